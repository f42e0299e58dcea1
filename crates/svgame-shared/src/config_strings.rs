// config_strings.rs — config string index space
//
// Config strings are broadcast to clients by index. The index space is a
// series of ranges, one per resource kind, each sized by its level limit.
// PLAYER_SKINS starts at LIGHTS + MAX_ITEMS, so it shares its first index
// with ITEMS. Hosts built against this table depend on those numbers.

use crate::limits::{LevelLimits, StringLimits};

pub const NAME: usize = 0;
pub const CD_TRACK: usize = 1;
pub const SKY: usize = 2;
/// String representation of a vec3_t
pub const SKY_AXIS: usize = 3;
pub const SKY_ROTATE: usize = 4;
/// Status bar layout program. Spans every slot up to AIR_ACCELERATION.
pub const STATUS_BAR: usize = 5;

pub const AIR_ACCELERATION: usize = 29;
pub const MAX_CLIENTS: usize = 30;
/// For catching cheater maps
pub const MAP_CHECKSUM: usize = 31;

pub const MODELS: usize = 32;
pub const SOUNDS: usize = MODELS + LevelLimits::MAX_MODELS;
pub const IMAGES: usize = SOUNDS + LevelLimits::MAX_SOUNDS;
pub const LIGHTS: usize = IMAGES + LevelLimits::MAX_IMAGES;
pub const ITEMS: usize = LIGHTS + LevelLimits::MAX_LIGHT_STYLES;
pub const PLAYER_SKINS: usize = LIGHTS + LevelLimits::MAX_ITEMS;
pub const GENERAL: usize = PLAYER_SKINS + LevelLimits::MAX_CLIENTS;
pub const TOTAL_CONFIG_STRINGS: usize = GENERAL + LevelLimits::MAX_GENERAL;

/// Bytes available at `index`. Slots in `[STATUS_BAR, AIR_ACCELERATION)` may
/// run on into the slots after them.
pub const fn size(index: usize) -> usize {
    if index >= STATUS_BAR && index < AIR_ACCELERATION {
        StringLimits::QPATH * (AIR_ACCELERATION - index)
    } else {
        StringLimits::QPATH
    }
}

/// Range an index belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigStringKind {
    Name,
    CdTrack,
    Sky,
    SkyAxis,
    SkyRotate,
    StatusBar,
    AirAcceleration,
    MaxClients,
    MapChecksum,
    Model(usize),
    Sound(usize),
    Image(usize),
    Light(usize),
    /// Items and player skins share a range; the index is relative to ITEMS.
    ItemOrPlayerSkin(usize),
    General(usize),
}

/// Classify `index`. `None` past the end of the table.
pub fn kind(index: usize) -> Option<ConfigStringKind> {
    use ConfigStringKind::*;
    let k = match index {
        NAME => Name,
        CD_TRACK => CdTrack,
        SKY => Sky,
        SKY_AXIS => SkyAxis,
        SKY_ROTATE => SkyRotate,
        i if i < AIR_ACCELERATION => StatusBar,
        AIR_ACCELERATION => AirAcceleration,
        MAX_CLIENTS => MaxClients,
        MAP_CHECKSUM => MapChecksum,
        i if i < SOUNDS => Model(i - MODELS),
        i if i < IMAGES => Sound(i - SOUNDS),
        i if i < LIGHTS => Image(i - IMAGES),
        i if i < ITEMS => Light(i - LIGHTS),
        i if i < GENERAL => ItemOrPlayerSkin(i - ITEMS),
        i if i < TOTAL_CONFIG_STRINGS => General(i - GENERAL),
        _ => return None,
    };
    Some(k)
}
