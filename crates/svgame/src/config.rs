// config.rs — settings read from host cvars at Initialize

use svgame_shared::flags::CvarFlags;
use svgame_shared::limits::LevelLimits;

use crate::imports::ServerImports;

pub const MAXCLIENTS_DEFAULT: &str = "4";
pub const MAXENTITIES_DEFAULT: &str = "1024";
pub const TRACECALLS_DEFAULT: &str = "1";

/// Game settings, fixed for the life of one Initialize/Shutdown pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Client slots, edicts 1..=max_clients
    pub max_clients: usize,
    /// Edict table length, world and client slots included
    pub max_entities: usize,
    /// Echo every entry point through `dprint`
    pub trace_calls: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_clients: 4,
            max_entities: LevelLimits::MAX_EDICTS,
            trace_calls: true,
        }
    }
}

impl GameConfig {
    /// Register and read the game's cvars. Missing cvars fall back to defaults.
    pub fn from_cvars(imports: &dyn ServerImports) -> Self {
        let max_clients = imports.cvar_value(
            "maxclients",
            MAXCLIENTS_DEFAULT,
            CvarFlags::SERVER_INFO | CvarFlags::LATCHED,
        );
        let max_entities = imports.cvar_value("maxentities", MAXENTITIES_DEFAULT, CvarFlags::LATCHED);
        let trace_calls = imports.cvar_value("g_tracecalls", TRACECALLS_DEFAULT, CvarFlags::empty());

        Self::clamped(max_clients as i64, max_entities as i64, trace_calls != 0.0)
    }

    /// Build a config, pulling the counts into the range the edict table allows.
    pub fn clamped(max_clients: i64, max_entities: i64, trace_calls: bool) -> Self {
        let max_clients = max_clients.clamp(1, LevelLimits::MAX_CLIENTS as i64) as usize;
        let max_entities = max_entities
            .clamp(max_clients as i64 + 1, LevelLimits::MAX_EDICTS as i64) as usize;
        Self { max_clients, max_entities, trace_calls }
    }
}
