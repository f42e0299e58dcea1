// enums.rs — enumerations exchanged with the host
//
// Records store these as the raw integer the host writes; use `TryFrom` to
// get the typed value back. Unknown values are returned as the error.

/// Declares a fieldless enum with an explicit integer repr plus
/// `TryFrom<repr>` and `From<Enum> for repr`.
macro_rules! native_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $repr:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr($repr)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value ),+
        }

        impl TryFrom<$repr> for $name {
            type Error = $repr;

            fn try_from(v: $repr) -> Result<Self, $repr> {
                match v {
                    $( x if x == $value => Ok($name::$variant), )+
                    other => Err(other),
                }
            }
        }

        impl From<$name> for $repr {
            fn from(v: $name) -> $repr {
                v as $repr
            }
        }
    };
}

native_enum! {
    /// `pmtype_t`
    pub enum PmoveType: i32 {
        /// Can accelerate and turn
        Normal = 0,
        Spectator = 1,
        /// No acceleration or turning
        Dead = 2,
        Gib = 3,
        Freeze = 4,
    }
}

native_enum! {
    /// `solid_t`
    pub enum Solidity: i32 {
        /// No interaction with other objects
        None = 0,
        /// Only touch when inside, after moving
        Trigger = 1,
        /// Touch on edge
        BoundingBox = 2,
        /// BSP clip, touch on edge
        Bsp = 3,
    }
}

native_enum! {
    /// Which edicts `area_edicts` collects.
    pub enum AreaType: i32 {
        Solid = 1,
        Triggers = 2,
    }
}

native_enum! {
    /// `entity_state_t::event`. Cleared by the host after one frame.
    pub enum EntityEvent: i32 {
        None = 0,
        ItemRespawn = 1,
        Footstep = 2,
        FallShort = 3,
        Fall = 4,
        FallFar = 5,
        PlayerTeleport = 6,
        OtherTeleport = 7,
    }
}

native_enum! {
    /// Print level for `bprint` / `cprint`.
    pub enum GamePrintLevel: i32 {
        /// Pickup messages
        Low = 0,
        /// Death messages
        Medium = 1,
        /// Critical messages
        High = 2,
        Chat = 3,
    }
}

native_enum! {
    /// Destination set for `multicast`.
    pub enum Multicast: i32 {
        All = 0,
        Phs = 1,
        Pvs = 2,
        AllReliable = 3,
        PhsReliable = 4,
        PvsReliable = 5,
    }
}

native_enum! {
    pub enum SoundAttenuation: i32 {
        /// Full volume the entire level
        None = 0,
        Normal = 1,
        Idle = 2,
        /// Diminish very rapidly with distance
        Static = 3,
    }
}

native_enum! {
    /// Sound channel. The low bits pick the channel; see `SoundChannel::with_modifiers`.
    pub enum SoundChannel: i32 {
        Auto = 0,
        Weapon = 1,
        Voice = 2,
        Item = 3,
        Body = 4,
    }
}

impl SoundChannel {
    /// Send to all clients, not just ones in the PHS
    pub const NO_PHS_ADD: i32 = 8;
    /// Send by reliable message, not datagram
    pub const RELIABLE: i32 = 16;

    /// Channel number with modifier bits ORed in, as the host expects it.
    pub fn with_modifiers(self, modifiers: i32) -> i32 {
        self as i32 | (modifiers & (Self::NO_PHS_ADD | Self::RELIABLE))
    }
}

native_enum! {
    /// Server to client message ops. Only the first few are written by the game.
    pub enum ServerCommand: u8 {
        Bad = 0,
        MuzzleFlash = 1,
        MuzzleFlash2 = 2,
        TempEntity = 3,
        Layout = 4,
        Inventory = 5,

        // Private to client and server
        Nop = 6,
        Disconnect = 7,
        Reconnect = 8,
        Sound = 9,
        Print = 10,
        StuffText = 11,
        ServerData = 12,
        ConfigString = 13,
        SpawnBaseline = 14,
        CenterPrint = 15,
        Download = 16,
        PlayerInfo = 17,
        PacketEntities = 18,
        DeltaPacketEntities = 19,
        Frame = 20,

        // r1q2 / q2pro extensions
        ZPacket = 21,
        ZDownload = 22,
        GameState = 23,
        Setting = 24,
    }
}

impl ServerCommand {
    pub const NUM_TYPES: u8 = 25;

    /// True for the ops the game module may write itself.
    pub fn is_game_op(self) -> bool {
        (self as u8) >= ServerCommand::MuzzleFlash as u8 && (self as u8) <= ServerCommand::Inventory as u8
    }
}

/// Slots in `PlayerState::stats`.
pub struct PlayerStateStats;

impl PlayerStateStats {
    pub const HEALTH_ICON: usize = 0;
    pub const HEALTH: usize = 1;
    pub const AMMO_ICON: usize = 2;
    pub const AMMO: usize = 3;
    pub const ARMOR_ICON: usize = 4;
    pub const ARMOR: usize = 5;
    pub const SELECTED_ICON: usize = 6;
    pub const PICKUP_ICON: usize = 7;
    pub const PICKUP_STRING: usize = 8;
    pub const TIMER_ICON: usize = 9;
    pub const TIMER: usize = 10;
    pub const HELP_ICON: usize = 11;
    pub const SELECTED_ITEM: usize = 12;
    pub const LAYOUTS: usize = 13;
    pub const FRAGS: usize = 14;
    /// Cleared each frame, 1 = health, 2 = armor
    pub const FLASHES: usize = 15;
    pub const CHASE: usize = 16;
    pub const SPECTATOR: usize = 17;

    pub const MAXIMUM_STATS: usize = 32;
}
