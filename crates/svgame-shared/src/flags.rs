// flags.rs — bit flag sets shared with the host
//
// Each set uses the same integer width as the host field it lands in.
// Composite masks are unions of the primitive bits.

use bitflags::bitflags;

bitflags! {
    /// Brush and entity contents (`CONTENTS_*` / `MASK_*`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ContentFlags: u32 {
        const SOLID        = 0x00000001;
        const WINDOW       = 0x00000002;
        const AUX          = 0x00000004;
        const LAVA         = 0x00000008;
        const SLIME        = 0x00000010;
        const WATER        = 0x00000020;
        const MIST         = 0x00000040;

        const AREA_PORTAL  = 0x00008000;
        const PLAYER_CLIP  = 0x00010000;
        const MONSTER_CLIP = 0x00020000;

        const CURRENT_0    = 0x00040000;
        const CURRENT_90   = 0x00080000;
        const CURRENT_180  = 0x00100000;
        const CURRENT_270  = 0x00200000;
        const CURRENT_UP   = 0x00400000;
        const CURRENT_DOWN = 0x00800000;

        const ORIGIN       = 0x01000000;
        const MONSTER      = 0x02000000;
        const DEAD_MONSTER = 0x04000000;
        const DETAIL       = 0x08000000;
        const TRANSLUCENT  = 0x10000000;
        const LADDER       = 0x20000000;

        const MASK_ALL           = u32::MAX;
        const MASK_SOLID         = Self::SOLID.bits() | Self::WINDOW.bits();
        const MASK_PLAYER_SOLID  = Self::SOLID.bits() | Self::PLAYER_CLIP.bits()
                                 | Self::WINDOW.bits() | Self::MONSTER.bits();
        const MASK_DEAD_SOLID    = Self::SOLID.bits() | Self::PLAYER_CLIP.bits()
                                 | Self::WINDOW.bits();
        const MASK_MONSTER_SOLID = Self::SOLID.bits() | Self::MONSTER_CLIP.bits()
                                 | Self::WINDOW.bits() | Self::MONSTER.bits();
        const MASK_WATER         = Self::WATER.bits() | Self::LAVA.bits() | Self::SLIME.bits();
        const MASK_OPAQUE        = Self::SOLID.bits() | Self::SLIME.bits() | Self::LAVA.bits();
        const MASK_SHOT          = Self::SOLID.bits() | Self::MONSTER.bits()
                                 | Self::WINDOW.bits() | Self::DEAD_MONSTER.bits();
        const MASK_CURRENTS      = Self::CURRENT_0.bits() | Self::CURRENT_90.bits()
                                 | Self::CURRENT_180.bits() | Self::CURRENT_270.bits()
                                 | Self::CURRENT_UP.bits() | Self::CURRENT_DOWN.bits();
    }
}

impl ContentFlags {
    /// The host passes contents around as a plain `int`.
    pub fn from_native(contents: i32) -> Self {
        Self::from_bits_retain(contents as u32)
    }

    pub fn to_native(self) -> i32 {
        self.bits() as i32
    }
}

bitflags! {
    /// Surface flags carried by `Surface::flags`.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SurfaceFlags: i32 {
        const LIGHT    = 0x01;
        const SLICK    = 0x02;
        const SKY      = 0x04;
        const WARP     = 0x08;
        const TRANS33  = 0x10;
        const TRANS66  = 0x20;
        const FLOWING  = 0x40;
        const NO_DRAW  = 0x80;
    }
}

bitflags! {
    /// `cvar_t::flags`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CvarFlags: i32 {
        /// Saved to the config file
        const ARCHIVE     = 1;
        /// Added to userinfo when changed
        const USER_INFO   = 2;
        /// Added to serverinfo when changed
        const SERVER_INFO = 4;
        /// Only settable from the command line
        const READ_ONLY   = 8;
        /// Held until the next map restart
        const LATCHED     = 16;
    }
}

bitflags! {
    /// `pmove_state_t::pm_flags`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PmoveFlags: u8 {
        const DUCKED         = 1;
        const JUMP_HELD      = 2;
        const ON_GROUND      = 4;
        /// pm_time is waterjump
        const TIME_WATER_JUMP = 8;
        /// pm_time is time before rejump
        const TIME_LAND      = 16;
        /// pm_time is non-moving time
        const TIME_TELEPORT  = 32;
        /// Temporarily disables prediction (used for grappling hook)
        const NO_PREDICTION  = 64;
    }
}

bitflags! {
    /// `usercmd_t::buttons`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct UserCmdButtons: u8 {
        const ATTACK = 1;
        const USE    = 2;
        /// Any key whatsoever
        const ANY    = 128;
    }
}

bitflags! {
    /// `entity_state_t::renderfx`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RenderEffects: i32 {
        /// Always have some light (viewmodel)
        const MIN_LIGHT       = 0x00000001;
        /// Don't draw through eyes, only mirrors
        const VIEWER_MODEL    = 0x00000002;
        /// Only draw through eyes
        const WEAPON_MODEL    = 0x00000004;
        const FULL_BRIGHT     = 0x00000008;
        /// For view weapon Z crunching
        const DEPTH_HACK      = 0x00000010;
        const TRANSLUCENT     = 0x00000020;
        const FRAME_LERP      = 0x00000040;
        const BEAM            = 0x00000080;
        /// skin is an index in image_precache
        const CUSTOM_SKIN     = 0x00000100;
        /// Pulse lighting for bonus items
        const GLOW            = 0x00000200;
        const SHELL_RED       = 0x00000400;
        const SHELL_GREEN     = 0x00000800;
        const SHELL_BLUE      = 0x00001000;
        const IR_VISIBLE      = 0x00008000;
        const SHELL_DOUBLE    = 0x00010000;
        const SHELL_HALF_DAM  = 0x00020000;
        const USE_DISGUISE    = 0x00040000;
    }
}

bitflags! {
    /// `player_state_t::rdflags`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct RenderDefFlags: i32 {
        const UNDER_WATER    = 1;
        /// Used for player configuration screen
        const NO_WORLD_MODEL = 2;
        const IR_GOGGLES     = 4;
        const UV_GOGGLES     = 8;
    }
}

bitflags! {
    /// `edict_t::svflags`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ServerFlags: i32 {
        /// Don't send entity to clients, even if it has effects
        const NO_CLIENT     = 0x00000001;
        /// Treat as CONTENTS_DEADMONSTER for collision
        const DEAD_MONSTER  = 0x00000002;
        /// Treat as CONTENTS_MONSTER for collision
        const MONSTER       = 0x00000004;
    }
}

bitflags! {
    /// `entity_state_t::effects`
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EntityEffects: u32 {
        const ROTATE             = 0x00000001;
        const GIB                = 0x00000002;
        const BLASTER            = 0x00000008;
        const ROCKET             = 0x00000010;
        const GRENADE            = 0x00000020;
        const HYPER_BLASTER      = 0x00000040;
        const BFG                = 0x00000080;
        const COLOR_SHELL        = 0x00000100;
        const POWER_SCREEN       = 0x00000200;
        const ANIM01             = 0x00000400;
        const ANIM23             = 0x00000800;
        const ANIM_ALL           = 0x00001000;
        const ANIM_ALL_FAST      = 0x00002000;
        const FLIES              = 0x00004000;
        const QUAD               = 0x00008000;
        const PENT               = 0x00010000;
        const TELEPORTER         = 0x00020000;
        const FLAG1              = 0x00040000;
        const FLAG2              = 0x00080000;
        const ION_RIPPER         = 0x00100000;
        const GREEN_GIB          = 0x00200000;
        const BLUE_HYPER_BLASTER = 0x00400000;
        const SPINNING_LIGHTS    = 0x00800000;
        const PLASMA             = 0x01000000;
        const TRAP               = 0x02000000;
        const TRACKER            = 0x04000000;
        const DOUBLE             = 0x08000000;
        const SPHERE_TRANS       = 0x10000000;
        const TAG_TRAIL          = 0x20000000;
        const HALF_DAMAGE        = 0x40000000;
        const TRACKER_TRAIL      = 0x80000000;
    }
}
