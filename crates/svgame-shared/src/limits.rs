// limits.rs — fixed level and string limits agreed with the host

/// Per-level resource limits. These size the config string ranges and the
/// edict table.
pub struct LevelLimits;

impl LevelLimits {
    /// Absolute client limit, `maxclients` may be lower.
    pub const MAX_CLIENTS: usize = 256;
    /// Edict table size, includes the world and client slots.
    pub const MAX_EDICTS: usize = 1024;
    pub const MAX_LIGHT_STYLES: usize = 256;
    pub const MAX_MODELS: usize = 256;
    pub const MAX_SOUNDS: usize = 256;
    pub const MAX_IMAGES: usize = 256;
    pub const MAX_ITEMS: usize = 256;
    pub const MAX_GENERAL: usize = Self::MAX_CLIENTS * 2;
    pub const MAX_CLIENT_NAME: usize = 16;
}

/// Byte limits for strings crossing the boundary.
pub struct StringLimits;

impl StringLimits {
    pub const CHAR_BUFFER: usize = 4096;
    pub const TOKENS: usize = 256;
    pub const TOKEN_CHARACTERS: usize = 1024;
    pub const NET_STRING: usize = 2048;
    pub const NET_NAME: usize = 16;
    /// Game relative path, the width of one config string slot.
    pub const QPATH: usize = 64;
    pub const OS_PATH: usize = 256;
    pub const INFO_KEY: usize = 64;
    pub const INFO_VALUE: usize = 64;
    pub const INFO_STRING: usize = 512;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_limits() {
        assert_eq!(LevelLimits::MAX_CLIENTS, 256);
        assert_eq!(LevelLimits::MAX_EDICTS, 1024);
        assert_eq!(LevelLimits::MAX_GENERAL, 512);
        assert_eq!(LevelLimits::MAX_CLIENT_NAME, StringLimits::NET_NAME);
    }

    #[test]
    fn test_string_limits() {
        assert_eq!(StringLimits::CHAR_BUFFER, 4096);
        assert_eq!(StringLimits::NET_STRING, 2048);
        assert_eq!(StringLimits::QPATH, 64);
        assert_eq!(StringLimits::OS_PATH, 256);
        assert_eq!(StringLimits::INFO_STRING, 512);
    }
}
