// svgame — server game module
//
// The host server loads this module and calls the `ServerGame_*` entry points
// by name. We bind the host's exported functions through
// `native::NativeImports` and drive a `ServerGame` from them.

pub mod config;
pub mod game;
pub mod imports;
pub mod native;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::GameConfig;
pub use game::{ExportInfo, ServerGame, SERVER_GAME_API_VERSION};
pub use imports::ServerImports;
pub use native::{ImportError, NativeImports};
pub use session::{ClientSession, ClientState, SessionError, Sessions};
