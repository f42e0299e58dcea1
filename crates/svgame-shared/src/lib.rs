// svgame-shared — records, flags and codecs shared between the server game
// module and the host server that loads it.

pub mod config_strings;
pub mod enums;
pub mod flags;
pub mod layout;
pub mod limits;
pub mod math;
pub mod strings;
pub mod types;

pub use math::{Vector3, Vector4};
pub use types::{
    Client, ClientHandle, Cvar, CvarHandle, Edict, EdictHandle, EntityState, Handle, PlayerState,
    PmoveInterop, PmoveState, SurfaceHandle, TraceResult, UserCmd,
};
