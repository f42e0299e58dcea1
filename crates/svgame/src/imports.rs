//! Host import interface — functions the host server provides to the game.
//!
//! Every method mirrors one exported host function. Failures come back the
//! way the host reports them: index 0, a null handle, `false` or an empty
//! string. There is no error channel.

use svgame_shared::enums::{AreaType, GamePrintLevel, Multicast};
use svgame_shared::flags::{ContentFlags, CvarFlags};
use svgame_shared::types::{CvarHandle, EdictHandle, PmoveInterop, TraceResult};
use svgame_shared::Vector3;

/// Functions provided by the host to the game module.
pub trait ServerImports {
    // Config strings and precaching
    fn config_string(&self, index: i32, value: &str);
    fn model_index(&self, name: &str) -> i32;
    fn sound_index(&self, name: &str) -> i32;
    fn image_index(&self, name: &str) -> i32;
    fn set_model(&self, ent: EdictHandle, name: &str);

    // Printing
    fn bprint(&self, level: GamePrintLevel, msg: &str);
    fn dprint(&self, msg: &str);
    fn cprint(&self, ent: EdictHandle, level: GamePrintLevel, msg: &str);
    fn center_print(&self, ent: EdictHandle, msg: &str);
    /// Aborts the level on the host side.
    fn error(&self, msg: &str);

    // Sound
    fn start_sound(
        &self,
        ent: EdictHandle,
        channel: i32,
        sound_index: i32,
        volume: f32,
        attenuation: f32,
        time_offset: f32,
    );
    #[allow(clippy::too_many_arguments)]
    fn start_positioned_sound(
        &self,
        origin: Vector3,
        ent: EdictHandle,
        channel: i32,
        sound_index: i32,
        volume: f32,
        attenuation: f32,
        time_offset: f32,
    );

    // Network messages
    fn unicast(&self, ent: EdictHandle, reliable: bool);
    fn multicast(&self, origin: Vector3, to: Multicast);
    fn write_float(&self, f: f32);
    fn write_char(&self, c: i32);
    fn write_byte(&self, c: i32);
    fn write_short(&self, c: i32);
    fn write_long(&self, c: i32);
    fn write_string(&self, s: &str);
    fn write_position(&self, pos: Vector3);
    fn write_angle(&self, f: f32);

    // Linking and visibility
    fn link_entity(&self, ent: EdictHandle);
    fn unlink_entity(&self, ent: EdictHandle);
    fn in_vis(&self, p1: Vector3, p2: Vector3, vis: i32) -> bool;
    fn in_pvs(&self, p1: Vector3, p2: Vector3) -> bool;
    fn in_phs(&self, p1: Vector3, p2: Vector3) -> bool;
    fn set_area_portal_state(&self, portal: i32, open: bool);
    fn areas_connected(&self, area1: i32, area2: i32) -> bool;

    // World queries
    fn trace(
        &self,
        start: Vector3,
        mins: Vector3,
        maxs: Vector3,
        end: Vector3,
        pass_edict: EdictHandle,
        content_mask: ContentFlags,
    ) -> TraceResult;
    fn point_contents(&self, point: Vector3) -> ContentFlags;
    /// Edicts whose bounds touch the box, never more than `max_count`.
    fn area_edicts(
        &self,
        mins: Vector3,
        maxs: Vector3,
        max_count: usize,
        area_type: AreaType,
    ) -> Vec<EdictHandle>;
    fn pmove(&self, pm: &mut PmoveInterop);

    // Console variables
    fn cvar(&self, name: &str, value: &str, flags: CvarFlags) -> CvarHandle;
    fn cvar_set(&self, name: &str, value: &str) -> CvarHandle;
    fn cvar_force_set(&self, name: &str, value: &str) -> CvarHandle;

    // Console commands
    fn argc(&self) -> i32;
    fn argv(&self, n: i32) -> String;
    fn args(&self) -> String;
    fn add_command_string(&self, text: &str);

    fn debug_graph(&self, value: f32, color: i32);

    // ---- helpers built on the table ----

    /// Register (or fetch) a cvar and read its numeric value. A null handle
    /// falls back to the numeric value of `default`.
    fn cvar_value(&self, name: &str, default: &str, flags: CvarFlags) -> f32 {
        let handle = self.cvar(name, default, flags);
        let fallback = default.trim().parse().unwrap_or(0.0);
        unsafe { handle.value_or(fallback) }
    }

    /// Register (or fetch) a cvar and read its string value.
    fn cvar_string(&self, name: &str, default: &str, flags: CvarFlags) -> String {
        let handle = self.cvar(name, default, flags);
        unsafe { handle.string_or(default) }
    }

    /// Every argument of the current command, including the command name.
    fn argv_all(&self) -> Vec<String> {
        (0..self.argc().max(0)).map(|n| self.argv(n)).collect()
    }
}
