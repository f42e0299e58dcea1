// layout.rs — layout pinning and whole-record access
//
// A shifted field cannot be detected at runtime, so sizes and offsets of
// every shared record are checked at compile time. Records holding pointers
// are only pinned on 64-bit targets.

use std::mem::{offset_of, size_of};

use bytemuck::Pod;

use crate::math::{Vector3, Vector4};
use crate::types::{
    Client, Cvar, Edict, EdictHandle, EntityState, Link, Plane, PlayerState, PmoveInterop,
    PmoveState, Surface, TraceResult, UserCmd,
};

// ============================================================
// Pointer-free records
// ============================================================

const _: () = assert!(size_of::<Vector3>() == 12);
const _: () = assert!(size_of::<Vector4>() == 16);

const _: () = assert!(size_of::<EntityState>() == 84);
const _: () = assert!(offset_of!(EntityState, number) == 0);
const _: () = assert!(offset_of!(EntityState, origin) == 4);
const _: () = assert!(offset_of!(EntityState, angles) == 16);
const _: () = assert!(offset_of!(EntityState, old_origin) == 28);
const _: () = assert!(offset_of!(EntityState, model_index) == 40);
const _: () = assert!(offset_of!(EntityState, model_index4) == 52);
const _: () = assert!(offset_of!(EntityState, frame) == 56);
const _: () = assert!(offset_of!(EntityState, effects) == 64);
const _: () = assert!(offset_of!(EntityState, solid) == 72);
const _: () = assert!(offset_of!(EntityState, event) == 80);

const _: () = assert!(size_of::<PmoveState>() == 28);
const _: () = assert!(offset_of!(PmoveState, origin) == 4);
const _: () = assert!(offset_of!(PmoveState, velocity) == 10);
const _: () = assert!(offset_of!(PmoveState, pm_flags) == 16);
const _: () = assert!(offset_of!(PmoveState, pm_time) == 17);
const _: () = assert!(offset_of!(PmoveState, gravity) == 18);
const _: () = assert!(offset_of!(PmoveState, delta_angles) == 20);

const _: () = assert!(size_of::<UserCmd>() == 16);
const _: () = assert!(offset_of!(UserCmd, angles) == 2);
const _: () = assert!(offset_of!(UserCmd, forward_move) == 8);
const _: () = assert!(offset_of!(UserCmd, impulse) == 14);
const _: () = assert!(offset_of!(UserCmd, light_level) == 15);

const _: () = assert!(size_of::<PlayerState>() == 184);
const _: () = assert!(offset_of!(PlayerState, view_angles) == 28);
const _: () = assert!(offset_of!(PlayerState, gun_index) == 88);
const _: () = assert!(offset_of!(PlayerState, blend) == 96);
const _: () = assert!(offset_of!(PlayerState, fov) == 112);
const _: () = assert!(offset_of!(PlayerState, rd_flags) == 116);
const _: () = assert!(offset_of!(PlayerState, stats) == 120);

const _: () = assert!(size_of::<Client>() == 192);
const _: () = assert!(offset_of!(Client, ping) == 184);
const _: () = assert!(offset_of!(Client, client_number) == 188);

const _: () = assert!(size_of::<Plane>() == 20);
const _: () = assert!(offset_of!(Plane, plane_type) == 16);
const _: () = assert!(size_of::<Surface>() == 24);
const _: () = assert!(offset_of!(Surface, flags) == 16);

// ============================================================
// Pointer-bearing records
// ============================================================

const _: () = assert!(size_of::<EdictHandle>() == size_of::<*mut Edict>());

#[cfg(target_pointer_width = "64")]
mod pinned64 {
    use super::*;

    const _: () = assert!(size_of::<Link>() == 16);

    const _: () = assert!(size_of::<TraceResult>() == 72);
    const _: () = assert!(offset_of!(TraceResult, end_pos) == 12);
    const _: () = assert!(offset_of!(TraceResult, plane) == 24);
    const _: () = assert!(offset_of!(TraceResult, surface) == 48);
    const _: () = assert!(offset_of!(TraceResult, contents) == 56);
    const _: () = assert!(offset_of!(TraceResult, entity) == 64);

    const _: () = assert!(size_of::<Edict>() == 280);
    const _: () = assert!(offset_of!(Edict, client) == 88);
    const _: () = assert!(offset_of!(Edict, in_use) == 96);
    const _: () = assert!(offset_of!(Edict, area) == 104);
    const _: () = assert!(offset_of!(Edict, num_clusters) == 120);
    const _: () = assert!(offset_of!(Edict, head_node) == 188);
    const _: () = assert!(offset_of!(Edict, server_flags) == 200);
    const _: () = assert!(offset_of!(Edict, mins) == 204);
    const _: () = assert!(offset_of!(Edict, solid) == 264);
    const _: () = assert!(offset_of!(Edict, owner) == 272);

    const _: () = assert!(size_of::<PmoveInterop>() == 384);
    const _: () = assert!(offset_of!(PmoveInterop, cmd) == 28);
    const _: () = assert!(offset_of!(PmoveInterop, touch_entities) == 56);
    const _: () = assert!(offset_of!(PmoveInterop, view_angles) == 312);
    const _: () = assert!(offset_of!(PmoveInterop, ground_entity) == 352);
    const _: () = assert!(offset_of!(PmoveInterop, trace) == 368);
    const _: () = assert!(offset_of!(PmoveInterop, point_contents) == 376);

    const _: () = assert!(size_of::<Cvar>() == 48);
    const _: () = assert!(offset_of!(Cvar, value) == 32);
    const _: () = assert!(offset_of!(Cvar, next) == 40);
}

// ============================================================
// Whole-record access
// ============================================================

/// Copy a whole record out of host memory.
///
/// # Safety
/// `addr` must point at a readable, initialized `T`. Alignment is not required.
pub unsafe fn read_record<T: Copy>(addr: *const T) -> T {
    std::ptr::read_unaligned(addr)
}

/// Overwrite a whole record in host memory.
///
/// # Safety
/// `addr` must point at writable memory large enough for `T`. Alignment is
/// not required.
pub unsafe fn write_record<T: Copy>(addr: *mut T, value: T) {
    std::ptr::write_unaligned(addr, value)
}

/// Decode a plain-data record from the front of `bytes`. `None` if too short.
pub fn record_from_bytes<T: Pod>(bytes: &[u8]) -> Option<T> {
    let n = size_of::<T>();
    if bytes.len() < n {
        return None;
    }
    Some(bytemuck::pod_read_unaligned(&bytes[..n]))
}

/// The raw bytes of a plain-data record, as the host would see them.
pub fn record_bytes<T: Pod>(value: &T) -> &[u8] {
    bytemuck::bytes_of(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Golden table of (record, field, offset) from the host headers.
    #[test]
    fn test_golden_offsets() {
        let table: &[(&str, usize, usize)] = &[
            ("EntityState.number", offset_of!(EntityState, number), 0),
            ("EntityState.origin", offset_of!(EntityState, origin), 4),
            ("EntityState.model_index2", offset_of!(EntityState, model_index2), 44),
            ("EntityState.model_index3", offset_of!(EntityState, model_index3), 48),
            ("EntityState.skin_number", offset_of!(EntityState, skin_number), 60),
            ("EntityState.render_fx", offset_of!(EntityState, render_fx), 68),
            ("EntityState.sound", offset_of!(EntityState, sound), 76),
            ("PmoveState.pm_type", offset_of!(PmoveState, pm_type), 0),
            ("PlayerState.pmove", offset_of!(PlayerState, pmove), 0),
            ("PlayerState.view_offset", offset_of!(PlayerState, view_offset), 40),
            ("PlayerState.kick_angles", offset_of!(PlayerState, kick_angles), 52),
            ("PlayerState.gun_angles", offset_of!(PlayerState, gun_angles), 64),
            ("PlayerState.gun_offset", offset_of!(PlayerState, gun_offset), 76),
            ("PlayerState.gun_frame", offset_of!(PlayerState, gun_frame), 92),
            ("UserCmd.msec", offset_of!(UserCmd, msec), 0),
            ("UserCmd.buttons", offset_of!(UserCmd, buttons), 1),
            ("UserCmd.side_move", offset_of!(UserCmd, side_move), 10),
            ("UserCmd.up_move", offset_of!(UserCmd, up_move), 12),
            ("Plane.dist", offset_of!(Plane, dist), 12),
            ("Plane.sign_bits", offset_of!(Plane, sign_bits), 17),
            ("Plane.pad", offset_of!(Plane, pad), 18),
            ("Surface.value", offset_of!(Surface, value), 20),
            ("TraceResult.all_solid", offset_of!(TraceResult, all_solid), 0),
            ("TraceResult.start_solid", offset_of!(TraceResult, start_solid), 4),
            ("TraceResult.fraction", offset_of!(TraceResult, fraction), 8),
            ("Edict.state", offset_of!(Edict, state), 0),
            ("Edict.link_count", offset_of!(Edict, link_count), 100),
            ("Edict.cluster_numbers", offset_of!(Edict, cluster_numbers), 124),
            ("Edict.area_number", offset_of!(Edict, area_number), 192),
            ("Edict.area_number2", offset_of!(Edict, area_number2), 196),
            ("Edict.maxs", offset_of!(Edict, maxs), 216),
            ("Edict.abs_min", offset_of!(Edict, abs_min), 228),
            ("Edict.abs_max", offset_of!(Edict, abs_max), 240),
            ("Edict.size", offset_of!(Edict, size), 252),
            ("Edict.clip_mask", offset_of!(Edict, clip_mask), 268),
            ("PmoveInterop.snap_initial", offset_of!(PmoveInterop, snap_initial), 44),
            ("PmoveInterop.num_touch", offset_of!(PmoveInterop, num_touch), 48),
            ("PmoveInterop.view_height", offset_of!(PmoveInterop, view_height), 324),
            ("PmoveInterop.mins", offset_of!(PmoveInterop, mins), 328),
            ("PmoveInterop.maxs", offset_of!(PmoveInterop, maxs), 340),
            ("PmoveInterop.water_type", offset_of!(PmoveInterop, water_type), 360),
            ("PmoveInterop.water_level", offset_of!(PmoveInterop, water_level), 364),
            ("Cvar.string", offset_of!(Cvar, string), 8),
            ("Cvar.latched_string", offset_of!(Cvar, latched_string), 16),
            ("Cvar.flags", offset_of!(Cvar, flags), 24),
            ("Cvar.modified", offset_of!(Cvar, modified), 28),
        ];
        for &(name, actual, expected) in table {
            assert_eq!(actual, expected, "{} offset", name);
        }
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(size_of::<EntityState>(), 84);
        assert_eq!(size_of::<PlayerState>(), 184);
        assert_eq!(size_of::<Edict>(), 280);
        assert_eq!(size_of::<PmoveInterop>(), 384);
        assert_eq!(size_of::<TraceResult>(), 72);
        assert_eq!(size_of::<Cvar>(), 48);
    }

    #[test]
    fn test_read_write_record_unaligned() {
        let mut buf = vec![0u8; size_of::<UserCmd>() + 1];
        let cmd = UserCmd { msec: 16, forward_move: 400, impulse: 3, ..Default::default() };
        unsafe {
            let addr = buf.as_mut_ptr().add(1) as *mut UserCmd;
            write_record(addr, cmd);
            assert_eq!(read_record(addr), cmd);
        }
        assert_eq!(buf[1], 16);
    }

    #[test]
    fn test_record_bytes() {
        let mut s = EntityState::default();
        s.number = 0x01020304;
        s.event = 6;
        let bytes = record_bytes(&s);
        assert_eq!(bytes.len(), 84);
        assert_eq!(&bytes[0..4], &0x01020304i32.to_ne_bytes());
        assert_eq!(&bytes[80..84], &6i32.to_ne_bytes());
        assert_eq!(record_from_bytes::<EntityState>(bytes), Some(s));
        assert_eq!(record_from_bytes::<EntityState>(&bytes[..83]), None);
    }
}
