// types.rs — records shared with the host server
//
// Every record here is a view over memory the host reads and writes, so the
// field order and widths follow the host's structs exactly. Enum and flag
// fields hold the raw integer; typed accessors sit next to each record.
// Sizes and offsets are pinned in layout.rs.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::os::raw::{c_char, c_int};

use bytemuck::{Pod, Zeroable};

use crate::enums::{EntityEvent, PlayerStateStats, PmoveType, Solidity};
use crate::flags::{
    ContentFlags, CvarFlags, EntityEffects, PmoveFlags, RenderDefFlags, RenderEffects,
    ServerFlags, SurfaceFlags, UserCmdButtons,
};
use crate::math::{Vector3, Vector4};
use crate::strings::{narrow_to_string, write_narrow};

/// Most entities a single pmove can touch.
pub const MAX_TOUCH: usize = 32;
/// Most PVS clusters an edict is tracked in before falling back to headnode.
pub const MAX_ENT_CLUSTERS: usize = 16;

// ============================================================
// Handles
// ============================================================

/// Non-owning reference to a host object.
///
/// Just an address: copying, comparing and hashing it never touches the
/// pointee, and null means "none". The pointee is only reachable through
/// `borrow` / `borrow_mut`, whose lifetime the caller keeps inside the
/// current host call.
#[repr(transparent)]
pub struct Handle<T> {
    ptr: *mut T,
    _marker: PhantomData<*mut T>,
}

pub type EdictHandle = Handle<Edict>;
pub type ClientHandle = Handle<Client>;
pub type SurfaceHandle = Handle<Surface>;
pub type CvarHandle = Handle<Cvar>;

impl<T> Handle<T> {
    pub const fn null() -> Self {
        Self { ptr: std::ptr::null_mut(), _marker: PhantomData }
    }

    pub const fn from_ptr(ptr: *mut T) -> Self {
        Self { ptr, _marker: PhantomData }
    }

    pub const fn as_ptr(self) -> *mut T {
        self.ptr
    }

    pub fn is_null(self) -> bool {
        self.ptr.is_null()
    }

    /// # Safety
    /// The host must keep the pointee alive and unaliased by writers for `'a`.
    pub unsafe fn borrow<'a>(self) -> Option<&'a T> {
        self.ptr.as_ref()
    }

    /// # Safety
    /// As `borrow`, and no other reference to the pointee may exist for `'a`.
    pub unsafe fn borrow_mut<'a>(self) -> Option<&'a mut T> {
        self.ptr.as_mut()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.ptr as usize).hash(state);
    }
}

impl<T> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:p})", self.ptr)
    }
}

impl<T> From<*mut T> for Handle<T> {
    fn from(ptr: *mut T) -> Self {
        Self::from_ptr(ptr)
    }
}

// ============================================================
// Entity state
// ============================================================

/// `entity_state_t` — the part of an edict sent to clients.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EntityState {
    /// Edict index
    pub number: c_int,
    pub origin: Vector3,
    pub angles: Vector3,
    /// For lerping
    pub old_origin: Vector3,
    pub model_index: c_int,
    /// Weapons, CTF flags, etc
    pub model_index2: c_int,
    pub model_index3: c_int,
    pub model_index4: c_int,
    pub frame: c_int,
    pub skin_number: c_int,
    pub effects: u32,
    pub render_fx: c_int,
    /// Packed bounding box for client side prediction, see `pack_solid`
    pub solid: c_int,
    /// For looping sounds, to guarantee shutoff
    pub sound: c_int,
    /// Impulse events, cleared after each frame
    pub event: c_int,
}

impl EntityState {
    pub fn effects(&self) -> EntityEffects {
        EntityEffects::from_bits_retain(self.effects)
    }

    pub fn render_effects(&self) -> RenderEffects {
        RenderEffects::from_bits_retain(self.render_fx)
    }

    pub fn event(&self) -> Option<EntityEvent> {
        EntityEvent::try_from(self.event).ok()
    }

    pub fn set_event(&mut self, event: EntityEvent) {
        self.event = event.into();
    }
}

/// Pack an axis aligned box into the 16 bits the host sends for prediction.
/// x/y use `maxs.x`, z down uses `-mins.z`, z up uses `maxs.z + 32`, all in
/// units of 8 and clamped to the field widths.
pub fn pack_solid(mins: Vector3, maxs: Vector3) -> c_int {
    let xy = ((maxs.x / 8.0) as i32).clamp(1, 31);
    let down = ((-mins.z / 8.0) as i32).clamp(1, 31);
    let up = (((maxs.z + 32.0) / 8.0) as i32).clamp(1, 63);
    (up << 10) | (down << 5) | xy
}

/// Inverse of [`pack_solid`], returns `(mins, maxs)`.
pub fn unpack_solid(solid: c_int) -> (Vector3, Vector3) {
    let xy = 8.0 * (solid & 31) as f32;
    let down = 8.0 * ((solid >> 5) & 31) as f32;
    let up = 8.0 * ((solid >> 10) & 63) as f32 - 32.0;
    (Vector3::new(-xy, -xy, -down), Vector3::new(xy, xy, up))
}

// ============================================================
// Player movement
// ============================================================

/// `pmove_state_t` — everything the client needs to predict movement.
/// Positions are 12.3 fixed point, see `math::coord_to_short`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PmoveState {
    pub pm_type: c_int,
    pub origin: [i16; 3],
    pub velocity: [i16; 3],
    pub pm_flags: u8,
    /// Each unit = 8 ms
    pub pm_time: u8,
    pub gravity: i16,
    /// Added to command angles to get view direction
    pub delta_angles: [i16; 3],
    pub _pad: [u8; 2],
}

impl PmoveState {
    pub fn pm_type(&self) -> Option<PmoveType> {
        PmoveType::try_from(self.pm_type).ok()
    }

    pub fn set_pm_type(&mut self, t: PmoveType) {
        self.pm_type = t.into();
    }

    pub fn flags(&self) -> PmoveFlags {
        PmoveFlags::from_bits_retain(self.pm_flags)
    }

    pub fn set_flags(&mut self, flags: PmoveFlags) {
        self.pm_flags = flags.bits();
    }

    pub fn origin(&self) -> Vector3 {
        Vector3::from_short_coordinates(self.origin)
    }

    pub fn set_origin(&mut self, v: Vector3) {
        self.origin = v.to_short_coordinates();
    }

    pub fn velocity(&self) -> Vector3 {
        Vector3::from_short_coordinates(self.velocity)
    }

    pub fn set_velocity(&mut self, v: Vector3) {
        self.velocity = v.to_short_coordinates();
    }
}

/// `usercmd_t` — one client input frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct UserCmd {
    pub msec: u8,
    pub buttons: u8,
    pub angles: [i16; 3],
    pub forward_move: i16,
    pub side_move: i16,
    pub up_move: i16,
    pub impulse: u8,
    /// Light level the player is standing on
    pub light_level: u8,
}

impl UserCmd {
    pub fn buttons(&self) -> UserCmdButtons {
        UserCmdButtons::from_bits_retain(self.buttons)
    }
}

/// Trace callback handed to the host's pmove.
pub type PmoveTraceFn = unsafe extern "C" fn(
    start: *const Vector3,
    mins: *const Vector3,
    maxs: *const Vector3,
    end: *const Vector3,
) -> TraceResult;

/// Point contents callback handed to the host's pmove.
pub type PmovePointContentsFn = unsafe extern "C" fn(point: *const Vector3) -> c_int;

/// `pmove_t` — in/out block for the host's player movement.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct PmoveInterop {
    // state (in / out)
    pub state: PmoveState,

    // command (in)
    pub cmd: UserCmd,
    /// If the state has been changed outside pmove
    pub snap_initial: c_int,

    // results (out)
    pub num_touch: c_int,
    pub touch_entities: [EdictHandle; MAX_TOUCH],

    /// Clamped
    pub view_angles: Vector3,
    pub view_height: f32,

    pub mins: Vector3,
    pub maxs: Vector3,

    pub ground_entity: EdictHandle,
    pub water_type: c_int,
    pub water_level: c_int,

    // callbacks to test the world
    pub trace: Option<PmoveTraceFn>,
    pub point_contents: Option<PmovePointContentsFn>,
}

impl Default for PmoveInterop {
    fn default() -> Self {
        Self {
            state: PmoveState::default(),
            cmd: UserCmd::default(),
            snap_initial: 0,
            num_touch: 0,
            touch_entities: [EdictHandle::null(); MAX_TOUCH],
            view_angles: Vector3::ZERO,
            view_height: 0.0,
            mins: Vector3::ZERO,
            maxs: Vector3::ZERO,
            ground_entity: EdictHandle::null(),
            water_type: 0,
            water_level: 0,
            trace: None,
            point_contents: None,
        }
    }
}

impl PmoveInterop {
    /// The touched entities, with `num_touch` clamped to the array.
    pub fn touched(&self) -> &[EdictHandle] {
        let n = (self.num_touch.max(0) as usize).min(MAX_TOUCH);
        &self.touch_entities[..n]
    }

    pub fn water_type(&self) -> ContentFlags {
        ContentFlags::from_native(self.water_type)
    }
}

// ============================================================
// Player state
// ============================================================

/// `player_state_t` — sent to the owning client every server frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PlayerState {
    pub pmove: PmoveState,

    // these fields do not need to be communicated bit-precise
    /// For fixed views
    pub view_angles: Vector3,
    /// Add to pmovestate->origin
    pub view_offset: Vector3,
    /// Add to view direction to get render angles
    pub kick_angles: Vector3,
    pub gun_angles: Vector3,
    pub gun_offset: Vector3,
    pub gun_index: c_int,
    pub gun_frame: c_int,
    /// rgba full screen effect
    pub blend: Vector4,
    pub fov: f32,
    pub rd_flags: c_int,
    pub stats: [i16; PlayerStateStats::MAXIMUM_STATS],
}

impl PlayerState {
    pub fn rd_flags(&self) -> RenderDefFlags {
        RenderDefFlags::from_bits_retain(self.rd_flags)
    }

    /// Stat slot value. Out of range slots read as zero.
    pub fn stat(&self, index: usize) -> i16 {
        self.stats.get(index).copied().unwrap_or(0)
    }

    /// Returns false when `index` is out of range.
    pub fn set_stat(&mut self, index: usize, value: i16) -> bool {
        match self.stats.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// `gclient_t` head — the part of the game's per client record the host
/// reads through `Edict::client`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Client {
    pub player_state: PlayerState,
    pub ping: c_int,
    /// Index into the host's client array
    pub client_number: c_int,
}

// ============================================================
// Collision
// ============================================================

/// `cplane_t`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Plane {
    pub normal: Vector3,
    pub dist: f32,
    /// For fast side tests
    pub plane_type: u8,
    /// signx + (signy<<1) + (signz<<2)
    pub sign_bits: u8,
    pub pad: [u8; 2],
}

/// `csurface_t`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Surface {
    pub name: [u8; 16],
    pub flags: c_int,
    pub value: c_int,
}

impl Surface {
    pub fn name(&self) -> String {
        narrow_to_string(&self.name)
    }

    pub fn set_name(&mut self, name: &str) {
        let n = write_narrow(&mut self.name, name);
        self.name[n..].fill(0);
    }

    pub fn flags(&self) -> SurfaceFlags {
        SurfaceFlags::from_bits_retain(self.flags)
    }
}

/// `trace_t` — result of a line or box sweep.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResult {
    /// If true, plane is not valid
    pub all_solid: c_int,
    /// If true, the initial point was in a solid area
    pub start_solid: c_int,
    /// 1.0 = didn't hit anything
    pub fraction: f32,
    /// Final position
    pub end_pos: Vector3,
    /// Surface normal at impact
    pub plane: Plane,
    /// Surface hit
    pub surface: SurfaceHandle,
    /// Contents on other side of surface hit
    pub contents: c_int,
    /// Not set by CM_*() functions
    pub entity: EdictHandle,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self {
            all_solid: 0,
            start_solid: 0,
            fraction: 1.0,
            end_pos: Vector3::ZERO,
            plane: Plane::default(),
            surface: SurfaceHandle::null(),
            contents: 0,
            entity: EdictHandle::null(),
        }
    }
}

impl TraceResult {
    /// False only for a clean miss: full fraction, never in solid.
    pub fn is_impact(&self) -> bool {
        !(self.fraction == 1.0 && self.all_solid == 0 && self.start_solid == 0)
    }

    pub fn contents(&self) -> ContentFlags {
        ContentFlags::from_native(self.contents)
    }
}

// ============================================================
// Edicts
// ============================================================

/// `link_t` — node in the host's area lists.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Link {
    pub prev: *mut Link,
    pub next: *mut Link,
}

impl Default for Link {
    fn default() -> Self {
        Self { prev: std::ptr::null_mut(), next: std::ptr::null_mut() }
    }
}

/// `edict_t` — the part of a server entity the host reads. Index 0 of the
/// table is the world, followed by one slot per client.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Edict {
    pub state: EntityState,
    /// Null if not a player
    pub client: ClientHandle,
    pub in_use: c_int,
    pub link_count: c_int,

    // host private
    pub area: Link,
    pub num_clusters: c_int,
    pub cluster_numbers: [c_int; MAX_ENT_CLUSTERS],
    /// Unused if num_clusters != -1
    pub head_node: c_int,
    pub area_number: c_int,
    pub area_number2: c_int,

    pub server_flags: c_int,
    pub mins: Vector3,
    pub maxs: Vector3,
    pub abs_min: Vector3,
    pub abs_max: Vector3,
    pub size: Vector3,
    pub solid: c_int,
    pub clip_mask: c_int,
    pub owner: EdictHandle,
}

impl Default for Edict {
    fn default() -> Self {
        Self {
            state: EntityState::default(),
            client: ClientHandle::null(),
            in_use: 0,
            link_count: 0,
            area: Link::default(),
            num_clusters: 0,
            cluster_numbers: [0; MAX_ENT_CLUSTERS],
            head_node: 0,
            area_number: 0,
            area_number2: 0,
            server_flags: 0,
            mins: Vector3::ZERO,
            maxs: Vector3::ZERO,
            abs_min: Vector3::ZERO,
            abs_max: Vector3::ZERO,
            size: Vector3::ZERO,
            solid: 0,
            clip_mask: 0,
            owner: EdictHandle::null(),
        }
    }
}

impl Edict {
    pub fn in_use(&self) -> bool {
        self.in_use != 0
    }

    pub fn server_flags(&self) -> ServerFlags {
        ServerFlags::from_bits_retain(self.server_flags)
    }

    pub fn set_server_flags(&mut self, flags: ServerFlags) {
        self.server_flags = flags.bits();
    }

    pub fn solidity(&self) -> Option<Solidity> {
        Solidity::try_from(self.solid).ok()
    }

    pub fn set_solidity(&mut self, solid: Solidity) {
        self.solid = solid.into();
    }

    pub fn clip_mask(&self) -> ContentFlags {
        ContentFlags::from_native(self.clip_mask)
    }

    /// Clusters the edict is linked into, empty when the host fell back to headnode.
    pub fn clusters(&self) -> &[c_int] {
        let n = (self.num_clusters.max(0) as usize).min(MAX_ENT_CLUSTERS);
        &self.cluster_numbers[..n]
    }
}

/// Address of edict `n` in a table with stride `edict_size`.
///
/// # Safety
/// `base` must point at a table of at least `n + 1` entries of `edict_size` bytes.
pub unsafe fn edict_at(base: *mut Edict, edict_size: usize, n: usize) -> EdictHandle {
    EdictHandle::from_ptr((base as *mut u8).add(edict_size * n) as *mut Edict)
}

/// Index of `ent` in the table at `base`, `None` for null or misaligned handles.
pub fn edict_index(base: *const Edict, edict_size: usize, ent: EdictHandle) -> Option<usize> {
    if ent.is_null() || base.is_null() || edict_size == 0 {
        return None;
    }
    let offset = (ent.as_ptr() as usize).checked_sub(base as usize)?;
    if offset % edict_size != 0 {
        return None;
    }
    Some(offset / edict_size)
}

// ============================================================
// Cvars
// ============================================================

/// `cvar_t` — owned by the host, reached through `CvarHandle`.
#[repr(C)]
#[derive(Debug)]
pub struct Cvar {
    pub name: *mut c_char,
    pub string: *mut c_char,
    /// For CVAR_LATCH vars
    pub latched_string: *mut c_char,
    pub flags: c_int,
    /// Set each time the cvar is changed
    pub modified: c_int,
    pub value: f32,
    pub next: *mut Cvar,
}

impl Cvar {
    pub fn flags(&self) -> CvarFlags {
        CvarFlags::from_bits_retain(self.flags)
    }
}

impl Handle<Cvar> {
    /// Numeric value, or `default` for a null handle.
    ///
    /// # Safety
    /// A non-null handle must point at a live host cvar.
    pub unsafe fn value_or(self, default: f32) -> f32 {
        self.borrow().map(|c| c.value).unwrap_or(default)
    }

    /// String value, or `default` for a null handle or null string.
    ///
    /// # Safety
    /// A non-null handle must point at a live host cvar.
    pub unsafe fn string_or(self, default: &str) -> String {
        match self.borrow() {
            Some(c) if !c.string.is_null() => crate::strings::c_str_to_string(c.string),
            _ => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_handle_null_and_eq() {
        let a = EdictHandle::null();
        assert!(a.is_null());
        assert_eq!(a, EdictHandle::default());
        assert!(unsafe { a.borrow() }.is_none());

        let mut e = Edict::default();
        let h = EdictHandle::from_ptr(&mut e);
        assert!(!h.is_null());
        assert_ne!(h, a);
        assert_eq!(h, EdictHandle::from(&mut e as *mut Edict));
    }

    #[test]
    fn test_handle_borrow_mut_writes_through() {
        let mut e = Edict::default();
        let h = EdictHandle::from_ptr(&mut e);
        unsafe {
            h.borrow_mut().unwrap().state.number = 7;
        }
        assert_eq!(e.state.number, 7);
    }

    #[test]
    fn test_pack_solid_roundtrip() {
        // Standard player box
        let mins = Vector3::new(-16.0, -16.0, -24.0);
        let maxs = Vector3::new(16.0, 16.0, 32.0);
        let packed = pack_solid(mins, maxs);
        assert_eq!(packed, (8 << 10) | (3 << 5) | 2);
        assert_eq!(unpack_solid(packed), (mins, maxs));
    }

    #[test]
    fn test_pack_solid_clamps() {
        let packed = pack_solid(Vector3::new(0.0, 0.0, -1000.0), Vector3::new(1000.0, 1000.0, 1000.0));
        assert_eq!(packed & 31, 31);
        assert_eq!((packed >> 5) & 31, 31);
        assert_eq!((packed >> 10) & 63, 63);

        let tiny = pack_solid(Vector3::ZERO, Vector3::ZERO);
        // z up of 0 packs to 4, the others clamp up to 1
        assert_eq!(tiny, (4 << 10) | (1 << 5) | 1);
    }

    #[test]
    fn test_trace_impact() {
        let mut t = TraceResult::default();
        assert!(!t.is_impact());
        t.fraction = 0.5;
        assert!(t.is_impact());
        t.fraction = 1.0;
        t.start_solid = 1;
        assert!(t.is_impact());
        t.start_solid = 0;
        t.all_solid = 1;
        assert!(t.is_impact());
    }

    #[test]
    fn test_pmove_state_accessors() {
        let mut s = PmoveState::default();
        s.set_pm_type(PmoveType::Spectator);
        s.set_flags(PmoveFlags::DUCKED | PmoveFlags::ON_GROUND);
        s.set_origin(Vector3::new(1.5, -2.0, 100.125));
        assert_eq!(s.pm_type(), Some(PmoveType::Spectator));
        assert_eq!(s.pm_flags, 5);
        assert_eq!(s.origin, [12, -16, 801]);
        assert_eq!(s.origin(), Vector3::new(1.5, -2.0, 100.125));

        s.pm_type = 42;
        assert_eq!(s.pm_type(), None);
    }

    #[test]
    fn test_player_stats_bounds() {
        let mut ps = PlayerState::default();
        assert!(ps.set_stat(PlayerStateStats::HEALTH, 100));
        assert_eq!(ps.stat(PlayerStateStats::HEALTH), 100);
        assert!(!ps.set_stat(PlayerStateStats::MAXIMUM_STATS, 1));
        assert_eq!(ps.stat(PlayerStateStats::MAXIMUM_STATS), 0);
    }

    #[test]
    fn test_pmove_touched_clamped() {
        let mut pm = PmoveInterop::default();
        let mut e = Edict::default();
        pm.touch_entities[0] = EdictHandle::from_ptr(&mut e);
        pm.num_touch = 1;
        assert_eq!(pm.touched().len(), 1);
        pm.num_touch = 100;
        assert_eq!(pm.touched().len(), MAX_TOUCH);
        pm.num_touch = -3;
        assert!(pm.touched().is_empty());
    }

    #[test]
    fn test_surface_name() {
        let mut s = Surface::default();
        s.set_name("e1u1/floor1_3_long_name");
        assert_eq!(s.name(), "e1u1/floor1_3_lo");
        s.set_name("sky1");
        assert_eq!(s.name(), "sky1");
        assert_eq!(s.name[4..], [0u8; 12]);
    }

    #[test]
    fn test_edict_table_arithmetic() {
        let mut table = vec![Edict::default(); 8];
        let base = table.as_mut_ptr();
        let size = std::mem::size_of::<Edict>();
        for n in 0..8 {
            let h = unsafe { edict_at(base, size, n) };
            assert_eq!(h.as_ptr(), &mut table[n] as *mut Edict);
            assert_eq!(edict_index(base, size, h), Some(n));
        }
        assert_eq!(edict_index(base, size, EdictHandle::null()), None);
    }

    #[test]
    fn test_edict_typed_fields() {
        let mut e = Edict::default();
        e.set_server_flags(ServerFlags::MONSTER);
        e.set_solidity(Solidity::BoundingBox);
        e.num_clusters = 2;
        e.cluster_numbers[..2].copy_from_slice(&[4, 9]);
        assert_eq!(e.server_flags, 4);
        assert_eq!(e.solid, 2);
        assert_eq!(e.clusters(), &[4, 9]);
        e.num_clusters = -1;
        assert!(e.clusters().is_empty());
        assert!(!e.in_use());
    }

    #[test]
    fn test_cvar_handle_fallbacks() {
        let null = CvarHandle::null();
        assert_eq!(unsafe { null.value_or(4.0) }, 4.0);
        assert_eq!(unsafe { null.string_or("4") }, "4");

        let name = CString::new("maxclients").unwrap();
        let value = CString::new("8").unwrap();
        let mut cvar = Cvar {
            name: name.as_ptr() as *mut c_char,
            string: value.as_ptr() as *mut c_char,
            latched_string: std::ptr::null_mut(),
            flags: (CvarFlags::SERVER_INFO | CvarFlags::LATCHED).bits(),
            modified: 0,
            value: 8.0,
            next: std::ptr::null_mut(),
        };
        let h = CvarHandle::from_ptr(&mut cvar);
        assert_eq!(unsafe { h.value_or(4.0) }, 8.0);
        assert_eq!(unsafe { h.string_or("4") }, "8");
        assert!(cvar.flags().contains(CvarFlags::LATCHED));
    }
}
