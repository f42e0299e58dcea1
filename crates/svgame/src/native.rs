// native.rs — host imports bound by exported symbol name
//
// The host server exports each import as a plain cdecl function named
// `SV_Mono_Export_<Name>`. They are resolved once, from the host process
// itself, when the game is initialized.

use std::os::raw::{c_char, c_int};

use libloading::Library;
use thiserror::Error;

use svgame_shared::enums::{AreaType, GamePrintLevel, Multicast};
use svgame_shared::flags::{ContentFlags, CvarFlags};
use svgame_shared::strings::{c_str_to_string, to_narrow_cstring};
use svgame_shared::types::{Cvar, CvarHandle, Edict, EdictHandle, PmoveInterop, TraceResult};
use svgame_shared::Vector3;

use crate::imports::ServerImports;

/// Why the import table could not be bound.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open host module: {0}")]
    HostModule(#[source] libloading::Error),
    #[error("failed to open host module '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: libloading::Error,
    },
    #[error("host does not export `{symbol}`")]
    MissingSymbol {
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
}

/// Exported host symbols, in import table order.
pub mod symbols {
    pub const CONFIG_STRING: &str = "SV_Mono_Export_ConfigString";
    pub const MODEL_INDEX: &str = "SV_Mono_Export_ModelIndex";
    pub const SOUND_INDEX: &str = "SV_Mono_Export_SoundIndex";
    pub const IMAGE_INDEX: &str = "SV_Mono_Export_ImageIndex";
    pub const SET_MODEL: &str = "SV_Mono_Export_SetModel";
    pub const BPRINTF: &str = "SV_Mono_Export_BPrintf";
    pub const DPRINTF: &str = "SV_Mono_Export_DPrintf";
    pub const CPRINTF: &str = "SV_Mono_Export_CPrintf";
    pub const CENTER_PRINT: &str = "SV_Mono_Export_CenterPrint";
    pub const ERROR: &str = "SV_Mono_Export_Error";
    pub const START_SOUND: &str = "SV_Mono_Export_StartSound";
    pub const START_POSITIONED_SOUND: &str = "SV_Mono_Export_StartPositionedSound";
    pub const UNICAST: &str = "SV_Mono_Export_MSG_Unicast";
    pub const MULTICAST: &str = "SV_Mono_Export_MSG_Multicast";
    pub const WRITE_FLOAT: &str = "SV_Mono_Export_MSG_WriteFloat";
    pub const WRITE_CHAR: &str = "SV_Mono_Export_MSG_WriteChar";
    pub const WRITE_BYTE: &str = "SV_Mono_Export_MSG_WriteByte";
    pub const WRITE_SHORT: &str = "SV_Mono_Export_MSG_WriteShort";
    pub const WRITE_LONG: &str = "SV_Mono_Export_MSG_WriteLong";
    pub const WRITE_STRING: &str = "SV_Mono_Export_MSG_WriteString";
    pub const WRITE_POSITION: &str = "SV_Mono_Export_MSG_WritePos";
    pub const WRITE_ANGLE: &str = "SV_Mono_Export_MSG_WriteAngle";
    pub const LINK_ENTITY: &str = "SV_Mono_Export_LinkEntity";
    pub const UNLINK_ENTITY: &str = "SV_Mono_Export_UnlinkEntity";
    pub const IN_VIS: &str = "SV_Mono_Export_inVIS";
    pub const IN_PVS: &str = "SV_Mono_Export_inPVS";
    pub const IN_PHS: &str = "SV_Mono_Export_inPHS";
    pub const SET_AREA_PORTAL_STATE: &str = "SV_Mono_Export_SetAreaPortalState";
    pub const AREAS_CONNECTED: &str = "SV_Mono_Export_AreasConnected";
    pub const TRACE: &str = "SV_Mono_Export_Trace";
    pub const POINT_CONTENTS: &str = "SV_Mono_Export_PointContents";
    pub const AREA_EDICTS: &str = "SV_Mono_Export_AreaEdicts";
    pub const PMOVE: &str = "SV_Mono_Export_Pmove";
    pub const CVAR: &str = "SV_Mono_Export_CVar";
    pub const CVAR_SET: &str = "SV_Mono_Export_CVar_Set";
    pub const CVAR_FORCE_SET: &str = "SV_Mono_Export_CVar_ForceSet";
    pub const CMD_ARGC: &str = "SV_Mono_Export_CmdArgc";
    pub const CMD_ARGV: &str = "SV_Mono_Export_CmdArgv";
    pub const CMD_ARGS: &str = "SV_Mono_Export_CmdArgs";
    pub const ADD_COMMAND_STRING: &str = "SV_Mono_Export_AddCommandString";
    pub const DEBUG_GRAPH: &str = "SV_Mono_Export_DebugGraph";

    pub const ALL: &[&str] = &[
        CONFIG_STRING, MODEL_INDEX, SOUND_INDEX, IMAGE_INDEX, SET_MODEL,
        BPRINTF, DPRINTF, CPRINTF, CENTER_PRINT, ERROR,
        START_SOUND, START_POSITIONED_SOUND,
        UNICAST, MULTICAST, WRITE_FLOAT, WRITE_CHAR, WRITE_BYTE, WRITE_SHORT,
        WRITE_LONG, WRITE_STRING, WRITE_POSITION, WRITE_ANGLE,
        LINK_ENTITY, UNLINK_ENTITY, IN_VIS, IN_PVS, IN_PHS,
        SET_AREA_PORTAL_STATE, AREAS_CONNECTED,
        TRACE, POINT_CONTENTS, AREA_EDICTS, PMOVE,
        CVAR, CVAR_SET, CVAR_FORCE_SET,
        CMD_ARGC, CMD_ARGV, CMD_ARGS, ADD_COMMAND_STRING, DEBUG_GRAPH,
    ];
}

type V3 = *const Vector3;

/// Raw host entry points, copied out of the library once bound.
struct NativeFns {
    config_string: unsafe extern "C" fn(c_int, *const c_char),
    model_index: unsafe extern "C" fn(*const c_char) -> c_int,
    sound_index: unsafe extern "C" fn(*const c_char) -> c_int,
    image_index: unsafe extern "C" fn(*const c_char) -> c_int,
    set_model: unsafe extern "C" fn(*mut Edict, *const c_char),
    bprintf: unsafe extern "C" fn(c_int, *const c_char),
    dprintf: unsafe extern "C" fn(*const c_char),
    cprintf: unsafe extern "C" fn(*mut Edict, c_int, *const c_char),
    center_print: unsafe extern "C" fn(*mut Edict, *const c_char),
    error: unsafe extern "C" fn(*const c_char),
    start_sound: unsafe extern "C" fn(*mut Edict, c_int, c_int, f32, f32, f32),
    start_positioned_sound: unsafe extern "C" fn(V3, *mut Edict, c_int, c_int, f32, f32, f32),
    unicast: unsafe extern "C" fn(*mut Edict, c_int),
    multicast: unsafe extern "C" fn(V3, c_int),
    write_float: unsafe extern "C" fn(f32),
    write_char: unsafe extern "C" fn(c_int),
    write_byte: unsafe extern "C" fn(c_int),
    write_short: unsafe extern "C" fn(c_int),
    write_long: unsafe extern "C" fn(c_int),
    write_string: unsafe extern "C" fn(*const c_char),
    write_position: unsafe extern "C" fn(V3),
    write_angle: unsafe extern "C" fn(f32),
    link_entity: unsafe extern "C" fn(*mut Edict),
    unlink_entity: unsafe extern "C" fn(*mut Edict),
    in_vis: unsafe extern "C" fn(V3, V3, c_int) -> c_int,
    in_pvs: unsafe extern "C" fn(V3, V3) -> c_int,
    in_phs: unsafe extern "C" fn(V3, V3) -> c_int,
    set_area_portal_state: unsafe extern "C" fn(c_int, c_int),
    areas_connected: unsafe extern "C" fn(c_int, c_int) -> c_int,
    trace: unsafe extern "C" fn(V3, V3, V3, V3, *mut Edict, c_int) -> TraceResult,
    point_contents: unsafe extern "C" fn(V3) -> c_int,
    area_edicts: unsafe extern "C" fn(V3, V3, *mut *mut Edict, c_int, c_int) -> c_int,
    pmove: unsafe extern "C" fn(*mut PmoveInterop),
    cvar: unsafe extern "C" fn(*const c_char, *const c_char, c_int) -> *mut Cvar,
    cvar_set: unsafe extern "C" fn(*const c_char, *const c_char) -> *mut Cvar,
    cvar_force_set: unsafe extern "C" fn(*const c_char, *const c_char) -> *mut Cvar,
    cmd_argc: unsafe extern "C" fn() -> c_int,
    cmd_argv: unsafe extern "C" fn(c_int) -> *const c_char,
    cmd_args: unsafe extern "C" fn() -> *const c_char,
    add_command_string: unsafe extern "C" fn(*const c_char),
    debug_graph: unsafe extern "C" fn(f32, c_int),
}

/// Import table backed by the host's exported functions.
pub struct NativeImports {
    fns: NativeFns,
    /// The library handle must outlive the copied function pointers
    _library: Option<Library>,
}

/// Copy one function pointer out of `library`.
unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T, ImportError> {
    let sym = library
        .get::<T>(name.as_bytes())
        .map_err(|source| ImportError::MissingSymbol { symbol: name, source })?;
    Ok(*sym)
}

#[cfg(unix)]
fn host_process() -> Result<Library, ImportError> {
    Ok(libloading::os::unix::Library::this().into())
}

#[cfg(windows)]
fn host_process() -> Result<Library, ImportError> {
    libloading::os::windows::Library::this()
        .map(Into::into)
        .map_err(ImportError::HostModule)
}

impl NativeImports {
    /// Bind every import from the process that loaded us.
    ///
    /// # Safety
    /// The host must export each symbol with the signature declared here.
    pub unsafe fn bind() -> Result<Self, ImportError> {
        Self::bind_library(host_process()?)
    }

    /// Bind every import from the shared object at `path`.
    ///
    /// # Safety
    /// As `bind`; loading `path` also runs its initializers.
    pub unsafe fn open(path: &str) -> Result<Self, ImportError> {
        let library = Library::new(path).map_err(|source| ImportError::Open {
            path: path.to_string(),
            source,
        })?;
        Self::bind_library(library)
    }

    unsafe fn bind_library(library: Library) -> Result<Self, ImportError> {
        use symbols::*;
        let lib = &library;
        let fns = NativeFns {
            config_string: symbol(lib, CONFIG_STRING)?,
            model_index: symbol(lib, MODEL_INDEX)?,
            sound_index: symbol(lib, SOUND_INDEX)?,
            image_index: symbol(lib, IMAGE_INDEX)?,
            set_model: symbol(lib, SET_MODEL)?,
            bprintf: symbol(lib, BPRINTF)?,
            dprintf: symbol(lib, DPRINTF)?,
            cprintf: symbol(lib, CPRINTF)?,
            center_print: symbol(lib, CENTER_PRINT)?,
            error: symbol(lib, ERROR)?,
            start_sound: symbol(lib, START_SOUND)?,
            start_positioned_sound: symbol(lib, START_POSITIONED_SOUND)?,
            unicast: symbol(lib, UNICAST)?,
            multicast: symbol(lib, MULTICAST)?,
            write_float: symbol(lib, WRITE_FLOAT)?,
            write_char: symbol(lib, WRITE_CHAR)?,
            write_byte: symbol(lib, WRITE_BYTE)?,
            write_short: symbol(lib, WRITE_SHORT)?,
            write_long: symbol(lib, WRITE_LONG)?,
            write_string: symbol(lib, WRITE_STRING)?,
            write_position: symbol(lib, WRITE_POSITION)?,
            write_angle: symbol(lib, WRITE_ANGLE)?,
            link_entity: symbol(lib, LINK_ENTITY)?,
            unlink_entity: symbol(lib, UNLINK_ENTITY)?,
            in_vis: symbol(lib, IN_VIS)?,
            in_pvs: symbol(lib, IN_PVS)?,
            in_phs: symbol(lib, IN_PHS)?,
            set_area_portal_state: symbol(lib, SET_AREA_PORTAL_STATE)?,
            areas_connected: symbol(lib, AREAS_CONNECTED)?,
            trace: symbol(lib, TRACE)?,
            point_contents: symbol(lib, POINT_CONTENTS)?,
            area_edicts: symbol(lib, AREA_EDICTS)?,
            pmove: symbol(lib, PMOVE)?,
            cvar: symbol(lib, CVAR)?,
            cvar_set: symbol(lib, CVAR_SET)?,
            cvar_force_set: symbol(lib, CVAR_FORCE_SET)?,
            cmd_argc: symbol(lib, CMD_ARGC)?,
            cmd_argv: symbol(lib, CMD_ARGV)?,
            cmd_args: symbol(lib, CMD_ARGS)?,
            add_command_string: symbol(lib, ADD_COMMAND_STRING)?,
            debug_graph: symbol(lib, DEBUG_GRAPH)?,
        };
        tracing::debug!(count = symbols::ALL.len(), "bound host imports");
        Ok(Self { fns, _library: Some(library) })
    }

    /// Import table over functions that are not looked up in a library.
    #[cfg(test)]
    fn from_fns(fns: NativeFns) -> Self {
        Self { fns, _library: None }
    }
}

impl ServerImports for NativeImports {
    fn config_string(&self, index: i32, value: &str) {
        let value = to_narrow_cstring(value);
        unsafe { (self.fns.config_string)(index, value.as_ptr()) }
    }

    fn model_index(&self, name: &str) -> i32 {
        let name = to_narrow_cstring(name);
        unsafe { (self.fns.model_index)(name.as_ptr()) }
    }

    fn sound_index(&self, name: &str) -> i32 {
        let name = to_narrow_cstring(name);
        unsafe { (self.fns.sound_index)(name.as_ptr()) }
    }

    fn image_index(&self, name: &str) -> i32 {
        let name = to_narrow_cstring(name);
        unsafe { (self.fns.image_index)(name.as_ptr()) }
    }

    fn set_model(&self, ent: EdictHandle, name: &str) {
        let name = to_narrow_cstring(name);
        unsafe { (self.fns.set_model)(ent.as_ptr(), name.as_ptr()) }
    }

    fn bprint(&self, level: GamePrintLevel, msg: &str) {
        let msg = to_narrow_cstring(msg);
        unsafe { (self.fns.bprintf)(level.into(), msg.as_ptr()) }
    }

    fn dprint(&self, msg: &str) {
        let msg = to_narrow_cstring(msg);
        unsafe { (self.fns.dprintf)(msg.as_ptr()) }
    }

    fn cprint(&self, ent: EdictHandle, level: GamePrintLevel, msg: &str) {
        let msg = to_narrow_cstring(msg);
        unsafe { (self.fns.cprintf)(ent.as_ptr(), level.into(), msg.as_ptr()) }
    }

    fn center_print(&self, ent: EdictHandle, msg: &str) {
        let msg = to_narrow_cstring(msg);
        unsafe { (self.fns.center_print)(ent.as_ptr(), msg.as_ptr()) }
    }

    fn error(&self, msg: &str) {
        let msg = to_narrow_cstring(msg);
        unsafe { (self.fns.error)(msg.as_ptr()) }
    }

    fn start_sound(
        &self,
        ent: EdictHandle,
        channel: i32,
        sound_index: i32,
        volume: f32,
        attenuation: f32,
        time_offset: f32,
    ) {
        unsafe {
            (self.fns.start_sound)(ent.as_ptr(), channel, sound_index, volume, attenuation, time_offset)
        }
    }

    fn start_positioned_sound(
        &self,
        origin: Vector3,
        ent: EdictHandle,
        channel: i32,
        sound_index: i32,
        volume: f32,
        attenuation: f32,
        time_offset: f32,
    ) {
        unsafe {
            (self.fns.start_positioned_sound)(
                &origin,
                ent.as_ptr(),
                channel,
                sound_index,
                volume,
                attenuation,
                time_offset,
            )
        }
    }

    fn unicast(&self, ent: EdictHandle, reliable: bool) {
        unsafe { (self.fns.unicast)(ent.as_ptr(), reliable as c_int) }
    }

    fn multicast(&self, origin: Vector3, to: Multicast) {
        unsafe { (self.fns.multicast)(&origin, to.into()) }
    }

    fn write_float(&self, f: f32) {
        unsafe { (self.fns.write_float)(f) }
    }

    fn write_char(&self, c: i32) {
        unsafe { (self.fns.write_char)(c) }
    }

    fn write_byte(&self, c: i32) {
        unsafe { (self.fns.write_byte)(c) }
    }

    fn write_short(&self, c: i32) {
        unsafe { (self.fns.write_short)(c) }
    }

    fn write_long(&self, c: i32) {
        unsafe { (self.fns.write_long)(c) }
    }

    fn write_string(&self, s: &str) {
        let s = to_narrow_cstring(s);
        unsafe { (self.fns.write_string)(s.as_ptr()) }
    }

    fn write_position(&self, pos: Vector3) {
        unsafe { (self.fns.write_position)(&pos) }
    }

    fn write_angle(&self, f: f32) {
        unsafe { (self.fns.write_angle)(f) }
    }

    fn link_entity(&self, ent: EdictHandle) {
        unsafe { (self.fns.link_entity)(ent.as_ptr()) }
    }

    fn unlink_entity(&self, ent: EdictHandle) {
        unsafe { (self.fns.unlink_entity)(ent.as_ptr()) }
    }

    fn in_vis(&self, p1: Vector3, p2: Vector3, vis: i32) -> bool {
        unsafe { (self.fns.in_vis)(&p1, &p2, vis) != 0 }
    }

    fn in_pvs(&self, p1: Vector3, p2: Vector3) -> bool {
        unsafe { (self.fns.in_pvs)(&p1, &p2) != 0 }
    }

    fn in_phs(&self, p1: Vector3, p2: Vector3) -> bool {
        unsafe { (self.fns.in_phs)(&p1, &p2) != 0 }
    }

    fn set_area_portal_state(&self, portal: i32, open: bool) {
        unsafe { (self.fns.set_area_portal_state)(portal, open as c_int) }
    }

    fn areas_connected(&self, area1: i32, area2: i32) -> bool {
        unsafe { (self.fns.areas_connected)(area1, area2) != 0 }
    }

    fn trace(
        &self,
        start: Vector3,
        mins: Vector3,
        maxs: Vector3,
        end: Vector3,
        pass_edict: EdictHandle,
        content_mask: ContentFlags,
    ) -> TraceResult {
        unsafe {
            (self.fns.trace)(&start, &mins, &maxs, &end, pass_edict.as_ptr(), content_mask.to_native())
        }
    }

    fn point_contents(&self, point: Vector3) -> ContentFlags {
        ContentFlags::from_native(unsafe { (self.fns.point_contents)(&point) })
    }

    fn area_edicts(
        &self,
        mins: Vector3,
        maxs: Vector3,
        max_count: usize,
        area_type: AreaType,
    ) -> Vec<EdictHandle> {
        let max_count = max_count.min(c_int::MAX as usize);
        let mut list: Vec<*mut Edict> = vec![std::ptr::null_mut(); max_count];
        let found = unsafe {
            (self.fns.area_edicts)(
                &mins,
                &maxs,
                list.as_mut_ptr(),
                max_count as c_int,
                area_type.into(),
            )
        };
        list.truncate((found.max(0) as usize).min(max_count));
        list.into_iter().map(EdictHandle::from_ptr).collect()
    }

    fn pmove(&self, pm: &mut PmoveInterop) {
        unsafe { (self.fns.pmove)(pm) }
    }

    fn cvar(&self, name: &str, value: &str, flags: CvarFlags) -> CvarHandle {
        let name = to_narrow_cstring(name);
        let value = to_narrow_cstring(value);
        CvarHandle::from_ptr(unsafe { (self.fns.cvar)(name.as_ptr(), value.as_ptr(), flags.bits()) })
    }

    fn cvar_set(&self, name: &str, value: &str) -> CvarHandle {
        let name = to_narrow_cstring(name);
        let value = to_narrow_cstring(value);
        CvarHandle::from_ptr(unsafe { (self.fns.cvar_set)(name.as_ptr(), value.as_ptr()) })
    }

    fn cvar_force_set(&self, name: &str, value: &str) -> CvarHandle {
        let name = to_narrow_cstring(name);
        let value = to_narrow_cstring(value);
        CvarHandle::from_ptr(unsafe { (self.fns.cvar_force_set)(name.as_ptr(), value.as_ptr()) })
    }

    fn argc(&self) -> i32 {
        unsafe { (self.fns.cmd_argc)() }
    }

    fn argv(&self, n: i32) -> String {
        unsafe { c_str_to_string((self.fns.cmd_argv)(n)) }
    }

    fn args(&self) -> String {
        unsafe { c_str_to_string((self.fns.cmd_args)()) }
    }

    fn add_command_string(&self, text: &str) {
        let text = to_narrow_cstring(text);
        unsafe { (self.fns.add_command_string)(text.as_ptr()) }
    }

    fn debug_graph(&self, value: f32, color: i32) {
        unsafe { (self.fns.debug_graph)(value, color) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::ffi::CStr;

    #[test]
    fn test_symbol_names_unique_and_prefixed() {
        let mut seen = HashSet::new();
        for name in symbols::ALL {
            assert!(name.starts_with("SV_Mono_Export_"), "{}", name);
            assert!(seen.insert(*name), "duplicate symbol {}", name);
        }
        assert_eq!(symbols::ALL.len(), 41);
    }

    #[test]
    fn test_position_writer_symbol() {
        assert_eq!(symbols::WRITE_POSITION, "SV_Mono_Export_MSG_WritePos");
    }

    #[test]
    fn test_bind_fails_without_host() {
        // The test binary does not export the host functions.
        match unsafe { NativeImports::bind() } {
            Err(ImportError::MissingSymbol { symbol, .. }) => {
                assert_eq!(symbol, symbols::CONFIG_STRING)
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("binding should fail outside the host"),
        }
    }

    #[test]
    fn test_open_missing_library() {
        let err = unsafe { NativeImports::open("/nonexistent/libhost.so") }
            .err()
            .expect("open should fail");
        assert!(matches!(err, ImportError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/libhost.so"));
    }

    // ---- marshalling against an in-process host ----

    /// What the in-process host saw and what it answers with.
    #[derive(Default)]
    struct FakeHost {
        strings: Vec<Vec<u8>>,
        ints: Vec<c_int>,
        vectors: Vec<Vector3>,
        edicts: Vec<*mut Edict>,
        /// Count returned from area_edicts, regardless of what was written
        area_found: c_int,
        /// Answer for the visibility and connectivity queries
        answer: c_int,
        argv: Option<&'static CStr>,
        contents: c_int,
    }

    thread_local! {
        static HOST: RefCell<FakeHost> = RefCell::new(FakeHost::default());
    }

    fn host<R>(f: impl FnOnce(&mut FakeHost) -> R) -> R {
        HOST.with(|h| f(&mut h.borrow_mut()))
    }

    unsafe fn seen_str(s: *const c_char) {
        let bytes = CStr::from_ptr(s).to_bytes().to_vec();
        host(|h| h.strings.push(bytes));
    }

    unsafe fn seen_vec(v: V3) {
        let v = *v;
        host(|h| h.vectors.push(v));
    }

    fn seen_int(i: c_int) {
        host(|h| h.ints.push(i));
    }

    unsafe extern "C" fn h_int_str(i: c_int, s: *const c_char) {
        seen_int(i);
        seen_str(s);
    }
    unsafe extern "C" fn h_str_index(s: *const c_char) -> c_int {
        seen_str(s);
        7
    }
    unsafe extern "C" fn h_edict_str(_: *mut Edict, s: *const c_char) {
        seen_str(s);
    }
    unsafe extern "C" fn h_str(s: *const c_char) {
        seen_str(s);
    }
    unsafe extern "C" fn h_edict_int_str(_: *mut Edict, i: c_int, s: *const c_char) {
        seen_int(i);
        seen_str(s);
    }
    unsafe extern "C" fn h_sound(_: *mut Edict, channel: c_int, _: c_int, _: f32, _: f32, _: f32) {
        seen_int(channel);
    }
    unsafe extern "C" fn h_positioned_sound(
        origin: V3,
        _: *mut Edict,
        channel: c_int,
        _: c_int,
        _: f32,
        _: f32,
        _: f32,
    ) {
        seen_vec(origin);
        seen_int(channel);
    }
    unsafe extern "C" fn h_edict_int(_: *mut Edict, i: c_int) {
        seen_int(i);
    }
    unsafe extern "C" fn h_vec_int(v: V3, i: c_int) {
        seen_vec(v);
        seen_int(i);
    }
    unsafe extern "C" fn h_float(_: f32) {}
    unsafe extern "C" fn h_int(i: c_int) {
        seen_int(i);
    }
    unsafe extern "C" fn h_vec(v: V3) {
        seen_vec(v);
    }
    unsafe extern "C" fn h_edict(e: *mut Edict) {
        host(|h| h.edicts.push(e));
    }
    unsafe extern "C" fn h_vis(a: V3, b: V3, i: c_int) -> c_int {
        seen_vec(a);
        seen_vec(b);
        seen_int(i);
        host(|h| h.answer)
    }
    unsafe extern "C" fn h_two_vec(a: V3, b: V3) -> c_int {
        seen_vec(a);
        seen_vec(b);
        host(|h| h.answer)
    }
    unsafe extern "C" fn h_two_int(a: c_int, b: c_int) {
        seen_int(a);
        seen_int(b);
    }
    unsafe extern "C" fn h_two_int_ret(a: c_int, b: c_int) -> c_int {
        seen_int(a);
        seen_int(b);
        host(|h| h.answer)
    }
    unsafe extern "C" fn h_trace(
        start: V3,
        _: V3,
        _: V3,
        end: V3,
        _: *mut Edict,
        mask: c_int,
    ) -> TraceResult {
        seen_vec(start);
        seen_vec(end);
        seen_int(mask);
        TraceResult { fraction: 0.25, end_pos: *end * 0.25, ..TraceResult::default() }
    }
    unsafe extern "C" fn h_point_contents(p: V3) -> c_int {
        seen_vec(p);
        host(|h| h.contents)
    }
    unsafe extern "C" fn h_area_edicts(
        mins: V3,
        maxs: V3,
        list: *mut *mut Edict,
        max: c_int,
        area_type: c_int,
    ) -> c_int {
        seen_vec(mins);
        seen_vec(maxs);
        seen_int(area_type);
        // a well behaved host never writes past `max`
        for i in 0..max.max(0) as usize {
            *list.add(i) = (0x1000 + i * 0x10) as *mut Edict;
        }
        host(|h| h.area_found)
    }
    unsafe extern "C" fn h_pmove(pm: *mut PmoveInterop) {
        (*pm).num_touch = 3;
    }
    unsafe extern "C" fn h_cvar(name: *const c_char, value: *const c_char, flags: c_int) -> *mut Cvar {
        seen_str(name);
        seen_str(value);
        seen_int(flags);
        std::ptr::null_mut()
    }
    unsafe extern "C" fn h_cvar_set(name: *const c_char, value: *const c_char) -> *mut Cvar {
        seen_str(name);
        seen_str(value);
        std::ptr::null_mut()
    }
    unsafe extern "C" fn h_argc() -> c_int {
        2
    }
    unsafe extern "C" fn h_argv(n: c_int) -> *const c_char {
        seen_int(n);
        host(|h| h.argv.map_or(std::ptr::null(), |s| s.as_ptr()))
    }
    unsafe extern "C" fn h_args() -> *const c_char {
        std::ptr::null()
    }
    unsafe extern "C" fn h_debug_graph(_: f32, color: c_int) {
        seen_int(color);
    }

    fn fake_imports() -> NativeImports {
        host(|h| *h = FakeHost::default());
        NativeImports::from_fns(NativeFns {
            config_string: h_int_str,
            model_index: h_str_index,
            sound_index: h_str_index,
            image_index: h_str_index,
            set_model: h_edict_str,
            bprintf: h_int_str,
            dprintf: h_str,
            cprintf: h_edict_int_str,
            center_print: h_edict_str,
            error: h_str,
            start_sound: h_sound,
            start_positioned_sound: h_positioned_sound,
            unicast: h_edict_int,
            multicast: h_vec_int,
            write_float: h_float,
            write_char: h_int,
            write_byte: h_int,
            write_short: h_int,
            write_long: h_int,
            write_string: h_str,
            write_position: h_vec,
            write_angle: h_float,
            link_entity: h_edict,
            unlink_entity: h_edict,
            in_vis: h_vis,
            in_pvs: h_two_vec,
            in_phs: h_two_vec,
            set_area_portal_state: h_two_int,
            areas_connected: h_two_int_ret,
            trace: h_trace,
            point_contents: h_point_contents,
            area_edicts: h_area_edicts,
            pmove: h_pmove,
            cvar: h_cvar,
            cvar_set: h_cvar_set,
            cvar_force_set: h_cvar_set,
            cmd_argc: h_argc,
            cmd_argv: h_argv,
            cmd_args: h_args,
            add_command_string: h_str,
            debug_graph: h_debug_graph,
        })
    }

    fn box_of(v: f32) -> (Vector3, Vector3) {
        (Vector3::new(-v, -v, -v), Vector3::new(v, v, v))
    }

    #[test]
    fn test_area_edicts_never_exceeds_max_count() {
        let imports = fake_imports();
        let (mins, maxs) = box_of(64.0);

        host(|h| h.area_found = 100);
        let list = imports.area_edicts(mins, maxs, 4, AreaType::Solid);
        assert_eq!(list.len(), 4);
        assert_eq!(list[3].as_ptr() as usize, 0x1030);

        host(|h| h.area_found = 2);
        assert_eq!(imports.area_edicts(mins, maxs, 4, AreaType::Triggers).len(), 2);

        host(|h| h.area_found = -1);
        assert!(imports.area_edicts(mins, maxs, 4, AreaType::Solid).is_empty());

        host(|h| h.area_found = 5);
        assert!(imports.area_edicts(mins, maxs, 0, AreaType::Solid).is_empty());

        host(|h| {
            assert_eq!(h.vectors[..2], [mins, maxs]);
            assert_eq!(h.ints[..2], [1, 2]);
        });
    }

    #[test]
    fn test_bool_conversions() {
        let imports = fake_imports();
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-4.0, 5.5, 0.0);

        host(|h| h.answer = 2);
        assert!(imports.in_pvs(a, b));
        assert!(imports.in_vis(a, b, 1));
        assert!(imports.areas_connected(3, 4));
        host(|h| h.answer = 0);
        assert!(!imports.in_phs(a, b));
        assert!(!imports.areas_connected(3, 4));

        host(|h| h.ints.clear());
        imports.unicast(EdictHandle::null(), true);
        imports.unicast(EdictHandle::null(), false);
        imports.set_area_portal_state(9, true);
        imports.set_area_portal_state(9, false);
        host(|h| assert_eq!(h.ints, vec![1, 0, 9, 1, 9, 0]));
    }

    #[test]
    fn test_strings_cross_as_narrow_bytes() {
        let imports = fake_imports();
        imports.dprint("caf\u{e9}\n");
        imports.write_string("cut\0here");
        imports.bprint(GamePrintLevel::Chat, "hi");
        assert_eq!(imports.model_index("models/a.md2"), 7);

        host(|h| {
            assert_eq!(h.strings[0], b"caf\xe9\n".to_vec());
            assert_eq!(h.strings[1], b"cut".to_vec());
            assert_eq!(h.strings[2], b"hi".to_vec());
            assert_eq!(h.strings[3], b"models/a.md2".to_vec());
            assert_eq!(h.ints, vec![3]);
        });
    }

    #[test]
    fn test_strings_from_host() {
        let arg: &'static CStr = CStr::from_bytes_with_nul(b"caf\xe9\0").unwrap();
        let imports = fake_imports();
        host(|h| h.argv = Some(arg));
        assert_eq!(imports.argv(1), "caf\u{e9}");
        host(|h| h.argv = None);
        assert_eq!(imports.argv(2), "");
        assert_eq!(imports.args(), "");
        assert_eq!(imports.argc(), 2);
    }

    #[test]
    fn test_vectors_pass_by_pointer() {
        let imports = fake_imports();
        let pos = Vector3::new(511.9375, -512.0, 0.125);
        imports.write_position(pos);
        imports.multicast(pos, Multicast::PvsReliable);

        let start = Vector3::new(0.0, 0.0, 64.0);
        let end = Vector3::new(0.0, 0.0, -64.0);
        let tr = imports.trace(start, Vector3::ZERO, Vector3::ZERO, end, EdictHandle::null(), ContentFlags::MASK_SOLID);
        assert_eq!(tr.fraction, 0.25);
        assert_eq!(tr.end_pos, end * 0.25);
        assert!(tr.is_impact());

        host(|h| h.contents = ContentFlags::WATER.to_native());
        assert_eq!(imports.point_contents(pos), ContentFlags::WATER);

        host(|h| {
            assert_eq!(h.vectors, vec![pos, pos, start, end, pos]);
            assert_eq!(h.ints, vec![5, ContentFlags::MASK_SOLID.to_native()]);
        });
    }

    #[test]
    fn test_cvar_null_handle_and_pmove() {
        let imports = fake_imports();
        let handle = imports.cvar("maxclients", "4", CvarFlags::SERVER_INFO | CvarFlags::LATCHED);
        assert!(handle.is_null());
        assert_eq!(imports.cvar_value("maxclients", "4", CvarFlags::empty()), 4.0);
        host(|h| {
            assert_eq!(h.strings[..2], [b"maxclients".to_vec(), b"4".to_vec()]);
            assert_eq!(h.ints[0], (CvarFlags::SERVER_INFO | CvarFlags::LATCHED).bits());
        });

        let mut pm = PmoveInterop::default();
        imports.pmove(&mut pm);
        assert_eq!(pm.num_touch, 3);
    }
}
