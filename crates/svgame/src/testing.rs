//! Recording import table for tests.
//!
//! `RecordingImports` answers every import with a fixed or configured value
//! and keeps a log of the calls it received. Clones share the same log, so a
//! test can hand one clone to the game and inspect the other.

use std::collections::HashMap;
use std::ffi::CString;
use std::sync::Arc;

use parking_lot::Mutex;

use svgame_shared::enums::{AreaType, GamePrintLevel, Multicast};
use svgame_shared::flags::{ContentFlags, CvarFlags};
use svgame_shared::types::{Cvar, CvarHandle, EdictHandle, PmoveInterop, TraceResult};
use svgame_shared::Vector3;

use crate::imports::ServerImports;

/// One recorded import call.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportCall {
    ConfigString(i32, String),
    ModelIndex(String),
    SoundIndex(String),
    ImageIndex(String),
    SetModel(EdictHandle, String),
    BPrint(GamePrintLevel, String),
    DPrint(String),
    CPrint(EdictHandle, GamePrintLevel, String),
    CenterPrint(EdictHandle, String),
    Error(String),
    StartSound { ent: EdictHandle, channel: i32, sound_index: i32 },
    StartPositionedSound { origin: Vector3, ent: EdictHandle, channel: i32, sound_index: i32 },
    Unicast(EdictHandle, bool),
    Multicast(Vector3, Multicast),
    WriteFloat(f32),
    WriteChar(i32),
    WriteByte(i32),
    WriteShort(i32),
    WriteLong(i32),
    WriteString(String),
    WritePosition(Vector3),
    WriteAngle(f32),
    LinkEntity(EdictHandle),
    UnlinkEntity(EdictHandle),
    InVis(Vector3, Vector3, i32),
    InPvs(Vector3, Vector3),
    InPhs(Vector3, Vector3),
    SetAreaPortalState(i32, bool),
    AreasConnected(i32, i32),
    Trace { start: Vector3, end: Vector3, pass_edict: EdictHandle, content_mask: ContentFlags },
    PointContents(Vector3),
    AreaEdicts { max_count: usize, area_type: AreaType },
    Pmove,
    Cvar(String, String, CvarFlags),
    CvarSet(String, String),
    CvarForceSet(String, String),
    Argc,
    Argv(i32),
    Args,
    AddCommandString(String),
    DebugGraph(f32, i32),
}

/// A cvar owned by the recorder. Boxed so handles stay valid as the map grows.
struct RecordedCvar {
    cvar: Cvar,
    _name: CString,
    string: CString,
}

impl RecordedCvar {
    fn new(name: &str, value: &str, flags: CvarFlags) -> Box<Self> {
        let name_c = CString::new(name).unwrap_or_default();
        let string = CString::new(value).unwrap_or_default();
        let mut slot = Box::new(Self {
            cvar: Cvar {
                name: std::ptr::null_mut(),
                string: std::ptr::null_mut(),
                latched_string: std::ptr::null_mut(),
                flags: flags.bits(),
                modified: 1,
                value: value.trim().parse().unwrap_or(0.0),
                next: std::ptr::null_mut(),
            },
            _name: name_c,
            string,
        });
        slot.cvar.name = slot._name.as_ptr() as *mut _;
        slot.cvar.string = slot.string.as_ptr() as *mut _;
        slot
    }

    fn set(&mut self, value: &str) {
        self.string = CString::new(value).unwrap_or_default();
        self.cvar.string = self.string.as_ptr() as *mut _;
        self.cvar.value = value.trim().parse().unwrap_or(0.0);
        self.cvar.modified = 1;
    }

    fn handle(&mut self) -> CvarHandle {
        CvarHandle::from_ptr(&mut self.cvar)
    }
}

/// Called after every recorded import, outside the recorder's lock.
pub type ImportHook = Arc<dyn Fn(&ImportCall) + Send + Sync>;

#[derive(Default)]
struct RecordingState {
    calls: Vec<ImportCall>,
    cvars: HashMap<String, Box<RecordedCvar>>,
    null_cvars: bool,
    args: Vec<String>,
    next_index: i32,
    trace_result: Option<TraceResult>,
    area_edicts: Vec<EdictHandle>,
    hook: Option<ImportHook>,
}

// Handles are only recorded and compared, never dereferenced, and each cvar
// only points into its own CStrings.
unsafe impl Send for RecordingState {}

/// Import table double that records every call.
#[derive(Clone, Default)]
pub struct RecordingImports {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingImports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset a cvar, as if the host config had set it.
    pub fn set_cvar(&self, name: &str, value: &str) {
        let mut state = self.state.lock();
        match state.cvars.get_mut(name) {
            Some(slot) => slot.set(value),
            None => {
                state.cvars.insert(name.to_string(), RecordedCvar::new(name, value, CvarFlags::empty()));
            }
        }
    }

    /// Make every cvar lookup return a null handle.
    pub fn fail_cvars(&self) {
        self.state.lock().null_cvars = true;
    }

    /// Set the tokens of the current console command.
    pub fn set_args(&self, args: &[&str]) {
        self.state.lock().args = args.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_trace_result(&self, trace: TraceResult) {
        self.state.lock().trace_result = Some(trace);
    }

    pub fn set_area_edicts(&self, edicts: Vec<EdictHandle>) {
        self.state.lock().area_edicts = edicts;
    }

    /// Run `hook` after each import, the way a host may call back into the
    /// game from inside an import.
    pub fn on_call(&self, hook: impl Fn(&ImportCall) + Send + Sync + 'static) {
        self.state.lock().hook = Some(Arc::new(hook));
    }

    pub fn calls(&self) -> Vec<ImportCall> {
        self.state.lock().calls.clone()
    }

    /// Messages sent through `dprint`, in order.
    pub fn dprints(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                ImportCall::DPrint(msg) => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.state.lock().calls.clear();
    }

    fn record(&self, call: ImportCall) {
        let hook = {
            let mut state = self.state.lock();
            state.calls.push(call.clone());
            state.hook.clone()
        };
        if let Some(hook) = hook {
            hook(&call);
        }
    }

    fn next_index(&self) -> i32 {
        let mut state = self.state.lock();
        state.next_index += 1;
        state.next_index
    }

    fn lookup_cvar(&self, name: &str, value: &str, flags: CvarFlags, overwrite: bool) -> CvarHandle {
        let mut state = self.state.lock();
        if state.null_cvars {
            return CvarHandle::null();
        }
        let slot = state
            .cvars
            .entry(name.to_string())
            .or_insert_with(|| RecordedCvar::new(name, value, flags));
        if overwrite {
            slot.set(value);
        }
        slot.cvar.flags |= flags.bits();
        slot.handle()
    }
}

impl ServerImports for RecordingImports {
    fn config_string(&self, index: i32, value: &str) {
        self.record(ImportCall::ConfigString(index, value.to_string()));
    }

    fn model_index(&self, name: &str) -> i32 {
        self.record(ImportCall::ModelIndex(name.to_string()));
        self.next_index()
    }

    fn sound_index(&self, name: &str) -> i32 {
        self.record(ImportCall::SoundIndex(name.to_string()));
        self.next_index()
    }

    fn image_index(&self, name: &str) -> i32 {
        self.record(ImportCall::ImageIndex(name.to_string()));
        self.next_index()
    }

    fn set_model(&self, ent: EdictHandle, name: &str) {
        self.record(ImportCall::SetModel(ent, name.to_string()));
    }

    fn bprint(&self, level: GamePrintLevel, msg: &str) {
        self.record(ImportCall::BPrint(level, msg.to_string()));
    }

    fn dprint(&self, msg: &str) {
        self.record(ImportCall::DPrint(msg.to_string()));
    }

    fn cprint(&self, ent: EdictHandle, level: GamePrintLevel, msg: &str) {
        self.record(ImportCall::CPrint(ent, level, msg.to_string()));
    }

    fn center_print(&self, ent: EdictHandle, msg: &str) {
        self.record(ImportCall::CenterPrint(ent, msg.to_string()));
    }

    fn error(&self, msg: &str) {
        self.record(ImportCall::Error(msg.to_string()));
    }

    fn start_sound(
        &self,
        ent: EdictHandle,
        channel: i32,
        sound_index: i32,
        _volume: f32,
        _attenuation: f32,
        _time_offset: f32,
    ) {
        self.record(ImportCall::StartSound { ent, channel, sound_index });
    }

    fn start_positioned_sound(
        &self,
        origin: Vector3,
        ent: EdictHandle,
        channel: i32,
        sound_index: i32,
        _volume: f32,
        _attenuation: f32,
        _time_offset: f32,
    ) {
        self.record(ImportCall::StartPositionedSound { origin, ent, channel, sound_index });
    }

    fn unicast(&self, ent: EdictHandle, reliable: bool) {
        self.record(ImportCall::Unicast(ent, reliable));
    }

    fn multicast(&self, origin: Vector3, to: Multicast) {
        self.record(ImportCall::Multicast(origin, to));
    }

    fn write_float(&self, f: f32) {
        self.record(ImportCall::WriteFloat(f));
    }

    fn write_char(&self, c: i32) {
        self.record(ImportCall::WriteChar(c));
    }

    fn write_byte(&self, c: i32) {
        self.record(ImportCall::WriteByte(c));
    }

    fn write_short(&self, c: i32) {
        self.record(ImportCall::WriteShort(c));
    }

    fn write_long(&self, c: i32) {
        self.record(ImportCall::WriteLong(c));
    }

    fn write_string(&self, s: &str) {
        self.record(ImportCall::WriteString(s.to_string()));
    }

    fn write_position(&self, pos: Vector3) {
        self.record(ImportCall::WritePosition(pos));
    }

    fn write_angle(&self, f: f32) {
        self.record(ImportCall::WriteAngle(f));
    }

    fn link_entity(&self, ent: EdictHandle) {
        self.record(ImportCall::LinkEntity(ent));
    }

    fn unlink_entity(&self, ent: EdictHandle) {
        self.record(ImportCall::UnlinkEntity(ent));
    }

    fn in_vis(&self, p1: Vector3, p2: Vector3, vis: i32) -> bool {
        self.record(ImportCall::InVis(p1, p2, vis));
        false
    }

    fn in_pvs(&self, p1: Vector3, p2: Vector3) -> bool {
        self.record(ImportCall::InPvs(p1, p2));
        false
    }

    fn in_phs(&self, p1: Vector3, p2: Vector3) -> bool {
        self.record(ImportCall::InPhs(p1, p2));
        false
    }

    fn set_area_portal_state(&self, portal: i32, open: bool) {
        self.record(ImportCall::SetAreaPortalState(portal, open));
    }

    fn areas_connected(&self, area1: i32, area2: i32) -> bool {
        self.record(ImportCall::AreasConnected(area1, area2));
        false
    }

    fn trace(
        &self,
        start: Vector3,
        _mins: Vector3,
        _maxs: Vector3,
        end: Vector3,
        pass_edict: EdictHandle,
        content_mask: ContentFlags,
    ) -> TraceResult {
        self.record(ImportCall::Trace { start, end, pass_edict, content_mask });
        let preset = self.state.lock().trace_result;
        preset.unwrap_or(TraceResult { end_pos: end, ..TraceResult::default() })
    }

    fn point_contents(&self, point: Vector3) -> ContentFlags {
        self.record(ImportCall::PointContents(point));
        ContentFlags::empty()
    }

    fn area_edicts(
        &self,
        _mins: Vector3,
        _maxs: Vector3,
        max_count: usize,
        area_type: AreaType,
    ) -> Vec<EdictHandle> {
        self.record(ImportCall::AreaEdicts { max_count, area_type });
        let state = self.state.lock();
        state.area_edicts.iter().copied().take(max_count).collect()
    }

    fn pmove(&self, pm: &mut PmoveInterop) {
        self.record(ImportCall::Pmove);
        pm.num_touch = 0;
    }

    fn cvar(&self, name: &str, value: &str, flags: CvarFlags) -> CvarHandle {
        self.record(ImportCall::Cvar(name.to_string(), value.to_string(), flags));
        self.lookup_cvar(name, value, flags, false)
    }

    fn cvar_set(&self, name: &str, value: &str) -> CvarHandle {
        self.record(ImportCall::CvarSet(name.to_string(), value.to_string()));
        self.lookup_cvar(name, value, CvarFlags::empty(), true)
    }

    fn cvar_force_set(&self, name: &str, value: &str) -> CvarHandle {
        self.record(ImportCall::CvarForceSet(name.to_string(), value.to_string()));
        self.lookup_cvar(name, value, CvarFlags::empty(), true)
    }

    fn argc(&self) -> i32 {
        self.record(ImportCall::Argc);
        self.state.lock().args.len() as i32
    }

    fn argv(&self, n: i32) -> String {
        self.record(ImportCall::Argv(n));
        let state = self.state.lock();
        usize::try_from(n)
            .ok()
            .and_then(|i| state.args.get(i).cloned())
            .unwrap_or_default()
    }

    fn args(&self) -> String {
        self.record(ImportCall::Args);
        let state = self.state.lock();
        state.args.iter().skip(1).cloned().collect::<Vec<_>>().join(" ")
    }

    fn add_command_string(&self, text: &str) {
        self.record(ImportCall::AddCommandString(text.to_string()));
    }

    fn debug_graph(&self, value: f32, color: i32) {
        self.record(ImportCall::DebugGraph(value, color));
    }
}
