// svgame-dll — server game module built as a dynamic library
//
// The host server loads this library and calls the `ServerGame_*` exports by
// name. `GetServerGameApi` hands the same entry points over as one table for
// hosts that prefer a single lookup.
//
// Every export runs on the host's main thread. The host may call back into
// the exports from inside an import, so no lock is held while the game runs.

#![allow(non_snake_case)]

use std::os::raw::{c_char, c_int};

use parking_lot::Mutex;

use svgame::{ExportInfo, NativeImports, ServerGame, ServerImports, SERVER_GAME_API_VERSION};
use svgame_shared::strings::c_str_to_string;
use svgame_shared::{Edict, EdictHandle, UserCmd};

// ============================================================
// Global state
// ============================================================

/// Host variables Initialize was told to fill in.
///
/// The host passes the addresses of fields in its own game export block,
/// a process global that outlives the module, and reads `num_edicts` back
/// from it after SpawnEntities.
struct HostExports {
    api_version: *mut c_int,
    edict_size: *mut c_int,
    max_edicts: *mut c_int,
    num_edicts: *mut c_int,
}

impl HostExports {
    /// Write `info` through every non-null pointer.
    unsafe fn publish(&self, info: ExportInfo) {
        store(self.api_version, info.api_version);
        store(self.edict_size, info.edict_size as c_int);
        store(self.max_edicts, info.max_edicts as c_int);
        store(self.num_edicts, info.num_edicts as c_int);
    }

    unsafe fn publish_num_edicts(&self, info: ExportInfo) {
        store(self.num_edicts, info.num_edicts as c_int);
    }
}

unsafe fn store(dst: *mut c_int, value: c_int) {
    if let Some(dst) = dst.as_mut() {
        *dst = value;
    }
}

struct GameSlot {
    game: ServerGame,
    exports: HostExports,
}

// The export pointers are only written from inside an entry point call.
unsafe impl Send for GameSlot {}

/// The live game, parked between entry point calls.
///
/// An entry point checks the game out and runs it with the lock released, so
/// the host may call back into any export from inside an import. A callback
/// that finds the game checked out is skipped, except Shutdown and
/// Initialize, which retire the running game once its call returns.
struct GameCell {
    slot: Option<GameSlot>,
    /// Bumped by Initialize and Shutdown
    generation: u64,
    /// Entry points currently running the game
    running: usize,
}

static GAME: Mutex<GameCell> = Mutex::new(GameCell { slot: None, generation: 0, running: 0 });

/// Run `f` on the live game, or log and skip when there is none.
fn with_game<R>(entry: &'static str, f: impl FnOnce(&mut GameSlot) -> R) -> Option<R> {
    let (checked_out, generation) = {
        let mut cell = GAME.lock();
        let slot = cell.slot.take();
        if slot.is_some() {
            cell.running += 1;
        } else if cell.running > 0 {
            tracing::warn!(entry = entry, "entry point re-entered from an import, skipped");
        } else {
            tracing::warn!(entry = entry, "entry point called without a live game");
        }
        (slot, cell.generation)
    };
    let mut slot = checked_out?;

    let result = f(&mut slot);

    let retired = {
        let mut cell = GAME.lock();
        cell.running -= 1;
        if cell.generation == generation && cell.slot.is_none() {
            cell.slot = Some(slot);
            None
        } else {
            Some(slot)
        }
    };
    if let Some(slot) = retired {
        slot.game.shutdown();
    }
    Some(result)
}

/// Replace any live game with a fresh one built on `imports`.
unsafe fn initialize_with(
    imports: Box<dyn ServerImports + Send>,
    exports: HostExports,
) -> *mut Edict {
    let mut game = ServerGame::initialize(imports);
    exports.publish(game.export_info());
    let edicts = game.edicts_ptr();

    let previous = {
        let mut cell = GAME.lock();
        cell.generation += 1;
        cell.slot.replace(GameSlot { game, exports })
    };
    if let Some(previous) = previous {
        tracing::warn!("Initialize called twice, shutting down the previous game");
        previous.game.shutdown();
    }
    edicts
}

// ============================================================
// Exports
// ============================================================

/// Bind the host's functions, fill in the host's export variables and return
/// the edict table. Returns null when the host functions can't be bound.
///
/// # Safety
/// Each non-null pointer must point at a host `int` that outlives the game.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_Initialize(
    api_version: *mut c_int,
    edict_size: *mut c_int,
    max_edicts: *mut c_int,
    num_edicts: *mut c_int,
) -> *mut Edict {
    let imports = match NativeImports::bind() {
        Ok(imports) => imports,
        Err(err) => {
            tracing::error!(error = %err, "unable to bind host imports");
            return std::ptr::null_mut();
        }
    };
    initialize_with(
        Box::new(imports),
        HostExports { api_version, edict_size, max_edicts, num_edicts },
    )
}

/// Release the edict table. Extra calls are ignored. Called from inside an
/// import, the running game is released when its entry point returns.
#[no_mangle]
pub extern "C" fn ServerGame_Shutdown() {
    let (slot, running) = {
        let mut cell = GAME.lock();
        cell.generation += 1;
        (cell.slot.take(), cell.running)
    };
    match slot {
        Some(slot) => slot.game.shutdown(),
        None if running > 0 => tracing::debug!("Shutdown deferred until the running entry point returns"),
        None => tracing::debug!("Shutdown without a live game"),
    }
}

/// # Safety
/// Each argument must be null or a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_SpawnEntities(
    map_name: *const c_char,
    entity_string: *const c_char,
    spawn_point: *const c_char,
) {
    let map_name = c_str_to_string(map_name);
    let entity_string = c_str_to_string(entity_string);
    let spawn_point = c_str_to_string(spawn_point);
    with_game("SpawnEntities", |slot| {
        slot.game.spawn_entities(&map_name, &entity_string, &spawn_point);
        slot.exports.publish_num_edicts(slot.game.export_info());
    });
}

/// # Safety
/// `file_name` must be null or a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_WriteGame(file_name: *const c_char) {
    let file_name = c_str_to_string(file_name);
    with_game("WriteGame", |slot| slot.game.write_game(&file_name));
}

/// # Safety
/// `file_name` must be null or a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_ReadGame(file_name: *const c_char) {
    let file_name = c_str_to_string(file_name);
    with_game("ReadGame", |slot| slot.game.read_game(&file_name));
}

/// # Safety
/// `file_name` must be null or a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_WriteLevel(file_name: *const c_char) {
    let file_name = c_str_to_string(file_name);
    with_game("WriteLevel", |slot| slot.game.write_level(&file_name));
}

/// # Safety
/// `file_name` must be null or a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_ReadLevel(file_name: *const c_char) {
    let file_name = c_str_to_string(file_name);
    with_game("ReadLevel", |slot| slot.game.read_level(&file_name));
}

/// Returns 1 when the client may connect, 0 otherwise.
///
/// # Safety
/// `userinfo` must be null or a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_ClientConnect(ent: *mut Edict, userinfo: *mut c_char) -> c_int {
    let userinfo = c_str_to_string(userinfo);
    let accepted = with_game("ClientConnect", |slot| {
        slot.game.client_connect(EdictHandle::from_ptr(ent), &userinfo)
    });
    accepted.unwrap_or(false) as c_int
}

#[no_mangle]
pub extern "C" fn ServerGame_ClientBegin(ent: *mut Edict) {
    with_game("ClientBegin", |slot| slot.game.client_begin(EdictHandle::from_ptr(ent)));
}

/// # Safety
/// `userinfo` must be null or a NUL terminated string.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_ClientUserinfoChanged(ent: *mut Edict, userinfo: *mut c_char) {
    let userinfo = c_str_to_string(userinfo);
    with_game("ClientUserinfoChanged", |slot| {
        slot.game.client_userinfo_changed(EdictHandle::from_ptr(ent), &userinfo)
    });
}

#[no_mangle]
pub extern "C" fn ServerGame_ClientDisconnect(ent: *mut Edict) {
    with_game("ClientDisconnect", |slot| slot.game.client_disconnect(EdictHandle::from_ptr(ent)));
}

#[no_mangle]
pub extern "C" fn ServerGame_ClientCommand(ent: *mut Edict) {
    with_game("ClientCommand", |slot| slot.game.client_command(EdictHandle::from_ptr(ent)));
}

/// # Safety
/// `cmd` must be null or point at a usercmd valid for the call.
#[no_mangle]
pub unsafe extern "C" fn ServerGame_ClientThink(ent: *mut Edict, cmd: *mut UserCmd) {
    let cmd = match cmd.as_ref() {
        Some(cmd) => *cmd,
        None => {
            tracing::warn!("ClientThink with a null usercmd");
            UserCmd::default()
        }
    };
    with_game("ClientThink", |slot| slot.game.client_think(EdictHandle::from_ptr(ent), &cmd));
}

#[no_mangle]
pub extern "C" fn ServerGame_RunFrame() {
    with_game("RunFrame", |slot| slot.game.run_frame());
}

#[no_mangle]
pub extern "C" fn ServerGame_ServerCommand() {
    with_game("ServerCommand", |slot| slot.game.server_command());
}

// ============================================================
// GetServerGameApi — every export in one table
// ============================================================

/// The export table handed out by `GetServerGameApi`.
#[repr(C)]
pub struct ServerGameExport {
    pub api_version: c_int,
    pub initialize: unsafe extern "C" fn(*mut c_int, *mut c_int, *mut c_int, *mut c_int) -> *mut Edict,
    pub shutdown: extern "C" fn(),
    pub spawn_entities: unsafe extern "C" fn(*const c_char, *const c_char, *const c_char),
    pub write_game: unsafe extern "C" fn(*const c_char),
    pub read_game: unsafe extern "C" fn(*const c_char),
    pub write_level: unsafe extern "C" fn(*const c_char),
    pub read_level: unsafe extern "C" fn(*const c_char),
    pub client_connect: unsafe extern "C" fn(*mut Edict, *mut c_char) -> c_int,
    pub client_begin: extern "C" fn(*mut Edict),
    pub client_userinfo_changed: unsafe extern "C" fn(*mut Edict, *mut c_char),
    pub client_disconnect: extern "C" fn(*mut Edict),
    pub client_command: extern "C" fn(*mut Edict),
    pub client_think: unsafe extern "C" fn(*mut Edict, *mut UserCmd),
    pub run_frame: extern "C" fn(),
    pub server_command: extern "C" fn(),
}

static SERVER_GAME_EXPORT: ServerGameExport = ServerGameExport {
    api_version: SERVER_GAME_API_VERSION,
    initialize: ServerGame_Initialize,
    shutdown: ServerGame_Shutdown,
    spawn_entities: ServerGame_SpawnEntities,
    write_game: ServerGame_WriteGame,
    read_game: ServerGame_ReadGame,
    write_level: ServerGame_WriteLevel,
    read_level: ServerGame_ReadLevel,
    client_connect: ServerGame_ClientConnect,
    client_begin: ServerGame_ClientBegin,
    client_userinfo_changed: ServerGame_ClientUserinfoChanged,
    client_disconnect: ServerGame_ClientDisconnect,
    client_command: ServerGame_ClientCommand,
    client_think: ServerGame_ClientThink,
    run_frame: ServerGame_RunFrame,
    server_command: ServerGame_ServerCommand,
};

#[no_mangle]
pub extern "C" fn GetServerGameApi() -> *const ServerGameExport {
    &SERVER_GAME_EXPORT
}

// ============================================================
// Tests
// ============================================================
