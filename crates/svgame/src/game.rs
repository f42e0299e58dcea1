// game.rs — server game lifecycle
//
// One `ServerGame` lives between Initialize and Shutdown. It owns the edict
// and client tables the host reads from, so their addresses must not change
// while it is alive. Both are boxed slices allocated once at Initialize.

use std::fmt;
use std::mem::size_of;

use svgame_shared::types::{edict_index, ClientHandle};
use svgame_shared::{Client, Edict, EdictHandle, UserCmd};

use crate::config::GameConfig;
use crate::imports::ServerImports;
use crate::session::{SessionError, Sessions};

/// Version reported to the host in the export block.
pub const SERVER_GAME_API_VERSION: i32 = 1;

/// Values the host reads back after Initialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportInfo {
    pub api_version: i32,
    pub edict_size: usize,
    pub max_edicts: usize,
    pub num_edicts: usize,
}

pub struct ServerGame {
    imports: Box<dyn ServerImports + Send>,
    config: GameConfig,
    edicts: Box<[Edict]>,
    clients: Box<[Client]>,
    num_edicts: usize,
    sessions: Sessions,
    frame: u64,
}

// The tables hold raw pointers into themselves and into host memory. The dll
// only touches a `ServerGame` from inside one entry point call at a time.
unsafe impl Send for ServerGame {}

impl ServerGame {
    /// Read the configuration cvars and allocate the edict table.
    pub fn initialize(imports: Box<dyn ServerImports + Send>) -> Self {
        let config = GameConfig::from_cvars(imports.as_ref());
        tracing::debug!(
            max_clients = config.max_clients,
            max_entities = config.max_entities,
            "allocating edict table"
        );

        let mut game = Self {
            imports,
            config,
            edicts: vec![Edict::default(); config.max_entities].into_boxed_slice(),
            clients: vec![Client::default(); config.max_clients].into_boxed_slice(),
            num_edicts: 1,
            sessions: Sessions::new(config.max_clients),
            frame: 0,
        };
        game.reset_edicts();
        game.trace(format_args!("GameMain::Initialize( );\n"));
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn imports(&self) -> &dyn ServerImports {
        self.imports.as_ref()
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn export_info(&self) -> ExportInfo {
        ExportInfo {
            api_version: SERVER_GAME_API_VERSION,
            edict_size: size_of::<Edict>(),
            max_edicts: self.edicts.len(),
            num_edicts: self.num_edicts,
        }
    }

    /// Base of the edict table handed to the host.
    pub fn edicts_ptr(&mut self) -> *mut Edict {
        self.edicts.as_mut_ptr()
    }

    pub fn edicts(&self) -> &[Edict] {
        &self.edicts
    }

    /// Handle to edict `n`, null past the end of the table.
    pub fn edict_handle(&mut self, n: usize) -> EdictHandle {
        self.edicts
            .get_mut(n)
            .map(|e| EdictHandle::from_ptr(e))
            .unwrap_or_default()
    }

    pub fn shutdown(self) {
        self.trace(format_args!("GameMain::Shutdown( );\n"));
        tracing::debug!(frames = self.frame, "server game shut down");
    }

    // ---- level and persistence ----

    pub fn spawn_entities(&mut self, map: &str, entities: &str, spawn_point: &str) {
        self.trace(format_args!(
            "GameMain::SpawnEntities( \"{}\", \"{}\", \"{}\" );\n",
            map, spawn_point, entities
        ));
        self.reset_edicts();
        self.num_edicts = self.config.max_clients + 1;
    }

    pub fn write_game(&mut self, file: &str) {
        self.trace(format_args!("GameMain::WriteGame( \"{}\" );\n", file));
    }

    pub fn read_game(&mut self, file: &str) {
        self.trace(format_args!("GameMain::ReadGame( \"{}\" );\n", file));
    }

    pub fn write_level(&mut self, file: &str) {
        self.trace(format_args!("GameMain::WriteLevel( \"{}\" );\n", file));
    }

    pub fn read_level(&mut self, file: &str) {
        self.trace(format_args!("GameMain::ReadLevel( \"{}\" );\n", file));
    }

    // ---- clients ----

    /// Returns whether the host should let the client in.
    pub fn client_connect(&mut self, ent: EdictHandle, userinfo: &str) -> bool {
        self.trace(format_args!(
            "GameMain::ClientConnect( {}, \"{}\" );\n",
            self.entity_number(ent),
            userinfo
        ));
        let result = self
            .client_slot(ent)
            .and_then(|slot| self.sessions.connect(slot, userinfo));
        self.settle(result)
    }

    pub fn client_begin(&mut self, ent: EdictHandle) {
        self.trace(format_args!("GameMain::ClientBegin( {} );\n", self.entity_number(ent)));
        let result = self.client_slot(ent).and_then(|slot| {
            self.sessions.begin(slot)?;
            self.edicts[slot + 1].in_use = 1;
            Ok(())
        });
        self.settle(result);
    }

    pub fn client_userinfo_changed(&mut self, ent: EdictHandle, userinfo: &str) {
        self.trace(format_args!(
            "GameMain::ClientUserinfoChanged( {}, \"{}\" );\n",
            self.entity_number(ent),
            userinfo
        ));
        let result = self
            .client_slot(ent)
            .and_then(|slot| self.sessions.userinfo_changed(slot, userinfo));
        self.settle(result);
    }

    pub fn client_disconnect(&mut self, ent: EdictHandle) {
        self.trace(format_args!("GameMain::ClientDisconnect( {} );\n", self.entity_number(ent)));
        let result = self.client_slot(ent).and_then(|slot| {
            self.sessions.disconnect(slot)?;
            self.edicts[slot + 1].in_use = 0;
            Ok(())
        });
        self.settle(result);
    }

    pub fn client_command(&mut self, ent: EdictHandle) {
        self.trace(format_args!("GameMain::ClientCommand( {} );\n", self.entity_number(ent)));
        let result = self
            .client_slot(ent)
            .and_then(|slot| self.sessions.command(slot));
        self.settle(result);
    }

    pub fn client_think(&mut self, ent: EdictHandle, cmd: &UserCmd) {
        self.trace(format_args!(
            "GameMain::ClientThink( {}, UserCommand* );\n",
            self.entity_number(ent)
        ));
        let result = self
            .client_slot(ent)
            .and_then(|slot| self.sessions.think(slot, cmd));
        self.settle(result);
    }

    // ---- frame ----

    pub fn run_frame(&mut self) {
        self.trace(format_args!("GameMain::RunFrame( {} );\n", self.frame));
        self.frame += 1;
    }

    pub fn server_command(&mut self) {
        let command = self.imports.argv(1);
        self.trace(format_args!("GameMain::ServerCommand( {} );\n", command));
    }

    // ---- internals ----

    fn trace(&self, line: fmt::Arguments<'_>) {
        if self.config.trace_calls {
            self.imports.dprint(&line.to_string());
        }
    }

    /// Zero the edict table, number every slot and hook clients up.
    fn reset_edicts(&mut self) {
        for (n, client) in self.clients.iter_mut().enumerate() {
            *client = Client { client_number: n as i32, ..Client::default() };
        }
        let max_clients = self.clients.len();
        let clients = self.clients.as_mut_ptr();
        for (n, edict) in self.edicts.iter_mut().enumerate() {
            *edict = Edict::default();
            edict.state.number = n as i32;
            if (1..=max_clients).contains(&n) {
                // SAFETY: n - 1 < max_clients
                edict.client = ClientHandle::from_ptr(unsafe { clients.add(n - 1) });
            }
        }
        if let Some(world) = self.edicts.first_mut() {
            world.in_use = 1;
        }
    }

    fn index_of(&self, ent: EdictHandle) -> Option<usize> {
        let n = edict_index(self.edicts.as_ptr(), size_of::<Edict>(), ent)?;
        (n < self.edicts.len()).then_some(n)
    }

    fn entity_number(&self, ent: EdictHandle) -> i64 {
        self.index_of(ent).map_or(-1, |n| n as i64)
    }

    fn client_slot(&self, ent: EdictHandle) -> Result<usize, SessionError> {
        self.index_of(ent)
            .and_then(|n| self.sessions.slot_for_edict(n))
            .ok_or(SessionError::UnknownClient)
    }

    /// Report a rejected client call to the host console and the log.
    fn settle(&self, result: Result<(), SessionError>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                self.imports.dprint(&format!("ServerGame: rejected, {}\n", err));
                tracing::warn!(error = %err, "client call rejected");
                false
            }
        }
    }
}

impl fmt::Debug for ServerGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerGame")
            .field("config", &self.config)
            .field("num_edicts", &self.num_edicts)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}
