// session.rs — per-client connection state
//
// Client slot n lives in edict n + 1. The host drives every transition; the
// game only checks that each call arrives in a state where it makes sense.

use std::fmt;

use thiserror::Error;

use svgame_shared::strings::{info_validate, info_value_for_key, NarrowBuf};
use svgame_shared::UserCmd;

pub type UserinfoBuf = NarrowBuf<512>;
pub type NetnameBuf = NarrowBuf<16>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClientState {
    #[default]
    Unconnected,
    /// ClientConnect accepted, waiting for ClientBegin
    Connected,
    /// In the game and sending usercmds
    Active,
    Disconnected,
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClientState::Unconnected => "unconnected",
            ClientState::Connected => "connected",
            ClientState::Active => "active",
            ClientState::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("edict is not a client slot")]
    UnknownClient,
    #[error("client {slot}: userinfo rejected")]
    InvalidUserinfo { slot: usize },
    #[error("client {slot}: {call} while {state}")]
    WrongState {
        slot: usize,
        call: &'static str,
        state: ClientState,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClientSession {
    pub state: ClientState,
    pub userinfo: UserinfoBuf,
    pub netname: NetnameBuf,
    pub last_cmd: UserCmd,
    /// Commands received since ClientBegin
    pub commands: u32,
}

impl ClientSession {
    fn require(
        &self,
        slot: usize,
        call: &'static str,
        allowed: &[ClientState],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::WrongState { slot, call, state: self.state })
        }
    }

    fn apply_userinfo(&mut self, userinfo: &str) {
        self.userinfo.set(userinfo);
        self.netname.set(&info_value_for_key(userinfo, "name"));
    }
}

const LIVE: &[ClientState] = &[ClientState::Connected, ClientState::Active];

/// One session per client slot.
#[derive(Debug)]
pub struct Sessions {
    slots: Vec<ClientSession>,
}

impl Sessions {
    pub fn new(max_clients: usize) -> Self {
        Self { slots: vec![ClientSession::default(); max_clients] }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&ClientSession> {
        self.slots.get(slot)
    }

    /// Client slot for an edict index, `None` for the world and non-client edicts.
    pub fn slot_for_edict(&self, edict_index: usize) -> Option<usize> {
        let slot = edict_index.checked_sub(1)?;
        (slot < self.slots.len()).then_some(slot)
    }

    fn slot_mut(&mut self, slot: usize) -> Result<&mut ClientSession, SessionError> {
        self.slots.get_mut(slot).ok_or(SessionError::UnknownClient)
    }

    pub fn connect(&mut self, slot: usize, userinfo: &str) -> Result<(), SessionError> {
        let session = self.slot_mut(slot)?;
        if !info_validate(userinfo) {
            return Err(SessionError::InvalidUserinfo { slot });
        }
        *session = ClientSession { state: ClientState::Connected, ..Default::default() };
        session.apply_userinfo(userinfo);
        Ok(())
    }

    pub fn begin(&mut self, slot: usize) -> Result<(), SessionError> {
        let session = self.slot_mut(slot)?;
        session.require(slot, "begin", LIVE)?;
        session.state = ClientState::Active;
        session.commands = 0;
        Ok(())
    }

    pub fn userinfo_changed(&mut self, slot: usize, userinfo: &str) -> Result<(), SessionError> {
        let session = self.slot_mut(slot)?;
        session.require(slot, "userinfo", LIVE)?;
        if !info_validate(userinfo) {
            return Err(SessionError::InvalidUserinfo { slot });
        }
        session.apply_userinfo(userinfo);
        Ok(())
    }

    pub fn disconnect(&mut self, slot: usize) -> Result<(), SessionError> {
        let session = self.slot_mut(slot)?;
        session.require(slot, "disconnect", LIVE)?;
        session.state = ClientState::Disconnected;
        Ok(())
    }

    pub fn command(&mut self, slot: usize) -> Result<(), SessionError> {
        let session = self.slot_mut(slot)?;
        session.require(slot, "command", &[ClientState::Active])?;
        session.commands = session.commands.saturating_add(1);
        Ok(())
    }

    pub fn think(&mut self, slot: usize, cmd: &UserCmd) -> Result<(), SessionError> {
        let session = self.slot_mut(slot)?;
        session.require(slot, "think", &[ClientState::Active])?;
        session.last_cmd = *cmd;
        Ok(())
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.state == ClientState::Active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UI: &str = "\\name\\Player\\skin\\male/grunt";

    #[test]
    fn test_slot_mapping() {
        let sessions = Sessions::new(4);
        assert_eq!(sessions.slot_for_edict(0), None);
        assert_eq!(sessions.slot_for_edict(1), Some(0));
        assert_eq!(sessions.slot_for_edict(4), Some(3));
        assert_eq!(sessions.slot_for_edict(5), None);
    }

    #[test]
    fn test_full_lifecycle() {
        let mut sessions = Sessions::new(2);
        sessions.connect(0, UI).unwrap();
        assert_eq!(sessions.get(0).unwrap().state, ClientState::Connected);
        assert_eq!(sessions.get(0).unwrap().netname.get(), "Player");

        sessions.begin(0).unwrap();
        sessions.command(0).unwrap();
        sessions.think(0, &UserCmd { msec: 16, ..Default::default() }).unwrap();
        let s = sessions.get(0).unwrap();
        assert_eq!(s.state, ClientState::Active);
        assert_eq!(s.commands, 1);
        assert_eq!(s.last_cmd.msec, 16);
        assert_eq!(sessions.active_count(), 1);

        sessions.disconnect(0).unwrap();
        assert_eq!(sessions.get(0).unwrap().state, ClientState::Disconnected);
        assert_eq!(sessions.active_count(), 0);
    }

    #[test]
    fn test_rejects_out_of_order_calls() {
        let mut sessions = Sessions::new(1);
        assert_eq!(
            sessions.begin(0),
            Err(SessionError::WrongState {
                slot: 0,
                call: "begin",
                state: ClientState::Unconnected
            })
        );
        sessions.connect(0, UI).unwrap();
        assert!(sessions.command(0).is_err());
        assert!(sessions.think(0, &UserCmd::default()).is_err());

        sessions.disconnect(0).unwrap();
        assert!(sessions.disconnect(0).is_err());
        assert!(sessions.userinfo_changed(0, UI).is_err());
    }

    #[test]
    fn test_reconnect_resets_slot() {
        let mut sessions = Sessions::new(1);
        sessions.connect(0, UI).unwrap();
        sessions.begin(0).unwrap();
        sessions.command(0).unwrap();
        sessions.disconnect(0).unwrap();

        sessions.connect(0, "\\name\\Other").unwrap();
        let s = sessions.get(0).unwrap();
        assert_eq!(s.state, ClientState::Connected);
        assert_eq!(s.commands, 0);
        assert_eq!(s.netname.get(), "Other");
    }

    #[test]
    fn test_userinfo_validation_and_truncation() {
        let mut sessions = Sessions::new(1);
        assert_eq!(
            sessions.connect(0, "\\name\\bad\"quote"),
            Err(SessionError::InvalidUserinfo { slot: 0 })
        );
        assert_eq!(sessions.get(0).unwrap().state, ClientState::Unconnected);

        sessions.connect(0, "\\name\\ABCDEFGHIJKLMNOPQRST").unwrap();
        assert_eq!(sessions.get(0).unwrap().netname.get(), "ABCDEFGHIJKLMNOP");

        sessions.userinfo_changed(0, "\\name\\Renamed").unwrap();
        assert_eq!(sessions.get(0).unwrap().netname.get(), "Renamed");
        assert_eq!(sessions.get(0).unwrap().userinfo.get(), "\\name\\Renamed");
    }

    #[test]
    fn test_unknown_slot() {
        let mut sessions = Sessions::new(1);
        assert_eq!(sessions.connect(3, UI), Err(SessionError::UnknownClient));
    }

    #[test]
    fn test_error_display() {
        let err = SessionError::WrongState { slot: 2, call: "think", state: ClientState::Connected };
        assert_eq!(err.to_string(), "client 2: think while connected");
    }
}
