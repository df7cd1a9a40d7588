//! A host that records every call the gate makes.

#![allow(dead_code)]

use std::collections::HashMap;

use gatekeeper_gate::{Connection, Notifier, TextStyle};
use gatekeeper_session::{Position, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Send {
        session: SessionId,
        text: String,
        style: TextStyle,
    },
    SetPosition {
        session: SessionId,
        position: Position,
    },
    Disconnect {
        session: SessionId,
        reason: String,
    },
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub positions: HashMap<SessionId, Position>,
    pub calls: Vec<HostCall>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves a session without recording a call, the way the world
    /// update would.
    pub fn place(&mut self, session: SessionId, position: Position) {
        self.positions.insert(session, position);
    }

    pub fn messages(&self, session: SessionId) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Send { session: s, text, .. } if *s == session => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn disconnects(&self) -> Vec<(SessionId, String)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Disconnect { session, reason } => Some((*session, reason.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn position_writes(&self, session: SessionId) -> Vec<Position> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::SetPosition { session: s, position } if *s == session => Some(*position),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingHost {
    fn send(&mut self, session: SessionId, text: &str, style: TextStyle) {
        self.calls.push(HostCall::Send {
            session,
            text: text.to_owned(),
            style,
        });
    }
}

impl Connection for RecordingHost {
    fn position(&self, session: SessionId) -> Option<Position> {
        self.positions.get(&session).copied()
    }

    fn set_position(&mut self, session: SessionId, position: Position) {
        self.positions.insert(session, position);
        self.calls.push(HostCall::SetPosition { session, position });
    }

    fn disconnect(&mut self, session: SessionId, reason: &str) {
        self.calls.push(HostCall::Disconnect {
            session,
            reason: reason.to_owned(),
        });
    }
}
