//! Collaborator traits: what the host server must provide.
//!
//! The gate never touches sockets, chat or the world directly. It asks the
//! host through these two traits, so the same gate works for a voxel game,
//! a MUD or a test harness that just records calls.
//!
//! All methods are synchronous and expected to be cheap: they are called
//! from inside a tick.

use gatekeeper_session::{Position, SessionId};

use crate::TextStyle;

/// Delivers one-line messages to a player.
///
/// Fire-and-forget: there is no acknowledgment and no error. If delivery
/// fails, the host deals with it.
pub trait Notifier {
    fn send(&mut self, session: SessionId, text: &str, style: TextStyle);
}

/// Reads and writes a connection's place in the world, and can drop it.
pub trait Connection {
    /// Current position, or `None` if the host no longer knows the
    /// connection. The gate keeps its previous pin in that case.
    fn position(&self, session: SessionId) -> Option<Position>;

    /// Moves the connection to `position`, overriding whatever happened
    /// during the tick.
    fn set_position(&mut self, session: SessionId, position: Position);

    /// Terminates the connection. Assumed to always succeed from the
    /// gate's point of view; the host tears the connection down afterwards.
    fn disconnect(&mut self, session: SessionId, reason: &str);
}
