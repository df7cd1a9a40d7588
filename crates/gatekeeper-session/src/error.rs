//! Error types for the session layer.

use crate::{PlayerId, SessionId};

/// Errors that can occur while managing login sessions.
///
/// Ticking never produces one of these: the gate treats unknown sessions
/// as no-ops. They come from the explicit operations around a tick:
/// joining, leaving, logging in and registering.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given connection.
    /// Either it never joined, left, or was already evicted.
    #[error("session {0} not found")]
    NotFound(SessionId),

    /// A session with this id is already tracked by the gate.
    /// Each connection gets exactly one fresh session.
    #[error("session {0} already joined")]
    AlreadyJoined(SessionId),

    /// The account already has stored credentials.
    #[error("player {0} is already registered")]
    AlreadyRegistered(PlayerId),

    /// The credential store failed for a reason of its own
    /// (I/O, corrupt record, etc.).
    #[error("credential store error: {0}")]
    Credentials(String),
}
