//! Unified error type for Gatekeeper.

use gatekeeper_session::SessionError;

/// Top-level error that wraps the layer-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GatekeeperError {
    /// A session-level error (unknown session, store failure, ...).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The gate service task has stopped; its handle is dead.
    #[error("gate service is unavailable")]
    Unavailable,

    /// The configuration file isn't valid JSON or has wrong field types.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration file couldn't be read.
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
}
