//! Per-connection login state for Gatekeeper.
//!
//! This crate holds the data side of the login gate:
//!
//! 1. **Identity**: who a connection is ([`SessionId`]) and which account
//!    it claims to be ([`PlayerId`])
//! 2. **Session state**: whether the connection has logged in, how many
//!    ticks it has left, and where it is pinned ([`SessionState`])
//! 3. **Credentials**: where passwords are checked ([`CredentialStore`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Service Layer (gatekeeper)       ← drives ticks, serializes auth commands
//!     ↕
//! Gate Layer (gatekeeper-gate)     ← countdown, warnings, pinning, eviction
//!     ↕
//! Session Layer (this crate)       ← plain per-connection data
//! ```

mod credentials;
mod error;
mod session;
mod types;

pub use credentials::{CredentialStore, MemoryCredentialStore};
pub use error::SessionError;
pub use session::{SessionConfig, SessionState};
pub use types::{PlayerId, Position, SessionId};
