//! The login gate for Gatekeeper.
//!
//! Every connection that hasn't logged in is held at the gate: it is
//! pinned in place, reminded how long it has left, and disconnected when
//! the countdown runs out.
//!
//! # Key types
//!
//! - [`GateScheduler`]: owns every [`SessionState`](gatekeeper_session::SessionState)
//!   and runs the two per-tick phases
//! - [`AuthHandler`]: the `/login` and `/register` flows that open the gate
//! - [`Notifier`] / [`Connection`]: what the host server must provide
//! - [`Notice`] / [`TextStyle`]: the fixed player-facing messages
//!
//! # One tick
//!
//! ```text
//! gate.begin_tick(host)   ← Phase A: pin position, warn, count down, evict
//! host world update       ← physics, input, knockback... may move players
//! gate.end_tick(host)     ← Phase B: put gated players back where they were
//! ```

mod auth;
mod host;
mod notice;
mod scheduler;

pub use auth::{AuthHandler, LoginOutcome, RegisterOutcome};
pub use host::{Connection, Notifier};
pub use notice::{CountdownAction, Notice, TextStyle, countdown_action};
pub use scheduler::GateScheduler;

/// Player-facing message texts, exactly as clients expect them.
pub mod messages {
    pub use crate::notice::{
        ALREADY_LOGGED_IN, ALREADY_REGISTERED, ATTEMPTS_EXCEEDED_REASON, EVICTION_REASON,
        LOGIN_PROMPT, LOGIN_SUCCEEDED, NOT_REGISTERED, POST_REGISTRATION_LOGIN_FAILED,
        POST_REGISTRATION_LOGIN_SUCCEEDED, REGISTRATION_SUCCEEDED, TIMED_OUT, WARN_1S, WARN_2S,
        WARN_3S, WARN_4S, WARN_5S, WARN_10S, WRONG_PASSWORD, attempts_remaining,
    };
}
