//! # Gatekeeper
//!
//! Login gate for multiplayer game servers.
//!
//! A player who connects is frozen in place and prompted to log in or
//! register. They get a fixed number of ticks (20 seconds at 20 Hz) with
//! countdown warnings along the way; if they haven't logged in by then,
//! they are disconnected.
//!
//! The host server implements [`WorldHost`](prelude::WorldHost) (send a
//! message, read/write a position, disconnect) and Gatekeeper does the rest.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gatekeeper::prelude::*;
//!
//! // Implement Notifier + Connection + WorldHost for your server, then:
//! // let handle = GateService::spawn(
//! //     GatekeeperConfig::default(),
//! //     my_host,
//! //     MemoryCredentialStore::new(),
//! // );
//! // handle.join(SessionId(1), PlayerId(42), Position::ORIGIN).await?;
//! // handle.login(SessionId(1), "password").await?;
//! ```

mod config;
mod error;
mod service;

pub use config::GatekeeperConfig;
pub use error::GatekeeperError;
pub use service::{GateHandle, GateService, GateStats, SessionSnapshot, WorldHost};

/// Everything a host needs, in one import.
pub mod prelude {
    pub use crate::{
        GateHandle, GateService, GateStats, GatekeeperConfig, GatekeeperError, SessionSnapshot,
        WorldHost,
    };
    pub use gatekeeper_gate::{
        AuthHandler, Connection, GateScheduler, LoginOutcome, Notifier, RegisterOutcome, TextStyle,
        messages,
    };
    pub use gatekeeper_session::{
        CredentialStore, MemoryCredentialStore, PlayerId, Position, SessionConfig, SessionError,
        SessionId, SessionState,
    };
    pub use gatekeeper_tick::{TickClock, TickConfig, TickInfo};
}
