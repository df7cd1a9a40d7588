//! The gate scheduler: drives every session's countdown once per tick.
//!
//! This is the central piece of the gate. It's responsible for:
//! - Creating a fresh session when a connection joins
//! - Pinning unauthenticated connections in place
//! - Sending countdown warnings at fixed thresholds
//! - Evicting connections whose countdown ran out
//!
//! # Concurrency note
//!
//! `GateScheduler` is NOT thread-safe by itself. It uses a plain
//! `HashMap` and every mutating method takes `&mut self`. A login can
//! therefore never land halfway through a tick: the borrow checker makes
//! the caller finish one before starting the other. Hosts that accept
//! logins from other tasks run the scheduler inside the `gatekeeper`
//! service actor, which serializes ticks and auth commands on one queue.

use std::collections::HashMap;

use gatekeeper_session::{PlayerId, Position, SessionConfig, SessionError, SessionId, SessionState};
use tracing::{debug, info, trace};

use crate::notice::{CountdownAction, EVICTION_REASON, countdown_action};
use crate::{Connection, Notifier};

/// Owns the login state of every connected session.
///
/// The host's own player type is never touched: the gate keeps a side
/// table from [`SessionId`] to [`SessionState`] and looks sessions up by
/// id each tick.
///
/// ## Lifecycle
///
/// ```text
/// join() ──→ [Unauthenticated] ──(AuthHandler)──→ [Authenticated] ──→ leave()
///                   │
///                   ▼ countdown <= -eviction_delay
///             disconnect + removed
/// ```
#[derive(Debug)]
pub struct GateScheduler {
    sessions: HashMap<SessionId, SessionState>,
    config: SessionConfig,
}

impl GateScheduler {
    /// Creates an empty gate. The config is validated first.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config: config.validated(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Starts gating a newly connected session.
    ///
    /// The session starts unauthenticated, pinned at `position`, with the
    /// full grace budget on its countdown.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyJoined`] if `session_id` is already
    /// tracked. Session ids are per connection and must not be reused
    /// while the old connection is still known.
    pub fn join(
        &mut self,
        session_id: SessionId,
        player: PlayerId,
        position: Position,
    ) -> Result<&SessionState, SessionError> {
        if self.sessions.contains_key(&session_id) {
            return Err(SessionError::AlreadyJoined(session_id));
        }

        let session = SessionState::new(player, position, &self.config);
        info!(
            %session_id,
            %player,
            countdown = session.remaining_ticks(),
            "session joined gate"
        );

        Ok(self.sessions.entry(session_id).or_insert(session))
    }

    /// Stops tracking a session and returns its final state.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the session isn't tracked
    /// (never joined, already left, or evicted).
    pub fn leave(&mut self, session_id: SessionId) -> Result<SessionState, SessionError> {
        let session = self
            .sessions
            .remove(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        info!(
            %session_id,
            authenticated = session.is_authenticated(),
            "session left gate"
        );
        Ok(session)
    }

    /// Looks up a session.
    pub fn session(&self, session_id: SessionId) -> Option<&SessionState> {
        self.sessions.get(&session_id)
    }

    /// Looks up a session for mutation. This is how the auth handler
    /// flips `authenticated` and counts attempts.
    pub fn session_mut(&mut self, session_id: SessionId) -> Option<&mut SessionState> {
        self.sessions.get_mut(&session_id)
    }

    /// Ids of all tracked sessions, in ascending order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    // -- Per-session phases ----------------------------------------------

    /// Phase A, run before the host's world update.
    ///
    /// For an unauthenticated session:
    /// 1. snapshot its current position as the pin,
    /// 2. send the notice for the current countdown value, or evict,
    /// 3. decrement the countdown.
    ///
    /// Authenticated and unknown sessions are left alone.
    pub fn tick_start<H>(&mut self, session_id: SessionId, host: &mut H)
    where
        H: Notifier + Connection + ?Sized,
    {
        let Some(session) = self.sessions.get_mut(&session_id) else {
            trace!(%session_id, "tick_start for unknown session, ignoring");
            return;
        };

        if !session.snapshot_gate() {
            return;
        }

        if let Some(position) = host.position(session_id) {
            session.pin(position);
        }

        let countdown = session.remaining_ticks();
        match countdown_action(countdown, &self.config) {
            Some(CountdownAction::Notify(notice)) => {
                debug!(%session_id, countdown, text = notice.text, "login notice");
                host.send(session_id, notice.text, notice.style);
            }
            Some(CountdownAction::Evict) => {
                info!(%session_id, countdown, "login timed out, evicting");
                host.disconnect(session_id, EVICTION_REASON);
                // Terminal: no further ticks reach this session.
                self.sessions.remove(&session_id);
                return;
            }
            None => {}
        }

        session.decrement_countdown();
    }

    /// Phase B, run after the host's world update.
    ///
    /// If Phase A found the session gated this tick, put it back at the
    /// pinned position. The Phase A snapshot decides, not the current
    /// `authenticated` flag: a login that lands between the two phases
    /// still gets this tick's pin restored and is free from the next one.
    pub fn tick_end<H>(&mut self, session_id: SessionId, host: &mut H)
    where
        H: Connection + ?Sized,
    {
        let Some(session) = self.sessions.get_mut(&session_id) else {
            return;
        };

        if session.take_gate_snapshot() == Some(true) {
            let pinned = session.pinned_position();
            trace!(%session_id, %pinned, "restoring pinned position");
            host.set_position(session_id, pinned);
        }
    }

    /// Runs both phases for one session with nothing in between.
    pub fn tick<H>(&mut self, session_id: SessionId, host: &mut H)
    where
        H: Notifier + Connection + ?Sized,
    {
        self.tick_start(session_id, host);
        self.tick_end(session_id, host);
    }

    // -- Whole-gate phases -----------------------------------------------

    /// Phase A for every tracked session, in ascending id order.
    pub fn begin_tick<H>(&mut self, host: &mut H)
    where
        H: Notifier + Connection + ?Sized,
    {
        for session_id in self.session_ids() {
            self.tick_start(session_id, host);
        }
    }

    /// Phase B for every tracked session.
    pub fn end_tick<H>(&mut self, host: &mut H)
    where
        H: Connection + ?Sized,
    {
        for session_id in self.session_ids() {
            self.tick_end(session_id, host);
        }
    }
}

impl Default for GateScheduler {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

// =========================================================================
// Tests
// =========================================================================
