//! Session types: the data the gate keeps for each connection.
//!
//! A session tracks:
//! - WHO is connected (`PlayerId`, the account they claim)
//! - WHETHER they have logged in yet
//! - HOW LONG they have left (a countdown in ticks)
//! - WHERE they are pinned while they wait

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{PlayerId, Position};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the login gate.
///
/// All durations are in ticks, not seconds: the gate has no clock of its
/// own and only counts how many times it was ticked. At the default 20
/// ticks per second, 400 ticks is a 20 second grace period.
///
/// `#[serde(default)]` lets a config file set only the fields it cares
/// about; everything missing falls back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Countdown value a fresh session starts from. The start prompt
    /// fires when the countdown equals this value.
    pub grace_ticks: i64,

    /// How many ticks past zero the countdown runs before the connection
    /// is evicted. Eviction fires once `countdown <= -eviction_delay_ticks`.
    pub eviction_delay_ticks: i64,

    /// Wrong passwords tolerated before the connection is dropped.
    pub max_login_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grace_ticks: 400,
            eviction_delay_ticks: 20,
            max_login_attempts: 3,
        }
    }
}

impl SessionConfig {
    /// Fix any out-of-range values so the config is safe to use.
    ///
    /// Rules:
    /// - `grace_ticks` must be at least 1 (a zero budget would never
    ///   show the start prompt).
    /// - `eviction_delay_ticks` must not be negative.
    pub fn validated(mut self) -> Self {
        if self.grace_ticks < 1 {
            warn!(
                grace_ticks = self.grace_ticks,
                "grace_ticks must be positive, using 1"
            );
            self.grace_ticks = 1;
        }
        if self.eviction_delay_ticks < 0 {
            warn!(
                eviction_delay_ticks = self.eviction_delay_ticks,
                "eviction_delay_ticks is negative, using 0"
            );
            self.eviction_delay_ticks = 0;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The login state of one connection.
///
/// Two logical states, with a countdown inside the first:
///
/// ```text
///   Unauthenticated(countdown) ──(login / register)──→ Authenticated
///          │
///          └──(countdown <= -eviction_delay)──→ evicted (session dropped)
/// ```
///
/// This is plain data. There is no validation here: the gate and the auth
/// handler are the only writers and they are trusted. Fields are private
/// so that every mutation goes through a named operation.
#[derive(Debug, Clone)]
pub struct SessionState {
    player: PlayerId,
    authenticated: bool,
    countdown: i64,
    login_attempts: u32,
    pinned_position: Position,
    /// Set at tick start: `Some(true)` if the session was gated for this
    /// tick, `Some(false)` if it was already authenticated. Consumed at
    /// tick end, so both phases of one tick agree even if a login lands
    /// in between.
    gate_snapshot: Option<bool>,
}

impl SessionState {
    /// Creates a fresh, unauthenticated session with the full grace budget.
    pub fn new(player: PlayerId, position: Position, config: &SessionConfig) -> Self {
        Self {
            player,
            authenticated: false,
            countdown: config.grace_ticks,
            login_attempts: 0,
            pinned_position: position,
            gate_snapshot: None,
        }
    }

    /// The account this connection claims to be.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    /// Ticks left on the countdown. Goes negative during the final
    /// stretch between the last warning and eviction.
    pub fn remaining_ticks(&self) -> i64 {
        self.countdown
    }

    /// Restarts the countdown at `ticks`.
    pub fn reset_countdown(&mut self, ticks: i64) {
        self.countdown = ticks;
    }

    /// Moves the countdown one tick closer to eviction.
    pub fn decrement_countdown(&mut self) {
        self.countdown -= 1;
    }

    /// Counts one failed login.
    pub fn record_attempt(&mut self) {
        self.login_attempts += 1;
    }

    pub fn login_attempts(&self) -> u32 {
        self.login_attempts
    }

    /// Clears the failed-login counter after a successful login.
    pub fn reset_attempts(&mut self) {
        self.login_attempts = 0;
    }

    /// Where the connection will be put back at the end of the tick.
    pub fn pinned_position(&self) -> Position {
        self.pinned_position
    }

    pub fn pin(&mut self, position: Position) {
        self.pinned_position = position;
    }

    /// Records, for the current tick, whether the gate applies.
    ///
    /// Returns `true` if the session is still unauthenticated.
    pub fn snapshot_gate(&mut self) -> bool {
        let gated = !self.authenticated;
        self.gate_snapshot = Some(gated);
        gated
    }

    /// Takes the snapshot written by [`snapshot_gate`](Self::snapshot_gate).
    ///
    /// Returns `None` if tick start never ran for this tick.
    pub fn take_gate_snapshot(&mut self) -> Option<bool> {
        self.gate_snapshot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> SessionState {
        SessionState::new(PlayerId(1), Position::new(1.0, 2.0, 3.0), &SessionConfig::default())
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.grace_ticks, 400);
        assert_eq!(config.eviction_delay_ticks, 20);
        assert_eq!(config.max_login_attempts, 3);
    }

    #[test]
    fn test_session_config_validated_clamps_bad_values() {
        let config = SessionConfig {
            grace_ticks: 0,
            eviction_delay_ticks: -5,
            max_login_attempts: 3,
        }
        .validated();
        assert_eq!(config.grace_ticks, 1);
        assert_eq!(config.eviction_delay_ticks, 0);
    }

    #[test]
    fn test_session_config_partial_json_uses_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "grace_ticks": 100 }"#).unwrap();
        assert_eq!(config.grace_ticks, 100);
        assert_eq!(config.eviction_delay_ticks, 20);
        assert_eq!(config.max_login_attempts, 3);
    }

    #[test]
    fn test_new_session_starts_unauthenticated_with_full_budget() {
        let s = fresh();
        assert!(!s.is_authenticated());
        assert_eq!(s.remaining_ticks(), 400);
        assert_eq!(s.login_attempts(), 0);
        assert_eq!(s.pinned_position(), Position::new(1.0, 2.0, 3.0));
        assert_eq!(s.player(), PlayerId(1));
    }

    #[test]
    fn test_record_attempt_only_grows_until_reset() {
        let mut s = fresh();
        s.record_attempt();
        s.record_attempt();
        assert_eq!(s.login_attempts(), 2);
        s.reset_attempts();
        assert_eq!(s.login_attempts(), 0);
    }

    #[test]
    fn test_decrement_countdown_goes_negative() {
        let mut s = fresh();
        s.reset_countdown(0);
        s.decrement_countdown();
        assert_eq!(s.remaining_ticks(), -1);
    }

    #[test]
    fn test_gate_snapshot_is_taken_once() {
        let mut s = fresh();
        assert!(s.snapshot_gate());
        // A login between the phases does not change what tick end sees.
        s.set_authenticated(true);
        assert_eq!(s.take_gate_snapshot(), Some(true));
        assert_eq!(s.take_gate_snapshot(), None);
        assert!(!s.snapshot_gate());
    }
}
