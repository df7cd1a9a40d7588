//! The fixed messages the gate shows players, and the countdown table
//! that decides when to show them.
//!
//! Message texts are part of the contract with clients: some clients
//! match on them to drive a login screen. Change them only together with
//! those clients.

use gatekeeper_session::SessionConfig;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TextStyle / Notice
// ---------------------------------------------------------------------------

/// How a message should be rendered. The host maps these to its own
/// formatting codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Green,
    Yellow,
    Gold,
    Red,
    DarkRed,
}

/// A styled, player-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub text: &'static str,
    pub style: TextStyle,
}

impl Notice {
    const fn new(text: &'static str, style: TextStyle) -> Self {
        Self { text, style }
    }
}

// -- Countdown --

pub const LOGIN_PROMPT: Notice = Notice::new(
    "Login with /login <password>, or register yourself with /register <password>.",
    TextStyle::Green,
);
pub const WARN_10S: Notice =
    Notice::new("10 seconds remaining until disconnection!", TextStyle::Yellow);
pub const WARN_5S: Notice =
    Notice::new("5 seconds remaining until disconnection!", TextStyle::Yellow);
pub const WARN_4S: Notice =
    Notice::new("4 seconds remaining until disconnection!", TextStyle::Yellow);
pub const WARN_3S: Notice =
    Notice::new("3 seconds remaining until disconnection!", TextStyle::Gold);
pub const WARN_2S: Notice =
    Notice::new("2 seconds remaining until disconnection!", TextStyle::Gold);
// "1 seconds" is what clients have always received.
pub const WARN_1S: Notice =
    Notice::new("1 seconds remaining until disconnection!", TextStyle::Red);
pub const TIMED_OUT: Notice =
    Notice::new("Login timed out: you will be disconnected.", TextStyle::DarkRed);

/// Disconnect reason sent when the countdown runs out.
pub const EVICTION_REASON: &str = "Login timed out.";

// -- Registration --

pub const REGISTRATION_SUCCEEDED: Notice =
    Notice::new("Registration successful: you are registered.", TextStyle::Green);
pub const POST_REGISTRATION_LOGIN_SUCCEEDED: Notice = Notice::new(
    "Post-registration login successful: you are free to play.",
    TextStyle::Green,
);
pub const POST_REGISTRATION_LOGIN_FAILED: Notice = Notice::new(
    "Post-registration login failed: report this to an administrator.",
    TextStyle::Red,
);
pub const ALREADY_REGISTERED: Notice =
    Notice::new("Registration failed: you are already registered.", TextStyle::Gold);

// -- Login --

pub const ALREADY_LOGGED_IN: Notice =
    Notice::new("Login failed: you are already logged in.", TextStyle::Gold);
pub const LOGIN_SUCCEEDED: Notice =
    Notice::new("Login successful: you are free to play.", TextStyle::Green);
pub const WRONG_PASSWORD: Notice =
    Notice::new("Login failed: you entered the wrong password.", TextStyle::Red);
pub const NOT_REGISTERED: Notice =
    Notice::new("Login failed: you are not registered.", TextStyle::Red);

/// Disconnect reason sent after too many wrong passwords.
pub const ATTEMPTS_EXCEEDED_REASON: &str = "Login attempts exceeded maximum threshold.";

/// "3 attempts remaining.", "1 attempt remaining.", ...
///
/// Shown in [`TextStyle::Gold`].
pub fn attempts_remaining(remaining: u32) -> String {
    let plural = if remaining == 1 { "" } else { "s" };
    format!("{remaining} attempt{plural} remaining.")
}

// ---------------------------------------------------------------------------
// Countdown table
// ---------------------------------------------------------------------------

/// What the gate should do for a given countdown value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownAction {
    /// Send this notice to the player.
    Notify(Notice),
    /// Disconnect the player with [`EVICTION_REASON`].
    Evict,
}

/// Looks up the countdown table.
///
/// Warnings match the countdown exactly, so each fires at most once as
/// the countdown passes through it. If the host skips ticks, a warning
/// can be missed. Eviction is a range check and fires on any tick at or
/// past `-eviction_delay_ticks`.
///
/// | countdown            | action                |
/// |----------------------|-----------------------|
/// | `grace_ticks` (400)  | [`LOGIN_PROMPT`]      |
/// | 200                  | [`WARN_10S`]          |
/// | 100                  | [`WARN_5S`]           |
/// | 80                   | [`WARN_4S`]           |
/// | 60                   | [`WARN_3S`]           |
/// | 40                   | [`WARN_2S`]           |
/// | 20                   | [`WARN_1S`]           |
/// | 0                    | [`TIMED_OUT`]         |
/// | ≤ `-eviction_delay`  | evict                 |
pub fn countdown_action(countdown: i64, config: &SessionConfig) -> Option<CountdownAction> {
    if countdown == config.grace_ticks {
        return Some(CountdownAction::Notify(LOGIN_PROMPT));
    }
    let notice = match countdown {
        200 => WARN_10S,
        100 => WARN_5S,
        80 => WARN_4S,
        60 => WARN_3S,
        40 => WARN_2S,
        20 => WARN_1S,
        0 => TIMED_OUT,
        c if c <= config.eviction_delay_ticks.saturating_neg() => return Some(CountdownAction::Evict),
        _ => return None,
    };
    Some(CountdownAction::Notify(notice))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig::default()
    }

    #[test]
    fn test_countdown_action_thresholds_are_exact() {
        let c = config();
        assert_eq!(countdown_action(400, &c), Some(CountdownAction::Notify(LOGIN_PROMPT)));
        assert_eq!(countdown_action(200, &c), Some(CountdownAction::Notify(WARN_10S)));
        assert_eq!(countdown_action(20, &c), Some(CountdownAction::Notify(WARN_1S)));
        assert_eq!(countdown_action(0, &c), Some(CountdownAction::Notify(TIMED_OUT)));
        assert_eq!(countdown_action(399, &c), None);
        assert_eq!(countdown_action(201, &c), None);
        assert_eq!(countdown_action(199, &c), None);
        assert_eq!(countdown_action(-1, &c), None);
        assert_eq!(countdown_action(-19, &c), None);
    }

    #[test]
    fn test_countdown_action_eviction_is_a_range() {
        let c = config();
        assert_eq!(countdown_action(-20, &c), Some(CountdownAction::Evict));
        assert_eq!(countdown_action(-21, &c), Some(CountdownAction::Evict));
        assert_eq!(countdown_action(-5_000, &c), Some(CountdownAction::Evict));
    }

    #[test]
    fn test_countdown_action_prompt_follows_configured_budget() {
        let c = SessionConfig {
            grace_ticks: 600,
            ..SessionConfig::default()
        };
        assert_eq!(countdown_action(600, &c), Some(CountdownAction::Notify(LOGIN_PROMPT)));
        assert_eq!(countdown_action(400, &c), None);
        // The second-based warnings stay where they are.
        assert_eq!(countdown_action(200, &c), Some(CountdownAction::Notify(WARN_10S)));
    }

    #[test]
    fn test_countdown_table_texts_and_styles_are_exact() {
        let c = config();
        let table = [
            (
                400,
                "Login with /login <password>, or register yourself with /register <password>.",
                TextStyle::Green,
            ),
            (200, "10 seconds remaining until disconnection!", TextStyle::Yellow),
            (100, "5 seconds remaining until disconnection!", TextStyle::Yellow),
            (80, "4 seconds remaining until disconnection!", TextStyle::Yellow),
            (60, "3 seconds remaining until disconnection!", TextStyle::Gold),
            (40, "2 seconds remaining until disconnection!", TextStyle::Gold),
            (20, "1 seconds remaining until disconnection!", TextStyle::Red),
            (0, "Login timed out: you will be disconnected.", TextStyle::DarkRed),
        ];

        for (countdown, text, style) in table {
            let Some(CountdownAction::Notify(notice)) = countdown_action(countdown, &c) else {
                panic!("no notice at countdown {countdown}");
            };
            assert_eq!(notice.text, text, "countdown {countdown}");
            assert_eq!(notice.style, style, "countdown {countdown}");
        }
        assert_eq!(EVICTION_REASON, "Login timed out.");
    }

    #[test]
    fn test_auth_notice_texts_and_styles_are_exact() {
        let table = [
            (
                REGISTRATION_SUCCEEDED,
                "Registration successful: you are registered.",
                TextStyle::Green,
            ),
            (
                POST_REGISTRATION_LOGIN_SUCCEEDED,
                "Post-registration login successful: you are free to play.",
                TextStyle::Green,
            ),
            (
                POST_REGISTRATION_LOGIN_FAILED,
                "Post-registration login failed: report this to an administrator.",
                TextStyle::Red,
            ),
            (
                ALREADY_REGISTERED,
                "Registration failed: you are already registered.",
                TextStyle::Gold,
            ),
            (
                ALREADY_LOGGED_IN,
                "Login failed: you are already logged in.",
                TextStyle::Gold,
            ),
            (
                LOGIN_SUCCEEDED,
                "Login successful: you are free to play.",
                TextStyle::Green,
            ),
            (
                WRONG_PASSWORD,
                "Login failed: you entered the wrong password.",
                TextStyle::Red,
            ),
            (
                NOT_REGISTERED,
                "Login failed: you are not registered.",
                TextStyle::Red,
            ),
        ];

        for (notice, text, style) in table {
            assert_eq!(notice, Notice::new(text, style));
        }
        assert_eq!(ATTEMPTS_EXCEEDED_REASON, "Login attempts exceeded maximum threshold.");
    }

    #[test]
    fn test_countdown_action_extreme_delay_does_not_overflow() {
        let c = SessionConfig {
            eviction_delay_ticks: i64::MIN,
            ..SessionConfig::default()
        };
        // A negative delay puts the eviction line above every countdown.
        assert_eq!(countdown_action(i64::MIN, &c), Some(CountdownAction::Evict));
        assert_eq!(countdown_action(399, &c), Some(CountdownAction::Evict));
        assert_eq!(countdown_action(0, &c), Some(CountdownAction::Notify(TIMED_OUT)));
    }

    #[test]
    fn test_attempts_remaining_pluralizes() {
        assert_eq!(attempts_remaining(3), "3 attempts remaining.");
        assert_eq!(attempts_remaining(2), "2 attempts remaining.");
        assert_eq!(attempts_remaining(1), "1 attempt remaining.");
    }

    #[test]
    fn test_text_style_serializes_snake_case() {
        let json = serde_json::to_string(&TextStyle::DarkRed).unwrap();
        assert_eq!(json, "\"dark_red\"");
    }
}
