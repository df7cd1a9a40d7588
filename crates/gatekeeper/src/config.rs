//! Service configuration.

use std::path::Path;

use gatekeeper_session::SessionConfig;
use gatekeeper_tick::TickConfig;
use serde::{Deserialize, Serialize};

use crate::GatekeeperError;

/// Everything needed to run a gate service.
///
/// Loaded from JSON; every field is optional:
///
/// ```json
/// {
///   "session": { "grace_ticks": 400, "eviction_delay_ticks": 20, "max_login_attempts": 3 },
///   "tick": { "tick_rate_hz": 20, "initial_jitter_us": 2000 },
///   "command_buffer": 256
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatekeeperConfig {
    /// Countdown budget and login attempt limit.
    pub session: SessionConfig,
    /// How fast the gate ticks.
    pub tick: TickConfig,
    /// Capacity of the service's command channel. When full, handle calls
    /// wait (backpressure).
    pub command_buffer: usize,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            tick: TickConfig::default(),
            command_buffer: 256,
        }
    }
}

impl GatekeeperConfig {
    /// Parses a JSON config and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, GatekeeperError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GatekeeperError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::info!(path = %path.display(), "loaded gatekeeper config");
        Self::from_json_str(&json)
    }

    /// Clamps every section to safe values.
    pub fn validated(self) -> Self {
        Self {
            session: self.session.validated(),
            tick: self.tick.validated(),
            command_buffer: self.command_buffer.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_twenty_second_budget() {
        let config = GatekeeperConfig::default();
        assert_eq!(config.session.grace_ticks, 400);
        assert_eq!(config.tick.tick_rate_hz, 20);
        assert_eq!(config.command_buffer, 256);
    }

    #[test]
    fn test_from_json_str_empty_object_is_default() {
        let config = GatekeeperConfig::from_json_str("{}").unwrap();
        assert_eq!(config, GatekeeperConfig::default());
    }

    #[test]
    fn test_from_json_str_overrides_nested_fields() {
        let config = GatekeeperConfig::from_json_str(
            r#"{ "session": { "max_login_attempts": 5 }, "tick": { "tick_rate_hz": 40 } }"#,
        )
        .unwrap();
        assert_eq!(config.session.max_login_attempts, 5);
        assert_eq!(config.session.grace_ticks, 400);
        assert_eq!(config.tick.tick_rate_hz, 40);
    }

    #[test]
    fn test_from_json_str_validates() {
        let config = GatekeeperConfig::from_json_str(
            r#"{ "tick": { "tick_rate_hz": 0 }, "command_buffer": 0 }"#,
        )
        .unwrap();
        assert_eq!(config.tick.tick_rate_hz, 20);
        assert_eq!(config.command_buffer, 1);
    }

    #[test]
    fn test_from_json_str_rejects_wrong_types() {
        let result = GatekeeperConfig::from_json_str(r#"{ "session": { "grace_ticks": "soon" } }"#);
        assert!(matches!(result, Err(GatekeeperError::Config(_))));
    }

    #[test]
    fn test_from_json_file_missing_is_io_error() {
        let result = GatekeeperConfig::from_json_file("/definitely/not/here/gatekeeper.json");
        assert!(matches!(result, Err(GatekeeperError::Io(_))));
    }

    #[test]
    fn test_from_json_file_reads_config() {
        let path = std::env::temp_dir().join(format!("gatekeeper-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "session": { "grace_ticks": 600 } }"#).unwrap();

        let config = GatekeeperConfig::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.session.grace_ticks, 600);
    }
}
