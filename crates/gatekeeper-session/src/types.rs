//! Identity and coordinate types shared by every Gatekeeper layer.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Identifies one live connection.
///
/// A new connection always gets a new `SessionId`, even when the same
/// account logs in again. The gate keys its side table by this id, so
/// state never leaks from an old connection into a new one.
///
/// This is a "newtype wrapper" around `u64`: the compiler won't let you
/// pass a `PlayerId` where a `SessionId` is expected, even though both
/// are plain integers underneath. `#[serde(transparent)]` keeps the JSON
/// form as just the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

/// Identifies an account: the key credentials are stored under.
///
/// Unlike [`SessionId`], a `PlayerId` survives reconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// World coordinates of a connection.
///
/// The gate never interprets these; it only copies them at tick start and
/// writes them back at tick end.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    /// The world origin `(0, 0, 0)`.
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_ids_use_prefixes() {
        assert_eq!(SessionId(7).to_string(), "S-7");
        assert_eq!(PlayerId(42).to_string(), "P-42");
    }

    #[test]
    fn test_ids_serialize_as_bare_numbers() {
        let json = serde_json::to_string(&SessionId(9)).unwrap();
        assert_eq!(json, "9");
        let back: PlayerId = serde_json::from_str("12").unwrap();
        assert_eq!(back, PlayerId(12));
    }

    #[test]
    fn test_position_display_rounds_to_two_places() {
        let p = Position::new(1.0, -2.5, 3.14159);
        assert_eq!(p.to_string(), "(1.00, -2.50, 3.14)");
    }

    #[test]
    fn test_position_default_is_origin() {
        assert_eq!(Position::default(), Position::ORIGIN);
    }
}
