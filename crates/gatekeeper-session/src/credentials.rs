//! Credential storage hook for checking passwords.
//!
//! Gatekeeper doesn't decide how passwords are stored. Hashing scheme,
//! salt length and file format belong to whoever runs the server.
//!
//! Instead, Gatekeeper defines the [`CredentialStore`] trait: register a
//! password for an account, and check a password against it. The auth
//! handler calls it during `/login` and `/register`.
//!
//! # Why a trait?
//!
//! The same gate can then run against a salted-hash file in production,
//! a database table behind a service, or the [`MemoryCredentialStore`] in
//! tests, without changing any gate code.

use std::collections::HashMap;

use crate::{PlayerId, SessionError};

/// Stores and checks account passwords.
///
/// # Trait bounds
///
/// - `Send` → the store can be moved into the gate service task.
/// - `'static` → it doesn't borrow temporary data; it lives as long as
///   the service that owns it.
///
/// # Example
///
/// ```rust
/// use std::collections::HashSet;
///
/// use gatekeeper_session::{CredentialStore, PlayerId, SessionError};
///
/// /// Lets every registered account in, whatever the password.
/// /// Only for local testing. Never use this in production!
/// #[derive(Default)]
/// struct OpenDoor {
///     known: HashSet<PlayerId>,
/// }
///
/// impl CredentialStore for OpenDoor {
///     fn contains(&self, player: PlayerId) -> bool {
///         self.known.contains(&player)
///     }
///
///     fn register(&mut self, player: PlayerId, _password: &str) -> Result<(), SessionError> {
///         if !self.known.insert(player) {
///             return Err(SessionError::AlreadyRegistered(player));
///         }
///         Ok(())
///     }
///
///     fn verify(&self, player: PlayerId, _password: &str) -> Result<bool, SessionError> {
///         Ok(self.contains(player))
///     }
/// }
/// ```
pub trait CredentialStore: Send + 'static {
    /// Returns `true` if the account has stored credentials.
    fn contains(&self, player: PlayerId) -> bool;

    /// Stores credentials for a new account.
    ///
    /// # Errors
    /// - [`SessionError::AlreadyRegistered`] if the account exists
    /// - [`SessionError::Credentials`] if the backend fails
    fn register(&mut self, player: PlayerId, password: &str) -> Result<(), SessionError>;

    /// Checks a password.
    ///
    /// # Returns
    /// - `Ok(true)`: the password matches
    /// - `Ok(false)`: wrong password, or the account doesn't exist
    /// - `Err(SessionError::Credentials)`: the backend failed
    fn verify(&self, player: PlayerId, password: &str) -> Result<bool, SessionError>;
}

/// An in-memory store that keeps passwords as given.
///
/// Useful for development servers and tests. Nothing is persisted and
/// nothing is hashed, so don't put real passwords in it.
#[derive(Debug, Default, Clone)]
pub struct MemoryCredentialStore {
    passwords: HashMap<PlayerId, String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passwords.is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn contains(&self, player: PlayerId) -> bool {
        self.passwords.contains_key(&player)
    }

    fn register(&mut self, player: PlayerId, password: &str) -> Result<(), SessionError> {
        if self.passwords.contains_key(&player) {
            return Err(SessionError::AlreadyRegistered(player));
        }
        self.passwords.insert(player, password.to_owned());
        tracing::debug!(%player, "credentials stored");
        Ok(())
    }

    fn verify(&self, player: PlayerId, password: &str) -> Result<bool, SessionError> {
        Ok(self
            .passwords
            .get(&player)
            .is_some_and(|stored| stored == password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_then_verify_accepts_same_password() {
        let mut store = MemoryCredentialStore::new();
        store.register(PlayerId(1), "hunter2").unwrap();

        assert!(store.contains(PlayerId(1)));
        assert!(store.verify(PlayerId(1), "hunter2").unwrap());
        assert!(!store.verify(PlayerId(1), "hunter3").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_register_twice_returns_already_registered() {
        let mut store = MemoryCredentialStore::new();
        store.register(PlayerId(1), "a").unwrap();

        let result = store.register(PlayerId(1), "b");
        assert!(matches!(result, Err(SessionError::AlreadyRegistered(p)) if p == PlayerId(1)));
        // The original password is untouched.
        assert!(store.verify(PlayerId(1), "a").unwrap());
    }

    #[test]
    fn test_verify_unknown_player_is_false() {
        let store = MemoryCredentialStore::new();
        assert!(store.is_empty());
        assert!(!store.verify(PlayerId(9), "anything").unwrap());
    }
}
