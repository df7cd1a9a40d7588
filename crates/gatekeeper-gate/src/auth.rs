//! The `/login` and `/register` flows.
//!
//! Parsing chat commands is the host's job. Once it has a session id and
//! a password, it hands them to [`AuthHandler`], which checks the
//! [`CredentialStore`], tells the player what happened and opens the gate
//! on success.

use gatekeeper_session::{CredentialStore, SessionError, SessionId};
use tracing::{error, info};

use crate::notice::{
    ALREADY_LOGGED_IN, ALREADY_REGISTERED, ATTEMPTS_EXCEEDED_REASON, LOGIN_SUCCEEDED,
    NOT_REGISTERED, Notice, POST_REGISTRATION_LOGIN_FAILED, POST_REGISTRATION_LOGIN_SUCCEEDED,
    REGISTRATION_SUCCEEDED, TextStyle, WRONG_PASSWORD, attempts_remaining,
};
use crate::{Connection, GateScheduler, Notifier};

/// Result of a `/login` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Password accepted. The gate is open for this session.
    LoggedIn,
    /// The session had already logged in; nothing changed.
    AlreadyLoggedIn,
    /// No credentials stored for this account.
    NotRegistered,
    /// Wrong password. `remaining` more wrong passwords are tolerated
    /// before the connection is dropped.
    WrongPassword { remaining: u32 },
    /// Wrong password with no attempts left. The connection was
    /// disconnected and the session removed from the gate.
    Disconnected,
}

/// Result of a `/register` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Credentials stored and the session logged in.
    Registered,
    /// The account already had credentials; nothing changed.
    AlreadyRegistered,
    /// Credentials were stored but logging in with them failed. This
    /// means the credential store is inconsistent.
    LoginFailed,
}

/// Handles logins and registrations against a [`CredentialStore`].
///
/// The handler is the only code besides the gate that writes
/// `authenticated` and `login_attempts`. It borrows the gate mutably for
/// each call, so a login is never observed half-applied by a tick.
///
/// The attempt limit and the countdown budget are read from the gate's
/// [`SessionConfig`](gatekeeper_session::SessionConfig), so one gate can be
/// served by any handler.
pub struct AuthHandler<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> AuthHandler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying credential store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Registers the session's account and logs it straight in.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] if the session isn't in the gate
    /// - [`SessionError::Credentials`] if the store fails
    pub fn register<H>(
        &mut self,
        gate: &mut GateScheduler,
        host: &mut H,
        session_id: SessionId,
        password: &str,
    ) -> Result<RegisterOutcome, SessionError>
    where
        H: Notifier + Connection + ?Sized,
    {
        let player = gate
            .session(session_id)
            .ok_or(SessionError::NotFound(session_id))?
            .player();

        if self.store.contains(player) {
            notify(host, session_id, ALREADY_REGISTERED);
            info!(%session_id, %player, "registration failed: already registered");
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        match self.store.register(player, password) {
            Ok(()) => {}
            Err(SessionError::AlreadyRegistered(_)) => {
                notify(host, session_id, ALREADY_REGISTERED);
                info!(%session_id, %player, "registration failed: already registered");
                return Ok(RegisterOutcome::AlreadyRegistered);
            }
            Err(e) => return Err(e),
        }

        notify(host, session_id, REGISTRATION_SUCCEEDED);
        info!(%session_id, %player, "registration succeeded");

        if self.store.verify(player, password)? {
            open_gate(gate, session_id)?;
            notify(host, session_id, POST_REGISTRATION_LOGIN_SUCCEEDED);
            info!(%session_id, %player, "post-registration login succeeded");
            Ok(RegisterOutcome::Registered)
        } else {
            notify(host, session_id, POST_REGISTRATION_LOGIN_FAILED);
            error!(%session_id, %player, "post-registration login failed: store rejected fresh credentials");
            Ok(RegisterOutcome::LoginFailed)
        }
    }

    /// Logs the session in with `password`.
    ///
    /// After `max_login_attempts` wrong passwords have been counted, the
    /// next wrong one disconnects the connection.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`] if the session isn't in the gate
    /// - [`SessionError::Credentials`] if the store fails
    pub fn login<H>(
        &mut self,
        gate: &mut GateScheduler,
        host: &mut H,
        session_id: SessionId,
        password: &str,
    ) -> Result<LoginOutcome, SessionError>
    where
        H: Notifier + Connection + ?Sized,
    {
        let session = gate
            .session(session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        let player = session.player();

        if session.is_authenticated() {
            notify(host, session_id, ALREADY_LOGGED_IN);
            info!(%session_id, %player, "login failed: already logged in");
            return Ok(LoginOutcome::AlreadyLoggedIn);
        }

        if !self.store.contains(player) {
            notify(host, session_id, NOT_REGISTERED);
            info!(%session_id, %player, "login failed: not registered");
            return Ok(LoginOutcome::NotRegistered);
        }

        if self.store.verify(player, password)? {
            open_gate(gate, session_id)?;
            notify(host, session_id, LOGIN_SUCCEEDED);
            info!(%session_id, %player, "login succeeded");
            return Ok(LoginOutcome::LoggedIn);
        }

        notify(host, session_id, WRONG_PASSWORD);

        let max = gate.config().max_login_attempts;
        let session = gate
            .session_mut(session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        let attempts = session.login_attempts();

        if attempts < max {
            let remaining = max - attempts;
            host.send(session_id, &attempts_remaining(remaining), TextStyle::Gold);
            session.record_attempt();
            info!(%session_id, %player, remaining, "login failed: wrong password");
            Ok(LoginOutcome::WrongPassword { remaining })
        } else {
            host.disconnect(session_id, ATTEMPTS_EXCEEDED_REASON);
            gate.leave(session_id)?;
            info!(%session_id, %player, attempts, "login failed: attempt limit exceeded, disconnected");
            Ok(LoginOutcome::Disconnected)
        }
    }
}

/// Marks the session authenticated and resets its counters.
fn open_gate(gate: &mut GateScheduler, session_id: SessionId) -> Result<(), SessionError> {
    let grace_ticks = gate.config().grace_ticks;
    let session = gate
        .session_mut(session_id)
        .ok_or(SessionError::NotFound(session_id))?;
    session.set_authenticated(true);
    session.reset_countdown(grace_ticks);
    session.reset_attempts();
    Ok(())
}

fn notify<H: Notifier + ?Sized>(host: &mut H, session_id: SessionId, notice: Notice) {
    host.send(session_id, notice.text, notice.style);
}
