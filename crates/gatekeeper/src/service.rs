//! Gate service: the login gate running as an isolated Tokio task.
//!
//! The gate and the auth handler are synchronous and need `&mut` access.
//! Real servers receive `/login` commands on connection tasks while the
//! tick loop runs elsewhere, so the service puts the gate, the auth
//! handler, the host and the tick clock in one actor and talks to it over
//! an mpsc channel. Ticks and commands are handled one at a time, which
//! is what keeps a login from landing halfway through a tick's bookkeeping.

use std::time::Duration;

use gatekeeper_gate::{AuthHandler, Connection, GateScheduler, LoginOutcome, Notifier, RegisterOutcome};
use gatekeeper_session::{CredentialStore, PlayerId, Position, SessionError, SessionId};
use gatekeeper_tick::{TickClock, TickInfo};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::{GatekeeperConfig, GatekeeperError};

/// The host server, as seen by the gate service.
///
/// On top of the gate's collaborator traits, the host gets a hook to run
/// its own world update between the two gate phases of each tick.
pub trait WorldHost: Notifier + Connection + Send + 'static {
    /// Advances the host's world by one tick. Anything that moves a gated
    /// player here is undone at the end of the tick. Default: no-op.
    fn update(&mut self, _dt: Duration) {}
}

/// A point-in-time copy of one session's gate state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub player: PlayerId,
    pub authenticated: bool,
    pub remaining_ticks: i64,
    pub login_attempts: u32,
    pub pinned_position: Position,
}

/// Counters for the whole service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateStats {
    /// Sessions currently tracked (authenticated or not).
    pub sessions: usize,
    /// Ticks run so far.
    pub ticks: u64,
    /// Ticks the clock skipped because the service fell behind.
    pub ticks_skipped: u64,
    /// Sessions disconnected by the countdown.
    pub evictions: u64,
    /// Whether ticking is paused.
    pub paused: bool,
}

/// Commands sent to the gate actor through its channel.
///
/// The `oneshot::Sender` in most variants is the reply channel: the
/// handle sends a command and waits for the answer on it.
enum GateCommand {
    Join {
        session_id: SessionId,
        player: PlayerId,
        position: Position,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Leave {
        session_id: SessionId,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Login {
        session_id: SessionId,
        password: String,
        reply: oneshot::Sender<Result<LoginOutcome, SessionError>>,
    },
    Register {
        session_id: SessionId,
        password: String,
        reply: oneshot::Sender<Result<RegisterOutcome, SessionError>>,
    },
    Snapshot {
        session_id: SessionId,
        reply: oneshot::Sender<Option<SessionSnapshot>>,
    },
    Stats {
        reply: oneshot::Sender<GateStats>,
    },
    Pause {
        reply: oneshot::Sender<()>,
    },
    Resume {
        reply: oneshot::Sender<()>,
    },
    Shutdown,
}

/// Handle to a running gate service.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper. Give one to
/// every connection task.
#[derive(Clone)]
pub struct GateHandle {
    sender: mpsc::Sender<GateCommand>,
}

impl GateHandle {
    /// Starts gating a new connection.
    pub async fn join(
        &self,
        session_id: SessionId,
        player: PlayerId,
        position: Position,
    ) -> Result<(), GatekeeperError> {
        let result = self
            .request(|reply| GateCommand::Join {
                session_id,
                player,
                position,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Stops gating a connection (it disconnected on its own).
    pub async fn leave(&self, session_id: SessionId) -> Result<(), GatekeeperError> {
        let result = self
            .request(|reply| GateCommand::Leave { session_id, reply })
            .await?;
        Ok(result?)
    }

    /// Runs `/login <password>` for a session.
    pub async fn login(
        &self,
        session_id: SessionId,
        password: &str,
    ) -> Result<LoginOutcome, GatekeeperError> {
        let password = password.to_owned();
        let result = self
            .request(|reply| GateCommand::Login {
                session_id,
                password,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Runs `/register <password>` for a session.
    pub async fn register(
        &self,
        session_id: SessionId,
        password: &str,
    ) -> Result<RegisterOutcome, GatekeeperError> {
        let password = password.to_owned();
        let result = self
            .request(|reply| GateCommand::Register {
                session_id,
                password,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Current state of one session, or `None` if it isn't tracked.
    pub async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SessionSnapshot>, GatekeeperError> {
        self.request(|reply| GateCommand::Snapshot { session_id, reply })
            .await
    }

    pub async fn stats(&self) -> Result<GateStats, GatekeeperError> {
        self.request(|reply| GateCommand::Stats { reply }).await
    }

    /// Stops ticking. Every countdown freezes and nobody is pinned or
    /// evicted until [`resume`](Self::resume); commands are still served.
    pub async fn pause(&self) -> Result<(), GatekeeperError> {
        self.request(|reply| GateCommand::Pause { reply }).await
    }

    /// Restarts ticking after [`pause`](Self::pause). Time spent paused
    /// does not count against anyone's countdown.
    pub async fn resume(&self) -> Result<(), GatekeeperError> {
        self.request(|reply| GateCommand::Resume { reply }).await
    }

    /// Tells the service to stop. Pending commands are dropped.
    pub async fn shutdown(&self) -> Result<(), GatekeeperError> {
        self.sender
            .send(GateCommand::Shutdown)
            .await
            .map_err(|_| GatekeeperError::Unavailable)
    }

    /// Sends a command built around a fresh reply channel and waits for
    /// the answer.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> GateCommand,
    ) -> Result<T, GatekeeperError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(build(reply_tx))
            .await
            .map_err(|_| GatekeeperError::Unavailable)?;
        reply_rx.await.map_err(|_| GatekeeperError::Unavailable)
    }
}

/// Spawns gate services.
pub struct GateService;

impl GateService {
    /// Spawns the gate actor on the current Tokio runtime and returns a
    /// handle to it.
    ///
    /// The actor owns `host` and `store` until it shuts down.
    pub fn spawn<H, S>(config: GatekeeperConfig, host: H, store: S) -> GateHandle
    where
        H: WorldHost,
        S: CredentialStore,
    {
        let config = config.validated();
        let (tx, rx) = mpsc::channel(config.command_buffer);

        let actor = GateActor {
            gate: GateScheduler::new(config.session.clone()),
            auth: AuthHandler::new(store),
            clock: TickClock::new(config.tick.clone()),
            host,
            receiver: rx,
            evictions: 0,
        };

        tokio::spawn(actor.run());

        GateHandle { sender: tx }
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct GateActor<H: WorldHost, S: CredentialStore> {
    gate: GateScheduler,
    auth: AuthHandler<S>,
    clock: TickClock,
    host: H,
    receiver: mpsc::Receiver<GateCommand>,
    evictions: u64,
}

impl<H: WorldHost, S: CredentialStore> GateActor<H, S> {
    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::info!(
            rate_hz = self.clock.tick_rate_hz(),
            grace_ticks = self.gate.config().grace_ticks,
            "gate service started"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else {
                        tracing::debug!("all gate handles dropped");
                        break;
                    };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                info = self.clock.wait_for_tick() => {
                    self.run_tick(info);
                }
            }
        }

        tracing::info!(
            ticks = self.clock.tick_count(),
            evictions = self.evictions,
            "gate service stopped"
        );
    }

    /// One full tick: Phase A, host world update, Phase B.
    fn run_tick(&mut self, info: TickInfo) {
        let before = self.gate.len();
        self.gate.begin_tick(&mut self.host);
        // Only eviction removes sessions during Phase A.
        self.evictions += (before - self.gate.len()) as u64;

        self.host.update(info.dt);
        self.gate.end_tick(&mut self.host);
    }

    /// Handles one command. Returns `false` when the actor should stop.
    fn handle_command(&mut self, cmd: GateCommand) -> bool {
        match cmd {
            GateCommand::Join {
                session_id,
                player,
                position,
                reply,
            } => {
                let result = self.gate.join(session_id, player, position).map(|_| ());
                let _ = reply.send(result);
            }
            GateCommand::Leave { session_id, reply } => {
                let result = self.gate.leave(session_id).map(|_| ());
                let _ = reply.send(result);
            }
            GateCommand::Login {
                session_id,
                password,
                reply,
            } => {
                let result = self
                    .auth
                    .login(&mut self.gate, &mut self.host, session_id, &password);
                let _ = reply.send(result);
            }
            GateCommand::Register {
                session_id,
                password,
                reply,
            } => {
                let result =
                    self.auth
                        .register(&mut self.gate, &mut self.host, session_id, &password);
                let _ = reply.send(result);
            }
            GateCommand::Snapshot { session_id, reply } => {
                let _ = reply.send(self.snapshot(session_id));
            }
            GateCommand::Stats { reply } => {
                let _ = reply.send(GateStats {
                    sessions: self.gate.len(),
                    ticks: self.clock.tick_count(),
                    ticks_skipped: self.clock.total_skipped(),
                    evictions: self.evictions,
                    paused: self.clock.is_paused(),
                });
            }
            GateCommand::Pause { reply } => {
                self.clock.pause();
                tracing::info!(tick = self.clock.tick_count(), "gate ticking paused");
                let _ = reply.send(());
            }
            GateCommand::Resume { reply } => {
                self.clock.resume();
                tracing::info!(tick = self.clock.tick_count(), "gate ticking resumed");
                let _ = reply.send(());
            }
            GateCommand::Shutdown => {
                tracing::info!(sessions = self.gate.len(), "gate service shutting down");
                return false;
            }
        }
        true
    }

    fn snapshot(&self, session_id: SessionId) -> Option<SessionSnapshot> {
        self.gate.session(session_id).map(|s| SessionSnapshot {
            session_id,
            player: s.player(),
            authenticated: s.is_authenticated(),
            remaining_ticks: s.remaining_ticks(),
            login_attempts: s.login_attempts(),
            pinned_position: s.pinned_position(),
        })
    }
}
