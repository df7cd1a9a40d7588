use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gatekeeper::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Simulated world
// ---------------------------------------------------------------------------

/// A tiny world where every player is falling: each tick moves them one
/// block down. Gated players should stay exactly where they joined.
#[derive(Clone, Default)]
struct FallingWorld {
    positions: Arc<Mutex<HashMap<SessionId, Position>>>,
}

impl FallingWorld {
    fn spawn(&self, session: SessionId, position: Position) {
        if let Ok(mut positions) = self.positions.lock() {
            positions.insert(session, position);
        }
    }

    fn height(&self, session: SessionId) -> Option<f64> {
        self.positions.lock().ok()?.get(&session).map(|p| p.y)
    }
}

impl Notifier for FallingWorld {
    fn send(&mut self, session: SessionId, text: &str, style: TextStyle) {
        tracing::info!(%session, ?style, "chat: {text}");
    }
}

impl Connection for FallingWorld {
    fn position(&self, session: SessionId) -> Option<Position> {
        self.positions.lock().ok()?.get(&session).copied()
    }

    fn set_position(&mut self, session: SessionId, position: Position) {
        self.spawn(session, position);
    }

    fn disconnect(&mut self, session: SessionId, reason: &str) {
        tracing::warn!(%session, reason, "kicked");
        if let Ok(mut positions) = self.positions.lock() {
            positions.remove(&session);
        }
    }
}

impl WorldHost for FallingWorld {
    fn update(&mut self, _dt: Duration) {
        if let Ok(mut positions) = self.positions.lock() {
            for position in positions.values_mut() {
                position.y -= 1.0;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Demo
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional: path to a JSON config as the first argument.
    let config = match std::env::args().nth(1) {
        Some(path) => GatekeeperConfig::from_json_file(path)?,
        None => GatekeeperConfig::default(),
    };

    let world = FallingWorld::default();
    let handle = GateService::spawn(config, world.clone(), MemoryCredentialStore::new());

    let spawn_point = Position::new(0.0, 100.0, 0.0);
    let (newcomer, idler) = (SessionId(1), SessionId(2));
    for (session, player) in [(newcomer, PlayerId(1)), (idler, PlayerId(2))] {
        world.spawn(session, spawn_point);
        handle.join(session, player, spawn_point).await?;
    }

    // The newcomer reads the prompt and registers after a couple of seconds.
    tokio::time::sleep(Duration::from_secs(2)).await;
    let outcome = handle.register(newcomer, "correct horse").await?;
    tracing::info!(?outcome, "newcomer registered");

    // The idler never logs in and is kicked when the countdown runs out.
    while handle.snapshot(idler).await?.is_some() {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    let stats = handle.stats().await?;
    tracing::info!(
        newcomer_height = ?world.height(newcomer),
        ticks = stats.ticks,
        evictions = stats.evictions,
        "demo finished"
    );

    handle.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_moves_everyone_down() {
        let mut world = FallingWorld::default();
        world.spawn(SessionId(1), Position::new(0.0, 10.0, 0.0));

        world.update(Duration::from_millis(50));

        assert_eq!(world.height(SessionId(1)), Some(9.0));
    }

    #[test]
    fn test_disconnect_removes_player() {
        let mut world = FallingWorld::default();
        world.spawn(SessionId(1), Position::ORIGIN);

        world.disconnect(SessionId(1), "bye");

        assert_eq!(world.position(SessionId(1)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gated_player_does_not_fall() {
        let world = FallingWorld::default();
        let handle = GateService::spawn(
            GatekeeperConfig {
                tick: TickConfig::with_rate(20),
                ..GatekeeperConfig::default()
            },
            world.clone(),
            MemoryCredentialStore::new(),
        );
        world.spawn(SessionId(1), Position::new(0.0, 100.0, 0.0));
        handle
            .join(SessionId(1), PlayerId(1), Position::new(0.0, 100.0, 0.0))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(world.height(SessionId(1)), Some(100.0));
    }
}
