//! Fixed-rate tick clock for Gatekeeper.
//!
//! The login gate counts ticks, not seconds. This crate turns wall-clock
//! time into ticks at a fixed rate (20 Hz by default, so the 400-tick
//! grace budget is 20 seconds) and tells the caller when it fell behind.
//!
//! # Skipped ticks
//!
//! When a tick fires late, the clock does not replay the missed ticks. It
//! resumes from now and reports how many were skipped in
//! [`TickInfo::ticks_skipped`]. The gate only counts the ticks it actually
//! ran, so a stall stretches the grace period and may swallow a countdown
//! warning; eviction still happens.
//!
//! # Integration
//!
//! The clock sits inside the service's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* login, register, join... */ }
//!         info = clock.wait_for_tick() => {
//!             gate.begin_tick(&mut host);
//!             host.update(info.dt);
//!             gate.end_tick(&mut host);
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the tick clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Ticks per second. Must be in `1..=MAX_TICK_RATE_HZ`.
    pub tick_rate_hz: u32,
    /// Random delay (0–max µs) added to the *first* tick, so gates started
    /// at the same instant don't all tick together.
    pub initial_jitter_us: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: Self::DEFAULT_TICK_RATE_HZ,
            initial_jitter_us: 2_000,
        }
    }
}

impl TickConfig {
    /// The rate the login countdown is tuned for.
    pub const DEFAULT_TICK_RATE_HZ: u32 = 20;

    /// Maximum supported tick rate.
    pub const MAX_TICK_RATE_HZ: u32 = 128;

    /// A config for a specific rate with no jitter.
    pub fn with_rate(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz,
            initial_jitter_us: 0,
        }
    }

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`TickClock::new`]. A rate of 0 would never
    /// tick and let every session wait forever, so it falls back to the
    /// default rate rather than meaning "event-driven".
    pub fn validated(mut self) -> Self {
        if self.tick_rate_hz == 0 {
            warn!(
                default = Self::DEFAULT_TICK_RATE_HZ,
                "tick_rate_hz is 0, using default"
            );
            self.tick_rate_hz = Self::DEFAULT_TICK_RATE_HZ;
        } else if self.tick_rate_hz > Self::MAX_TICK_RATE_HZ {
            warn!(
                rate = self.tick_rate_hz,
                max = Self::MAX_TICK_RATE_HZ,
                "tick_rate_hz exceeds maximum, clamping"
            );
            self.tick_rate_hz = Self::MAX_TICK_RATE_HZ;
        }
        self
    }

    /// Duration of a single tick at the configured rate.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz.max(1) as f64)
    }
}

// ---------------------------------------------------------------------------
// TickInfo
// ---------------------------------------------------------------------------

/// Information about a tick, returned by [`TickClock::wait_for_tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// Fixed delta time (always `1 / tick_rate`).
    pub dt: Duration,
    /// Whole ticks that should have fired before this one but didn't,
    /// because the caller came back late.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// TickClock
// ---------------------------------------------------------------------------

/// Fixed-rate tick clock. One per gate service.
#[derive(Debug)]
pub struct TickClock {
    config: TickConfig,
    tick_duration: Duration,
    tick_count: u64,
    total_skipped: u64,
    /// When the next tick is due (Tokio instant for `sleep_until`).
    next_tick: Instant,
    paused: bool,
}

impl TickClock {
    /// Creates a clock. The first tick is due one tick duration from now,
    /// plus jitter.
    pub fn new(config: TickConfig) -> Self {
        let config = config.validated();
        let tick_duration = config.tick_duration();

        let jitter = if config.initial_jitter_us > 0 {
            Duration::from_micros(rand::rng().random_range(0..config.initial_jitter_us))
        } else {
            Duration::ZERO
        };

        debug!(
            rate_hz = config.tick_rate_hz,
            tick_ms = tick_duration.as_secs_f64() * 1000.0,
            jitter_us = jitter.as_micros() as u64,
            "tick clock created"
        );

        Self {
            config,
            tick_duration,
            tick_count: 0,
            total_skipped: 0,
            next_tick: Instant::now() + tick_duration + jitter,
            paused: false,
        }
    }

    /// A clock at `tick_rate_hz` with no jitter.
    pub fn with_rate(tick_rate_hz: u32) -> Self {
        Self::new(TickConfig::with_rate(tick_rate_hz))
    }

    /// Waits until the next tick is due.
    ///
    /// While paused, this future pends forever; `tokio::select!` keeps
    /// serving its other branches.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        if self.paused {
            return std::future::pending::<TickInfo>().await;
        }

        let due = self.next_tick;
        time::sleep_until(due).await;

        let now = Instant::now();
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(due);
        let ticks_skipped = (late_by.as_nanos() / self.tick_duration.as_nanos()) as u64;
        if ticks_skipped > 0 {
            warn!(
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "tick clock fell behind, skipping ahead"
            );
            self.total_skipped += ticks_skipped;
            // Resume from now rather than firing a burst of catch-up ticks.
            self.next_tick = now + self.tick_duration;
        } else {
            // Keep the original cadence when only slightly late.
            self.next_tick = due + self.tick_duration;
        }

        trace!(tick = self.tick_count, "tick fired");

        TickInfo {
            tick: self.tick_count,
            dt: self.tick_duration,
            ticks_skipped,
        }
    }

    /// Stops ticking. Idempotent.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(tick = self.tick_count, "tick clock paused");
        }
    }

    /// Resumes ticking. The next tick is due one tick duration from now,
    /// so time spent paused is neither replayed nor reported as skipped.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.next_tick = Instant::now() + self.tick_duration;
            debug!(tick = self.tick_count, "tick clock resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Ticks skipped so far because the caller fell behind.
    pub fn total_skipped(&self) -> u64 {
        self.total_skipped
    }

    pub fn tick_rate_hz(&self) -> u32 {
        self.config.tick_rate_hz
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick_duration
    }
}
