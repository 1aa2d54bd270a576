//! Heartbeat ticker for Spellwire.
//!
//! Produces one tick per fixed interval. The session uses each tick to age
//! its pending commands and to send a liveness `ping`.
//!
//! # Paused mode
//!
//! While paused, [`HeartbeatTicker::wait_for_tick`] pends forever. The
//! client pauses the ticker whenever the session is not connected, so no
//! ticks pile up while there is no server to ping.
//!
//! # Integration
//!
//! The ticker is designed to sit inside the client driver's
//! `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         line = stream.recv_line() => { /* session.on_line(..) */ }
//!         _ = ticker.wait_for_tick() => session.on_tick(),
//!     }
//! }
//! ```
//!
//! `wait_for_tick` only updates its state after the deadline has passed,
//! so dropping it mid-wait (the other `select!` branch won) loses nothing.

use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the heartbeat ticker.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Time between ticks. Default: 1 second.
    pub interval: Duration,
    /// Random delay (0..max) added to the *first* tick, so many clients
    /// started together don't ping in lockstep. Default: none.
    pub initial_jitter: Duration,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            initial_jitter: Duration::ZERO,
        }
    }
}

impl TickConfig {
    /// Shortest interval the ticker accepts.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

    /// Longest interval (and jitter) the ticker accepts: one day.
    pub const MAX_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

    /// A config with the given interval and no jitter.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    /// Fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`HeartbeatTicker::new`]. A zero interval
    /// would spin, so it is raised to [`Self::MIN_INTERVAL`]. Interval and
    /// jitter above [`Self::MAX_INTERVAL`] are lowered to it, so a deadline
    /// can always be computed.
    pub fn validated(mut self) -> Self {
        if self.interval < Self::MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                "heartbeat interval too small, clamping to 1 ms"
            );
            self.interval = Self::MIN_INTERVAL;
        }
        if self.interval > Self::MAX_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                "heartbeat interval too large, clamping to one day"
            );
            self.interval = Self::MAX_INTERVAL;
        }
        self.initial_jitter = self.initial_jitter.min(Self::MAX_INTERVAL);
        self
    }
}

// ---------------------------------------------------------------------------
// Tick info (returned to caller each tick)
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by
/// [`HeartbeatTicker::wait_for_tick`].
#[derive(Debug, Clone)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// How late the tick fired relative to its deadline.
    pub late_by: Duration,
    /// Whole intervals that passed unticked because the caller was busy.
    /// Missed ticks are never replayed.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Ticker
// ---------------------------------------------------------------------------

/// Fixed-period, pausable tick source.
pub struct HeartbeatTicker {
    config: TickConfig,
    tick_count: u64,
    /// When the next tick should fire (Tokio instant for `sleep_until`).
    next_tick: Instant,
    paused: bool,
    /// Jitter not yet spent. Added to the first deadline only, whether that
    /// is set at creation or by the first `resume` of a paused ticker.
    pending_jitter: Duration,
}

impl HeartbeatTicker {
    /// Create a running ticker. The first tick fires one interval (plus
    /// jitter) from now.
    pub fn new(config: TickConfig) -> Self {
        let mut ticker = Self::paused(config);
        ticker.resume();
        ticker
    }

    /// Create a ticker that starts paused.
    ///
    /// The jitter is kept for the first [`resume`](Self::resume).
    pub fn paused(config: TickConfig) -> Self {
        let config = config.validated();

        let jitter = if config.initial_jitter > Duration::ZERO {
            let max = config.initial_jitter.as_micros() as u64;
            Duration::from_micros(rand::rng().random_range(0..max.max(1)))
        } else {
            Duration::ZERO
        };

        debug!(
            interval_ms = config.interval.as_millis() as u64,
            jitter_us = jitter.as_micros() as u64,
            "heartbeat ticker created"
        );

        Self {
            next_tick: Instant::now() + config.interval,
            config,
            tick_count: 0,
            paused: true,
            pending_jitter: jitter,
        }
    }

    /// Wait until the next tick is due.
    ///
    /// When paused this future pends forever; `tokio::select!` still
    /// processes its other branches.
    pub async fn wait_for_tick(&mut self) -> TickInfo {
        if self.paused {
            return std::future::pending().await;
        }

        let deadline = self.next_tick;
        time::sleep_until(deadline).await;

        let now = Instant::now();
        let interval = self.config.interval;
        self.tick_count += 1;

        let late_by = now.saturating_duration_since(deadline);
        let ticks_skipped =
            (late_by.as_nanos() / interval.as_nanos().max(1)) as u64;
        if ticks_skipped > 0 {
            warn!(
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = late_by.as_millis() as u64,
                "heartbeat late, skipping ahead"
            );
        }

        // Always schedule from now so a stall never causes a burst.
        self.next_tick = now + interval;

        trace!(tick = self.tick_count, "heartbeat tick");

        TickInfo {
            tick: self.tick_count,
            late_by,
            ticks_skipped,
        }
    }

    /// Stop ticking. `wait_for_tick` pends until [`resume`](Self::resume).
    ///
    /// Safe to call multiple times (idempotent).
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            debug!(tick = self.tick_count, "heartbeat paused");
        }
    }

    /// Start ticking again.
    ///
    /// The next tick fires one full interval from now, never immediately.
    /// The first resume also adds the initial jitter.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            let jitter = std::mem::take(&mut self.pending_jitter);
            self.next_tick = Instant::now() + self.config.interval + jitter;
            debug!(tick = self.tick_count, "heartbeat resumed");
        }
    }

    /// Pause or resume to match `running`.
    pub fn set_running(&mut self, running: bool) {
        if running {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Ticks fired so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }
}
