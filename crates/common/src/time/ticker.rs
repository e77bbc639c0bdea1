//! Fixed-period tick source with cancellation.
//!
//! Drives countdowns and sample replays. Unlike a bare
//! `tokio::time::interval`, the first tick fires one full period after
//! construction, and a cancelled ticker never yields another tick.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Configuration for a [`Ticker`].
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Time between ticks.
    pub period: Duration,
    /// What to do when the consumer falls behind.
    pub missed_tick_behavior: MissedTickBehavior,
}

impl TickerConfig {
    /// Create a configuration with the given period.
    ///
    /// Missed ticks are delayed rather than burst, so a slow consumer sees
    /// one tick at a time.
    pub fn new(period: Duration) -> Self {
        Self { period, missed_tick_behavior: MissedTickBehavior::Delay }
    }

    /// Override the missed-tick behaviour.
    pub fn missed_tick_behavior(mut self, behavior: MissedTickBehavior) -> Self {
        self.missed_tick_behavior = behavior;
        self
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// A cancellable periodic tick source.
pub struct Ticker {
    interval: Interval,
    cancel: CancellationToken,
    delivered: u64,
}

impl Ticker {
    /// Create a ticker whose first tick fires one period from now.
    ///
    /// A zero period is raised to one millisecond; tokio rejects zero.
    pub fn new(config: TickerConfig, cancel: CancellationToken) -> Self {
        let period = config.period.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(config.missed_tick_behavior);
        Self { interval, cancel, delivered: 0 }
    }

    /// Wait for the next tick.
    ///
    /// Returns the 1-based tick number, or `None` once the token is
    /// cancelled.
    pub async fn tick(&mut self) -> Option<u64> {
        if self.cancel.is_cancelled() {
            return None;
        }

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            _ = self.interval.tick() => {
                self.delivered += 1;
                Some(self.delivered)
            }
        }
    }

    /// Number of ticks delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Token that stops this ticker.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}
