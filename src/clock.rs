//! Pacing and timestamps for the generator
//!
//! The generator never sleeps directly; it waits on a [`Clock`] so tests can swap
//! the wall clock for one that ticks instantly.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::time::{Interval, MissedTickBehavior, interval};

#[async_trait]
pub trait Clock: Send {
    /// Wait until the next emission slot
    async fn tick(&mut self);

    /// Current time in seconds since epoch
    fn now(&self) -> i64;
}

/// Wall-clock pacing backed by a tokio interval
///
/// The first tick completes immediately, later ticks are `period` apart.
pub struct IntervalClock {
    ticker: Interval,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        // tokio panics on a zero period
        let mut ticker = interval(period.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { ticker }
    }
}

#[async_trait]
impl Clock for IntervalClock {
    async fn tick(&mut self) {
        self.ticker.tick().await;
    }

    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Virtual clock that never waits
///
/// Each tick advances the reported time by `step` seconds.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: i64,
    step: i64,
    ticks: u64,
}

impl ManualClock {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            now: start,
            step,
            ticks: 0,
        }
    }

    /// Number of ticks taken so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn tick(&mut self) {
        if self.ticks > 0 {
            self.now += self.step;
        }
        self.ticks += 1;
    }

    fn now(&self) -> i64 {
        self.now
    }
}
