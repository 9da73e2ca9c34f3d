use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

/// One display refresh at 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Frame-paced ticks. The first tick lands one period after creation; ticks
/// missed while the runtime was busy are skipped, not replayed.
#[derive(Debug)]
pub struct FrameTicker {
    interval: Interval,
    period: Duration,
    frames: u64,
}

impl FrameTicker {
    pub fn new(period: Duration) -> Self {
        let period = period.max(MIN_FRAME_INTERVAL);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            period,
            frames: 0,
        }
    }

    pub async fn next_frame(&mut self) -> u64 {
        self.interval.tick().await;
        self.frames += 1;
        self.frames
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

#[cfg(test)]
#[path = "../tests/frame/frame_tests.rs"]
mod tests;
