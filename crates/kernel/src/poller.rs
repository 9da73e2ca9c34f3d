use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::bridge::{BridgeHandle, BridgeSlot, GET_SETTINGS_CAPABILITY, HostBridge};
use crate::frame::{DEFAULT_FRAME_INTERVAL, FrameTicker};

pub const DEFAULT_READINESS_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub frame_interval: Duration,
    /// `None` waits for the host forever.
    pub timeout: Option<Duration>,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            timeout: Some(DEFAULT_READINESS_TIMEOUT),
        }
    }
}

#[derive(Debug)]
pub enum BridgeWait {
    Ready {
        handle: BridgeHandle,
        frames: u64,
        waited: Duration,
    },
    TimedOut {
        frames: u64,
        waited: Duration,
    },
}

/// Returns the injected bridge when it exposes the settings capability.
pub fn probe_bridge(slot: &BridgeSlot) -> Option<Arc<dyn HostBridge>> {
    slot.current().filter(|bridge| bridge.exposes(GET_SETTINGS_CAPABILITY))
}

pub async fn await_bridge(slot: &BridgeSlot, policy: ReadinessPolicy) -> BridgeWait {
    let started_at = Instant::now();
    let deadline = policy.timeout.map(|timeout| started_at + timeout);
    let mut ticker = FrameTicker::new(policy.frame_interval);

    loop {
        if let Some(bridge) = probe_bridge(slot) {
            return ready(bridge, ticker.frames(), started_at);
        }

        let timed_out = match deadline {
            Some(deadline) => tokio::select! {
                _ = ticker.next_frame() => false,
                _ = tokio::time::sleep_until(deadline) => true,
            },
            None => {
                ticker.next_frame().await;
                false
            }
        };

        if timed_out {
            if let Some(bridge) = probe_bridge(slot) {
                return ready(bridge, ticker.frames(), started_at);
            }

            let waited = started_at.elapsed();
            tracing::warn!(
                event = "bridge_wait_timeout",
                frames = ticker.frames(),
                waited_ms = waited.as_millis() as u64,
                injected = slot.is_injected()
            );
            return BridgeWait::TimedOut {
                frames: ticker.frames(),
                waited,
            };
        }

        if ticker.frames() % 60 == 0 {
            tracing::debug!(
                event = "bridge_wait_pending",
                frames = ticker.frames(),
                injected = slot.is_injected()
            );
        }
    }
}

fn ready(bridge: Arc<dyn HostBridge>, frames: u64, started_at: Instant) -> BridgeWait {
    let waited = started_at.elapsed();
    tracing::info!(
        event = "bridge_ready",
        frames = frames,
        waited_ms = waited.as_millis() as u64
    );
    BridgeWait::Ready {
        handle: BridgeHandle::ready(bridge),
        frames,
        waited,
    }
}

#[cfg(test)]
#[path = "../tests/poller/poller_tests.rs"]
mod tests;
