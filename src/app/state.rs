use shellboot_kernel::bridge::BridgeHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

/// Process-wide state shared with the rest of the application once boot has
/// finished. Cloning shares the same slots.
#[derive(Debug, Clone)]
pub struct AppState {
    bridge: Arc<OnceLock<BridgeHandle>>,
    mounted: Arc<AtomicBool>,
    started_at: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            bridge: Arc::new(OnceLock::new()),
            mounted: Arc::new(AtomicBool::new(false)),
            started_at: Instant::now(),
        }
    }

    /// The bridge published at the end of boot, real or fallback. `None`
    /// until boot reaches `Ready`.
    pub fn bridge(&self) -> Option<&BridgeHandle> {
        self.bridge.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Write-once. Returns whatever ends up published, which is the earlier
    /// handle if one was already there.
    pub(crate) fn publish_bridge(&self, handle: BridgeHandle) -> BridgeHandle {
        self.bridge.get_or_init(|| handle).clone()
    }

    /// `true` for exactly one caller per process.
    pub(crate) fn claim_mount(&self) -> bool {
        !self.mounted.swap(true, Ordering::SeqCst)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/app/state_tests.rs"]
mod tests;
