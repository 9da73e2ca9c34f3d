use shellboot_kernel::bridge::{BridgeSlot, HostBridge};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Puts `bridge` into `slot` after `delay`, the way a native host injects its
/// object some time after the page starts.
pub fn inject_after(
    slot: BridgeSlot,
    bridge: Arc<dyn HostBridge>,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        slot.inject(bridge);
        tracing::info!(
            event = "host_bridge_injected",
            delay_ms = delay.as_millis() as u64
        );
    })
}
