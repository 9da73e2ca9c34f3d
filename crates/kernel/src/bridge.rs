use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use crate::{AppError, AppResult};

/// Capability the boot sequence needs before it treats the bridge as ready.
pub const GET_SETTINGS_CAPABILITY: &str = "get_settings";

pub type BridgeFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability object provided by the native host.
pub trait HostBridge: Send + Sync {
    fn exposes(&self, capability: &str) -> bool;
    fn get_settings(&self) -> BridgeFuture<'_, AppResult<Value>>;
}

/// Stand-in used when no usable host exists. Exposes nothing.
#[derive(Debug, Default)]
pub struct NoopHostBridge;

impl HostBridge for NoopHostBridge {
    fn exposes(&self, _capability: &str) -> bool {
        false
    }

    fn get_settings(&self) -> BridgeFuture<'_, AppResult<Value>> {
        Box::pin(async {
            Err(
                AppError::new("bridge_capability_missing", "宿主桥接能力不可用")
                    .with_context("capability", GET_SETTINGS_CAPABILITY),
            )
        })
    }
}

/// Where the host drops its bridge once it is ready to talk. Cloning shares
/// the same slot.
#[derive(Clone, Default)]
pub struct BridgeSlot {
    inner: Arc<RwLock<Option<Arc<dyn HostBridge>>>>,
}

impl BridgeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inject(&self, bridge: Arc<dyn HostBridge>) {
        match self.inner.write() {
            Ok(mut guard) => {
                *guard = Some(bridge);
            }
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                *guard = Some(bridge);
            }
        }
    }

    pub fn current(&self) -> Option<Arc<dyn HostBridge>> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_injected(&self) -> bool {
        self.current().is_some()
    }
}

impl Debug for BridgeSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeSlot")
            .field("injected", &self.is_injected())
            .finish()
    }
}

/// Reference to a bridge that passed the readiness check, or to the noop
/// stand-in. The host owns the underlying object.
#[derive(Clone)]
pub struct BridgeHandle {
    bridge: Arc<dyn HostBridge>,
    fallback: bool,
}

impl BridgeHandle {
    pub(crate) fn ready(bridge: Arc<dyn HostBridge>) -> Self {
        Self {
            bridge,
            fallback: false,
        }
    }

    pub fn fallback() -> Self {
        Self {
            bridge: Arc::new(NoopHostBridge),
            fallback: true,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn exposes(&self, capability: &str) -> bool {
        self.bridge.exposes(capability)
    }

    pub fn is_same_bridge(&self, bridge: &Arc<dyn HostBridge>) -> bool {
        Arc::ptr_eq(&self.bridge, bridge)
    }

    pub async fn get_settings(&self) -> AppResult<Value> {
        self.bridge.get_settings().await
    }
}

impl Debug for BridgeHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/bridge/bridge_tests.rs"]
mod tests;
