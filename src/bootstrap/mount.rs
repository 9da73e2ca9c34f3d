use crate::app::state::AppState;
use crate::bootstrap::machine::{BootPath, FallbackReason};
use shellboot_i18n::LocaleTarget;
use shellboot_kernel::bridge::BridgeHandle;
use shellboot_protocol::{AppError, AppResult};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct MountContext {
    pub active_locale: String,
    pub bridge: BridgeHandle,
    pub path: BootPath,
}

/// Render/mount collaborator. Called at most once per process.
pub trait Mounter: Send + Sync {
    fn mount(&self, context: &MountContext) -> AppResult<()>;
}

/// Owns the mount for one boot. `release` mounts with the boot's result; if
/// the guard is dropped unreleased (error, panic, cancelled future) it mounts
/// on the fallback bridge instead. `AppState` refuses a second mount.
pub(crate) struct MountGuard {
    mounter: Arc<dyn Mounter>,
    state: AppState,
    locale: Arc<dyn LocaleTarget>,
    armed: bool,
}

impl MountGuard {
    pub(crate) fn new(
        mounter: Arc<dyn Mounter>,
        state: AppState,
        locale: Arc<dyn LocaleTarget>,
    ) -> Self {
        Self {
            mounter,
            state,
            locale,
            armed: true,
        }
    }

    pub(crate) fn release(mut self, context: MountContext) -> AppResult<MountContext> {
        self.armed = false;
        let bridge = self.state.publish_bridge(context.bridge);
        let context = MountContext { bridge, ..context };
        self.mount_once(&context)?;
        Ok(context)
    }

    fn mount_once(&self, context: &MountContext) -> AppResult<()> {
        if !self.state.claim_mount() {
            tracing::warn!(event = "app_mount_skipped", reason = "already_mounted");
            return Err(AppError::new("app_already_mounted", "界面已经挂载"));
        }

        let started_at = Instant::now();
        let result = self.mounter.mount(context);
        let duration_ms = started_at.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => tracing::info!(
                event = "app_mounted",
                locale = context.active_locale.as_str(),
                path = context.path.as_str(),
                fallback_bridge = context.bridge.is_fallback(),
                duration_ms = duration_ms
            ),
            Err(error) => tracing::error!(
                event = "app_mount_failed",
                code = error.code.as_str(),
                causes = ?error.visible_causes(),
                duration_ms = duration_ms
            ),
        }
        result
    }
}

impl Drop for MountGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;

        tracing::warn!(
            event = "boot_interrupted",
            panicking = std::thread::panicking()
        );
        let context = MountContext {
            active_locale: self.locale.active_locale(),
            bridge: self.state.publish_bridge(BridgeHandle::fallback()),
            path: BootPath::Fallback(FallbackReason::Interrupted),
        };
        let _ = self.mount_once(&context);
    }
}

#[cfg(test)]
#[path = "../../tests/bootstrap/mount_tests.rs"]
mod tests;
