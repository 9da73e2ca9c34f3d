use crate::app::state::AppState;
use crate::bootstrap::config::BootConfig;
use crate::bootstrap::locale::{LocaleApplication, UnchangedReason, apply_locale};
use crate::bootstrap::machine::{BootMachine, BootPath, BootState, FallbackReason};
use crate::bootstrap::mount::{MountContext, MountGuard, Mounter};
use shellboot_i18n::LocaleTarget;
use shellboot_kernel::bridge::{BridgeHandle, BridgeSlot};
use shellboot_kernel::fetch::fetch_settings;
use shellboot_kernel::poller::{BridgeWait, await_bridge};
use shellboot_protocol::models::SettingsOutcome;
use shellboot_protocol::{AppError, AppResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootReport {
    pub path: BootPath,
    pub states: Vec<BootState>,
    pub locale: LocaleApplication,
    pub active_locale: String,
    pub frames_waited: u64,
    pub duration: Duration,
}

/// Drives one boot: wait for the bridge, fetch settings, apply the locale or
/// fall back, then mount.
pub struct BootOrchestrator {
    config: BootConfig,
    slot: BridgeSlot,
    locale: Arc<dyn LocaleTarget>,
    mounter: Arc<dyn Mounter>,
    state: AppState,
    started: AtomicBool,
}

fn log_boot_stage(stage: &str, started_at: Instant) {
    tracing::info!(
        event = "boot_stage_done",
        stage = stage,
        duration_ms = started_at.elapsed().as_millis() as u64
    );
}

impl BootOrchestrator {
    pub fn new(
        config: BootConfig,
        slot: BridgeSlot,
        locale: Arc<dyn LocaleTarget>,
        mounter: Arc<dyn Mounter>,
        state: AppState,
    ) -> Self {
        Self {
            config,
            slot,
            locale,
            mounter,
            state,
            started: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Runs the boot sequence. Only misuse is an error: a second call on the
    /// same orchestrator, or the mounter itself failing. Every other failure
    /// degrades to the fallback bridge. Dropping the returned future before it
    /// completes still mounts once.
    pub async fn boot(&self) -> AppResult<BootReport> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(AppError::new("boot_already_started", "启动流程已经执行"));
        }

        let boot_started_at = Instant::now();
        let guard = MountGuard::new(
            self.mounter.clone(),
            self.state.clone(),
            self.locale.clone(),
        );
        let mut machine = BootMachine::new();
        tracing::info!(
            event = "boot_started",
            frame_interval_ms = self.config.frame_interval_ms,
            readiness_timeout_ms = ?self.config.readiness_timeout_ms,
            fetch_timeout_ms = ?self.config.fetch_timeout_ms,
            active_locale = self.locale.active_locale().as_str()
        );

        let stage_started_at = Instant::now();
        let wait = await_bridge(&self.slot, self.config.readiness_policy()).await;
        log_boot_stage(BootState::WaitingForBridge.as_str(), stage_started_at);

        let (bridge, path, locale, frames_waited) = match wait {
            BridgeWait::Ready { handle, frames, .. } => {
                machine.advance(BootState::Fetching)?;
                let stage_started_at = Instant::now();
                let fetched = fetch_settings(&handle, self.config.fetch_timeout()).await;
                log_boot_stage(BootState::Fetching.as_str(), stage_started_at);

                match fetched {
                    Ok(raw) => {
                        machine.advance(BootState::Applying)?;
                        let outcome = SettingsOutcome::decode(&raw);
                        let locale = apply_locale(Some(&outcome), self.locale.as_ref());
                        (handle, BootPath::Bridge, locale, frames)
                    }
                    Err(error) => {
                        let code = error
                            .context_value("innerCode")
                            .unwrap_or(error.code.as_str())
                            .to_string();
                        tracing::warn!(
                            event = "boot_fallback",
                            reason = "fetch_failed",
                            code = error.code.as_str(),
                            inner_code = code.as_str(),
                            causes = ?error.visible_causes()
                        );
                        machine.advance(BootState::NoBridgeFallback)?;
                        (
                            BridgeHandle::fallback(),
                            BootPath::Fallback(FallbackReason::FetchFailed { code }),
                            skipped_locale(),
                            frames,
                        )
                    }
                }
            }
            BridgeWait::TimedOut { frames, waited } => {
                tracing::warn!(
                    event = "boot_fallback",
                    reason = "bridge_wait_timeout",
                    frames = frames,
                    waited_ms = waited.as_millis() as u64
                );
                machine.advance(BootState::NoBridgeFallback)?;
                (
                    BridgeHandle::fallback(),
                    BootPath::Fallback(FallbackReason::BridgeWaitTimedOut),
                    skipped_locale(),
                    frames,
                )
            }
        };

        machine.advance(BootState::Ready)?;
        let context = guard.release(MountContext {
            active_locale: self.locale.active_locale(),
            bridge,
            path,
        })?;

        let duration = boot_started_at.elapsed();
        tracing::info!(
            event = "boot_completed",
            state = machine.current().as_str(),
            path = context.path.as_str(),
            locale = context.active_locale.as_str(),
            frames = frames_waited,
            duration_ms = duration.as_millis() as u64,
            uptime_ms = self.state.uptime().as_millis() as u64
        );

        Ok(BootReport {
            path: context.path,
            states: machine.history().to_vec(),
            locale,
            active_locale: context.active_locale,
            frames_waited,
            duration,
        })
    }
}

fn skipped_locale() -> LocaleApplication {
    tracing::info!(
        event = "locale_unchanged",
        reason = UnchangedReason::SkippedByFallback.as_str()
    );
    LocaleApplication::Unchanged {
        reason: UnchangedReason::SkippedByFallback,
    }
}

#[cfg(test)]
#[path = "../../tests/bootstrap/orchestrator_tests.rs"]
mod tests;
