pub mod app;
pub mod bootstrap;
pub mod host;

use app::console::ConsoleMounter;
use app::state::AppState;
use bootstrap::{BootConfig, BootOrchestrator, BootReport};
use shellboot_i18n::I18nController;
use shellboot_kernel::bridge::BridgeSlot;
use shellboot_logging::{LoggingOptions, init_logging, log_warn_fallback};
use shellboot_protocol::AppResult;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const HOST_SETTINGS_ENV: &str = "SHELLBOOT_HOST_SETTINGS";
pub const HOST_DELAY_ENV: &str = "SHELLBOOT_HOST_DELAY_MS";
pub const NO_HOST_ENV: &str = "SHELLBOOT_NO_HOST";

const DEFAULT_HOST_SETTINGS_PATH: &str = "configs/user_config.json";
const DEFAULT_HOST_DELAY_MS: u64 = 120;

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn host_delay() -> Duration {
    let millis = env_value(HOST_DELAY_ENV)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_HOST_DELAY_MS);
    Duration::from_millis(millis)
}

fn host_settings_path() -> PathBuf {
    env_value(HOST_SETTINGS_ENV)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HOST_SETTINGS_PATH))
}

/// Boots the shell headless: the development host injects a JSON-backed
/// bridge after a delay (or never, with `SHELLBOOT_NO_HOST`), and the UI
/// mount is reported on stdout.
pub async fn run() -> AppResult<BootReport> {
    match init_logging(&LoggingOptions::from_env()) {
        Ok(logging_guard) => tracing::info!(
            event = "logging_initialized",
            level = logging_guard.level(),
            log_dir = ?logging_guard.log_dir()
        ),
        Err(error) => log_warn_fallback(&format!(
            "logging init failed, continuing without it: code={}, message={}",
            error.code, error.message
        )),
    }

    let config_path = BootConfig::resolve_path(env_value);
    let config = BootConfig::load_or_default(&config_path)
        .with_env_overrides(env_value)
        .normalized();

    let locale = Arc::new(I18nController::new(
        config.default_locale.clone(),
        config.fallback_locale.clone(),
    ));
    let slot = BridgeSlot::new();

    let no_host = env_value(NO_HOST_ENV).is_some_and(|value| is_truthy(&value));
    if no_host {
        tracing::info!(event = "host_bridge_disabled", key = NO_HOST_ENV);
    } else {
        let bridge = Arc::new(host::JsonSettingsBridge::new(host_settings_path()));
        tracing::info!(
            event = "host_bridge_scheduled",
            settings_path = %bridge.path().to_string_lossy()
        );
        host::inject_after(slot.clone(), bridge, host_delay());
    }

    let orchestrator = BootOrchestrator::new(
        config,
        slot,
        locale,
        Arc::new(ConsoleMounter::default()),
        AppState::new(),
    );
    orchestrator.boot().await
}
