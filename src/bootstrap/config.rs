use serde::{Deserialize, Serialize};
use shellboot_i18n::{
    DEFAULT_FALLBACK_LOCALE, DEFAULT_RESOLVED_LOCALE, SYSTEM_LOCALE_PREFERENCE,
    normalize_locale_preference, resolve_system_locale,
};
use shellboot_kernel::frame::DEFAULT_FRAME_INTERVAL;
use shellboot_kernel::poller::{DEFAULT_READINESS_TIMEOUT, ReadinessPolicy};
use shellboot_protocol::{AppError, AppResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BOOT_CONFIG_ENV: &str = "SHELLBOOT_CONFIG";
pub const READINESS_TIMEOUT_ENV: &str = "SHELLBOOT_READINESS_TIMEOUT_MS";
pub const FRAME_INTERVAL_ENV: &str = "SHELLBOOT_FRAME_INTERVAL_MS";
pub const DEFAULT_LOCALE_ENV: &str = "SHELLBOOT_DEFAULT_LOCALE";

const DEFAULT_CONFIG_PATH: &str = "configs/boot.json";
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5000;

const FRAME_INTERVAL_MIN_MS: u64 = 1;
const FRAME_INTERVAL_MAX_MS: u64 = 1000;
const READINESS_TIMEOUT_MAX_MS: u64 = 600_000;
const FETCH_TIMEOUT_MIN_MS: u64 = 100;
const FETCH_TIMEOUT_MAX_MS: u64 = 120_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BootConfig {
    pub frame_interval_ms: u64,
    /// `null` or `0` waits for the host bridge forever.
    pub readiness_timeout_ms: Option<u64>,
    /// `null` lets the settings call run unbounded.
    pub fetch_timeout_ms: Option<u64>,
    pub default_locale: String,
    pub fallback_locale: String,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: DEFAULT_FRAME_INTERVAL.as_millis() as u64,
            readiness_timeout_ms: Some(DEFAULT_READINESS_TIMEOUT.as_millis() as u64),
            fetch_timeout_ms: Some(DEFAULT_FETCH_TIMEOUT_MS),
            default_locale: DEFAULT_RESOLVED_LOCALE.to_string(),
            fallback_locale: DEFAULT_FALLBACK_LOCALE.to_string(),
        }
    }
}

impl BootConfig {
    pub fn resolve_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        lookup(BOOT_CONFIG_ENV)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Reads a JSON config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    event = "boot_config_missing",
                    path = %path.display()
                );
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(AppError::new("boot_config_read_failed", "读取启动配置失败")
                    .with_source(error)
                    .with_context("path", path.display().to_string()));
            }
        };

        Self::from_json_str(&content)
            .map_err(|error| error.with_context("path", path.display().to_string()))
    }

    /// Like `load`, but an unreadable or corrupted file yields the defaults
    /// so the boot still reaches its mount.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(
                    event = error.code.as_str(),
                    path = %path.display(),
                    causes = ?error.visible_causes()
                );
                Self::default()
            }
        }
    }

    pub fn from_json_str(content: &str) -> AppResult<Self> {
        serde_json::from_str(content).map_err(|error| {
            AppError::new("boot_config_parse_failed", "启动配置格式错误").with_source(error)
        })
    }

    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(READINESS_TIMEOUT_ENV) {
            match parse_optional_millis(&raw) {
                Some(value) => self.readiness_timeout_ms = value,
                None => tracing::warn!(
                    event = "boot_config_env_ignored",
                    key = READINESS_TIMEOUT_ENV,
                    value = raw.as_str()
                ),
            }
        }

        if let Some(raw) = lookup(FRAME_INTERVAL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(value) => self.frame_interval_ms = value,
                Err(_) => tracing::warn!(
                    event = "boot_config_env_ignored",
                    key = FRAME_INTERVAL_ENV,
                    value = raw.as_str()
                ),
            }
        }

        if let Some(raw) = lookup(DEFAULT_LOCALE_ENV)
            && !raw.trim().is_empty()
        {
            self.default_locale = raw;
        }

        self
    }

    pub fn normalized(mut self) -> Self {
        self.frame_interval_ms = self
            .frame_interval_ms
            .clamp(FRAME_INTERVAL_MIN_MS, FRAME_INTERVAL_MAX_MS);
        self.readiness_timeout_ms = self
            .readiness_timeout_ms
            .filter(|value| *value != 0)
            .map(|value| value.clamp(self.frame_interval_ms, READINESS_TIMEOUT_MAX_MS));
        self.fetch_timeout_ms = self
            .fetch_timeout_ms
            .map(|value| value.clamp(FETCH_TIMEOUT_MIN_MS, FETCH_TIMEOUT_MAX_MS));
        self.default_locale = canonical_locale(&self.default_locale, DEFAULT_RESOLVED_LOCALE);
        self.fallback_locale = canonical_locale(&self.fallback_locale, DEFAULT_FALLBACK_LOCALE);
        self
    }

    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy {
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            timeout: self
                .readiness_timeout_ms
                .filter(|value| *value != 0)
                .map(Duration::from_millis),
        }
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_optional_millis(raw: &str) -> Option<Option<u64>> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "0" | "none" | "off" | "unbounded" => Some(None),
        _ => normalized.parse::<u64>().ok().map(Some),
    }
}

fn canonical_locale(raw: &str, default: &str) -> String {
    match normalize_locale_preference(raw) {
        Some(preference) if preference == SYSTEM_LOCALE_PREFERENCE => resolve_system_locale(),
        Some(locale) => locale,
        None => {
            tracing::warn!(event = "boot_config_locale_invalid", value = raw, default = default);
            default.to_string()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/bootstrap/config_tests.rs"]
mod tests;
