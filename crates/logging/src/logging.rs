use crate::{AppError, ResultExt};
use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, SystemTime};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_LEVEL_ENV: &str = "SHELLBOOT_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "SHELLBOOT_LOG_DIR";

const DEFAULT_KEEP_DAYS: u32 = 7;
const DEFAULT_FILE_PREFIX: &str = "shellboot";
const LOG_FILE_SUFFIX: &str = "log";
const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Console only when `None`.
    pub log_dir: Option<PathBuf>,
    pub keep_days: u32,
    pub file_prefix: String,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            log_dir: None,
            keep_days: DEFAULT_KEEP_DAYS,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

impl LoggingOptions {
    pub fn from_env() -> Self {
        let log_dir = std::env::var_os(LOG_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self {
            log_dir,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingGuard {
    log_dir: Option<PathBuf>,
    level: String,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    pub fn level(&self) -> &str {
        &self.level
    }
}

fn worker_guard_slot() -> &'static Mutex<Option<WorkerGuard>> {
    static SLOT: OnceLock<Mutex<Option<WorkerGuard>>> = OnceLock::new();
    SLOT.get_or_init(|| Mutex::new(None))
}

pub fn resolve_log_level() -> String {
    resolve_log_level_from(std::env::var(LOG_LEVEL_ENV).ok())
}

fn resolve_log_level_from(env_level: Option<String>) -> String {
    if let Some(level) = env_level.map(|value| value.trim().to_ascii_lowercase())
        && VALID_LEVELS.contains(&level.as_str())
    {
        return level;
    }

    if cfg!(debug_assertions) {
        "debug".to_string()
    } else {
        "info".to_string()
    }
}

pub fn init_logging(options: &LoggingOptions) -> Result<LoggingGuard, AppError> {
    let level = resolve_log_level();
    if tracing::dispatcher::has_been_set() {
        return Ok(LoggingGuard {
            log_dir: options.log_dir.clone(),
            level,
        });
    }

    let env_filter = EnvFilter::new(level.clone());
    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_ansi(cfg!(debug_assertions))
        .with_target(true)
        .with_writer(std::io::stderr);

    let file_layer = match options.log_dir.as_deref() {
        Some(log_dir) => {
            fs::create_dir_all(log_dir)
                .with_context(|| format!("创建日志目录失败: {}", log_dir.display()))
                .with_code("log_dir_create_failed", "创建日志目录失败")
                .with_ctx("logDir", log_dir.display().to_string())?;
            cleanup_expired_logs(
                log_dir,
                options.file_prefix.as_str(),
                u64::from(options.keep_days),
            )?;

            let file_appender = RollingBuilder::new()
                .rotation(Rotation::DAILY)
                .filename_prefix(options.file_prefix.as_str())
                .filename_suffix(LOG_FILE_SUFFIX)
                .build(log_dir)
                .with_context(|| format!("创建日志写入器失败: {}", log_dir.display()))
                .with_code("log_appender_create_failed", "创建日志写入器失败")
                .with_ctx("logDir", log_dir.display().to_string())?;
            let (file_writer, worker_guard) = tracing_appender::non_blocking(file_appender);
            if let Ok(mut slot) = worker_guard_slot().lock() {
                *slot = Some(worker_guard);
            }

            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(file_writer)
                    .with_current_span(false)
                    .with_span_list(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .with_context(|| format!("初始化日志订阅器失败: level={level}"))
        .with_code("log_subscriber_init_failed", "初始化日志订阅器失败")
        .with_ctx("logLevel", level.clone())?;

    Ok(LoggingGuard {
        log_dir: options.log_dir.clone(),
        level,
    })
}

/// Removes rolled files named `<file_prefix>.*.log` older than `keep_days`.
/// Anything else in the directory is left alone.
pub fn cleanup_expired_logs(
    log_dir: &Path,
    file_prefix: &str,
    keep_days: u64,
) -> Result<usize, AppError> {
    let keep_duration = Duration::from_secs(keep_days.saturating_mul(24 * 60 * 60));
    cleanup_expired_logs_with_duration(log_dir, file_prefix, keep_duration, SystemTime::now())
}

fn cleanup_expired_logs_with_duration(
    log_dir: &Path,
    file_prefix: &str,
    keep_duration: Duration,
    now: SystemTime,
) -> Result<usize, AppError> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let entries = fs::read_dir(log_dir)
        .with_context(|| format!("读取日志目录失败: {}", log_dir.display()))
        .with_code("log_cleanup_read_dir_failed", "读取日志目录失败")
        .with_ctx("logDir", log_dir.display().to_string())?;

    let mut removed = 0usize;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("读取日志条目失败: {}", log_dir.display()))
            .with_code("log_cleanup_read_entry_failed", "读取日志条目失败")
            .with_ctx("logDir", log_dir.display().to_string())?;
        let path = entry.path();
        if !path.is_file() || !is_log_file(&path, file_prefix) {
            continue;
        }

        let modified_at = entry
            .metadata()
            .and_then(|metadata| metadata.modified())
            .with_context(|| format!("读取日志修改时间失败: {}", path.display()))
            .with_code("log_cleanup_modified_time_failed", "读取日志修改时间失败")
            .with_ctx("logPath", path.display().to_string())?;

        let elapsed = now.duration_since(modified_at).unwrap_or_default();
        if elapsed <= keep_duration {
            continue;
        }

        fs::remove_file(&path)
            .with_context(|| format!("删除过期日志失败: {}", path.display()))
            .with_code("log_cleanup_remove_failed", "删除过期日志失败")
            .with_ctx("logPath", path.display().to_string())?;
        removed += 1;
    }

    Ok(removed)
}

fn is_log_file(path: &Path, file_prefix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix(file_prefix))
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| {
            rest.strip_suffix(LOG_FILE_SUFFIX)
                .is_some_and(|stem| stem.is_empty() || stem.ends_with('.'))
        })
}

pub fn log_warn_fallback(message: &str) {
    if tracing::dispatcher::has_been_set() {
        tracing::warn!(event = "bootstrap_warning", message = message);
        return;
    }

    eprintln!("{message}");
}

pub fn log_error_fallback(message: &str) {
    if tracing::dispatcher::has_been_set() {
        tracing::error!(event = "bootstrap_error", message = message);
        return;
    }

    eprintln!("{message}");
}

#[cfg(test)]
#[path = "../tests/logging/logging_tests.rs"]
mod tests;
