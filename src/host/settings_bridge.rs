use serde_json::{Map, Value};
use shellboot_kernel::bridge::{BridgeFuture, GET_SETTINGS_CAPABILITY, HostBridge};
use shellboot_protocol::models::SettingsResponseDto;
use shellboot_protocol::{AppError, AppResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Development host backed by a JSON user config file. Stands in for the
/// native host when the UI shell runs headless.
#[derive(Debug)]
pub struct JsonSettingsBridge {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonSettingsBridge {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings object. A missing file or a file that is not a JSON
    /// object reads as empty.
    pub fn load_settings(&self) -> AppResult<Map<String, Value>> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        load_settings_unlocked(&self.path)
    }

    /// Merges `patch` into the stored settings and returns the result.
    pub fn save_settings(&self, patch: Map<String, Value>) -> AppResult<Map<String, Value>> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut settings = load_settings_unlocked(&self.path)?;
        settings.extend(patch);
        write_settings_file(&self.path, &settings)?;
        tracing::info!(
            event = "host_settings_saved",
            path = %self.path.to_string_lossy(),
            keys = settings.len()
        );
        Ok(settings)
    }

    /// Reply in the shape the UI expects from `get_settings`.
    pub fn settings_response(&self) -> SettingsResponseDto {
        match self.load_settings() {
            Ok(settings) => SettingsResponseDto::succeeded(settings),
            Err(error) => {
                tracing::warn!(
                    event = "host_settings_read_failed",
                    code = error.code.as_str(),
                    causes = ?error.visible_causes()
                );
                SettingsResponseDto::failed(error.message.clone())
            }
        }
    }
}

impl HostBridge for JsonSettingsBridge {
    fn exposes(&self, capability: &str) -> bool {
        capability == GET_SETTINGS_CAPABILITY
    }

    fn get_settings(&self) -> BridgeFuture<'_, AppResult<Value>> {
        Box::pin(async move {
            serde_json::to_value(self.settings_response()).map_err(|error| {
                AppError::new("host_settings_serialize_failed", "序列化用户配置失败")
                    .with_source(error)
            })
        })
    }
}

fn load_settings_unlocked(path: &Path) -> AppResult<Map<String, Value>> {
    let content = match fs::read_to_string(path) {
        Ok(value) => value,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Map::new()),
        Err(error) => {
            return Err(
                AppError::new("host_settings_read_failed", "读取用户配置文件失败")
                    .with_source(error)
                    .with_context("path", path.to_string_lossy().to_string()),
            );
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(settings)) => Ok(settings),
        Ok(_) => {
            tracing::warn!(
                event = "host_settings_not_object",
                path = %path.to_string_lossy()
            );
            Ok(Map::new())
        }
        Err(error) => {
            tracing::warn!(
                event = "host_settings_parse_failed",
                detail = %error,
                path = %path.to_string_lossy()
            );
            Ok(Map::new())
        }
    }
}

fn write_settings_file(path: &Path, settings: &Map<String, Value>) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|error| {
            AppError::new("host_settings_dir_create_failed", "创建用户配置目录失败")
                .with_source(error)
                .with_context("path", parent.to_string_lossy().to_string())
        })?;
    }

    let serialized = serde_json::to_string_pretty(settings).map_err(|error| {
        AppError::new("host_settings_serialize_failed", "序列化用户配置失败").with_source(error)
    })?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, serialized).map_err(|error| {
        AppError::new("host_settings_temp_write_failed", "写入临时配置文件失败")
            .with_source(error)
            .with_context("path", temp_path.to_string_lossy().to_string())
    })?;

    match fs::rename(&temp_path, path) {
        Ok(()) => Ok(()),
        Err(rename_error) if path.exists() => {
            fs::remove_file(path).map_err(|error| {
                let _ = fs::remove_file(&temp_path);
                AppError::new("host_settings_replace_failed", "替换用户配置文件失败")
                    .with_source(error)
                    .with_cause(rename_error.to_string())
                    .with_context("path", path.to_string_lossy().to_string())
            })?;
            fs::rename(&temp_path, path).map_err(|error| {
                let _ = fs::remove_file(&temp_path);
                AppError::new("host_settings_replace_failed", "替换用户配置文件失败")
                    .with_source(error)
                    .with_context("path", path.to_string_lossy().to_string())
            })
        }
        Err(rename_error) => {
            let _ = fs::remove_file(&temp_path);
            Err(
                AppError::new("host_settings_write_failed", "写入用户配置文件失败")
                    .with_source(rename_error)
                    .with_context("path", path.to_string_lossy().to_string()),
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/host/settings_bridge_tests.rs"]
mod tests;
