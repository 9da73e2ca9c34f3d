use crate::bootstrap::{MountContext, Mounter};
use shellboot_protocol::{AppError, AppResult};
use std::io::Write;

const DEFAULT_MOUNT_TARGET: &str = "#app";

/// Mounter for headless runs: reports the mount on stdout.
#[derive(Debug, Clone)]
pub struct ConsoleMounter {
    target: String,
}

impl ConsoleMounter {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl Default for ConsoleMounter {
    fn default() -> Self {
        Self::new(DEFAULT_MOUNT_TARGET)
    }
}

impl Mounter for ConsoleMounter {
    fn mount(&self, context: &MountContext) -> AppResult<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(
            stdout,
            "mounted {} locale={} path={} fallback_bridge={}",
            self.target,
            context.active_locale,
            context.path.as_str(),
            context.bridge.is_fallback()
        )
        .map_err(|error| {
            AppError::new("console_mount_failed", "控制台挂载输出失败").with_source(error)
        })
    }
}

#[cfg(test)]
#[path = "../../tests/app/console_tests.rs"]
mod tests;
