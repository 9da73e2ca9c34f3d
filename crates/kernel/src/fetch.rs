use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::bridge::{BridgeHandle, GET_SETTINGS_CAPABILITY};
use crate::runtime::unwind::run_guarded;
use crate::{AppError, AppResult};

/// Calls the bridge's settings capability once and hands back its reply
/// untouched. Rejections, panics and the optional timeout all surface as
/// `bridge_fetch_failed`.
pub async fn fetch_settings(handle: &BridgeHandle, timeout: Option<Duration>) -> AppResult<Value> {
    let started_at = Instant::now();
    tracing::info!(
        event = "settings_fetch_started",
        capability = GET_SETTINGS_CAPABILITY,
        fallback = handle.is_fallback()
    );

    let call = run_guarded(GET_SETTINGS_CAPABILITY, handle.get_settings());
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(AppError::new("bridge_fetch_timeout", "读取宿主设置超时")
                .with_context("timeoutMs", limit.as_millis().to_string())),
        },
        None => call.await,
    };

    let duration_ms = started_at.elapsed().as_millis() as u64;
    match result {
        Ok(raw) => {
            tracing::info!(
                event = "settings_received",
                duration_ms = duration_ms,
                shape = value_kind(&raw)
            );
            Ok(raw)
        }
        Err(error) => Err(AppError::new("bridge_fetch_failed", "读取宿主设置失败")
            .with_context("capability", GET_SETTINGS_CAPABILITY)
            .with_context("innerCode", error.code.clone())
            .with_context("durationMs", duration_ms.to_string())
            .with_cause(error.message.clone())
            .with_causes(error.causes.clone())),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "../tests/fetch/fetch_tests.rs"]
mod tests;
