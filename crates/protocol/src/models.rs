use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SETTINGS_SUCCESS_KEY: &str = "success";
pub const SETTINGS_PAYLOAD_KEY: &str = "settings";
pub const SETTINGS_ERROR_KEY: &str = "error";
pub const SETTINGS_LANGUAGE_KEY: &str = "language";

/// Settings reply as the host produces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponseDto {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SettingsResponseDto {
    pub fn succeeded(settings: Map<String, Value>) -> Self {
        Self {
            success: true,
            settings: Some(settings),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            settings: None,
            error: Some(error.into()),
        }
    }
}

/// Settings reply as the boot sequence consumes it. Decoded once from the
/// untrusted wire value; nothing downstream looks at the raw shape again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsOutcome {
    Success { language: Option<String> },
    Failure { error: Option<String> },
}

impl SettingsOutcome {
    pub fn decode(raw: &Value) -> Self {
        let success = raw
            .get(SETTINGS_SUCCESS_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !success {
            return Self::Failure {
                error: non_empty_text(raw.get(SETTINGS_ERROR_KEY)),
            };
        }

        let language = raw
            .get(SETTINGS_PAYLOAD_KEY)
            .and_then(|settings| settings.get(SETTINGS_LANGUAGE_KEY))
            .and_then(|value| non_empty_text(Some(value)));
        Self::Success { language }
    }
}

/// Any non-empty string, passed through as the host sent it.
fn non_empty_text(value: Option<&Value>) -> Option<String> {
    value?
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "../tests/models/models_tests.rs"]
mod tests;
