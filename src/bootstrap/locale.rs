use shellboot_i18n::LocaleTarget;
use shellboot_protocol::models::SettingsOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    NoResponse,
    HostReportedFailure,
    NoPreference,
    SkippedByFallback,
}

impl UnchangedReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoResponse => "no_response",
            Self::HostReportedFailure => "host_reported_failure",
            Self::NoPreference => "no_preference",
            Self::SkippedByFallback => "skipped_by_fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleApplication {
    Applied { locale: String, previous: String },
    Unchanged { reason: UnchangedReason },
}

impl LocaleApplication {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Switches the active locale to the host's saved language when there is
/// one. Every other reply leaves the locale alone.
pub fn apply_locale(
    outcome: Option<&SettingsOutcome>,
    target: &dyn LocaleTarget,
) -> LocaleApplication {
    let reason = match outcome {
        None => UnchangedReason::NoResponse,
        Some(SettingsOutcome::Failure { error }) => {
            tracing::info!(
                event = "locale_unchanged",
                reason = UnchangedReason::HostReportedFailure.as_str(),
                host_error = error.as_deref().unwrap_or_default()
            );
            return LocaleApplication::Unchanged {
                reason: UnchangedReason::HostReportedFailure,
            };
        }
        Some(SettingsOutcome::Success { language: None }) => UnchangedReason::NoPreference,
        Some(SettingsOutcome::Success {
            language: Some(language),
        }) => {
            let previous = target.active_locale();
            target.set_active_locale(language);
            tracing::info!(
                event = "locale_applied",
                locale = language.as_str(),
                previous = previous.as_str()
            );
            return LocaleApplication::Applied {
                locale: language.clone(),
                previous,
            };
        }
    };

    tracing::info!(event = "locale_unchanged", reason = reason.as_str());
    LocaleApplication::Unchanged { reason }
}

#[cfg(test)]
#[path = "../../tests/bootstrap/locale_tests.rs"]
mod tests;
