use super::*;
use shellboot_i18n::I18nController;

fn controller() -> I18nController {
    I18nController::new("zh-CN", "en-US")
}

#[test]
fn apply_locale_should_switch_to_saved_language() {
    let target = controller();
    let outcome = SettingsOutcome::Success {
        language: Some("fr-FR".to_string()),
    };

    let applied = apply_locale(Some(&outcome), &target);

    assert_eq!(
        applied,
        LocaleApplication::Applied {
            locale: "fr-FR".to_string(),
            previous: "zh-CN".to_string(),
        }
    );
    assert!(applied.is_applied());
    assert_eq!(target.active_locale(), "fr-FR");
}

#[test]
fn apply_locale_should_pass_unrecognized_language_through() {
    let target = controller();
    let outcome = SettingsOutcome::Success {
        language: Some("tlh-Klingon".to_string()),
    };

    assert!(apply_locale(Some(&outcome), &target).is_applied());
    assert_eq!(target.active_locale(), "tlh-Klingon");
    assert_eq!(target.resolved_locale(), "zh-CN");
}

#[test]
fn apply_locale_should_keep_locale_without_preference() {
    let target = controller();
    let outcome = SettingsOutcome::decode(&serde_json::json!({ "success": true, "settings": {} }));

    assert_eq!(
        apply_locale(Some(&outcome), &target),
        LocaleApplication::Unchanged {
            reason: UnchangedReason::NoPreference,
        }
    );
    assert_eq!(target.active_locale(), "zh-CN");
}

#[test]
fn apply_locale_should_ignore_language_when_host_reports_failure() {
    let target = controller();
    let outcome = SettingsOutcome::decode(&serde_json::json!({
        "success": false,
        "settings": { "language": "en-US" },
        "error": "disk full"
    }));

    assert_eq!(
        apply_locale(Some(&outcome), &target),
        LocaleApplication::Unchanged {
            reason: UnchangedReason::HostReportedFailure,
        }
    );
    assert_eq!(target.active_locale(), "zh-CN");
}

#[test]
fn apply_locale_should_keep_locale_without_response() {
    let target = controller();
    assert_eq!(
        apply_locale(None, &target),
        LocaleApplication::Unchanged {
            reason: UnchangedReason::NoResponse,
        }
    );
    assert_eq!(target.active_locale(), "zh-CN");
}
