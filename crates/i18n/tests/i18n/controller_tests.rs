use super::*;

#[test]
fn new_controller_should_start_on_default_locale() {
    let controller = I18nController::new("zh-CN", "en-US");
    assert_eq!(controller.active_locale(), "zh-CN");
    assert_eq!(controller.resolved_locale(), "zh-CN");
    assert_eq!(controller.default_locale(), "zh-CN");
    assert_eq!(controller.fallback_locale(), "en-US");
}

#[test]
fn set_active_locale_should_accept_any_string() {
    let controller = I18nController::new("zh-CN", "en-US");
    controller.set_active_locale("tlh-Klingon");
    assert_eq!(controller.active_locale(), "tlh-Klingon");
}

#[test]
fn resolved_locale_should_walk_default_then_fallback() {
    let controller =
        I18nController::new("zh-CN", "en-US").with_available_locales(["fr-FR", "ja-JP"]);

    controller.set_active_locale("fr-FR");
    assert_eq!(controller.resolved_locale(), "fr-FR");

    controller.set_active_locale("pt-BR");
    assert_eq!(controller.resolved_locale(), "zh-CN");
    assert_eq!(controller.locale_chain(), vec!["pt-BR", "zh-CN", "en-US"]);
}

#[test]
fn is_available_should_match_non_canonical_spelling() {
    let controller = I18nController::new("zh-CN", "en-US");
    assert!(controller.is_available("en_us"));
    assert!(controller.is_available("zh"));
    assert!(!controller.is_available("de-DE"));
}

#[test]
fn locale_chain_should_not_repeat_entries() {
    let controller = I18nController::new("en-US", "en-US");
    assert_eq!(controller.locale_chain(), vec!["en-US"]);
}

#[test]
fn resolved_locale_should_fall_back_for_unknown_active_locale() {
    let controller = I18nController::new("zh-CN", "en-US");
    controller.set_active_locale("xx-YY");
    assert_eq!(controller.active_locale(), "xx-YY");
    assert_eq!(controller.resolved_locale(), "zh-CN");
}
