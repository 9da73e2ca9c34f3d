pub const SYSTEM_LOCALE_PREFERENCE: &str = "system";
pub const DEFAULT_RESOLVED_LOCALE: &str = "zh-CN";
pub const DEFAULT_FALLBACK_LOCALE: &str = "en-US";

pub fn resolve_system_locale() -> String {
    resolve_system_locale_from(|key| std::env::var(key).ok())
}

pub(crate) fn resolve_system_locale_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    for key in ["LC_ALL", "LC_MESSAGES", "LANG", "LANGUAGE"] {
        if let Some(value) = lookup(key)
            && let Some(locale) = normalize_locale(&value)
        {
            return locale;
        }
    }

    DEFAULT_RESOLVED_LOCALE.to_string()
}

pub fn normalize_locale_preference(value: &str) -> Option<String> {
    let normalized = value.trim();
    if normalized.eq_ignore_ascii_case(SYSTEM_LOCALE_PREFERENCE) {
        return Some(SYSTEM_LOCALE_PREFERENCE.to_string());
    }

    normalize_locale(normalized)
}

/// Canonical `ll-RR` form of a language tag. `zh_cn.UTF-8` becomes `zh-CN`;
/// a bare `zh` or `en` gets its default region.
pub fn normalize_locale(raw: &str) -> Option<String> {
    let normalized = raw
        .trim()
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .replace('_', "-");
    if normalized.is_empty() {
        return None;
    }

    let mut parts = normalized.split('-');
    let language = parts.next()?.trim().to_lowercase();
    if language.len() != 2 || !language.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return None;
    }

    let region = parts
        .find(|part| part.len() == 2 && part.chars().all(|ch| ch.is_ascii_alphabetic()))
        .map(|part| part.to_ascii_uppercase());

    if let Some(region) = region {
        return Some(format!("{}-{}", language, region));
    }

    match language.as_str() {
        "zh" => Some("zh-CN".to_string()),
        "en" => Some("en-US".to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/i18n/locale_tests.rs"]
mod tests;
