use std::collections::BTreeSet;
use std::sync::RwLock;

use crate::locale::normalize_locale;

/// Anything holding a mutable "active locale".
pub trait LocaleTarget: Send + Sync {
    fn active_locale(&self) -> String;
    fn set_active_locale(&self, locale: &str);
}

/// Active-locale holder with a default and a fallback locale. Any string is
/// accepted as active; lookups walk active → default → fallback and stop at
/// the first locale that has a catalog.
#[derive(Debug)]
pub struct I18nController {
    default_locale: String,
    fallback_locale: String,
    available: BTreeSet<String>,
    active: RwLock<String>,
}

impl I18nController {
    pub fn new(default_locale: impl Into<String>, fallback_locale: impl Into<String>) -> Self {
        let default_locale = default_locale.into();
        let fallback_locale = fallback_locale.into();
        let available = BTreeSet::from([default_locale.clone(), fallback_locale.clone()]);
        Self {
            active: RwLock::new(default_locale.clone()),
            default_locale,
            fallback_locale,
            available,
        }
    }

    pub fn with_available_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available.extend(locales.into_iter().map(Into::into));
        self
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    pub fn is_available(&self, locale: &str) -> bool {
        if self.available.contains(locale) {
            return true;
        }
        normalize_locale(locale).is_some_and(|canonical| self.available.contains(&canonical))
    }

    pub fn locale_chain(&self) -> Vec<String> {
        let mut chain: Vec<String> = Vec::with_capacity(3);
        for locale in [
            self.active_locale(),
            self.default_locale.clone(),
            self.fallback_locale.clone(),
        ] {
            if !chain.contains(&locale) {
                chain.push(locale);
            }
        }
        chain
    }

    pub fn resolved_locale(&self) -> String {
        self.locale_chain()
            .into_iter()
            .find(|locale| self.is_available(locale))
            .unwrap_or_else(|| self.fallback_locale.clone())
    }
}

impl LocaleTarget for I18nController {
    fn active_locale(&self) -> String {
        match self.active.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_active_locale(&self, locale: &str) {
        if !self.is_available(locale) {
            tracing::warn!(
                event = "i18n_locale_unrecognized",
                locale = locale,
                fallback = self.fallback_locale.as_str()
            );
        }

        match self.active.write() {
            Ok(mut guard) => {
                *guard = locale.to_string();
            }
            Err(poisoned) => {
                let mut guard = poisoned.into_inner();
                *guard = locale.to_string();
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/i18n/controller_tests.rs"]
mod tests;
