mod controller;
mod locale;

pub use controller::{I18nController, LocaleTarget};
pub use locale::{
    DEFAULT_FALLBACK_LOCALE, DEFAULT_RESOLVED_LOCALE, SYSTEM_LOCALE_PREFERENCE, normalize_locale,
    normalize_locale_preference, resolve_system_locale,
};
