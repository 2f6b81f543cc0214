// Locale selection. Strings live in `locales/<lang>.json`.
use crate::config::Config;

pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "ar"];

pub fn is_supported(lang: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&lang)
}

/// Activates the configured (or system) locale and returns it.
pub fn apply(config: &Config) -> String {
    let lang = config.effective_language();
    rust_i18n::set_locale(&lang);
    log::debug!("UI locale set to {}", lang);
    lang
}

/// Arabic is written right to left; list rows are right-aligned for it.
pub fn is_rtl(lang: &str) -> bool {
    lang == "ar"
}
