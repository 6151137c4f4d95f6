//! # Display Localization Hook
//!
//! Schema objects carry English display strings. Callers localize them by
//! passing a lookup table; any string missing from the table passes through
//! unchanged. This is presentation only and never touches codes.

use std::collections::HashMap;

/// Source string to translated string.
pub type Translations = HashMap<String, String>;

/// Types whose display strings can be localized in place.
pub trait Translate {
    /// Replace every translatable string with `translations[s]`, leaving
    /// strings without an entry as they are.
    fn translate(&mut self, translations: &Translations);
}

/// Translate an optional string field. An absent field stays absent.
pub fn translate_opt(value: &mut Option<String>, translations: &Translations) {
    if let Some(current) = value.as_mut() {
        if let Some(translated) = translations.get(current.as_str()) {
            *current = translated.clone();
        }
    }
}
