//! Intake languages supported by the keyword-matching components.
//!
//! The engine performs no natural-language understanding; free text is only
//! ever scanned with case-insensitive substring matching against fixed
//! per-language keyword lists, so the supported set is a closed enum.

use serde::{Deserialize, Serialize};

/// Languages the intake stepper can submit free text in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl Language {
    /// Parses a language tag, accepting both ISO 639-1 codes and full names.
    ///
    /// Unrecognised tags fall back to English so that a malformed intake
    /// record degrades to the conservative default rather than erroring.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "es" | "spanish" | "espanol" | "español" => Language::Spanish,
            _ => Language::English,
        }
    }
}
