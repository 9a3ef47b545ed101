//! Emergency keyword screening of free-text messages.
//!
//! A conservative, high-recall filter: case-insensitive substring matching
//! against fixed per-language keyword lists. False positives are acceptable;
//! false negatives are not. A hit must surface the fixed language-appropriate
//! emergency instruction to the caller and be audit-logged separately — it is
//! never silently folded into a triage score.

use crate::config::KeywordOverrides;
use crate::language::Language;

/// Built-in English critical-symptom phrases.
const ENGLISH_KEYWORDS: &[&str] = &[
    "chest pain",
    "heart attack",
    "can't breathe",
    "cannot breathe",
    "not breathing",
    "shortness of breath",
    "unconscious",
    "unresponsive",
    "severe bleeding",
    "vomiting blood",
    "stroke",
    "seizure",
    "choking",
    "overdose",
    "suicid",
    "anaphyla",
];

/// Built-in Spanish critical-symptom phrases.
const SPANISH_KEYWORDS: &[&str] = &[
    "dolor en el pecho",
    "dolor de pecho",
    "infarto",
    "no puedo respirar",
    "no respira",
    "falta de aire",
    "inconsciente",
    "sangrado abundante",
    "vomitando sangre",
    "derrame cerebral",
    "convulsion",
    "convulsión",
    "ahogando",
    "sobredosis",
    "suicid",
];

const ENGLISH_INSTRUCTION: &str =
    "Your message describes symptoms that may be a medical emergency. \
     Call your local emergency number or go to the nearest emergency department now. \
     Do not wait for an online consultation.";

const SPANISH_INSTRUCTION: &str =
    "Su mensaje describe síntomas que pueden ser una emergencia médica. \
     Llame al número de emergencias o acuda al servicio de urgencias más cercano ahora. \
     No espere una consulta en línea.";

/// Scans free text for critical-symptom phrases.
///
/// Built-in keyword lists can be extended (never replaced) through
/// [`KeywordOverrides`] supplied by the engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EmergencyDetector {
    extra_english: Vec<String>,
    extra_spanish: Vec<String>,
}

impl EmergencyDetector {
    /// Creates a detector using only the built-in keyword lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector with deployment-specific extra keywords merged in.
    pub fn with_overrides(overrides: &KeywordOverrides) -> Self {
        Self {
            extra_english: overrides
                .english
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            extra_spanish: overrides
                .spanish
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        }
    }

    /// Returns `true` if the message contains any critical-symptom phrase.
    ///
    /// Both language lists are scanned regardless of the declared language;
    /// patients mix languages more often than they set the language toggle.
    /// The declared language only selects which list is consulted first.
    pub fn detect(&self, message: &str, language: Language) -> bool {
        let haystack = message.to_lowercase();
        let (first, second) = match language {
            Language::English => (self.english_lists(), self.spanish_lists()),
            Language::Spanish => (self.spanish_lists(), self.english_lists()),
        };
        contains_any(&haystack, first) || contains_any(&haystack, second)
    }

    /// The fixed emergency instruction for a language.
    pub fn instruction(language: Language) -> &'static str {
        match language {
            Language::English => ENGLISH_INSTRUCTION,
            Language::Spanish => SPANISH_INSTRUCTION,
        }
    }

    fn english_lists(&self) -> (&'static [&'static str], &[String]) {
        (ENGLISH_KEYWORDS, &self.extra_english)
    }

    fn spanish_lists(&self) -> (&'static [&'static str], &[String]) {
        (SPANISH_KEYWORDS, &self.extra_spanish)
    }
}

fn contains_any(haystack: &str, (builtin, extra): (&[&str], &[String])) -> bool {
    builtin.iter().any(|k| haystack.contains(k)) || extra.iter().any(|k| haystack.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_matches_case_insensitively() {
        let detector = EmergencyDetector::new();
        assert!(detector.detect("Sudden CHEST PAIN while walking", Language::English));
        assert!(detector.detect("creo que es un INFARTO", Language::Spanish));
    }

    #[test]
    fn test_detect_crosses_language_lists() {
        let detector = EmergencyDetector::new();
        // Spanish phrase in an intake declared as English still triggers.
        assert!(detector.detect("mi padre dice no puedo respirar", Language::English));
    }

    #[test]
    fn test_detect_ignores_benign_text() {
        let detector = EmergencyDetector::new();
        assert!(!detector.detect("mild rash on my arm for a week", Language::English));
        assert!(!detector.detect("", Language::English));
    }

    #[test]
    fn test_overrides_extend_builtin_lists() {
        let overrides = KeywordOverrides {
            english: vec!["crushing pressure".to_string()],
            spanish: Vec::new(),
        };
        let detector = EmergencyDetector::with_overrides(&overrides);
        assert!(detector.detect("a Crushing Pressure in my chest", Language::English));
        // Built-ins still present.
        assert!(detector.detect("I think it's a stroke", Language::English));
    }

    #[test]
    fn test_instructions_are_language_appropriate() {
        assert!(EmergencyDetector::instruction(Language::English).contains("emergency"));
        assert!(EmergencyDetector::instruction(Language::Spanish).contains("emergencia"));
    }
}
