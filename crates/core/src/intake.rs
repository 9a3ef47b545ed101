//! Structured symptom intake.
//!
//! The intake stepper (an external collaborator) builds an [`IntakeRecord`]
//! incrementally and hands it to the engine read-only. Field extraction here
//! is deliberately tolerant: the stepper has gone through several revisions
//! and older clients populate different answer keys, so the accessors read
//! the first populated candidate and fall back to documented defaults rather
//! than erroring.

use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answer keys accepted for the reported severity, in precedence order.
const SEVERITY_KEYS: &[&str] = &["severity", "pain_severity", "pain_level"];

/// Answer keys accepted for the onset/duration free text, in precedence order.
const DURATION_KEYS: &[&str] = &["duration", "onset"];

/// Answer keys accepted for a free-text symptom description, in precedence order.
const DESCRIPTION_KEYS: &[&str] = &["symptom_description", "description"];

/// A structured symptom intake snapshot for one patient request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    /// Free-text chief complaint as entered by the patient.
    pub chief_complaint: String,
    /// Per-question answers keyed by question identifier.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    /// Selected anatomical zone identifier, if the patient picked one.
    #[serde(default)]
    pub zone: Option<String>,
    /// Set when the intake flow itself flagged the case as an emergency.
    #[serde(default)]
    pub emergency: bool,
    /// Red-flag question answers, flag name to boolean.
    #[serde(default)]
    pub red_flags: BTreeMap<String, bool>,
    /// Patient age in years, when known.
    #[serde(default)]
    pub age: Option<u32>,
    /// Structured list of associated symptoms, when the stepper collected one.
    #[serde(default)]
    pub associated_symptoms: Vec<String>,
    /// Language the patient completed the intake in.
    #[serde(default)]
    pub language: Language,
}

impl IntakeRecord {
    /// Reported severity on the 0–10 scale.
    ///
    /// Reads the first populated severity answer; missing or unparsable
    /// values default to 0, and parsable values are clamped into 0–10.
    pub fn severity(&self) -> f64 {
        let raw = first_populated(&self.answers, SEVERITY_KEYS);
        let Some(raw) = raw else { return 0.0 };
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value.clamp(0.0, 10.0),
            _ => 0.0,
        }
    }

    /// Free-text onset/duration answer, if any.
    pub fn duration_text(&self) -> Option<&str> {
        first_populated(&self.answers, DURATION_KEYS)
    }

    /// Free-text symptom description, if any.
    pub fn symptom_description(&self) -> Option<&str> {
        first_populated(&self.answers, DESCRIPTION_KEYS)
    }

    /// Names of red flags answered affirmatively, in key order.
    pub fn active_red_flags(&self) -> Vec<&str> {
        self.red_flags
            .iter()
            .filter(|(_, &set)| set)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Whether any red-flag question was answered affirmatively.
    pub fn has_red_flag(&self) -> bool {
        self.red_flags.values().any(|&set| set)
    }
}

fn first_populated<'a>(answers: &'a BTreeMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| answers.get(*key))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake_with(key: &str, value: &str) -> IntakeRecord {
        let mut record = IntakeRecord::default();
        record.answers.insert(key.to_string(), value.to_string());
        record
    }

    #[test]
    fn test_severity_reads_any_candidate_key() {
        assert_eq!(intake_with("severity", "7").severity(), 7.0);
        assert_eq!(intake_with("pain_severity", "4.5").severity(), 4.5);
        assert_eq!(intake_with("pain_level", "9").severity(), 9.0);
    }

    #[test]
    fn test_severity_defaults_to_zero_on_missing_or_garbage() {
        assert_eq!(IntakeRecord::default().severity(), 0.0);
        assert_eq!(intake_with("severity", "quite bad").severity(), 0.0);
        assert_eq!(intake_with("severity", "").severity(), 0.0);
    }

    #[test]
    fn test_severity_clamps_to_scale() {
        assert_eq!(intake_with("severity", "15").severity(), 10.0);
        assert_eq!(intake_with("severity", "-3").severity(), 0.0);
    }

    #[test]
    fn test_duration_prefers_duration_over_onset() {
        let mut record = intake_with("onset", "yesterday");
        record
            .answers
            .insert("duration".to_string(), "two hours".to_string());
        assert_eq!(record.duration_text(), Some("two hours"));
    }

    #[test]
    fn test_active_red_flags_lists_only_set_flags() {
        let mut record = IntakeRecord::default();
        record.red_flags.insert("chest_pain".to_string(), true);
        record.red_flags.insert("fainting".to_string(), false);
        record.red_flags.insert("vomiting_blood".to_string(), true);
        assert_eq!(record.active_red_flags(), vec!["chest_pain", "vomiting_blood"]);
        assert!(record.has_red_flag());
    }
}
