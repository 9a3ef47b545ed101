//! Urgency scoring of intake records.
//!
//! The canonical scorer is a weighted additive model over the full intake
//! signal, producing a 0–100 score, a four-band category, and a reasoning
//! trail for audit and display. The older three-band scorer that shipped with
//! the first intake flow is kept below as [`legacy_score`], deprecated, for
//! call paths that have not migrated yet; the two can disagree and the 0–100
//! model is authoritative.

use crate::constants::{
    ASSOCIATED_SYMPTOMS_MAX_SCORE, ASSOCIATED_SYMPTOM_SCORE, CRITICAL_FLAG_SCORE,
    IMMEDIATE_THRESHOLD, RED_FLAG_SCORE, SEMI_URGENT_THRESHOLD, SEVERITY_MAX_SCORE,
    SYMPTOM_DESCRIPTION_MIN_CHARS, SYMPTOM_DESCRIPTION_SCORE, URGENT_KEYWORD_MAX_SCORE,
    URGENT_KEYWORD_SCORE, URGENT_THRESHOLD, WAIT_IMMEDIATE, WAIT_NON_URGENT, WAIT_SEMI_URGENT,
    WAIT_URGENT,
};
use crate::intake::IntakeRecord;
use crate::language::Language;
use crate::zones::TriageLevel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Intake red-flag names treated as critical indicators.
///
/// These are the flag keys the intake stepper emits for its hard-stop
/// questions; any of them scores as an emergency indicator.
const CRITICAL_INTAKE_FLAGS: &[&str] = &[
    "chest_pain",
    "breathing_difficulty",
    "loss_of_consciousness",
    "severe_bleeding",
    "stroke_symptoms",
];

/// Onset phrases per acuteness bucket, English.
const EN_HOURS: &[&str] = &["hour", "today", "this morning", "tonight", "just now"];
const EN_DAYS: &[&str] = &["day", "yesterday"];
const EN_WEEKS: &[&str] = &["week"];
const EN_MONTHS: &[&str] = &["month"];

/// Onset phrases per acuteness bucket, Spanish.
const ES_HOURS: &[&str] = &["hora", "hoy", "esta mañana", "ahora"];
const ES_DAYS: &[&str] = &["día", "dia", "ayer"];
const ES_WEEKS: &[&str] = &["semana"];
const ES_MONTHS: &[&str] = &["mes"];

/// Urgent-language phrases scanned in the chief complaint.
const EN_URGENT_WORDS: &[&str] = &[
    "severe",
    "unbearable",
    "worst",
    "extreme",
    "excruciating",
    "intense",
    "can't move",
];
const ES_URGENT_WORDS: &[&str] = &[
    "severo",
    "insoportable",
    "peor",
    "extremo",
    "intenso",
    "no aguanto",
];

/// Four-band urgency category derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrgencyCategory {
    Immediate,
    Urgent,
    SemiUrgent,
    NonUrgent,
}

impl UrgencyCategory {
    /// Maps a clamped total score into its category band.
    pub fn from_score(total_score: u8) -> Self {
        if total_score >= IMMEDIATE_THRESHOLD {
            UrgencyCategory::Immediate
        } else if total_score >= URGENT_THRESHOLD {
            UrgencyCategory::Urgent
        } else if total_score >= SEMI_URGENT_THRESHOLD {
            UrgencyCategory::SemiUrgent
        } else {
            UrgencyCategory::NonUrgent
        }
    }

    /// Priority level, 1 highest to 4 lowest.
    pub fn priority(&self) -> u8 {
        match self {
            UrgencyCategory::Immediate => 1,
            UrgencyCategory::Urgent => 2,
            UrgencyCategory::SemiUrgent => 3,
            UrgencyCategory::NonUrgent => 4,
        }
    }

    /// Recommended wait-time text shown to the patient.
    pub fn recommended_wait(&self) -> &'static str {
        match self {
            UrgencyCategory::Immediate => WAIT_IMMEDIATE,
            UrgencyCategory::Urgent => WAIT_URGENT,
            UrgencyCategory::SemiUrgent => WAIT_SEMI_URGENT,
            UrgencyCategory::NonUrgent => WAIT_NON_URGENT,
        }
    }

    /// Equivalent zone-style triage level, used by the safety gate when
    /// combining the scorer outcome with a zone assessment.
    pub fn as_triage_level(&self) -> TriageLevel {
        match self {
            UrgencyCategory::Immediate => TriageLevel::Emergency,
            UrgencyCategory::Urgent => TriageLevel::Urgent,
            UrgencyCategory::SemiUrgent | UrgencyCategory::NonUrgent => TriageLevel::Routine,
        }
    }
}

impl fmt::Display for UrgencyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UrgencyCategory::Immediate => "immediate",
            UrgencyCategory::Urgent => "urgent",
            UrgencyCategory::SemiUrgent => "semi-urgent",
            UrgencyCategory::NonUrgent => "non-urgent",
        };
        write!(f, "{name}")
    }
}

/// Result of scoring one intake snapshot. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageScore {
    /// Total urgency score, clamped to 0–100.
    pub total_score: u8,
    /// Category band the score falls into.
    pub category: UrgencyCategory,
    /// Priority level, 1 highest to 4 lowest. Strictly determined by the
    /// score thresholds.
    pub priority_level: u8,
    /// Recommended wait-time text for the category.
    pub recommended_wait: String,
    /// Which rules fired and the values they extracted, in scoring order.
    pub reasoning: Vec<String>,
}

impl TriageScore {
    fn from_total(total: f64, reasoning: Vec<String>) -> Self {
        let total_score = total.round().clamp(0.0, 100.0) as u8;
        let category = UrgencyCategory::from_score(total_score);
        TriageScore {
            total_score,
            category,
            priority_level: category.priority(),
            recommended_wait: category.recommended_wait().to_string(),
            reasoning,
        }
    }
}

/// Scores an intake record with the canonical weighted additive model.
///
/// Pure and total: malformed or missing answers resolve to documented
/// defaults, and the result for a given snapshot is always the same.
pub fn score(intake: &IntakeRecord) -> TriageScore {
    let mut total = 0.0;
    let mut reasoning = Vec::new();

    // Red-flag indicator, higher band wins.
    let critical = critical_indicator(intake);
    if let Some(indicator) = critical {
        total += CRITICAL_FLAG_SCORE;
        reasoning.push(format!("Critical indicator present: {indicator}"));
    } else if intake.has_red_flag() {
        total += RED_FLAG_SCORE;
        reasoning.push(format!(
            "Red flags reported: {}",
            intake.active_red_flags().join(", ")
        ));
    }

    // Reported severity, 0-10 scale.
    let severity = intake.severity();
    if severity >= 8.0 {
        total += 20.0;
        reasoning.push(format!("High pain severity: {severity}/10"));
    } else if severity >= 5.0 {
        total += 15.0;
        reasoning.push(format!("Moderate pain severity: {severity}/10"));
    } else if severity >= 3.0 {
        total += 10.0;
        reasoning.push(format!("Notable pain severity: {severity}/10"));
    } else if severity > 0.0 {
        total += (severity / 10.0) * SEVERITY_MAX_SCORE;
        reasoning.push(format!("Mild pain severity: {severity}/10"));
    }

    // Onset recency.
    if let Some(duration) = intake.duration_text() {
        if let Some((points, label)) = classify_duration(duration, intake.language) {
            total += points;
            reasoning.push(format!("{label}: \"{}\"", duration.trim()));
        }
    }

    // Associated symptom burden.
    if !intake.associated_symptoms.is_empty() {
        let count = intake.associated_symptoms.len();
        let points =
            (count as f64 * ASSOCIATED_SYMPTOM_SCORE).min(ASSOCIATED_SYMPTOMS_MAX_SCORE);
        total += points;
        reasoning.push(format!("Associated symptoms reported: {count}"));
    } else if intake
        .symptom_description()
        .is_some_and(|d| d.chars().count() > SYMPTOM_DESCRIPTION_MIN_CHARS)
    {
        total += SYMPTOM_DESCRIPTION_SCORE;
        reasoning.push("Detailed symptom description provided".to_string());
    }

    // Age outliers.
    if let Some(age) = intake.age.filter(|&a| a > 0) {
        if age < 5 || age > 70 {
            total += 5.0;
            reasoning.push(format!("Age outside resilient range: {age}"));
        } else if age < 12 || age > 60 {
            total += 3.0;
            reasoning.push(format!("Age near vulnerable range: {age}"));
        }
    }

    // Urgent language in the chief complaint.
    let matches = urgent_word_matches(&intake.chief_complaint, intake.language);
    if matches > 0 {
        total += (matches as f64 * URGENT_KEYWORD_SCORE).min(URGENT_KEYWORD_MAX_SCORE);
        reasoning.push(format!("Urgent language in complaint: {matches} match(es)"));
    }

    TriageScore::from_total(total, reasoning)
}

fn critical_indicator(intake: &IntakeRecord) -> Option<String> {
    if intake.emergency {
        return Some("emergency flag set by intake".to_string());
    }
    intake
        .active_red_flags()
        .into_iter()
        .find(|flag| CRITICAL_INTAKE_FLAGS.contains(flag))
        .map(|flag| flag.to_string())
}

fn classify_duration(duration: &str, language: Language) -> Option<(f64, &'static str)> {
    let haystack = duration.to_lowercase();
    let (hours, days, weeks, months) = match language {
        Language::English => (EN_HOURS, EN_DAYS, EN_WEEKS, EN_MONTHS),
        Language::Spanish => (ES_HOURS, ES_DAYS, ES_WEEKS, ES_MONTHS),
    };
    if hours.iter().any(|k| haystack.contains(k)) {
        Some((15.0, "Very recent onset"))
    } else if days.iter().any(|k| haystack.contains(k)) {
        Some((12.0, "Recent onset"))
    } else if weeks.iter().any(|k| haystack.contains(k)) {
        Some((8.0, "Onset weeks ago"))
    } else if months.iter().any(|k| haystack.contains(k)) {
        Some((5.0, "Chronic onset"))
    } else {
        None
    }
}

fn urgent_word_matches(complaint: &str, language: Language) -> usize {
    let haystack = complaint.to_lowercase();
    let words = match language {
        Language::English => EN_URGENT_WORDS,
        Language::Spanish => ES_URGENT_WORDS,
    };
    words.iter().filter(|w| haystack.contains(*w)).count()
}

/// Scores an intake record with the original three-band model.
///
/// Looks only at onset recency, pain, fever, and breathing difficulty, and
/// produces three bands mapped onto the canonical [`TriageScore`] shape with
/// representative scores. Kept for intake flows that predate the weighted
/// model; new call paths must use [`score`].
#[deprecated(note = "superseded by the weighted 0-100 model in `score`")]
pub fn legacy_score(intake: &IntakeRecord) -> TriageScore {
    let mut points = 0u8;
    let mut reasoning = Vec::new();

    let severity = intake.severity();
    if severity >= 7.0 {
        points += 2;
        reasoning.push(format!("Severe pain: {severity}/10"));
    } else if severity >= 4.0 {
        points += 1;
        reasoning.push(format!("Moderate pain: {severity}/10"));
    }

    if let Some(duration) = intake.duration_text() {
        match classify_duration(duration, intake.language) {
            Some((p, _)) if p >= 15.0 => {
                points += 2;
                reasoning.push("Onset within hours".to_string());
            }
            Some((p, _)) if p >= 12.0 => {
                points += 1;
                reasoning.push("Onset within days".to_string());
            }
            _ => {}
        }
    }

    let feverish = intake
        .answers
        .get("fever")
        .is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "yes" | "true" | "si" | "sí"));
    if feverish {
        points += 1;
        reasoning.push("Fever reported".to_string());
    }

    if intake
        .red_flags
        .get("breathing_difficulty")
        .copied()
        .unwrap_or(false)
    {
        points += 3;
        reasoning.push("Breathing difficulty reported".to_string());
    }

    // Three bands, projected onto the canonical score ranges.
    let representative = if points >= 4 {
        55.0
    } else if points >= 2 {
        35.0
    } else {
        10.0
    };
    TriageScore::from_total(representative, reasoning)
}
