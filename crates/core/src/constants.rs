//! Constants used throughout the triage core crate.
//!
//! Scoring weights, category thresholds, and recommendation limits live here
//! so the clinical rule values are reviewable in one place.

/// Score contribution when the intake carries an emergency or critical red flag.
pub const CRITICAL_FLAG_SCORE: f64 = 40.0;

/// Score contribution when a lesser red flag is present.
pub const RED_FLAG_SCORE: f64 = 25.0;

/// Maximum score contribution from reported severity.
pub const SEVERITY_MAX_SCORE: f64 = 20.0;

/// Maximum score contribution from associated symptoms.
pub const ASSOCIATED_SYMPTOMS_MAX_SCORE: f64 = 10.0;

/// Score contribution per associated symptom.
pub const ASSOCIATED_SYMPTOM_SCORE: f64 = 2.0;

/// Score credited for a long free-text symptom description when no symptom
/// list is supplied.
pub const SYMPTOM_DESCRIPTION_SCORE: f64 = 8.0;

/// Minimum character count for a symptom description to earn credit.
pub const SYMPTOM_DESCRIPTION_MIN_CHARS: usize = 20;

/// Maximum score contribution from urgent-language keywords.
pub const URGENT_KEYWORD_MAX_SCORE: f64 = 10.0;

/// Score contribution per urgent-language keyword match.
pub const URGENT_KEYWORD_SCORE: f64 = 3.0;

/// Total score at or above which the case is immediate (priority 1).
pub const IMMEDIATE_THRESHOLD: u8 = 70;

/// Total score at or above which the case is urgent (priority 2).
pub const URGENT_THRESHOLD: u8 = 50;

/// Total score at or above which the case is semi-urgent (priority 3).
pub const SEMI_URGENT_THRESHOLD: u8 = 30;

/// Recommended wait-time text per urgency category.
pub const WAIT_IMMEDIATE: &str = "see immediately or call emergency services";
pub const WAIT_URGENT: &str = "within 1-2 hours";
pub const WAIT_SEMI_URGENT: &str = "within 4-6 hours";
pub const WAIT_NON_URGENT: &str = "routine scheduling";

/// Default maximum number of doctors in a recommendation list.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;

/// Ranking bonus for a doctor whose specialties include the recommended one.
pub const SPECIALTY_MATCH_BONUS: f64 = 10.0;

/// Ranking bonus when the consultation mode is online.
pub const ONLINE_MODE_BONUS: f64 = 5.0;

/// Ranking penalty per kilometre of distance, when a distance function is supplied.
pub const DISTANCE_PENALTY_PER_KM: f64 = 0.1;

/// Length in hex characters of the audit entry integrity token.
pub const INTEGRITY_TOKEN_LEN: usize = 16;
