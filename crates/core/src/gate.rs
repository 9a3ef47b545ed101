//! Consultation-mode safety gate.
//!
//! One hard rule: an online consultation is never offered against an
//! emergency triage outcome. Callers requesting online when it is unsafe get
//! an explicit refusal; there is no silent downgrade to in-person.

use crate::triage::TriageScore;
use crate::zones::{TriageLevel, ZoneAssessment};
use crate::ConsultationMode;
use serde::{Deserialize, Serialize};

/// Outcome of the online-permission check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnlineDecision {
    pub allowed: bool,
    pub reason: String,
}

/// Modes that are safe for a triage outcome, plus a UI hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeModes {
    /// Consultation modes safe for this outcome.
    pub modes: Vec<ConsultationMode>,
    /// Mode the UI should pre-select: online when safe, otherwise physical.
    pub primary_recommendation: ConsultationMode,
}

/// The combined triage outcome used for gating: the worst of the zone
/// assessment (if a zone was selected) and the scorer's category.
pub fn combined_level(zone: Option<&ZoneAssessment>, score: &TriageScore) -> TriageLevel {
    let zone_level = zone.map(|z| z.triage_level).unwrap_or(TriageLevel::Routine);
    zone_level.max(score.category.as_triage_level())
}

/// Decides whether an online consultation is permitted for a triage outcome.
pub fn check_online_allowed(level: TriageLevel) -> OnlineDecision {
    match level {
        TriageLevel::Emergency => OnlineDecision {
            allowed: false,
            reason: "emergency triage outcome requires in-person or emergency care".to_string(),
        },
        TriageLevel::Urgent | TriageLevel::Routine => OnlineDecision {
            allowed: true,
            reason: format!("{level} triage outcome permits remote consultation"),
        },
    }
}

/// Returns the safe consultation modes for a triage outcome.
pub fn safe_modes(level: TriageLevel) -> SafeModes {
    if check_online_allowed(level).allowed {
        SafeModes {
            modes: vec![ConsultationMode::Online, ConsultationMode::Physical],
            primary_recommendation: ConsultationMode::Online,
        }
    } else {
        SafeModes {
            modes: vec![ConsultationMode::Physical],
            primary_recommendation: ConsultationMode::Physical,
        }
    }
}
