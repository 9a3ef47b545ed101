//! # Triage Core
//!
//! Clinical decision-support engine for a patient-facing telehealth
//! application. Given structured symptom intake, this crate:
//! - assesses the selected anatomical zone against a static knowledge base,
//! - screens free text for critical-symptom phrases,
//! - computes a 0–100 urgency score with an explainable reasoning trail,
//! - gates whether a remote consultation is clinically safe,
//! - filters and ranks a doctor directory for referral, and
//! - records every decision in an append-only, tamper-evident audit log.
//!
//! All scoring, lookup, filtering, and ranking is pure and synchronous; the
//! only shared mutable state is the audit store behind [`audit::AuditLog`].
//!
//! **No presentation or storage concerns**: intake collection, the doctor
//! directory, persistence of audit entries, and consultation transport all
//! belong to the embedding application.

pub mod audit;
pub mod config;
pub mod constants;
pub mod doctors;
pub mod emergency;
mod error;
pub mod gate;
pub mod intake;
pub mod language;
pub mod recommend;
pub mod referral;
pub mod triage;
pub mod zones;

pub use error::{EngineError, EngineResult};

use serde::{Deserialize, Serialize};

/// Consultation encounter types the platform offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsultationMode {
    /// Remote video/text consultation.
    Online,
    /// In-person appointment.
    Physical,
}

impl std::fmt::Display for ConsultationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConsultationMode::Online => "online",
            ConsultationMode::Physical => "physical",
        };
        write!(f, "{name}")
    }
}

/// Role of the actor a decision is made for or by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Patient,
    Clinician,
    System,
    Admin,
}

/// The acting identity recorded on audit entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identifier from the embedding application.
    pub id: String,
    pub role: ActorRole,
}
