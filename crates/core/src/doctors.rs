//! Doctor directory wire types.
//!
//! The doctor directory is an external collaborator; the engine only reads
//! these records. Eligibility and ranking over them live in [`crate::referral`].

use crate::zones::Specialty;
use crate::ConsultationMode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use triage_types::{NonEmptyText, Rating};

/// A geographic location hint supplied by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One doctor record as supplied by the directory service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    /// Directory identifier.
    pub id: String,
    /// Display name.
    pub name: NonEmptyText,
    /// Specialties the doctor practises.
    pub specialties: BTreeSet<Specialty>,
    /// Whether the doctor currently accepts consultations.
    pub active: bool,
    /// Whether the doctor's credentials have been verified.
    pub verified: bool,
    /// Consultation modes the doctor offers.
    pub modes: Vec<ConsultationMode>,
    /// Practice location, when known.
    #[serde(default)]
    pub location: Option<GeoPoint>,
    /// Aggregate patient rating.
    pub rating: Rating,
}

impl Doctor {
    /// Whether the doctor offers the given consultation mode.
    pub fn supports_mode(&self, mode: ConsultationMode) -> bool {
        self.modes.contains(&mode)
    }

    /// Whether the doctor practises the given specialty.
    pub fn has_specialty(&self, specialty: Specialty) -> bool {
        self.specialties.contains(&specialty)
    }
}

/// A doctor paired with its ranking score. Transient: produced by the
/// ranking step for one recommendation and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDoctor {
    pub doctor: Doctor,
    pub score: f64,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Builds a plain active, verified, dual-mode doctor for tests.
    pub(crate) fn doctor(id: &str, specialty: Specialty) -> Doctor {
        Doctor {
            id: id.to_string(),
            name: NonEmptyText::new(format!("Dr {id}")).expect("test name is non-empty"),
            specialties: [specialty].into_iter().collect(),
            active: true,
            verified: true,
            modes: vec![ConsultationMode::Online, ConsultationMode::Physical],
            location: None,
            rating: Rating::unrated(),
        }
    }
}
