//! Doctor eligibility filtering.
//!
//! Narrows a directory snapshot to the doctors who can legally and
//! practically serve a case: active, credential-verified, offering the
//! requested consultation mode, and practising the recommended specialty.
//! When the pool holds no specialty match at all, the filter widens to any
//! active, verified, mode-capable doctor — explicitly, with the widening
//! flagged on the outcome and logged, never silently.
//!
//! Each call is evaluated independently; the filter has no memory of past
//! recommendations.

use crate::doctors::Doctor;
use crate::zones::Specialty;
use crate::ConsultationMode;

/// Result of one eligibility pass.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityOutcome {
    /// Eligible doctors, in directory order.
    pub doctors: Vec<Doctor>,
    /// Size of the directory snapshot the filter started from.
    pub pool_size: usize,
    /// True when no specialty match existed and the filter fell back to any
    /// active, verified, mode-capable doctor.
    pub widened: bool,
}

/// Filters a directory snapshot down to the doctors eligible for a case.
pub fn filter_eligible(
    doctors: &[Doctor],
    specialty: Specialty,
    mode: ConsultationMode,
) -> EligibilityOutcome {
    let pool_size = doctors.len();

    let base: Vec<&Doctor> = doctors
        .iter()
        .filter(|d| d.active && d.verified && d.supports_mode(mode))
        .collect();

    let matching: Vec<Doctor> = base
        .iter()
        .filter(|d| d.has_specialty(specialty))
        .map(|d| (*d).clone())
        .collect();

    if !matching.is_empty() {
        return EligibilityOutcome {
            doctors: matching,
            pool_size,
            widened: false,
        };
    }

    if base.is_empty() {
        return EligibilityOutcome {
            doctors: Vec::new(),
            pool_size,
            widened: false,
        };
    }

    tracing::warn!(
        "no {} match in pool of {}, widening eligibility to {} capable doctor(s)",
        specialty,
        pool_size,
        base.len()
    );
    EligibilityOutcome {
        doctors: base.into_iter().cloned().collect(),
        pool_size,
        widened: true,
    }
}
