//! Doctor ranking.
//!
//! Scores eligible doctors for one case and orders them best-first. Ranking
//! is deterministic: the sort is stable and ties keep the eligible-list
//! order, so identical inputs always produce identical output.

use crate::constants::{DISTANCE_PENALTY_PER_KM, ONLINE_MODE_BONUS, SPECIALTY_MATCH_BONUS};
use crate::doctors::{Doctor, ScoredDoctor};
use crate::zones::Specialty;
use crate::ConsultationMode;
use std::cmp::Ordering;

/// Optional per-doctor distance source, in kilometres.
///
/// Supplied by the caller when patient location is known; doctors the
/// function returns `None` for take no distance penalty.
pub type DistanceFn<'a> = &'a dyn Fn(&Doctor) -> Option<f64>;

/// Scores and orders eligible doctors, best first.
pub fn rank(
    eligible: &[Doctor],
    specialty: Specialty,
    mode: ConsultationMode,
    distance_fn: Option<DistanceFn<'_>>,
) -> Vec<ScoredDoctor> {
    let mut scored: Vec<ScoredDoctor> = eligible
        .iter()
        .map(|doctor| {
            let mut score = 0.0;
            if doctor.has_specialty(specialty) {
                score += SPECIALTY_MATCH_BONUS;
            }
            if mode == ConsultationMode::Online {
                score += ONLINE_MODE_BONUS;
            }
            if let Some(distance) = distance_fn.and_then(|f| f(doctor)) {
                score -= DISTANCE_PENALTY_PER_KM * distance;
            }
            ScoredDoctor {
                doctor: doctor.clone(),
                score,
            }
        })
        .collect();

    // Stable sort: equal scores keep the eligible-list order.
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

/// Truncates a ranked list to at most `limit` doctors.
pub fn top_n(mut ranked: Vec<ScoredDoctor>, limit: usize) -> Vec<ScoredDoctor> {
    ranked.truncate(limit);
    ranked
}
