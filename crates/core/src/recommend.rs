//! Recommendation orchestration.
//!
//! Composes the zone knowledge base, triage scorer, safety gate, eligibility
//! filter, and ranking scorer into single calls, writing an audit entry at
//! every decision point. The audit log is an injected dependency so tests
//! and embedders can substitute their own store; an audit write failure is
//! recorded and never blocks the clinical decision from reaching the caller.

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::config::EngineConfig;
use crate::doctors::{Doctor, ScoredDoctor};
use crate::emergency::EmergencyDetector;
use crate::gate;
use crate::intake::IntakeRecord;
use crate::language::Language;
use crate::referral::ranking::DistanceFn;
use crate::referral::{eligibility, ranking};
use crate::triage;
use crate::zones::{self, Specialty, TriageLevel, ZoneAssessment};
use crate::{Actor, ActorRole, ConsultationMode, EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of one recommendation call.
///
/// An empty `doctors` list is a valid, non-error outcome; callers surface
/// the attached warnings and the alternative mode suggestion instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Ranked doctors, best first, at most the configured limit.
    pub doctors: Vec<ScoredDoctor>,
    /// Consultation mode the recommendation was computed for.
    pub mode: ConsultationMode,
    /// Non-fatal safety and availability guidance for the caller.
    pub warnings: Vec<String>,
    /// Suggested other mode when this one produced no doctors.
    pub alternative_mode: Option<ConsultationMode>,
}

/// Recommendations for both consultation modes, plus the gate's UI hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BothModesRecommendation {
    /// Online recommendation, `None` when the safety gate refused the mode.
    pub online: Option<RecommendationResult>,
    /// Physical recommendation, always computed.
    pub physical: RecommendationResult,
    /// Mode the UI should pre-select.
    pub primary_recommendation: ConsultationMode,
}

/// Orchestrates the decision-support flow for doctor recommendations.
#[derive(Clone)]
pub struct RecommendationService {
    cfg: Arc<EngineConfig>,
    audit: Arc<dyn AuditLog>,
    detector: EmergencyDetector,
}

impl RecommendationService {
    /// Creates a service with the given configuration and audit sink.
    pub fn new(cfg: Arc<EngineConfig>, audit: Arc<dyn AuditLog>) -> Self {
        let detector = EmergencyDetector::with_overrides(cfg.keyword_overrides());
        Self {
            cfg,
            audit,
            detector,
        }
    }

    /// Recommends doctors for an intake record in the requested mode.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::OnlineBlocked` when `mode` is online and the
    /// combined triage outcome forbids remote consultation. No partial
    /// doctor list is ever returned in that case; callers must redirect to
    /// a physical consultation.
    pub fn recommend(
        &self,
        doctors: &[Doctor],
        intake: &IntakeRecord,
        mode: ConsultationMode,
        actor: &Actor,
    ) -> EngineResult<RecommendationResult> {
        self.recommend_with_distance(doctors, intake, mode, actor, None)
    }

    /// Like [`recommend`](Self::recommend), with a caller-supplied distance
    /// function feeding the ranking penalty.
    pub fn recommend_with_distance(
        &self,
        doctors: &[Doctor],
        intake: &IntakeRecord,
        mode: ConsultationMode,
        actor: &Actor,
        distance_fn: Option<DistanceFn<'_>>,
    ) -> EngineResult<RecommendationResult> {
        let zone = intake.zone.as_deref().map(zones::assess);
        let score = triage::score(intake);
        let level = gate::combined_level(zone.as_ref(), &score);

        if mode == ConsultationMode::Online {
            let decision = gate::check_online_allowed(level);
            if !decision.allowed {
                self.record(
                    actor,
                    AuditAction::OnlineBlocked,
                    format!("online consultation refused: {}", decision.reason),
                );
                if level == TriageLevel::Emergency {
                    self.record(
                        actor,
                        AuditAction::EmergencyRedirect,
                        "caller redirected to emergency care".to_string(),
                    );
                }
                return Err(EngineError::OnlineBlocked {
                    reason: decision.reason,
                });
            }
        }

        let specialty = zone
            .as_ref()
            .map(|z| z.specialty)
            .unwrap_or(Specialty::GeneralMedicine);

        let outcome = eligibility::filter_eligible(doctors, specialty, mode);
        self.record(
            actor,
            AuditAction::EligibilityFilter,
            format!(
                "pool {} -> {} eligible for {} ({}), widened: {}",
                outcome.pool_size,
                outcome.doctors.len(),
                specialty,
                mode,
                outcome.widened
            ),
        );

        if outcome.doctors.is_empty() {
            let alternative = self.safe_alternative(mode, level);
            let mut warnings =
                vec!["No available doctors match this request right now.".to_string()];
            if let Some(alt) = alternative {
                warnings.push(format!("Consider booking a {alt} consultation instead."));
            }
            return Ok(RecommendationResult {
                doctors: Vec::new(),
                mode,
                warnings,
                alternative_mode: alternative,
            });
        }

        let ranked = ranking::rank(&outcome.doctors, specialty, mode, distance_fn);
        let top = ranking::top_n(ranked, self.cfg.recommendation_limit());

        let ids: Vec<&str> = top.iter().map(|s| s.doctor.id.as_str()).collect();
        let top_score = top.first().map(|s| s.score).unwrap_or(0.0);
        self.record(
            actor,
            AuditAction::DoctorRecommendation,
            format!("recommended [{}], top score {:.1}", ids.join(", "), top_score),
        );

        let warnings = self.safety_warnings(zone.as_ref(), level, mode, outcome.widened, specialty);
        Ok(RecommendationResult {
            doctors: top,
            mode,
            warnings,
            alternative_mode: None,
        })
    }

    /// Computes recommendations for both modes at once.
    ///
    /// An online refusal by the safety gate is reported as an unavailable
    /// online option rather than an error; the physical recommendation is
    /// always computed.
    pub fn recommend_both_modes(
        &self,
        doctors: &[Doctor],
        intake: &IntakeRecord,
        actor: &Actor,
    ) -> EngineResult<BothModesRecommendation> {
        let online = match self.recommend(doctors, intake, ConsultationMode::Online, actor) {
            Ok(result) => Some(result),
            Err(EngineError::OnlineBlocked { .. }) => None,
            Err(other) => return Err(other),
        };
        let physical = self.recommend(doctors, intake, ConsultationMode::Physical, actor)?;

        let zone = intake.zone.as_deref().map(zones::assess);
        let score = triage::score(intake);
        let level = gate::combined_level(zone.as_ref(), &score);

        Ok(BothModesRecommendation {
            online,
            physical,
            primary_recommendation: gate::safe_modes(level).primary_recommendation,
        })
    }

    /// Recommends doctors while bypassing the consultation-mode safety gate.
    ///
    /// Reserved for clinicians and administrators handling an emergency on
    /// the patient's behalf; the override reason and authorising actor are
    /// always audit-logged, and the eligibility filter still applies.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::OverrideNotPermitted` when the actor is not a
    /// clinician or administrator.
    pub fn emergency_override(
        &self,
        doctors: &[Doctor],
        intake: &IntakeRecord,
        mode: ConsultationMode,
        actor: &Actor,
        reason: &str,
    ) -> EngineResult<RecommendationResult> {
        if !matches!(actor.role, ActorRole::Clinician | ActorRole::Admin) {
            return Err(EngineError::OverrideNotPermitted {
                role: format!("{:?}", actor.role),
            });
        }

        self.record(
            actor,
            AuditAction::EmergencyOverride,
            format!("safety gate bypassed for {mode} consultation: {reason}"),
        );

        let zone = intake.zone.as_deref().map(zones::assess);
        let specialty = zone
            .as_ref()
            .map(|z| z.specialty)
            .unwrap_or(Specialty::GeneralMedicine);

        let outcome = eligibility::filter_eligible(doctors, specialty, mode);
        self.record(
            actor,
            AuditAction::EligibilityFilter,
            format!(
                "override: pool {} -> {} eligible for {} ({}), widened: {}",
                outcome.pool_size,
                outcome.doctors.len(),
                specialty,
                mode,
                outcome.widened
            ),
        );

        let ranked = ranking::rank(&outcome.doctors, specialty, mode, None);
        let top = ranking::top_n(ranked, self.cfg.recommendation_limit());
        Ok(RecommendationResult {
            doctors: top,
            mode,
            warnings: Vec::new(),
            alternative_mode: None,
        })
    }

    /// Screens a free-text message for emergency keywords.
    ///
    /// On a hit, writes an audit entry and returns the fixed
    /// language-appropriate emergency instruction for the caller to surface
    /// verbatim. Returns `None` when nothing matched.
    pub fn screen_message(
        &self,
        message: &str,
        language: Language,
        actor: &Actor,
    ) -> Option<&'static str> {
        if !self.detector.detect(message, language) {
            return None;
        }
        self.record(
            actor,
            AuditAction::EmergencyKeyword,
            "critical-symptom phrase detected in free text".to_string(),
        );
        Some(EmergencyDetector::instruction(language))
    }

    /// The other mode, when it is safe for this triage outcome.
    fn safe_alternative(
        &self,
        mode: ConsultationMode,
        level: TriageLevel,
    ) -> Option<ConsultationMode> {
        match mode {
            ConsultationMode::Online => Some(ConsultationMode::Physical),
            ConsultationMode::Physical => {
                gate::check_online_allowed(level)
                    .allowed
                    .then_some(ConsultationMode::Online)
            }
        }
    }

    fn safety_warnings(
        &self,
        zone: Option<&ZoneAssessment>,
        level: TriageLevel,
        mode: ConsultationMode,
        widened: bool,
        specialty: Specialty,
    ) -> Vec<String> {
        let mut warnings = Vec::new();
        if level == TriageLevel::Urgent {
            warnings.push(
                "This case warrants prompt attention; book the earliest available slot."
                    .to_string(),
            );
        }
        if mode == ConsultationMode::Physical {
            if let Some(zone) = zone {
                if !zone.red_flags.is_empty() {
                    let flags: Vec<&str> =
                        zone.red_flags.iter().map(|f| f.as_str()).collect();
                    warnings.push(format!(
                        "Mention these warning signs to the clinician: {}",
                        flags.join(", ")
                    ));
                }
            }
        }
        if widened {
            warnings.push(format!(
                "No {specialty} specialist was available; showing other qualified doctors."
            ));
        }
        warnings
    }

    /// Appends an audit entry, swallowing store failures.
    ///
    /// An audit outage must not stop a clinical decision from reaching the
    /// caller; sustained failures should alert operationally via the error
    /// log.
    fn record(&self, actor: &Actor, action: AuditAction, details: String) {
        let patient_id =
            (actor.role == ActorRole::Patient).then(|| actor.id.clone());
        let entry = AuditEntry::new(actor, action, details, patient_id);
        if let Err(e) = self.audit.append(entry) {
            tracing::error!("failed to append {} audit entry: {}", action, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InMemoryAuditLog;
    use crate::doctors::test_support::doctor;

    fn service() -> (RecommendationService, Arc<InMemoryAuditLog>) {
        let log = Arc::new(InMemoryAuditLog::new());
        let service = RecommendationService::new(
            Arc::new(EngineConfig::default()),
            log.clone(),
        );
        (service, log)
    }

    fn patient() -> Actor {
        Actor {
            id: "patient-1".to_string(),
            role: ActorRole::Patient,
        }
    }

    fn cardiac_emergency_intake() -> IntakeRecord {
        let mut intake = IntakeRecord::default();
        intake.zone = Some("LEFT_PRECORDIAL".to_string());
        intake.emergency = true;
        intake
            .answers
            .insert("severity".to_string(), "9".to_string());
        intake
    }

    fn routine_intake() -> IntakeRecord {
        let mut intake = IntakeRecord::default();
        intake.zone = Some("KNEE".to_string());
        intake
            .answers
            .insert("severity".to_string(), "2".to_string());
        intake
    }

    #[test]
    fn test_online_request_against_emergency_is_blocked_with_audit() {
        let (service, log) = service();
        let pool = vec![doctor("cardio", Specialty::Cardiology)];
        let err = service
            .recommend(
                &pool,
                &cardiac_emergency_intake(),
                ConsultationMode::Online,
                &patient(),
            )
            .expect_err("should block online");
        assert!(matches!(err, EngineError::OnlineBlocked { .. }));
        assert_eq!(log.by_action(AuditAction::OnlineBlocked).len(), 1);
        assert_eq!(log.by_action(AuditAction::EmergencyRedirect).len(), 1);
        // No recommendation entry: no partial list escaped.
        assert!(log.by_action(AuditAction::DoctorRecommendation).is_empty());
    }

    #[test]
    fn test_routine_online_recommendation_selects_specialty_match() {
        let (service, log) = service();
        let pool = vec![
            doctor("generalist", Specialty::GeneralMedicine),
            doctor("ortho", Specialty::Orthopedics),
        ];
        let result = service
            .recommend(&pool, &routine_intake(), ConsultationMode::Online, &patient())
            .expect("routine online should be allowed");
        // The generalist is filtered out once a specialty match exists.
        assert_eq!(result.doctors.len(), 1);
        assert_eq!(result.doctors[0].doctor.id, "ortho");
        assert_eq!(result.doctors[0].score, 15.0);
        assert_eq!(log.by_action(AuditAction::EligibilityFilter).len(), 1);
        assert_eq!(log.by_action(AuditAction::DoctorRecommendation).len(), 1);
    }

    #[test]
    fn test_widened_pool_keeps_all_capable_doctors() {
        let (service, log) = service();
        let pool = vec![
            doctor("generalist", Specialty::GeneralMedicine),
            doctor("gastro", Specialty::Gastroenterology),
        ];
        // Knee complaint wants orthopedics; nobody matches, so the filter
        // widens and the result says so.
        let result = service
            .recommend(&pool, &routine_intake(), ConsultationMode::Online, &patient())
            .expect("widened pool should still recommend");
        assert_eq!(result.doctors.len(), 2);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("orthopedics specialist was available")));
        let filter_entries = log.by_action(AuditAction::EligibilityFilter);
        assert!(filter_entries[0].details.contains("widened: true"));
    }

    #[test]
    fn test_empty_pool_returns_warning_not_error() {
        let (service, _log) = service();
        let result = service
            .recommend(&[], &routine_intake(), ConsultationMode::Online, &patient())
            .expect("empty pool is not an error");
        assert!(result.doctors.is_empty());
        assert!(!result.warnings.is_empty());
        assert_eq!(result.alternative_mode, Some(ConsultationMode::Physical));
    }

    #[test]
    fn test_result_is_sorted_and_bounded() {
        let (service, _log) = service();
        let pool: Vec<Doctor> = (0..9)
            .map(|i| doctor(&format!("d{i}"), Specialty::Orthopedics))
            .collect();
        let result = service
            .recommend(&pool, &routine_intake(), ConsultationMode::Online, &patient())
            .expect("should recommend");
        assert_eq!(result.doctors.len(), 5);
        for pair in result.doctors.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_urgent_zone_physical_mode_attaches_red_flag_warning() {
        let (service, _log) = service();
        let mut intake = IntakeRecord::default();
        intake.zone = Some("RIGHT_LOWER_QUADRANT".to_string());
        let pool = vec![doctor("gastro", Specialty::Gastroenterology)];
        let result = service
            .recommend(&pool, &intake, ConsultationMode::Physical, &patient())
            .expect("physical is always gate-safe");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("APPENDICITIS_PATTERN")));
        assert!(result.warnings.iter().any(|w| w.contains("prompt attention")));
    }

    #[test]
    fn test_both_modes_swallows_online_block() {
        let (service, _log) = service();
        let pool = vec![doctor("cardio", Specialty::Cardiology)];
        let both = service
            .recommend_both_modes(&pool, &cardiac_emergency_intake(), &patient())
            .expect("physical side always computes");
        assert!(both.online.is_none());
        assert!(!both.physical.doctors.is_empty());
        assert_eq!(both.primary_recommendation, ConsultationMode::Physical);
    }

    #[test]
    fn test_both_modes_prefers_online_when_safe() {
        let (service, _log) = service();
        let pool = vec![doctor("ortho", Specialty::Orthopedics)];
        let both = service
            .recommend_both_modes(&pool, &routine_intake(), &patient())
            .expect("should compute both");
        assert!(both.online.is_some());
        assert_eq!(both.primary_recommendation, ConsultationMode::Online);
    }

    #[test]
    fn test_emergency_override_requires_privilege() {
        let (service, log) = service();
        let pool = vec![doctor("cardio", Specialty::Cardiology)];
        let err = service
            .emergency_override(
                &pool,
                &cardiac_emergency_intake(),
                ConsultationMode::Online,
                &patient(),
                "patient requested",
            )
            .expect_err("patients cannot override");
        assert!(matches!(err, EngineError::OverrideNotPermitted { .. }));

        let clinician = Actor {
            id: "dr-oncall".to_string(),
            role: ActorRole::Clinician,
        };
        let result = service
            .emergency_override(
                &pool,
                &cardiac_emergency_intake(),
                ConsultationMode::Online,
                &clinician,
                "remote stabilisation while ambulance en route",
            )
            .expect("clinician override should pass the gate");
        assert!(!result.doctors.is_empty());
        let overrides = log.by_action(AuditAction::EmergencyOverride);
        assert_eq!(overrides.len(), 1);
        assert!(overrides[0].details.contains("ambulance"));
        assert_eq!(overrides[0].actor_id, "dr-oncall");
    }

    #[test]
    fn test_screen_message_logs_and_returns_instruction() {
        let (service, log) = service();
        let hit = service.screen_message(
            "I have crushing chest pain",
            Language::English,
            &patient(),
        );
        assert!(hit.is_some_and(|text| text.contains("emergency")));
        assert_eq!(log.by_action(AuditAction::EmergencyKeyword).len(), 1);

        let miss = service.screen_message("itchy elbow", Language::English, &patient());
        assert!(miss.is_none());
        assert_eq!(log.by_action(AuditAction::EmergencyKeyword).len(), 1);
    }

    #[test]
    fn test_audit_log_grows_monotonically_across_calls() {
        let (service, log) = service();
        let pool = vec![doctor("ortho", Specialty::Orthopedics)];
        let mut last = log.len();
        for _ in 0..3 {
            service
                .recommend(&pool, &routine_intake(), ConsultationMode::Online, &patient())
                .expect("should recommend");
            assert!(log.len() > last);
            last = log.len();
        }
    }
}
