//! Append-only, tamper-evident audit trail of engine decisions.
//!
//! Every gating, filtering, and ranking decision is recorded as an
//! [`AuditEntry`]. Entries are write-once and the log as a whole is
//! append-only: nothing in this engine edits or deletes an entry. Each entry
//! carries an integrity token derived deterministically from its content, so
//! later mutation of stored content is detectable by recomputation. The
//! token is tamper evidence, not a cryptographic signature.
//!
//! The store behind the log is an external concern; [`InMemoryAuditLog`] is
//! the reference implementation and the substitute used in tests. Appends
//! are serialised behind a mutex so concurrent decisions cannot interleave
//! within a single entry.

use crate::constants::INTEGRITY_TOKEN_LEN;
use crate::{Actor, ActorRole};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Mutex;
use uuid::Uuid;

/// The fixed set of auditable decision points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Eligibility filter ran over a doctor pool.
    EligibilityFilter,
    /// An online consultation request was refused by the safety gate.
    OnlineBlocked,
    /// The caller was redirected to emergency services.
    EmergencyRedirect,
    /// A ranked doctor recommendation was produced.
    DoctorRecommendation,
    /// An emergency keyword was detected in free text.
    EmergencyKeyword,
    /// A privileged actor bypassed the safety gate.
    EmergencyOverride,
}

impl AuditAction {
    /// Canonical wire identifier for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::EligibilityFilter => "ELIGIBILITY_FILTER",
            AuditAction::OnlineBlocked => "ONLINE_BLOCKED",
            AuditAction::EmergencyRedirect => "EMERGENCY_REDIRECT",
            AuditAction::DoctorRecommendation => "DOCTOR_RECOMMENDATION",
            AuditAction::EmergencyKeyword => "EMERGENCY_KEYWORD",
            AuditAction::EmergencyOverride => "EMERGENCY_OVERRIDE",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Content fields covered by the integrity token, in canonical order.
#[derive(Serialize)]
struct TokenContent<'a> {
    timestamp: &'a str,
    actor_id: &'a str,
    actor_role: ActorRole,
    action: AuditAction,
    details: &'a str,
    patient_id: Option<&'a str>,
}

/// One write-once record of an engine decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub actor_id: String,
    pub actor_role: ActorRole,
    pub action: AuditAction,
    pub details: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    /// Deterministic digest of the other content fields.
    pub integrity_token: String,
}

impl AuditEntry {
    /// Creates a new entry stamped with the current time and its integrity
    /// token.
    pub fn new(
        actor: &Actor,
        action: AuditAction,
        details: impl Into<String>,
        patient_id: Option<String>,
    ) -> Self {
        let timestamp = Utc::now();
        let details = details.into();
        let integrity_token = compute_token(
            timestamp,
            &actor.id,
            actor.role,
            action,
            &details,
            patient_id.as_deref(),
        );
        AuditEntry {
            id: Uuid::new_v4(),
            timestamp,
            actor_id: actor.id.clone(),
            actor_role: actor.role,
            action,
            details,
            patient_id,
            integrity_token,
        }
    }

    /// Recomputes the integrity token and compares it with the stored one.
    ///
    /// Returns `false` when any content field has been mutated since the
    /// entry was created.
    pub fn verify(&self) -> bool {
        let expected = compute_token(
            self.timestamp,
            &self.actor_id,
            self.actor_role,
            self.action,
            &self.details,
            self.patient_id.as_deref(),
        );
        expected == self.integrity_token
    }
}

fn compute_token(
    timestamp: DateTime<Utc>,
    actor_id: &str,
    actor_role: ActorRole,
    action: AuditAction,
    details: &str,
    patient_id: Option<&str>,
) -> String {
    let timestamp_text = timestamp.to_rfc3339();
    let content = TokenContent {
        timestamp: &timestamp_text,
        actor_id,
        actor_role,
        action,
        details,
        patient_id,
    };
    // Struct field order fixes the canonical rendering.
    let canonical =
        serde_json::to_string(&content).unwrap_or_else(|_| format!("{actor_id}:{action}"));
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)[..INTEGRITY_TOKEN_LEN].to_string()
}

/// Errors from the audit store.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit store unavailable: {0}")]
    StoreUnavailable(String),
}

/// An append-only audit sink with pure read filters.
///
/// Implementations must serialise appends per store; queries never mutate.
pub trait AuditLog: Send + Sync {
    /// Appends one entry. Never overwrites or deletes.
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;

    /// Entries recorded by the given actor, in append order.
    fn by_actor(&self, actor_id: &str) -> Vec<AuditEntry>;

    /// Entries with the given action tag, in append order.
    fn by_action(&self, action: AuditAction) -> Vec<AuditEntry>;

    /// Entries whose timestamp falls in `[from, to)`, in append order.
    fn between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<AuditEntry>;

    /// Number of entries appended so far.
    fn len(&self) -> usize;

    /// Whether the log is still empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutex-serialised in-memory audit log.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&[AuditEntry]) -> T) -> T {
        match self.entries.lock() {
            Ok(entries) => f(&entries),
            // A poisoned lock means a panic elsewhere; reads still serve
            // whatever was committed.
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AuditError::StoreUnavailable(e.to_string()))?;
        entries.push(entry);
        Ok(())
    }

    fn by_actor(&self, actor_id: &str) -> Vec<AuditEntry> {
        self.read(|entries| {
            entries
                .iter()
                .filter(|e| e.actor_id == actor_id)
                .cloned()
                .collect()
        })
    }

    fn by_action(&self, action: AuditAction) -> Vec<AuditEntry> {
        self.read(|entries| {
            entries
                .iter()
                .filter(|e| e.action == action)
                .cloned()
                .collect()
        })
    }

    fn between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<AuditEntry> {
        self.read(|entries| {
            entries
                .iter()
                .filter(|e| e.timestamp >= from && e.timestamp < to)
                .cloned()
                .collect()
        })
    }

    fn len(&self) -> usize {
        self.read(|entries| entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn actor() -> Actor {
        Actor {
            id: "engine".to_string(),
            role: ActorRole::System,
        }
    }

    #[test]
    fn test_entry_verifies_when_untouched() {
        let entry = AuditEntry::new(
            &actor(),
            AuditAction::DoctorRecommendation,
            "recommended 3 doctors",
            Some("patient-1".to_string()),
        );
        assert!(entry.verify());
        assert_eq!(entry.integrity_token.len(), INTEGRITY_TOKEN_LEN);
    }

    #[test]
    fn test_tampered_entry_fails_verification() {
        let entry = AuditEntry::new(&actor(), AuditAction::OnlineBlocked, "blocked", None);

        let mut tampered = entry.clone();
        tampered.details = "allowed".to_string();
        assert!(!tampered.verify());

        let mut tampered = entry.clone();
        tampered.actor_id = "someone-else".to_string();
        assert!(!tampered.verify());

        let mut tampered = entry.clone();
        tampered.patient_id = Some("patient-2".to_string());
        assert!(!tampered.verify());

        assert!(entry.verify());
    }

    #[test]
    fn test_log_length_is_monotonically_non_decreasing() {
        let log = InMemoryAuditLog::new();
        let mut previous = log.len();
        for i in 0..5 {
            log.append(AuditEntry::new(
                &actor(),
                AuditAction::EligibilityFilter,
                format!("pass {i}"),
                None,
            ))
            .expect("append should succeed");
            assert!(log.len() > previous);
            previous = log.len();
        }
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn test_query_filters() {
        let log = InMemoryAuditLog::new();
        let patient = Actor {
            id: "patient-9".to_string(),
            role: ActorRole::Patient,
        };
        log.append(AuditEntry::new(
            &actor(),
            AuditAction::EligibilityFilter,
            "pool 5 -> 2",
            None,
        ))
        .expect("append");
        log.append(AuditEntry::new(
            &patient,
            AuditAction::OnlineBlocked,
            "blocked",
            None,
        ))
        .expect("append");

        assert_eq!(log.by_actor("patient-9").len(), 1);
        assert_eq!(log.by_action(AuditAction::EligibilityFilter).len(), 1);

        let now = Utc::now();
        assert_eq!(
            log.between(now - Duration::minutes(1), now + Duration::minutes(1))
                .len(),
            2
        );
        assert!(log
            .between(now + Duration::minutes(1), now + Duration::minutes(2))
            .is_empty());
    }
}
