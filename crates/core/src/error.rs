//! Engine error taxonomy.
//!
//! Blocked-mode requests are the only fatal condition a caller of the
//! recommendation flow has to handle; malformed intake input never errors
//! (the scorer and zone base resolve it with documented defaults), and an
//! empty eligible-doctor set is returned as a value, not an error.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An online consultation was requested against an unsafe triage outcome.
    /// Callers must redirect to a physical consultation rather than retry.
    #[error("online consultation blocked: {reason}")]
    OnlineBlocked { reason: String },

    /// An emergency override was attempted by an actor without clinical or
    /// administrative privileges.
    #[error("emergency override not permitted for role {role}")]
    OverrideNotPermitted { role: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read keyword override file: {0}")]
    KeywordFileRead(std::io::Error),

    #[error("failed to parse keyword override file: {0}")]
    KeywordFileParse(serde_yaml::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
