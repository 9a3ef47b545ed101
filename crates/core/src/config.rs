//! Engine runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the
//! services that need it. Nothing in this crate reads environment variables
//! during request handling; that pattern leads to inconsistent behaviour in
//! multi-threaded runtimes and test harnesses.

use crate::constants::DEFAULT_RECOMMENDATION_LIMIT;
use crate::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound on the recommendation limit, to keep result payloads sane.
const MAX_RECOMMENDATION_LIMIT: usize = 25;

/// Deployment-specific additions to the emergency keyword lists.
///
/// Overrides always extend the built-in lists; they can never remove or
/// replace a built-in phrase. The detector must stay high-recall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordOverrides {
    /// Extra English critical-symptom phrases.
    #[serde(default)]
    pub english: Vec<String>,
    /// Extra Spanish critical-symptom phrases.
    #[serde(default)]
    pub spanish: Vec<String>,
}

/// Engine configuration resolved at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    recommendation_limit: usize,
    keyword_overrides: KeywordOverrides,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            keyword_overrides: KeywordOverrides::default(),
        }
    }
}

impl EngineConfig {
    /// Create a new `EngineConfig`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the recommendation limit is
    /// zero or implausibly large, or if any override keyword is blank.
    pub fn new(
        recommendation_limit: usize,
        keyword_overrides: KeywordOverrides,
    ) -> EngineResult<Self> {
        if recommendation_limit == 0 || recommendation_limit > MAX_RECOMMENDATION_LIMIT {
            return Err(EngineError::InvalidInput(format!(
                "recommendation limit must be between 1 and {}, got {}",
                MAX_RECOMMENDATION_LIMIT, recommendation_limit
            )));
        }
        validate_overrides(&keyword_overrides)?;

        Ok(Self {
            recommendation_limit,
            keyword_overrides,
        })
    }

    /// Maximum number of doctors returned per recommendation.
    pub fn recommendation_limit(&self) -> usize {
        self.recommendation_limit
    }

    /// Extra emergency keywords merged into the built-in lists.
    pub fn keyword_overrides(&self) -> &KeywordOverrides {
        &self.keyword_overrides
    }
}

/// Loads keyword overrides from a YAML file.
///
/// The expected document shape is:
///
/// ```yaml
/// english:
///   - crushing pressure
/// spanish:
///   - presión aplastante
/// ```
///
/// # Errors
///
/// Returns `EngineError::KeywordFileRead` if the file cannot be read,
/// `EngineError::KeywordFileParse` if it is not valid YAML of the expected
/// shape, and `EngineError::InvalidInput` if any listed keyword is blank.
pub fn load_keyword_overrides(path: &Path) -> EngineResult<KeywordOverrides> {
    let contents = std::fs::read_to_string(path).map_err(EngineError::KeywordFileRead)?;
    let overrides: KeywordOverrides =
        serde_yaml::from_str(&contents).map_err(EngineError::KeywordFileParse)?;
    validate_overrides(&overrides)?;
    Ok(overrides)
}

fn validate_overrides(overrides: &KeywordOverrides) -> EngineResult<()> {
    let blank = overrides
        .english
        .iter()
        .chain(overrides.spanish.iter())
        .any(|keyword| keyword.trim().is_empty());
    if blank {
        return Err(EngineError::InvalidInput(
            "keyword overrides must not contain blank entries".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_uses_standard_limit() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.recommendation_limit(), DEFAULT_RECOMMENDATION_LIMIT);
        assert!(cfg.keyword_overrides().english.is_empty());
    }

    #[test]
    fn test_new_rejects_zero_limit() {
        let err = EngineConfig::new(0, KeywordOverrides::default())
            .expect_err("should reject zero limit");
        assert!(matches!(err, EngineError::InvalidInput(msg) if msg.contains("limit")));
    }

    #[test]
    fn test_new_rejects_blank_keywords() {
        let overrides = KeywordOverrides {
            english: vec!["  ".to_string()],
            spanish: Vec::new(),
        };
        let err = EngineConfig::new(5, overrides).expect_err("should reject blank keyword");
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_load_keyword_overrides_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "english:\n  - crushing pressure\nspanish:\n  - presión aplastante")
            .expect("write temp file");

        let overrides = load_keyword_overrides(file.path()).expect("should parse");
        assert_eq!(overrides.english, vec!["crushing pressure".to_string()]);
        assert_eq!(overrides.spanish, vec!["presión aplastante".to_string()]);
    }

    #[test]
    fn test_load_keyword_overrides_missing_file_errors() {
        let err = load_keyword_overrides(Path::new("/nonexistent/keywords.yaml"))
            .expect_err("should fail to read");
        assert!(matches!(err, EngineError::KeywordFileRead(_)));
    }

    #[test]
    fn test_load_keyword_overrides_rejects_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "english: 3").expect("write temp file");
        let err = load_keyword_overrides(file.path()).expect_err("should fail to parse");
        assert!(matches!(err, EngineError::KeywordFileParse(_)));
    }
}
