//! Validated value types shared across the teletriage engine.
//!
//! These types enforce their invariants at construction time so that the
//! decision-support code can rely on them without re-validating at every call
//! site.

/// Errors that can occur when creating validated value types.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// A rating was outside the supported 0.0–5.0 range
    #[error("rating must be between 0.0 and 5.0, got {0}")]
    RatingOutOfRange(f64),
}

/// A string type that guarantees non-empty content.
///
/// Wraps a `String` and ensures it contains at least one non-whitespace
/// character. Input is trimmed of leading and trailing whitespace during
/// construction. Used for fields that are meaningless when blank, such as a
/// doctor's display name or an audit actor identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the
    /// trimmed result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A doctor rating aggregate, bounded to the 0.0–5.0 star scale.
///
/// The directory service supplies ratings as plain floats; this wrapper
/// rejects out-of-range and non-finite values once, at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rating(f64);

impl Rating {
    /// Creates a new `Rating`, validating the 0.0–5.0 range.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::RatingOutOfRange` if the value is not finite or
    /// falls outside 0.0–5.0.
    pub fn new(value: f64) -> Result<Self, TypesError> {
        if !value.is_finite() || !(0.0..=5.0).contains(&value) {
            return Err(TypesError::RatingOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// A neutral rating for doctors with no reviews yet.
    pub fn unrated() -> Self {
        Self(0.0)
    }

    /// Returns the rating value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl serde::Serialize for Rating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Rating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Rating::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_and_accepts() {
        let text = NonEmptyText::new("  Dr Adeyemi  ").expect("should accept");
        assert_eq!(text.as_str(), "Dr Adeyemi");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace_only() {
        let err = NonEmptyText::new("   ").expect_err("should reject whitespace");
        assert!(matches!(err, TypesError::Empty));
    }

    #[test]
    fn test_rating_accepts_bounds() {
        assert!(Rating::new(0.0).is_ok());
        assert!(Rating::new(5.0).is_ok());
        assert!(Rating::new(4.3).is_ok());
    }

    #[test]
    fn test_rating_rejects_out_of_range() {
        let err = Rating::new(5.1).expect_err("should reject > 5");
        assert!(matches!(err, TypesError::RatingOutOfRange(_)));
        assert!(Rating::new(-0.1).is_err());
        assert!(Rating::new(f64::NAN).is_err());
    }

    #[test]
    fn test_rating_serde_round_trip_validates() {
        let parsed: Result<Rating, _> = serde_json::from_str("7.0");
        assert!(parsed.is_err());
    }
}
