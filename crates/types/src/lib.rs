//! Validated text primitives shared across the Notecraft crates.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// Used for every label a clinician must be able to see: template names, section names and
/// field labels. The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Builds a `NonEmptyText`, substituting `fallback` when `input` is blank.
    ///
    /// `fallback` itself must be non-blank; a blank fallback yields a single `"?"`.
    pub fn or_fallback(input: impl AsRef<str>, fallback: impl AsRef<str>) -> Self {
        Self::new(input)
            .or_else(|_| Self::new(fallback))
            .unwrap_or_else(|_| Self("?".to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a copy of this text with `suffix` appended.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}{}", self.0, suffix))
    }

    pub fn into_inner(self) -> String {
        self.0
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

impl std::str::FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_input() {
        let text = NonEmptyText::new("  Chief Complaint \n").unwrap();
        assert_eq!(text.as_str(), "Chief Complaint");
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn fallback_used_only_when_blank() {
        assert_eq!(NonEmptyText::or_fallback("Plan", "Section 1").as_str(), "Plan");
        assert_eq!(NonEmptyText::or_fallback(" ", "Section 1").as_str(), "Section 1");
        assert_eq!(NonEmptyText::or_fallback("", "").as_str(), "?");
    }

    #[test]
    fn deserialize_rejects_blank_strings() {
        let ok: NonEmptyText = serde_json::from_str("\"Assessment\"").unwrap();
        assert_eq!(ok.as_str(), "Assessment");

        let err = serde_json::from_str::<NonEmptyText>("\"  \"").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn suffix_is_appended_verbatim() {
        let text = NonEmptyText::new("Plan").unwrap();
        assert_eq!(text.with_suffix(" (Copy)").as_str(), "Plan (Copy)");
    }
}
