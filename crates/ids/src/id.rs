//! Identifier implementations.

use crate::{IdError, IdResult};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// A UUID that is guaranteed to be in canonical form once constructed.
///
/// # Construction
/// - [`CanonicalId::new`] generates a fresh random identifier.
/// - [`CanonicalId::derive`] computes a name-based identifier under a parent.
/// - [`CanonicalId::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalId(Uuid);

impl Default for CanonicalId {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalId {
    /// Generates a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives a stable identifier from `parent` and `name`.
    ///
    /// The same `(parent, name)` pair always produces the same identifier.
    pub fn derive(parent: &CanonicalId, name: &str) -> Self {
        Self(Uuid::new_v5(&parent.0, name.as_bytes()))
    }

    /// Derives a stable identifier from a free-form key with no parent identifier.
    ///
    /// Used when an external source names things with arbitrary strings (library template ids).
    pub fn derive_from_key(key: &str) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()))
    }

    /// Validates and parses an identifier that must already be canonical.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> IdResult<Self> {
        if !Self::is_canonical(input) {
            return Err(IdError::InvalidInput(format!(
                "id must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| IdError::InvalidInput(format!("invalid id '{}': {}", input, e)))
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// Purely syntactic: exactly 32 bytes, all of `0-9a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for CanonicalId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalId::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CanonicalId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CanonicalId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CanonicalId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Declares a typed wrapper around [`CanonicalId`] so ids of different entities cannot be mixed.
macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(CanonicalId);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn new() -> Self {
                Self(CanonicalId::new())
            }

            /// Derives a stable identifier from a parent identifier and a name.
            pub fn derive(parent: &CanonicalId, name: &str) -> Self {
                Self(CanonicalId::derive(parent, name))
            }

            pub fn parse(input: &str) -> IdResult<Self> {
                CanonicalId::parse(input).map(Self)
            }

            pub fn as_canonical(&self) -> &CanonicalId {
                &self.0
            }
        }

        impl From<CanonicalId> for $name {
            fn from(id: CanonicalId) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

typed_id!(
    /// Identifies a template.
    TemplateId
);
typed_id!(
    /// Identifies a section; unique within its template.
    SectionId
);
typed_id!(
    /// Identifies one entry of a list-shaped section.
    ItemId
);
typed_id!(
    /// Identifies a typed field attached to a section.
    FieldId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_canonical_ids() {
        let id = CanonicalId::new();
        let rendered = id.to_string();
        assert_eq!(rendered.len(), 32);
        assert!(CanonicalId::is_canonical(&rendered));
    }

    #[test]
    fn parse_accepts_canonical_form() {
        let canonical = "550e8400e29b41d4a716446655440000";
        let id = CanonicalId::parse(canonical).expect("canonical id");
        assert_eq!(id.to_string(), canonical);
    }

    #[test]
    fn parse_rejects_non_canonical_forms() {
        for input in [
            "550e8400-e29b-41d4-a716-446655440000",
            "550E8400E29B41D4A716446655440000",
            "550e8400e29b41d4a71644665544000",
            "550e8400e29b41d4a71644665544000g",
            "",
        ] {
            assert!(
                matches!(CanonicalId::parse(input), Err(IdError::InvalidInput(_))),
                "expected rejection for {input:?}"
            );
        }
    }

    #[test]
    fn derive_is_stable_and_name_sensitive() {
        let parent = CanonicalId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let a = CanonicalId::derive(&parent, "section-0");
        let b = CanonicalId::derive(&parent, "section-0");
        let c = CanonicalId::derive(&parent, "section-1");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(
            CanonicalId::derive_from_key("lib-soap"),
            CanonicalId::derive_from_key("lib-soap")
        );
    }

    #[test]
    fn typed_ids_serialise_as_plain_strings() {
        let id = SectionId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");

        let back: SectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        assert!(serde_json::from_str::<SectionId>("\"not-an-id\"").is_err());
    }

    #[test]
    fn fresh_typed_ids_are_distinct() {
        assert_ne!(SectionId::new(), SectionId::new());
    }
}
