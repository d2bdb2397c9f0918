//! Canonical identifiers for templates and their parts.
//!
//! Every identifier in Notecraft is an opaque UUID rendered in a *canonical* form:
//! **32 lowercase hexadecimal characters** (no hyphens), e.g.
//! `550e8400e29b41d4a716446655440000`.
//!
//! Identifiers are either:
//! - freshly generated (UUID v4) when an author creates or duplicates something, or
//! - derived (UUID v5) from a parent identifier and a name, which makes conversions such as
//!   library import deterministic: the same input always yields the same ids.
//!
//! Externally supplied identifiers must already be canonical. Uppercase, hyphenated, wrong
//! length or non-hex values are rejected by [`CanonicalId::parse`].

mod id;

pub use id::{CanonicalId, FieldId, ItemId, SectionId, TemplateId};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
