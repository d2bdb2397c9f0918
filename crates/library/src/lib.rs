//! Template library wire/boundary support.
//!
//! Library templates come from an external catalog and arrive as YAML or JSON documents. This
//! crate owns their strict wire model and parsing only. Conversion into the canonical template
//! shape lives in `notecraft-core`, which depends on this crate (never the reverse).

pub mod wire;

pub use wire::{LibrarySection, LibraryTemplate};

use thiserror::Error;

/// Errors returned by the `notecraft-library` boundary crate.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Parse a YAML sequence of library templates.
pub fn read_library_yaml(yaml: &str) -> Result<Vec<LibraryTemplate>, LibraryError> {
    wire::parse_yaml(yaml)
}

/// Parse a JSON array of library templates.
pub fn read_library_json(json: &str) -> Result<Vec<LibraryTemplate>, LibraryError> {
    wire::parse_json(json)
}

/// Parse library templates, choosing the format from a file name.
///
/// Names ending in `.json` are parsed as JSON; everything else as YAML (a superset of JSON).
pub fn read_library(file_name: &str, text: &str) -> Result<Vec<LibraryTemplate>, LibraryError> {
    if file_name.to_ascii_lowercase().ends_with(".json") {
        read_library_json(text)
    } else {
        read_library_yaml(text)
    }
}

/// Write library templates back out as YAML.
pub fn write_library_yaml(templates: &[LibraryTemplate]) -> Result<String, LibraryError> {
    Ok(serde_yaml::to_string(templates)?)
}
