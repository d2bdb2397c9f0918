//! Input validation utilities.
//!
//! Everything an author types passes through here before it reaches a template, so that the
//! collection engine only ever stores labels that are non-empty.

use crate::{TemplateError, TemplateResult};
use notecraft_types::NonEmptyText;

/// Validates that `value` contains non-whitespace text, returning it trimmed.
///
/// # Errors
///
/// Returns `TemplateError::Validation` naming `field` if the value is blank.
pub fn require_text(field: &str, value: &str) -> TemplateResult<NonEmptyText> {
    NonEmptyText::new(value)
        .map_err(|_| TemplateError::Validation(format!("{field} cannot be empty")))
}

/// Validates list entries, returning them trimmed.
///
/// # Errors
///
/// Returns `TemplateError::Validation` if any entry is blank.
pub fn require_items(items: &[String]) -> TemplateResult<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let trimmed = item.trim();
            if trimmed.is_empty() {
                return Err(TemplateError::Validation(format!(
                    "item {} cannot be empty",
                    index + 1
                )));
            }
            Ok(trimmed.to_owned())
        })
        .collect()
}

/// Validates that `index` addresses an existing position in a list of `len` entries.
pub fn require_index(name: &str, index: usize, len: usize) -> TemplateResult<()> {
    if index >= len {
        return Err(TemplateError::Validation(format!(
            "{name} {index} is out of range for {len} sections"
        )));
    }
    Ok(())
}
