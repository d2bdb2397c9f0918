//! Library template wire model.
//!
//! Shape of one library item:
//!
//! ```yaml
//! id: "lib-soap-general"
//! title: "SOAP Note"
//! specialty: "General Practice"
//! type: "Follow-up"
//! sections:
//!   - name: "Allergies"
//!     type: "bulleted_list"
//!     description: "Known allergies and reactions"
//! ```
//!
//! Every field except `id` is optional so that minimal catalog entries still parse; unknown keys
//! are rejected.

use crate::LibraryError;
use serde::{Deserialize, Serialize};

/// Section `type` strings treated as list-shaped.
const LIST_SHAPED_TYPES: &[&str] = &[
    "bulleted_list",
    "bullet_list",
    "numbered_list",
    "checklist",
    "exam_list",
    "list",
];

/// One template as published by the library.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LibraryTemplate {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(rename = "type", default)]
    pub template_type: String,
    #[serde(default)]
    pub sections: Vec<LibrarySection>,
}

/// One section of a library template.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LibrarySection {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub section_type: String,
    #[serde(default)]
    pub description: String,
}

impl LibrarySection {
    /// Returns the section type lowercased with spaces and hyphens folded to `_`.
    ///
    /// `"Bulleted List"`, `"bulleted-list"` and `"bulleted_list"` all normalise to
    /// `"bulleted_list"`.
    pub fn normalised_type(&self) -> String {
        self.section_type
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect()
    }

    /// Returns true if the source section holds a list of entries rather than prose.
    pub fn is_list_shaped(&self) -> bool {
        let normalised = self.normalised_type();
        LIST_SHAPED_TYPES.contains(&normalised.as_str())
    }
}

/// Strictly parse YAML holding either one library template or a sequence of them.
///
/// Uses `serde_path_to_error` to report the failing path (e.g. `[0].sections[2].type`).
pub(crate) fn parse_yaml(yaml_text: &str) -> Result<Vec<LibraryTemplate>, LibraryError> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml_text)?;
    if value.is_mapping() {
        let single: LibraryTemplate =
            serde_path_to_error::deserialize(value).map_err(schema_mismatch)?;
        return Ok(vec![single]);
    }
    serde_path_to_error::deserialize(value).map_err(schema_mismatch)
}

/// Strictly parse JSON holding either one library template or an array of them.
pub(crate) fn parse_json(json_text: &str) -> Result<Vec<LibraryTemplate>, LibraryError> {
    let value: serde_json::Value = serde_json::from_str(json_text)?;
    if value.is_object() {
        let single: LibraryTemplate =
            serde_path_to_error::deserialize(value).map_err(schema_mismatch)?;
        return Ok(vec![single]);
    }
    serde_path_to_error::deserialize(value).map_err(schema_mismatch)
}

fn schema_mismatch<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> LibraryError {
    let path = err.path().to_string();
    let source = err.into_inner();
    let path = if path.is_empty() || path == "." {
        "<root>"
    } else {
        path.as_str()
    };
    LibraryError::Translation(format!("library template schema mismatch at {path}: {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"- id: "lib-soap-general"
  title: "SOAP Note"
  specialty: "General Practice"
  type: "Follow-up"
  sections:
    - name: "Chief Complaint"
      type: "paragraph"
      description: "Reason for visit"
    - name: "Allergies"
      type: "bulleted_list"
      description: "Known allergies and reactions"
- id: "lib-minimal"
"#;

    #[test]
    fn parses_sample_yaml() {
        let templates = parse_yaml(SAMPLE_YAML).expect("parse yaml");
        assert_eq!(templates.len(), 2);

        let soap = &templates[0];
        assert_eq!(soap.title, "SOAP Note");
        assert_eq!(soap.template_type, "Follow-up");
        assert_eq!(soap.sections.len(), 2);
        assert!(!soap.sections[0].is_list_shaped());
        assert!(soap.sections[1].is_list_shaped());

        let minimal = &templates[1];
        assert_eq!(minimal.id, "lib-minimal");
        assert!(minimal.title.is_empty());
        assert!(minimal.sections.is_empty());
    }

    #[test]
    fn parses_json_array() {
        let json = r#"[{"id": "lib-1", "title": "Intake", "specialty": "", "type": "New Patient",
            "sections": [{"name": "Exam", "type": "exam_list", "description": ""}]}]"#;
        let templates = parse_json(json).expect("parse json");
        assert_eq!(templates[0].sections[0].section_type, "exam_list");
    }

    #[test]
    fn accepts_a_single_template() {
        let yaml = parse_yaml("id: lib-1\ntitle: Intake\n").expect("single yaml template");
        assert_eq!(yaml.len(), 1);
        assert_eq!(yaml[0].title, "Intake");

        let json = parse_json(r#"{"id": "lib-2"}"#).expect("single json template");
        assert_eq!(json[0].id, "lib-2");
    }

    #[test]
    fn rejects_unknown_keys_with_path() {
        let yaml = r#"- id: "lib-1"
  sections:
    - name: "Plan"
      colour: "blue"
"#;
        let err = parse_yaml(yaml).expect_err("should reject unknown key");
        match err {
            LibraryError::Translation(msg) => {
                assert!(msg.contains("colour"));
                assert!(msg.contains("sections"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_id() {
        let err = parse_json(r#"[{"title": "No id"}]"#).expect_err("id is required");
        assert!(matches!(err, LibraryError::Translation(msg) if msg.contains("id")));
    }

    #[test]
    fn normalises_type_spellings() {
        for spelling in ["Bulleted List", "bulleted-list", " bulleted_list "] {
            let section = LibrarySection {
                name: "Allergies".into(),
                section_type: spelling.into(),
                description: String::new(),
            };
            assert_eq!(section.normalised_type(), "bulleted_list");
            assert!(section.is_list_shaped());
        }
    }
}
