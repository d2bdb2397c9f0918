//! Template data model.

use crate::section_list::SectionList;
use crate::validation::require_text;
use crate::TemplateResult;
use chrono::{DateTime, Utc};
use notecraft_ids::TemplateId;
use notecraft_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Where a template came from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Created by an author in this system.
    #[default]
    Authored,
    /// Converted from a library template; `source_id` is the library's own id.
    Library { source_id: String },
}

/// A named, ordered collection of sections plus metadata.
///
/// Section order is the order content appears in a generated note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: NonEmptyText,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub visit_types: BTreeSet<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub provenance: Provenance,
    #[serde(default)]
    pub sections: SectionList,
}

fn default_active() -> bool {
    true
}

impl Template {
    /// Creates an empty, active, authored template.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Validation` if `name` is blank.
    pub fn new(name: &str) -> TemplateResult<Self> {
        Ok(Self {
            id: TemplateId::new(),
            name: require_text("template name", name)?,
            description: String::new(),
            specialty: String::new(),
            visit_types: BTreeSet::new(),
            is_active: true,
            last_modified: Utc::now(),
            provenance: Provenance::Authored,
            sections: SectionList::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_specialty(mut self, specialty: impl Into<String>) -> Self {
        self.specialty = specialty.into();
        self
    }

    /// Associates a visit type; blank names are ignored.
    pub fn with_visit_type(mut self, visit_type: &str) -> Self {
        let visit_type = visit_type.trim();
        if !visit_type.is_empty() {
            self.visit_types.insert(visit_type.to_owned());
        }
        self
    }

    pub fn is_library(&self) -> bool {
        matches!(self.provenance, Provenance::Library { .. })
    }

    /// Stamps `last_modified` with the current time.
    pub(crate) fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}
