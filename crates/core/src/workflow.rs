//! Workflow step deriver and field mappings.
//!
//! A template expands into a fixed script for entering a note into the structured record:
//!
//! ```text
//! trigger  Access record system
//! action   Open patient record
//! action   Navigate to <section> section      } per section, in template order
//! action   Enter <field or item label>        } per field, then per item
//! action   Save patient record
//! ```
//!
//! Step ids are derived from what a step refers to, never from its position, so user mappings
//! keyed by step id survive reordering and insertion of unrelated sections.

use crate::constants::{
    STEP_ACCESS_SYSTEM_ID, STEP_ACCESS_SYSTEM_NAME, STEP_OPEN_RECORD_ID, STEP_OPEN_RECORD_NAME,
    STEP_SAVE_RECORD_ID, STEP_SAVE_RECORD_NAME,
};
use crate::fields::{infer_fields, EhrField};
use crate::template::Template;
use notecraft_ids::{CanonicalId, SectionId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    Trigger,
    Action,
    Condition,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    pub step_type: StepType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<SectionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_field_id: Option<CanonicalId>,
    pub is_editable: bool,
}

impl WorkflowStep {
    fn fixed(id: &str, name: &str, step_type: StepType) -> Self {
        Self {
            id: id.to_owned(),
            name: name.to_owned(),
            step_type,
            section_id: None,
            template_field_id: None,
            is_editable: false,
        }
    }
}

/// Expands `template` into its ordered automation steps.
///
/// Never fails; a template without sections yields the three fixed steps.
pub fn derive_workflow_steps(template: &Template) -> Vec<WorkflowStep> {
    let mut steps = vec![
        WorkflowStep::fixed(
            STEP_ACCESS_SYSTEM_ID,
            STEP_ACCESS_SYSTEM_NAME,
            StepType::Trigger,
        ),
        WorkflowStep::fixed(STEP_OPEN_RECORD_ID, STEP_OPEN_RECORD_NAME, StepType::Action),
    ];

    for section in template.sections.iter() {
        steps.push(WorkflowStep {
            id: format!("navigate-{}", section.id),
            name: format!("Navigate to {} section", section.name),
            step_type: StepType::Action,
            section_id: Some(section.id),
            template_field_id: None,
            is_editable: true,
        });

        for entry in section.entries() {
            steps.push(WorkflowStep {
                id: format!("enter-{}-{}", section.id, entry.id),
                name: format!("Enter {}", entry.label),
                step_type: StepType::Action,
                section_id: Some(section.id),
                template_field_id: Some(entry.id),
                is_editable: true,
            });
        }
    }

    steps.push(WorkflowStep::fixed(
        STEP_SAVE_RECORD_ID,
        STEP_SAVE_RECORD_NAME,
        StepType::Action,
    ));
    steps
}

/// Derived association between a template and the record it fills in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub template_type: String,
    pub ehr_fields: Vec<EhrField>,
    pub workflow_steps: Vec<WorkflowStep>,
}

impl FieldMapping {
    /// Builds the mapping for `template` with the default field rules.
    pub fn for_template(template: &Template) -> Self {
        Self {
            template_type: template.name.as_str().to_owned(),
            ehr_fields: infer_fields(template),
            workflow_steps: derive_workflow_steps(template),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_catalog_entry;
    use crate::collection::{add_section, reorder, NewSection};

    fn catalog_template(names: &[&str]) -> Template {
        names.iter().fold(Template::new("Visit").unwrap(), |t, name| {
            let entry = find_catalog_entry(name).expect("catalog entry");
            add_section(&t, NewSection::FromCatalog(entry)).unwrap()
        })
    }

    #[test]
    fn empty_template_yields_skeleton() {
        let steps = derive_workflow_steps(&Template::new("Empty").unwrap());
        let names: Vec<&str> = steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Access record system", "Open patient record", "Save patient record"]
        );
        assert_eq!(steps[0].step_type, StepType::Trigger);
        assert!(steps.iter().all(|s| !s.is_editable));
    }

    #[test]
    fn step_count_matches_sections_and_entries() {
        let template = catalog_template(&["Chief Complaint", "Physical Exam", "Plan"]);
        let entries: usize = template
            .sections
            .iter()
            .map(|section| 1 + section.entries().count())
            .sum();

        let steps = derive_workflow_steps(&template);
        assert_eq!(steps.len(), 2 + entries + 1);
    }

    #[test]
    fn section_steps_follow_template_order() {
        let template = catalog_template(&["Physical Exam", "Assessment"]);
        let steps = derive_workflow_steps(&template);

        assert_eq!(steps[2].name, "Navigate to Physical Exam section");
        assert_eq!(steps[3].name, "Enter General");
        let exam = template.sections.at(0).unwrap();
        let first_item = &exam.body.items().unwrap()[0];
        assert_eq!(steps[3].template_field_id, Some(*first_item.id.as_canonical()));
        assert_eq!(steps[3].section_id, Some(exam.id));

        let navigate_assessment = steps
            .iter()
            .position(|s| s.name == "Navigate to Assessment section")
            .unwrap();
        assert_eq!(navigate_assessment, steps.len() - 2);
        assert_eq!(steps.last().unwrap().name, "Save patient record");
    }

    #[test]
    fn derivation_is_deterministic() {
        let template = catalog_template(&["Review of Systems", "Allergies", "Plan"]);
        let copy = template.clone();
        assert_eq!(derive_workflow_steps(&template), derive_workflow_steps(&copy));
    }

    #[test]
    fn step_ids_survive_reordering() {
        let template = catalog_template(&["Chief Complaint", "Physical Exam"]);
        let reordered = reorder(&template, 0, 1).unwrap();

        let mut before: Vec<String> = derive_workflow_steps(&template)
            .into_iter()
            .map(|s| s.id)
            .collect();
        let mut after: Vec<String> = derive_workflow_steps(&reordered)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_ne!(before, after);
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn step_ids_are_unique() {
        let template = catalog_template(&["Review of Systems", "Physical Exam"]);
        let steps = derive_workflow_steps(&template);
        let mut ids: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), steps.len());
    }

    #[test]
    fn mapping_combines_fields_and_steps() {
        let template = catalog_template(&["Chief Complaint", "Assessment", "Plan"]);
        let mapping = FieldMapping::for_template(&template);

        assert_eq!(mapping.template_type, "Visit");
        assert_eq!(
            mapping.ehr_fields,
            vec![EhrField::ChiefComplaint, EhrField::Assessment, EhrField::Plan]
        );
        assert_eq!(mapping.workflow_steps.len(), 6);

        let json = mapping.to_json_pretty().unwrap();
        assert!(json.contains("\"Chief Complaint\""));
        assert!(json.contains("\"step_type\": \"trigger\""));
    }
}
