//! Field catalog and field-mapping engine.
//!
//! Infers which structured-record fields a template implicates from its section names and
//! typed-field labels. Matching is deliberately simple: each catalog field has a list of
//! lowercase trigger substrings, and a field is implicated when any trigger appears anywhere in
//! the lowercased corpus. This over-matches (every "... History" section implicates History of
//! Present Illness) and under-matches synonyms it has no trigger for.
//!
//! The rules are data ([`FIELD_RULES`]) and the comparison sits behind [`FieldMatcher`], so a
//! different matcher can be plugged in without touching the engine.

use crate::template::Template;
use serde::{Deserialize, Serialize};

/// Structured-record fields that sections can be mapped onto, in catalog declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EhrField {
    #[serde(rename = "Chief Complaint")]
    ChiefComplaint,
    #[serde(rename = "History of Present Illness")]
    HistoryOfPresentIllness,
    #[serde(rename = "Review of Systems")]
    ReviewOfSystems,
    #[serde(rename = "Allergies")]
    Allergies,
    #[serde(rename = "Medications")]
    Medications,
    #[serde(rename = "Family History")]
    FamilyHistory,
    #[serde(rename = "Social History")]
    SocialHistory,
    #[serde(rename = "Vital Signs")]
    VitalSigns,
    #[serde(rename = "Physical Examination")]
    PhysicalExamination,
    #[serde(rename = "Assessment")]
    Assessment,
    #[serde(rename = "Plan")]
    Plan,
}

impl EhrField {
    pub const ALL: [EhrField; 11] = [
        EhrField::ChiefComplaint,
        EhrField::HistoryOfPresentIllness,
        EhrField::ReviewOfSystems,
        EhrField::Allergies,
        EhrField::Medications,
        EhrField::FamilyHistory,
        EhrField::SocialHistory,
        EhrField::VitalSigns,
        EhrField::PhysicalExamination,
        EhrField::Assessment,
        EhrField::Plan,
    ];

    /// Display name, as shown to users and written to mappings.
    pub fn name(self) -> &'static str {
        match self {
            EhrField::ChiefComplaint => "Chief Complaint",
            EhrField::HistoryOfPresentIllness => "History of Present Illness",
            EhrField::ReviewOfSystems => "Review of Systems",
            EhrField::Allergies => "Allergies",
            EhrField::Medications => "Medications",
            EhrField::FamilyHistory => "Family History",
            EhrField::SocialHistory => "Social History",
            EhrField::VitalSigns => "Vital Signs",
            EhrField::PhysicalExamination => "Physical Examination",
            EhrField::Assessment => "Assessment",
            EhrField::Plan => "Plan",
        }
    }
}

impl std::fmt::Display for EhrField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Trigger substrings (lowercase) that implicate one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldRule {
    pub field: EhrField,
    pub triggers: &'static [&'static str],
}

/// Default rule table, one rule per field in [`EhrField::ALL`] order.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        field: EhrField::ChiefComplaint,
        triggers: &["chief complaint"],
    },
    FieldRule {
        field: EhrField::HistoryOfPresentIllness,
        triggers: &["history", "hpi"],
    },
    FieldRule {
        field: EhrField::ReviewOfSystems,
        triggers: &["review", "systems"],
    },
    FieldRule {
        field: EhrField::Allergies,
        triggers: &["allerg"],
    },
    FieldRule {
        field: EhrField::Medications,
        triggers: &["medication", "prescri"],
    },
    FieldRule {
        field: EhrField::FamilyHistory,
        triggers: &["family"],
    },
    FieldRule {
        field: EhrField::SocialHistory,
        triggers: &["social"],
    },
    FieldRule {
        field: EhrField::VitalSigns,
        triggers: &["vital"],
    },
    FieldRule {
        field: EhrField::PhysicalExamination,
        triggers: &["exam", "physical"],
    },
    FieldRule {
        field: EhrField::Assessment,
        triggers: &["assess", "diagnosis"],
    },
    FieldRule {
        field: EhrField::Plan,
        triggers: &["plan", "treatment"],
    },
];

/// Decides whether a rule fires for a corpus.
pub trait FieldMatcher {
    /// `corpus` is lowercase; one line per section name or field label.
    fn matches(&self, corpus: &str, rule: &FieldRule) -> bool;
}

/// Fires when any trigger is a substring of the corpus.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubstringMatcher;

impl FieldMatcher for SubstringMatcher {
    fn matches(&self, corpus: &str, rule: &FieldRule) -> bool {
        rule.triggers.iter().any(|trigger| corpus.contains(trigger))
    }
}

/// Field-mapping engine: a rule table plus a matcher.
#[derive(Clone, Debug)]
pub struct FieldMapper<M = SubstringMatcher> {
    rules: Vec<FieldRule>,
    matcher: M,
}

impl Default for FieldMapper<SubstringMatcher> {
    fn default() -> Self {
        Self::new(FIELD_RULES.to_vec(), SubstringMatcher)
    }
}

impl<M: FieldMatcher> FieldMapper<M> {
    /// Builds a mapper. Output order follows `rules` order.
    pub fn new(rules: Vec<FieldRule>, matcher: M) -> Self {
        Self { rules, matcher }
    }

    /// Returns the implicated fields, deduplicated, in rule order.
    ///
    /// A template with no sections, or whose text matches no trigger, yields an empty list.
    pub fn infer(&self, template: &Template) -> Vec<EhrField> {
        let corpus = corpus(template);
        if corpus.is_empty() {
            return Vec::new();
        }

        let mut fields: Vec<EhrField> = Vec::new();
        for rule in &self.rules {
            if !fields.contains(&rule.field) && self.matcher.matches(&corpus, rule) {
                fields.push(rule.field);
            }
        }
        fields
    }
}

/// Lowercased section names and typed-field labels, one per line.
///
/// Lines keep a trigger from matching across the boundary between two names.
pub fn corpus(template: &Template) -> String {
    let mut lines: Vec<String> = Vec::new();
    for section in template.sections.iter() {
        lines.push(section.name.as_str().to_lowercase());
        for field in &section.fields {
            lines.push(field.label.as_str().to_lowercase());
        }
    }
    lines.join("\n")
}

/// Infers fields with the default rules and substring matcher.
pub fn infer_fields(template: &Template) -> Vec<EhrField> {
    FieldMapper::default().infer(template)
}
