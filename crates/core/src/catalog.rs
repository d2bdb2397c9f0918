//! Predefined sections offered by "add from catalog".

use crate::section::SectionType;

/// A predefined section an author can add to a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub section_type: SectionType,
    pub default_items: &'static [&'static str],
}

pub const SECTION_CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Visit Header",
        description: "Patient, date and clinician details",
        section_type: SectionType::Header,
        default_items: &[],
    },
    CatalogEntry {
        name: "Chief Complaint",
        description: "Primary reason for the visit in the patient's words",
        section_type: SectionType::Paragraph,
        default_items: &[],
    },
    CatalogEntry {
        name: "History of Present Illness",
        description: "Onset, location, duration, character and modifying factors",
        section_type: SectionType::Paragraph,
        default_items: &[],
    },
    CatalogEntry {
        name: "Review of Systems",
        description: "Pertinent positives and negatives by system",
        section_type: SectionType::Checklist,
        default_items: &[
            "Constitutional",
            "Cardiovascular",
            "Respiratory",
            "Gastrointestinal",
            "Musculoskeletal",
            "Neurological",
        ],
    },
    CatalogEntry {
        name: "Allergies",
        description: "Known allergies and reactions",
        section_type: SectionType::BulletedList,
        default_items: &[],
    },
    CatalogEntry {
        name: "Current Medications",
        description: "Active prescriptions and supplements",
        section_type: SectionType::BulletedList,
        default_items: &[],
    },
    CatalogEntry {
        name: "Social History",
        description: "Tobacco, alcohol, occupation and living situation",
        section_type: SectionType::Paragraph,
        default_items: &[],
    },
    CatalogEntry {
        name: "Family History",
        description: "Conditions in first-degree relatives",
        section_type: SectionType::Paragraph,
        default_items: &[],
    },
    CatalogEntry {
        name: "Vital Signs",
        description: "Blood pressure, heart rate, temperature, respiratory rate, SpO2",
        section_type: SectionType::Paragraph,
        default_items: &[],
    },
    CatalogEntry {
        name: "Physical Exam",
        description: "Findings by body region",
        section_type: SectionType::ExamList,
        default_items: &["General", "HEENT", "Heart", "Lungs", "Abdomen", "Extremities"],
    },
    CatalogEntry {
        name: "Assessment",
        description: "Clinical impression and differential diagnosis",
        section_type: SectionType::Paragraph,
        default_items: &[],
    },
    CatalogEntry {
        name: "Plan",
        description: "Treatment, orders and follow-up",
        section_type: SectionType::BulletedList,
        default_items: &[],
    },
    CatalogEntry {
        name: "Patient Instructions",
        description: "Standard after-visit guidance",
        section_type: SectionType::StaticText,
        default_items: &[],
    },
];

/// Finds a catalog entry by name, ignoring case and surrounding whitespace.
pub fn find_catalog_entry(name: &str) -> Option<&'static CatalogEntry> {
    let name = name.trim();
    SECTION_CATALOG
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name))
}
