//! Conversion of library templates into the canonical template shape.
//!
//! Conversion is total and deterministic:
//! - every id is derived (UUID v5) from the library template id and the section position, so
//!   importing the same item twice yields the same template;
//! - blank titles and names fall back to placeholders instead of failing;
//! - unknown section types become [`SectionType::Custom`].
//!
//! Each library section becomes one section carrying exactly one synthesized field labelled with
//! the section name: `long_text` when the source was list-shaped, `short_text` otherwise.

use crate::constants::{LIBRARY_ID_PREFIX, UNTITLED_TEMPLATE};
use crate::section::{FieldType, Section, SectionBody, SectionType, TemplateField};
use crate::section_list::SectionList;
use crate::template::{Provenance, Template};
use crate::{TemplateError, TemplateResult};
use chrono::{DateTime, Utc};
use notecraft_ids::{CanonicalId, FieldId, SectionId, TemplateId};
use notecraft_library::{LibrarySection, LibraryTemplate};
use notecraft_types::NonEmptyText;
use std::collections::BTreeSet;
use std::path::Path;

/// Template id a library item converts to.
pub fn library_template_id(library_id: &str) -> TemplateId {
    TemplateId::from(CanonicalId::derive_from_key(&format!(
        "{LIBRARY_ID_PREFIX}{library_id}"
    )))
}

/// Converts a library template, stamping `imported_at` as its last-modified time.
pub fn convert_library_template(item: &LibraryTemplate, imported_at: DateTime<Utc>) -> Template {
    let id = library_template_id(&item.id);
    let name = template_name(item);

    // Section ids derive from distinct positions and each field id from its own section id.
    let sections = SectionList::from_distinct_sections(
        item.sections
            .iter()
            .enumerate()
            .map(|(index, section)| convert_section(&id, index, section)),
    );

    let mut visit_types = BTreeSet::new();
    let template_type = item.template_type.trim();
    if !template_type.is_empty() {
        visit_types.insert(template_type.to_owned());
    }

    Template {
        id,
        name,
        description: String::new(),
        specialty: item.specialty.trim().to_owned(),
        visit_types,
        is_active: true,
        last_modified: imported_at,
        provenance: Provenance::Library {
            source_id: item.id.clone(),
        },
        sections,
    }
}

fn template_name(item: &LibraryTemplate) -> NonEmptyText {
    [item.title.as_str(), item.template_type.as_str(), item.id.as_str()]
        .into_iter()
        .find_map(|candidate| NonEmptyText::new(candidate).ok())
        .unwrap_or_else(|| NonEmptyText::or_fallback(UNTITLED_TEMPLATE, UNTITLED_TEMPLATE))
}

fn convert_section(template_id: &TemplateId, index: usize, source: &LibrarySection) -> Section {
    let section_id = SectionId::derive(template_id.as_canonical(), &format!("section-{index}"));
    let name = NonEmptyText::or_fallback(&source.name, format!("Section {}", index + 1));
    let section_type = section_type_of(source);

    let field_type = if source.is_list_shaped() {
        FieldType::LongText
    } else {
        FieldType::ShortText
    };
    let field = TemplateField {
        id: FieldId::derive(section_id.as_canonical(), "field-0"),
        label: name.clone(),
        field_type,
        placeholder: source.description.trim().to_owned(),
    };

    Section {
        id: section_id,
        name,
        description: source.description.trim().to_owned(),
        body: SectionBody::empty(section_type),
        fields: vec![field],
    }
}

fn section_type_of(source: &LibrarySection) -> SectionType {
    let normalised = source.normalised_type();
    match normalised.as_str() {
        "bullet_list" | "numbered_list" | "list" => SectionType::BulletedList,
        other => SectionType::from_wire(other).unwrap_or(SectionType::Custom),
    }
}

/// Reads library templates from a YAML or JSON file.
///
/// # Errors
///
/// Returns `TemplateError::FileRead` if the file cannot be read and `TemplateError::Library` if
/// it does not match the library schema.
pub fn read_library_file(path: &Path) -> TemplateResult<Vec<LibraryTemplate>> {
    let text = std::fs::read_to_string(path).map_err(TemplateError::FileRead)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let items = notecraft_library::read_library(file_name, &text)?;
    tracing::info!(path = %path.display(), count = items.len(), "read library templates");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn imported_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 12, 10, 14, 0).unwrap()
    }

    fn section(name: &str, section_type: &str) -> LibrarySection {
        LibrarySection {
            name: name.into(),
            section_type: section_type.into(),
            description: String::new(),
        }
    }

    fn item(sections: Vec<LibrarySection>) -> LibraryTemplate {
        LibraryTemplate {
            id: "lib-soap".into(),
            title: "SOAP Note".into(),
            specialty: "General Practice".into(),
            template_type: "Follow-up".into(),
            sections,
        }
    }

    #[test]
    fn bulleted_list_section_gets_long_text_field() {
        let template =
            convert_library_template(&item(vec![section("Allergies", "bulleted_list")]), imported_at());

        assert_eq!(template.sections.len(), 1);
        let converted = template.sections.at(0).unwrap();
        assert_eq!(converted.section_type(), SectionType::BulletedList);
        assert_eq!(converted.fields.len(), 1);
        assert_eq!(converted.fields[0].field_type, FieldType::LongText);
        assert_eq!(converted.fields[0].label.as_str(), "Allergies");
    }

    #[test]
    fn prose_sections_get_short_text_field() {
        let template = convert_library_template(
            &item(vec![section("Chief Complaint", "paragraph"), section("Notes", "")]),
            imported_at(),
        );
        for converted in template.sections.iter() {
            assert_eq!(converted.fields.len(), 1);
            assert_eq!(converted.fields[0].field_type, FieldType::ShortText);
        }
    }

    #[test]
    fn list_aliases_become_bulleted_lists() {
        let template = convert_library_template(
            &item(vec![section("Medications", "Numbered List"), section("Problems", "list")]),
            imported_at(),
        );
        for converted in template.sections.iter() {
            assert_eq!(converted.section_type(), SectionType::BulletedList);
            assert_eq!(converted.fields[0].field_type, FieldType::LongText);
        }
    }

    #[test]
    fn every_section_is_kept_with_distinct_ids() {
        let source = item(vec![
            section("Chief Complaint", "paragraph"),
            section("Chief Complaint", "paragraph"),
            section("Allergies", "bulleted_list"),
        ]);
        let template = convert_library_template(&source, imported_at());

        assert_eq!(template.sections.len(), 3);
        let revalidated = SectionList::from_sections(template.sections.iter().cloned());
        assert_eq!(revalidated.unwrap(), template.sections);
    }

    #[test]
    fn metadata_is_carried_over() {
        let template = convert_library_template(&item(vec![]), imported_at());
        assert_eq!(template.name.as_str(), "SOAP Note");
        assert_eq!(template.specialty, "General Practice");
        assert!(template.visit_types.contains("Follow-up"));
        assert!(template.is_library());
        assert_eq!(
            template.provenance,
            Provenance::Library {
                source_id: "lib-soap".into()
            }
        );
        assert_eq!(template.last_modified, imported_at());
    }

    #[test]
    fn conversion_is_deterministic() {
        let source = item(vec![
            section("Chief Complaint", "paragraph"),
            section("Physical Exam", "exam_list"),
        ]);
        let a = convert_library_template(&source, imported_at());
        let b = convert_library_template(&source, imported_at());
        assert_eq!(a, b);
        assert_eq!(a.id, library_template_id("lib-soap"));
    }

    #[test]
    fn minimal_item_converts_with_placeholders() {
        let source = LibraryTemplate {
            id: "lib-empty".into(),
            title: " ".into(),
            specialty: String::new(),
            template_type: String::new(),
            sections: vec![section("", "mystery_widget")],
        };
        let template = convert_library_template(&source, imported_at());

        assert_eq!(template.name.as_str(), "lib-empty");
        assert!(template.visit_types.is_empty());
        let converted = template.sections.at(0).unwrap();
        assert_eq!(converted.name.as_str(), "Section 1");
        assert_eq!(converted.section_type(), SectionType::Custom);
        assert_eq!(converted.fields.len(), 1);
    }

    #[test]
    fn title_falls_back_to_type() {
        let mut source = item(vec![]);
        source.title = String::new();
        assert_eq!(
            convert_library_template(&source, imported_at()).name.as_str(),
            "Follow-up"
        );
    }

    #[test]
    fn read_library_file_picks_format_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let json_path = dir.path().join("library.json");
        std::fs::write(
            &json_path,
            r#"[{"id": "lib-1", "title": "Intake", "sections": [{"name": "Allergies", "type": "bulleted_list"}]}]"#,
        )
        .unwrap();
        let yaml_path = dir.path().join("library.yaml");
        std::fs::write(&yaml_path, "- id: lib-2\n  title: Review\n").unwrap();

        assert_eq!(read_library_file(&json_path).unwrap()[0].title, "Intake");
        assert_eq!(read_library_file(&yaml_path).unwrap()[0].title, "Review");
        assert!(matches!(
            read_library_file(&dir.path().join("missing.yaml")),
            Err(TemplateError::FileRead(_))
        ));
    }
}
