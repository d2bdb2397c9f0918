//! Section data model.
//!
//! A section is one titled, typed block of a template. Its body is a tagged union discriminated
//! by `section_type`, so the type alone decides whether prose (`content`) or entries (`items`)
//! are authoritative:
//!
//! ```yaml
//! id: "550e8400e29b41d4a716446655440000"
//! name: "Allergies"
//! description: "Known allergies and reactions"
//! section_type: "bulleted_list"
//! items:
//!   - id: "6a1f0c2e9b3d4e5f8a7b6c5d4e3f2a1b"
//!     text: "Penicillin"
//! ```

use notecraft_ids::{CanonicalId, FieldId, ItemId, SectionId};
use notecraft_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// The fixed set of section kinds an author can place in a template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Paragraph,
    BulletedList,
    Checklist,
    ExamList,
    StaticText,
    Header,
    Custom,
}

impl SectionType {
    pub const ALL: [SectionType; 7] = [
        SectionType::Paragraph,
        SectionType::BulletedList,
        SectionType::Checklist,
        SectionType::ExamList,
        SectionType::StaticText,
        SectionType::Header,
        SectionType::Custom,
    ];

    /// Returns true for types whose body is a list of items.
    pub fn is_list_shaped(self) -> bool {
        matches!(
            self,
            SectionType::BulletedList | SectionType::Checklist | SectionType::ExamList
        )
    }

    /// Wire spelling, as used in template and library files.
    pub fn as_str(self) -> &'static str {
        match self {
            SectionType::Paragraph => "paragraph",
            SectionType::BulletedList => "bulleted_list",
            SectionType::Checklist => "checklist",
            SectionType::ExamList => "exam_list",
            SectionType::StaticText => "static_text",
            SectionType::Header => "header",
            SectionType::Custom => "custom",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            SectionType::Paragraph => "Paragraph",
            SectionType::BulletedList => "Bulleted list",
            SectionType::Checklist => "Checklist",
            SectionType::ExamList => "Exam list",
            SectionType::StaticText => "Static text",
            SectionType::Header => "Header",
            SectionType::Custom => "Custom",
        }
    }

    /// Looks up a type by its wire spelling.
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a list-shaped section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionItem {
    pub id: ItemId,
    pub text: String,
}

impl SectionItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            text: text.into(),
        }
    }
}

/// Body of a section, discriminated by `section_type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "section_type", rename_all = "snake_case")]
pub enum SectionBody {
    Paragraph {
        #[serde(default)]
        content: String,
    },
    BulletedList {
        #[serde(default)]
        items: Vec<SectionItem>,
    },
    Checklist {
        #[serde(default)]
        items: Vec<SectionItem>,
    },
    ExamList {
        #[serde(default)]
        items: Vec<SectionItem>,
    },
    StaticText {
        #[serde(default)]
        content: String,
    },
    Header {
        #[serde(default)]
        content: String,
    },
    Custom {
        #[serde(default)]
        content: String,
    },
}

impl SectionBody {
    /// An empty body of the given type.
    pub fn empty(section_type: SectionType) -> Self {
        match section_type {
            SectionType::Paragraph => SectionBody::Paragraph {
                content: String::new(),
            },
            SectionType::BulletedList => SectionBody::BulletedList { items: Vec::new() },
            SectionType::Checklist => SectionBody::Checklist { items: Vec::new() },
            SectionType::ExamList => SectionBody::ExamList { items: Vec::new() },
            SectionType::StaticText => SectionBody::StaticText {
                content: String::new(),
            },
            SectionType::Header => SectionBody::Header {
                content: String::new(),
            },
            SectionType::Custom => SectionBody::Custom {
                content: String::new(),
            },
        }
    }

    pub fn section_type(&self) -> SectionType {
        match self {
            SectionBody::Paragraph { .. } => SectionType::Paragraph,
            SectionBody::BulletedList { .. } => SectionType::BulletedList,
            SectionBody::Checklist { .. } => SectionType::Checklist,
            SectionBody::ExamList { .. } => SectionType::ExamList,
            SectionBody::StaticText { .. } => SectionType::StaticText,
            SectionBody::Header { .. } => SectionType::Header,
            SectionBody::Custom { .. } => SectionType::Custom,
        }
    }

    /// Prose content, for text-shaped bodies.
    pub fn content(&self) -> Option<&str> {
        match self {
            SectionBody::Paragraph { content }
            | SectionBody::StaticText { content }
            | SectionBody::Header { content }
            | SectionBody::Custom { content } => Some(content),
            _ => None,
        }
    }

    pub(crate) fn content_mut(&mut self) -> Option<&mut String> {
        match self {
            SectionBody::Paragraph { content }
            | SectionBody::StaticText { content }
            | SectionBody::Header { content }
            | SectionBody::Custom { content } => Some(content),
            _ => None,
        }
    }

    /// Entries, for list-shaped bodies.
    pub fn items(&self) -> Option<&[SectionItem]> {
        match self {
            SectionBody::BulletedList { items }
            | SectionBody::Checklist { items }
            | SectionBody::ExamList { items } => Some(items),
            _ => None,
        }
    }

    pub(crate) fn items_mut(&mut self) -> Option<&mut Vec<SectionItem>> {
        match self {
            SectionBody::BulletedList { items }
            | SectionBody::Checklist { items }
            | SectionBody::ExamList { items } => Some(items),
            _ => None,
        }
    }
}

/// Data type of a typed field, as entered into the structured record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    LongText,
    Number,
    Date,
    Checkbox,
    Select,
}

/// A typed, labelled input attached to a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateField {
    pub id: FieldId,
    pub label: NonEmptyText,
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub placeholder: String,
}

/// Something the workflow deriver will ask an operator to enter: a typed field or a list item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionEntry<'a> {
    pub id: CanonicalId,
    pub label: &'a str,
}

/// A single template building block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub name: NonEmptyText,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub body: SectionBody,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<TemplateField>,
}

impl Section {
    /// Creates a section with a fresh id and an empty body of `section_type`.
    pub fn new(name: NonEmptyText, section_type: SectionType) -> Self {
        Self {
            id: SectionId::new(),
            name,
            description: String::new(),
            body: SectionBody::empty(section_type),
            fields: Vec::new(),
        }
    }

    pub fn section_type(&self) -> SectionType {
        self.body.section_type()
    }

    /// Typed fields followed by list items, in their stored order.
    pub fn entries(&self) -> impl Iterator<Item = SectionEntry<'_>> {
        let fields = self.fields.iter().map(|field| SectionEntry {
            id: *field.id.as_canonical(),
            label: field.label.as_str(),
        });
        let items = self.body.items().unwrap_or_default().iter().map(|item| SectionEntry {
            id: *item.id.as_canonical(),
            label: item.text.as_str(),
        });
        fields.chain(items)
    }

    /// Returns a copy with a new section id and fresh ids for every item and field.
    pub(crate) fn cloned_with_fresh_ids(&self) -> Self {
        let mut copy = self.clone();
        copy.id = SectionId::new();
        if let Some(items) = copy.body.items_mut() {
            for item in items.iter_mut() {
                item.id = ItemId::new();
            }
        }
        for field in copy.fields.iter_mut() {
            field.id = FieldId::new();
        }
        copy
    }
}
