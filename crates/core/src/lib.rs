//! # Notecraft Core
//!
//! Core logic for authoring clinical note templates and reconciling them with a structured
//! record:
//! - the section collection engine ([`collection`]) over an id-keyed ordered list
//!   ([`section_list`]), with a per-section edit session ([`editing`]);
//! - field inference ([`fields`]) and workflow step derivation ([`workflow`]);
//! - the template registry ([`registry`]), library import ([`import`]) and persistence
//!   ([`store`]).
//!
//! **No presentation concerns**: rendering, navigation and any network surface belong to the
//! application shell that calls into this crate.

pub mod catalog;
pub mod collection;
pub mod config;
pub mod constants;
pub mod editing;
pub mod error;
pub mod fields;
pub mod import;
pub mod registry;
pub mod section;
pub mod section_list;
pub mod store;
pub mod template;
pub mod validation;
pub mod workflow;

pub use catalog::{find_catalog_entry, CatalogEntry, SECTION_CATALOG};
pub use collection::{
    add_section, delete_section, duplicate_section, edit_section, move_down, move_up, reorder,
    NewSection, SectionPatch,
};
pub use config::CoreConfig;
pub use editing::{EditSession, EditState};
pub use error::{TemplateError, TemplateResult};
pub use fields::{infer_fields, EhrField, FieldMapper, FieldMatcher, FieldRule, SubstringMatcher};
pub use import::{convert_library_template, read_library_file};
pub use registry::{RegistryEntry, TemplateRegistry};
pub use section::{FieldType, Section, SectionBody, SectionItem, SectionType, TemplateField};
pub use section_list::SectionList;
pub use store::{FileTemplateStore, InMemoryTemplateStore, TemplateStore};
pub use template::{Provenance, Template};
pub use workflow::{derive_workflow_steps, FieldMapping, StepType, WorkflowStep};

pub use notecraft_ids::{FieldId, ItemId, SectionId, TemplateId};
pub use notecraft_library::LibraryTemplate;
pub use notecraft_types::NonEmptyText;
