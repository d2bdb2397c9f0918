//! Template registry.
//!
//! Aggregates authored templates and converted library templates into one addressable
//! collection. The registry is an ordinary value: construct it, pass it to whoever needs it, and
//! `reset` or drop it when done. There is no process-wide instance.
//!
//! Lookup rules:
//! - re-registering an id replaces the earlier template in place;
//! - name lookups only see active templates, and an authored template shadows a library
//!   template with the same name;
//! - [`TemplateRegistry::list_types`] lists each active name once, authored names first, each
//!   group in registration order.
//!
//! Converted library templates are stamped with the registry's import time, fixed when the
//! registry is built, so registries built with the same import time hold equal templates.

use crate::import::convert_library_template;
use crate::store::TemplateStore;
use crate::template::Template;
use crate::workflow::FieldMapping;
use crate::{TemplateError, TemplateResult};
use chrono::{DateTime, Utc};
use notecraft_ids::TemplateId;
use notecraft_library::LibraryTemplate;
use std::collections::HashSet;

/// One template offered to the registry.
#[derive(Clone, Debug)]
pub enum RegistryEntry {
    Authored(Template),
    Library(LibraryTemplate),
}

#[derive(Clone, Debug)]
pub struct TemplateRegistry {
    templates: Vec<Template>,
    imported_at: DateTime<Utc>,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Creates an empty registry that stamps library conversions with the current time.
    pub fn new() -> Self {
        Self::with_import_time(Utc::now())
    }

    /// Creates an empty registry that stamps library conversions with `imported_at`.
    pub fn with_import_time(imported_at: DateTime<Utc>) -> Self {
        Self {
            templates: Vec::new(),
            imported_at,
        }
    }

    /// Last-modified time given to every converted library template.
    pub fn imported_at(&self) -> DateTime<Utc> {
        self.imported_at
    }

    /// Builds a registry from the given library items plus every template in `store`.
    ///
    /// Stored templates are registered last, so a saved copy of an imported library template
    /// replaces the freshly converted one.
    pub fn from_sources(
        store: &dyn TemplateStore,
        library: Vec<LibraryTemplate>,
    ) -> TemplateResult<Self> {
        let mut entries: Vec<RegistryEntry> =
            library.into_iter().map(RegistryEntry::Library).collect();
        entries.extend(store.load_all()?.into_iter().map(RegistryEntry::Authored));

        let mut registry = Self::new();
        registry.init(entries);
        Ok(registry)
    }

    /// Replaces the contents of the registry with `entries`.
    pub fn init(&mut self, entries: impl IntoIterator<Item = RegistryEntry>) {
        self.reset();
        self.register(entries);
    }

    /// Removes every template.
    pub fn reset(&mut self) {
        self.templates.clear();
    }

    /// Merges a batch into the registry, converting library items first.
    pub fn register(&mut self, entries: impl IntoIterator<Item = RegistryEntry>) {
        let mut authored = 0usize;
        let mut library = 0usize;

        for entry in entries {
            let template = match entry {
                RegistryEntry::Authored(template) => {
                    authored += 1;
                    template
                }
                RegistryEntry::Library(item) => {
                    library += 1;
                    convert_library_template(&item, self.imported_at)
                }
            };
            self.upsert(template);
        }

        tracing::info!(authored, library, total = self.templates.len(), "registered templates");
    }

    /// Registers a batch of library templates.
    pub fn register_library_templates(&mut self, items: impl IntoIterator<Item = LibraryTemplate>) {
        self.register(items.into_iter().map(RegistryEntry::Library));
    }

    /// Registers or replaces a single authored template, e.g. after a save.
    pub fn upsert(&mut self, template: Template) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// All templates, active or not, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Template> + '_ {
        self.templates.iter()
    }

    pub fn get(&self, id: &TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| &t.id == id)
    }

    /// Finds an active template by exact name, preferring authored templates.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::TemplateNotFound` if no active template has that name.
    pub fn get_by_name(&self, name: &str) -> TemplateResult<&Template> {
        let mut matches = self
            .templates
            .iter()
            .filter(|t| t.is_active && t.name.as_str() == name);
        let first = matches
            .next()
            .ok_or_else(|| TemplateError::TemplateNotFound(name.to_owned()))?;
        if !first.is_library() {
            return Ok(first);
        }
        Ok(matches.find(|t| !t.is_library()).unwrap_or(first))
    }

    /// Distinct names of active templates: authored first, then library.
    pub fn list_types(&self) -> Vec<String> {
        let authored = self.templates.iter().filter(|t| !t.is_library());
        let library = self.templates.iter().filter(|t| t.is_library());

        let mut seen = HashSet::new();
        authored
            .chain(library)
            .filter(|t| t.is_active)
            .filter(|t| seen.insert(t.name.as_str()))
            .map(|t| t.name.as_str().to_owned())
            .collect()
    }

    /// Names offered by the workflow-configuration boundary; same as [`Self::list_types`].
    pub fn template_types(&self) -> Vec<String> {
        self.list_types()
    }

    /// Field mapping and workflow steps for the named template, or `None` if unknown.
    pub fn ehr_field_mappings(&self, template_type: &str) -> Option<FieldMapping> {
        self.get_by_name(template_type)
            .ok()
            .map(FieldMapping::for_template)
    }

    /// Soft-deletes a template. Returns false if the id is unknown.
    pub fn deactivate(&mut self, id: &TemplateId) -> bool {
        match self.templates.iter_mut().find(|t| &t.id == id) {
            Some(template) => {
                template.is_active = false;
                template.touch();
                true
            }
            None => false,
        }
    }

    /// Hard-deletes a template, returning it.
    pub fn remove(&mut self, id: &TemplateId) -> Option<Template> {
        let position = self.templates.iter().position(|t| &t.id == id)?;
        Some(self.templates.remove(position))
    }
}
