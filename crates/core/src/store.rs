//! Template persistence.
//!
//! The collection engine never persists anything itself. After each mutation the authoring
//! shell hands the returned snapshot to [`TemplateStore::on_save`].
//!
//! [`FileTemplateStore`] keeps one YAML file per template:
//!
//! ```text
//! <template_dir>/
//! ├── 550e8400e29b41d4a716446655440000.yaml
//! └── 6a1f0c2e9b3d4e5f8a7b6c5d4e3f2a1b.yaml
//! ```
//!
//! Writes go to a temporary sibling file that is then renamed over the target, so a crash never
//! leaves a half-written template behind.

use crate::constants::TEMPLATE_FILE_EXTENSION;
use crate::template::Template;
use crate::{TemplateError, TemplateResult};
use notecraft_ids::TemplateId;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub trait TemplateStore {
    /// Persists `template`, replacing any earlier version with the same id.
    fn on_save(&mut self, template: &Template) -> TemplateResult<()>;

    /// Loads one template by id.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::TemplateNotFound` if the store has no such template.
    fn load(&self, id: &TemplateId) -> TemplateResult<Template>;

    /// Loads every template, sorted by name then id.
    fn load_all(&self) -> TemplateResult<Vec<Template>>;

    /// Hard-deletes a template. Returns false if it did not exist.
    fn delete(&mut self, id: &TemplateId) -> TemplateResult<bool>;
}

fn sort_templates(templates: &mut [Template]) {
    templates.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
}

/// File-backed store, one YAML document per template.
#[derive(Clone, Debug)]
pub struct FileTemplateStore {
    dir: PathBuf,
}

impl FileTemplateStore {
    /// Creates a store rooted at `dir`. No I/O happens until the first call.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &TemplateId) -> PathBuf {
        self.dir
            .join(format!("{id}.{TEMPLATE_FILE_EXTENSION}"))
    }

    fn read_template(path: &Path) -> TemplateResult<Template> {
        let text = fs::read_to_string(path).map_err(TemplateError::FileRead)?;
        serde_yaml::from_str(&text).map_err(TemplateError::YamlDeserialization)
    }
}

impl TemplateStore for FileTemplateStore {
    fn on_save(&mut self, template: &Template) -> TemplateResult<()> {
        fs::create_dir_all(&self.dir).map_err(TemplateError::StorageDirCreation)?;

        let yaml = serde_yaml::to_string(template).map_err(TemplateError::YamlSerialization)?;
        let path = self.path_for(&template.id);
        let tmp_path = path.with_extension(format!("{TEMPLATE_FILE_EXTENSION}.tmp"));

        fs::write(&tmp_path, yaml).map_err(TemplateError::FileWrite)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(TemplateError::FileWrite(e));
        }

        tracing::info!(template_id = %template.id, path = %path.display(), "saved template");
        Ok(())
    }

    fn load(&self, id: &TemplateId) -> TemplateResult<Template> {
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(TemplateError::TemplateNotFound(id.to_string()));
        }
        Self::read_template(&path)
    }

    /// Reads every `*.yaml` file in the directory.
    ///
    /// A missing directory yields no templates. Files that are not valid templates are logged and
    /// skipped so one bad file cannot hide the rest.
    fn load_all(&self) -> TemplateResult<Vec<Template>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TemplateError::FileRead(e)),
        };

        let mut templates = Vec::new();
        for entry in entries {
            let path = entry.map_err(TemplateError::FileRead)?.path();
            let is_yaml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == TEMPLATE_FILE_EXTENSION);
            if !path.is_file() || !is_yaml {
                continue;
            }

            match Self::read_template(&path) {
                Ok(template) => templates.push(template),
                Err(e) => {
                    tracing::warn!("skipping unreadable template {}: {}", path.display(), e);
                }
            }
        }

        sort_templates(&mut templates);
        Ok(templates)
    }

    fn delete(&mut self, id: &TemplateId) -> TemplateResult<bool> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(template_id = %id, "deleted template");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(TemplateError::FileDelete(e)),
        }
    }
}

/// Store that keeps templates in memory; for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: BTreeMap<TemplateId, Template>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for InMemoryTemplateStore {
    fn on_save(&mut self, template: &Template) -> TemplateResult<()> {
        self.templates.insert(template.id, template.clone());
        Ok(())
    }

    fn load(&self, id: &TemplateId) -> TemplateResult<Template> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| TemplateError::TemplateNotFound(id.to_string()))
    }

    fn load_all(&self) -> TemplateResult<Vec<Template>> {
        let mut templates: Vec<Template> = self.templates.values().cloned().collect();
        sort_templates(&mut templates);
        Ok(templates)
    }

    fn delete(&mut self, id: &TemplateId) -> TemplateResult<bool> {
        Ok(self.templates.remove(id).is_some())
    }
}
