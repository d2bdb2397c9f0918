//! Section collection engine.
//!
//! Every operation takes a template snapshot by reference and returns a new snapshot; the input
//! is never modified. Callers apply the returned snapshot to whatever store they use (see
//! [`crate::store::TemplateStore::on_save`]).
//!
//! Missing-id policy:
//! - [`delete_section`] is idempotent and returns an unchanged snapshot.
//! - [`edit_section`], [`duplicate_section`], [`move_up`] and [`move_down`] return
//!   [`TemplateError::SectionNotFound`].
//!
//! Operations that change nothing (moving the first section up, reordering onto itself) return a
//! snapshot equal to the input, including `last_modified`.

use crate::catalog::CatalogEntry;
use crate::constants::COPY_SUFFIX;
use crate::section::{Section, SectionBody, SectionItem, SectionType};
use crate::template::Template;
use crate::validation::{require_items, require_text};
use crate::{TemplateError, TemplateResult};
use notecraft_ids::{ItemId, SectionId};
use serde::{Deserialize, Serialize};

/// What an author asked to add.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewSection {
    /// Copy of a predefined catalog section.
    FromCatalog(&'static CatalogEntry),
    /// Free-text section typed by the author.
    Custom { name: String, content: String },
}

/// Partial update for a section. `None` leaves the attribute unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl SectionPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.content.is_none()
            && self.items.is_none()
    }

    /// Overlays `other` on this patch; attributes set in `other` win.
    pub fn merge(&mut self, other: SectionPatch) {
        if other.name.is_some() {
            self.name = other.name;
        }
        if other.description.is_some() {
            self.description = other.description;
        }
        if other.content.is_some() {
            self.content = other.content;
        }
        if other.items.is_some() {
            self.items = other.items;
        }
    }
}

/// Builds the section an author asked for, with fresh ids.
///
/// # Errors
///
/// Returns `TemplateError::Validation` if a custom section has a blank name.
pub fn build_section(new_section: &NewSection) -> TemplateResult<Section> {
    match new_section {
        NewSection::FromCatalog(entry) => {
            let name = require_text("section name", entry.name)?;
            let mut section = Section::new(name, entry.section_type);
            section.description = entry.description.to_owned();
            if let Some(items) = section.body.items_mut() {
                items.extend(entry.default_items.iter().map(|text| SectionItem::new(*text)));
            }
            Ok(section)
        }
        NewSection::Custom { name, content } => {
            let name = require_text("section name", name)?;
            let mut section = Section::new(name, SectionType::Custom);
            section.body = SectionBody::Custom {
                content: content.trim().to_owned(),
            };
            Ok(section)
        }
    }
}

/// Appends a new section built from a catalog entry or custom text.
///
/// # Errors
///
/// Returns `TemplateError::Validation` if a custom section has a blank name.
pub fn add_section(template: &Template, new_section: NewSection) -> TemplateResult<Template> {
    let section = build_section(&new_section)?;
    let section_id = section.id;

    let mut next = template.clone();
    next.sections.push(section)?;
    next.touch();

    tracing::debug!(template_id = %next.id, section_id = %section_id, "added section");
    Ok(next)
}

/// Applies a partial update to the section matching `id`.
///
/// `content` may only be patched on text-shaped sections and `items` only on list-shaped
/// sections. Replacing items keeps the id of every item whose position survives and mints ids
/// for new positions.
///
/// # Errors
///
/// - `TemplateError::SectionNotFound` if `id` is absent.
/// - `TemplateError::Validation` if the patch blanks the name, contains a blank item, or targets
///   the body attribute the section type does not use.
pub fn edit_section(
    template: &Template,
    id: &SectionId,
    patch: SectionPatch,
) -> TemplateResult<Template> {
    if !template.sections.contains(id) {
        return Err(TemplateError::SectionNotFound(*id));
    }
    if patch.is_empty() {
        return Ok(template.clone());
    }

    let name = patch
        .name
        .as_deref()
        .map(|name| require_text("section name", name))
        .transpose()?;
    let items = patch.items.as_deref().map(require_items).transpose()?;

    let mut next = template.clone();
    next.sections.update(id, |section| {
        let section_type = section.section_type();

        if let Some(name) = name {
            section.name = name;
        }
        if let Some(description) = patch.description {
            section.description = description;
        }
        if let Some(content) = patch.content {
            let slot = section.body.content_mut().ok_or_else(|| {
                TemplateError::Validation(format!(
                    "{section_type} sections hold items, not content"
                ))
            })?;
            *slot = content;
        }
        if let Some(items) = items {
            let slot = section.body.items_mut().ok_or_else(|| {
                TemplateError::Validation(format!(
                    "{section_type} sections hold content, not items"
                ))
            })?;
            *slot = replace_items(slot, items);
        }
        Ok(())
    })?;
    next.touch();

    tracing::debug!(template_id = %next.id, section_id = %id, "edited section");
    Ok(next)
}

fn replace_items(existing: &[SectionItem], texts: Vec<String>) -> Vec<SectionItem> {
    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| SectionItem {
            id: existing.get(index).map(|item| item.id).unwrap_or_else(ItemId::new),
            text,
        })
        .collect()
}

/// Removes the section matching `id`; later sections shift up.
///
/// Idempotent: an absent `id` returns an unchanged snapshot.
pub fn delete_section(template: &Template, id: &SectionId) -> Template {
    if !template.sections.contains(id) {
        return template.clone();
    }

    let mut next = template.clone();
    next.sections.remove(id);
    next.touch();

    tracing::debug!(template_id = %next.id, section_id = %id, "deleted section");
    next
}

/// Clones the section matching `id` immediately after the original.
///
/// The clone gets a fresh section id, fresh item and field ids, and the name suffixed
/// `" (Copy)"`.
///
/// # Errors
///
/// Returns `TemplateError::SectionNotFound` if `id` is absent.
pub fn duplicate_section(template: &Template, id: &SectionId) -> TemplateResult<Template> {
    let (position, original) = template
        .sections
        .position(id)
        .zip(template.sections.get(id))
        .ok_or(TemplateError::SectionNotFound(*id))?;

    let mut copy = original.cloned_with_fresh_ids();
    copy.name = original.name.with_suffix(COPY_SUFFIX);
    let copy_id = copy.id;

    let mut next = template.clone();
    next.sections.insert(position + 1, copy)?;
    next.touch();

    tracing::debug!(
        template_id = %next.id,
        section_id = %id,
        copy_id = %copy_id,
        "duplicated section"
    );
    Ok(next)
}

/// Swaps the section with its predecessor; no-op for the first section.
///
/// # Errors
///
/// Returns `TemplateError::SectionNotFound` if `id` is absent.
pub fn move_up(template: &Template, id: &SectionId) -> TemplateResult<Template> {
    let position = template
        .sections
        .position(id)
        .ok_or(TemplateError::SectionNotFound(*id))?;
    if position == 0 {
        return Ok(template.clone());
    }
    swap_positions(template, position, position - 1)
}

/// Swaps the section with its successor; no-op for the last section.
///
/// # Errors
///
/// Returns `TemplateError::SectionNotFound` if `id` is absent.
pub fn move_down(template: &Template, id: &SectionId) -> TemplateResult<Template> {
    let position = template
        .sections
        .position(id)
        .ok_or(TemplateError::SectionNotFound(*id))?;
    if position + 1 >= template.sections.len() {
        return Ok(template.clone());
    }
    swap_positions(template, position, position + 1)
}

fn swap_positions(template: &Template, a: usize, b: usize) -> TemplateResult<Template> {
    let mut next = template.clone();
    next.sections.swap(a, b)?;
    next.touch();

    tracing::debug!(template_id = %next.id, from = a, to = b, "swapped sections");
    Ok(next)
}

/// Moves the section at `from_index` to `to_index`, shifting the sections between.
///
/// Used for drag-based reordering. Ids never change.
///
/// # Errors
///
/// Returns `TemplateError::Validation` if either index is out of range.
pub fn reorder(template: &Template, from_index: usize, to_index: usize) -> TemplateResult<Template> {
    if from_index == to_index {
        crate::validation::require_index("from_index", from_index, template.sections.len())?;
        return Ok(template.clone());
    }

    let mut next = template.clone();
    next.sections.move_index(from_index, to_index)?;
    next.touch();

    tracing::debug!(
        template_id = %next.id,
        from = from_index,
        to = to_index,
        "reordered sections"
    );
    Ok(next)
}
