//! Ordered, id-keyed storage for a template's sections.
//!
//! Sections live in a map keyed by [`SectionId`] and a separate vector records their order. All
//! index arithmetic (insert, remove, swap, move) happens here, so uniqueness and ordering are
//! enforced in one place rather than in every collection operation.
//!
//! Section ids are unique within the list, and entry ids (typed fields and list items) are
//! unique across all sections, so every workflow step derived from the list has its own id.
//!
//! On disk a `SectionList` is a plain YAML/JSON sequence of sections in order. Deserialisation
//! rejects duplicate section or entry ids.

use crate::section::Section;
use crate::validation::require_index;
use crate::{TemplateError, TemplateResult};
use notecraft_ids::SectionId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionList {
    by_id: HashMap<SectionId, Section>,
    order: Vec<SectionId>,
}

impl SectionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from sections in order.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Validation` if two sections share an id.
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> TemplateResult<Self> {
        let mut list = Self::new();
        for section in sections {
            list.push(section)?;
        }
        Ok(list)
    }

    /// Builds a list from sections whose section and entry ids are distinct by construction,
    /// such as ids derived from distinct positions.
    pub(crate) fn from_distinct_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut list = Self::new();
        for section in sections {
            debug_assert!(!list.by_id.contains_key(&section.id));
            debug_assert!(list.check_entry_ids(&section).is_ok());
            list.order.push(section.id);
            list.by_id.insert(section.id, section);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sections in template order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> + '_ {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    /// Section ids in template order.
    pub fn ids(&self) -> &[SectionId] {
        &self.order
    }

    pub fn get(&self, id: &SectionId) -> Option<&Section> {
        self.by_id.get(id)
    }

    pub fn at(&self, index: usize) -> Option<&Section> {
        self.order.get(index).and_then(|id| self.by_id.get(id))
    }

    pub fn contains(&self, id: &SectionId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn position(&self, id: &SectionId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        self.order.iter().position(|candidate| candidate == id)
    }

    /// Appends a section.
    pub fn push(&mut self, section: Section) -> TemplateResult<()> {
        let index = self.len();
        self.insert(index, section)
    }

    /// Inserts a section at `index`, shifting later sections down.
    ///
    /// `index` may equal `len()` (append).
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Validation` on a duplicate section or entry id, or an index past
    /// the end.
    pub fn insert(&mut self, index: usize, section: Section) -> TemplateResult<()> {
        if self.by_id.contains_key(&section.id) {
            return Err(TemplateError::Validation(format!(
                "duplicate section id {}",
                section.id
            )));
        }
        self.check_entry_ids(&section)?;
        if index > self.len() {
            return Err(TemplateError::Validation(format!(
                "insert position {index} is out of range for {} sections",
                self.len()
            )));
        }
        self.order.insert(index, section.id);
        self.by_id.insert(section.id, section);
        Ok(())
    }

    /// Removes a section, shifting later sections up. Returns `None` if absent.
    pub fn remove(&mut self, id: &SectionId) -> Option<Section> {
        let section = self.by_id.remove(id)?;
        self.order.retain(|candidate| candidate != id);
        Some(section)
    }

    /// Swaps the sections at two positions.
    pub fn swap(&mut self, a: usize, b: usize) -> TemplateResult<()> {
        require_index("position", a, self.len())?;
        require_index("position", b, self.len())?;
        self.order.swap(a, b);
        Ok(())
    }

    /// Removes the section at `from` and reinserts it at `to`, shifting the sections between.
    pub fn move_index(&mut self, from: usize, to: usize) -> TemplateResult<()> {
        require_index("from_index", from, self.len())?;
        require_index("to_index", to, self.len())?;
        let id = self.order.remove(from);
        self.order.insert(to, id);
        Ok(())
    }

    /// Applies `update` to the section matching `id`.
    ///
    /// The section id is restored after `update` runs; ids are immutable.
    pub(crate) fn update<F>(&mut self, id: &SectionId, update: F) -> TemplateResult<()>
    where
        F: FnOnce(&mut Section) -> TemplateResult<()>,
    {
        let mut draft = self
            .by_id
            .get(id)
            .cloned()
            .ok_or(TemplateError::SectionNotFound(*id))?;
        update(&mut draft)?;
        draft.id = *id;
        self.check_entry_ids(&draft)?;
        self.by_id.insert(*id, draft);
        Ok(())
    }

    /// Rejects `section` if one of its entry ids repeats within it or appears in another section.
    fn check_entry_ids(&self, section: &Section) -> TemplateResult<()> {
        let mut seen: HashSet<_> = self
            .by_id
            .values()
            .filter(|other| other.id != section.id)
            .flat_map(|other| other.entries())
            .map(|entry| entry.id)
            .collect();

        for entry in section.entries() {
            if !seen.insert(entry.id) {
                return Err(TemplateError::Validation(format!(
                    "duplicate entry id {} in section {}",
                    entry.id, section.id
                )));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SectionList {
    type Item = &'a Section;
    type IntoIter = Box<dyn Iterator<Item = &'a Section> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for SectionList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for SectionList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sections = Vec::<Section>::deserialize(deserializer)?;
        SectionList::from_sections(sections).map_err(serde::de::Error::custom)
    }
}
