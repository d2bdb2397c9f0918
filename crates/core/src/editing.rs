//! Per-section edit session.
//!
//! The authoring shell edits one section at a time:
//!
//! ```text
//! idle --begin_edit--> editing --save--> idle   (draft applied)
//!                      editing --cancel--> idle (draft discarded)
//! ```
//!
//! Deleting or duplicating the section under edit discards the draft and returns to idle.
//! Starting an edit while another is in progress discards the earlier draft.

use crate::collection::{self, SectionPatch};
use crate::template::Template;
use crate::{TemplateError, TemplateResult};
use notecraft_ids::SectionId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing {
        section_id: SectionId,
        draft: SectionPatch,
    },
}

/// A template snapshot plus the edit state of its sections.
#[derive(Clone, Debug)]
pub struct EditSession {
    template: Template,
    state: EditState,
}

impl EditSession {
    pub fn new(template: Template) -> Self {
        Self {
            template,
            state: EditState::Idle,
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn into_template(self) -> Template {
        self.template
    }

    pub fn editing(&self) -> Option<&SectionId> {
        match &self.state {
            EditState::Editing { section_id, .. } => Some(section_id),
            EditState::Idle => None,
        }
    }

    /// Starts editing `id` with an empty draft.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::SectionNotFound` if `id` is absent; the current state is kept.
    pub fn begin_edit(&mut self, id: &SectionId) -> TemplateResult<()> {
        if !self.template.sections.contains(id) {
            return Err(TemplateError::SectionNotFound(*id));
        }
        if let Some(previous) = self.editing() {
            tracing::debug!(section_id = %previous, "discarding draft for new edit");
        }
        self.state = EditState::Editing {
            section_id: *id,
            draft: SectionPatch::default(),
        };
        Ok(())
    }

    /// Merges `patch` into the current draft.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::Validation` when no section is being edited.
    pub fn update_draft(&mut self, patch: SectionPatch) -> TemplateResult<()> {
        match &mut self.state {
            EditState::Editing { draft, .. } => {
                draft.merge(patch);
                Ok(())
            }
            EditState::Idle => Err(TemplateError::Validation(
                "no section is being edited".into(),
            )),
        }
    }

    /// Applies the draft and returns to idle. Saving while idle does nothing.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`collection::edit_section`]; on error the session stays in
    /// `Editing` with its draft intact so the author can correct it.
    pub fn save(&mut self) -> TemplateResult<()> {
        let EditState::Editing { section_id, draft } = &self.state else {
            return Ok(());
        };
        self.template = collection::edit_section(&self.template, section_id, draft.clone())?;
        self.state = EditState::Idle;
        Ok(())
    }

    /// Discards the draft and returns to idle.
    pub fn cancel(&mut self) {
        self.state = EditState::Idle;
    }

    /// Deletes `id`; discards the draft if it belonged to `id`.
    pub fn delete(&mut self, id: &SectionId) {
        self.discard_if_editing(id);
        self.template = collection::delete_section(&self.template, id);
    }

    /// Duplicates `id`; discards the draft if it belonged to `id`.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError::SectionNotFound` if `id` is absent.
    pub fn duplicate(&mut self, id: &SectionId) -> TemplateResult<()> {
        let next = collection::duplicate_section(&self.template, id)?;
        self.discard_if_editing(id);
        self.template = next;
        Ok(())
    }

    fn discard_if_editing(&mut self, id: &SectionId) {
        if self.editing() == Some(id) {
            tracing::debug!(section_id = %id, "discarding draft of section under edit");
            self.state = EditState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::{add_section, NewSection};

    fn session_with(names: &[&str]) -> EditSession {
        let template = names.iter().fold(Template::new("T").unwrap(), |t, name| {
            add_section(
                &t,
                NewSection::Custom {
                    name: (*name).into(),
                    content: String::new(),
                },
            )
            .unwrap()
        });
        EditSession::new(template)
    }

    fn first_id(session: &EditSession) -> SectionId {
        session.template().sections.ids()[0]
    }

    #[test]
    fn save_applies_draft_and_returns_to_idle() {
        let mut session = session_with(&["Plan"]);
        let id = first_id(&session);

        session.begin_edit(&id).unwrap();
        session.update_draft(SectionPatch::rename("Care Plan")).unwrap();
        session.save().unwrap();

        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(
            session.template().sections.get(&id).unwrap().name.as_str(),
            "Care Plan"
        );
    }

    #[test]
    fn cancel_discards_draft() {
        let mut session = session_with(&["Plan"]);
        let id = first_id(&session);
        let before = session.template().clone();

        session.begin_edit(&id).unwrap();
        session.update_draft(SectionPatch::rename("Care Plan")).unwrap();
        session.cancel();

        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(session.template(), &before);
    }

    #[test]
    fn failed_save_keeps_editing() {
        let mut session = session_with(&["Plan"]);
        let id = first_id(&session);

        session.begin_edit(&id).unwrap();
        session.update_draft(SectionPatch::rename("   ")).unwrap();
        assert!(session.save().is_err());
        assert_eq!(session.editing(), Some(&id));
    }

    #[test]
    fn deleting_section_under_edit_discards_draft() {
        let mut session = session_with(&["Plan", "Assessment"]);
        let id = first_id(&session);

        session.begin_edit(&id).unwrap();
        session.update_draft(SectionPatch::rename("Care Plan")).unwrap();
        session.delete(&id);

        assert_eq!(session.state(), &EditState::Idle);
        assert_eq!(session.template().sections.len(), 1);
        session.save().unwrap();
        assert_eq!(session.template().sections.len(), 1);
    }

    #[test]
    fn duplicating_section_under_edit_discards_draft() {
        let mut session = session_with(&["Plan"]);
        let id = first_id(&session);

        session.begin_edit(&id).unwrap();
        session.update_draft(SectionPatch::rename("Care Plan")).unwrap();
        session.duplicate(&id).unwrap();

        assert_eq!(session.state(), &EditState::Idle);
        let names: Vec<&str> = session
            .template()
            .sections
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Plan", "Plan (Copy)"]);
    }

    #[test]
    fn deleting_other_section_keeps_draft() {
        let mut session = session_with(&["Plan", "Assessment"]);
        let plan = first_id(&session);
        let assessment = session.template().sections.ids()[1];

        session.begin_edit(&plan).unwrap();
        session.delete(&assessment);

        assert_eq!(session.editing(), Some(&plan));
    }

    #[test]
    fn begin_edit_on_missing_section_keeps_state() {
        let mut session = session_with(&["Plan"]);
        let id = first_id(&session);
        session.begin_edit(&id).unwrap();

        assert!(session.begin_edit(&SectionId::new()).is_err());
        assert_eq!(session.editing(), Some(&id));
    }

    #[test]
    fn update_draft_while_idle_is_rejected() {
        let mut session = session_with(&["Plan"]);
        assert!(matches!(
            session.update_draft(SectionPatch::rename("X")),
            Err(TemplateError::Validation(_))
        ));
    }
}
