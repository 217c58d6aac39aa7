//! Note use-case service.
//!
//! # Invariants
//! - Search is a case-insensitive substring match over title and content;
//!   a blank term lists every note.
//! - Edits keep `created_at` and the newest-first list position.

use crate::clock::{Clock, SystemClock};
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::OwnerId;
use crate::repo::note_repo::NoteRepository;
use crate::service::{logged, ServiceResult};
use log::info;

const MODULE: &str = "note_service";

/// Use-case facade for notes.
pub struct NoteService<R: NoteRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: NoteRepository, C: Clock> NoteService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// # Errors
    /// - `Validation` when the title or content is blank.
    pub fn create_note(&self, owner: OwnerId, draft: &NoteDraft) -> ServiceResult<Note> {
        let draft = draft.normalized().map_err(logged(MODULE, "note_create"))?;
        let note = self
            .repo
            .insert_note(owner, &draft, self.clock.now())
            .map_err(logged(MODULE, "note_create"))?;
        info!("event=note_create module={MODULE} status=ok note_id={}", note.id);
        Ok(note)
    }

    /// Replaces a note's title and content.
    ///
    /// # Errors
    /// - `Validation` when the title or content is blank.
    /// - `NotFound` when no such note exists for `owner`.
    pub fn update_note(
        &self,
        owner: OwnerId,
        id: NoteId,
        draft: &NoteDraft,
    ) -> ServiceResult<Note> {
        let draft = draft.normalized().map_err(logged(MODULE, "note_update"))?;
        let note = self
            .repo
            .update_note(owner, id, &draft, self.clock.now())
            .map_err(logged(MODULE, "note_update"))?;
        info!("event=note_update module={MODULE} status=ok note_id={id}");
        Ok(note)
    }

    /// Lists notes newest first, keeping only those matching `search`.
    pub fn list_notes(&self, owner: OwnerId, search: Option<&str>) -> ServiceResult<Vec<Note>> {
        let notes = self
            .repo
            .list_notes(owner)
            .map_err(logged(MODULE, "note_list"))?;
        Ok(match search {
            Some(term) => notes.into_iter().filter(|note| note.matches(term)).collect(),
            None => notes,
        })
    }

    pub fn delete_note(&self, owner: OwnerId, id: NoteId) -> ServiceResult<()> {
        self.repo
            .delete_note(owner, id)
            .map_err(logged(MODULE, "note_delete"))?;
        info!("event=note_delete module={MODULE} status=ok note_id={id}");
        Ok(())
    }
}
