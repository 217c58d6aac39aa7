//! Journal use-case service.

use crate::clock::{Clock, SystemClock};
use crate::model::journal::{JournalCategory, JournalDraft, JournalEntry, JournalEntryId};
use crate::model::OwnerId;
use crate::repo::journal_repo::JournalRepository;
use crate::service::{logged, ServiceResult};
use log::info;

const MODULE: &str = "journal_service";

/// Use-case facade for journal entries.
pub struct JournalService<R: JournalRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: JournalRepository> JournalService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: JournalRepository, C: Clock> JournalService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// # Errors
    /// - `Validation` when the title or content is blank.
    pub fn create_entry(
        &self,
        owner: OwnerId,
        draft: &JournalDraft,
    ) -> ServiceResult<JournalEntry> {
        let draft = draft
            .normalized()
            .map_err(logged(MODULE, "journal_create"))?;
        let entry = self
            .repo
            .insert_entry(owner, &draft, self.clock.now())
            .map_err(logged(MODULE, "journal_create"))?;
        info!(
            "event=journal_create module={MODULE} status=ok entry_id={} category={}",
            entry.id, entry.category
        );
        Ok(entry)
    }

    /// Replaces title, content and category of an entry.
    ///
    /// # Errors
    /// - `Validation` when the title or content is blank.
    /// - `NotFound` when no such entry exists for `owner`.
    pub fn update_entry(
        &self,
        owner: OwnerId,
        id: JournalEntryId,
        draft: &JournalDraft,
    ) -> ServiceResult<JournalEntry> {
        let draft = draft
            .normalized()
            .map_err(logged(MODULE, "journal_update"))?;
        let entry = self
            .repo
            .update_entry(owner, id, &draft, self.clock.now())
            .map_err(logged(MODULE, "journal_update"))?;
        info!(
            "event=journal_update module={MODULE} status=ok entry_id={id} category={}",
            entry.category
        );
        Ok(entry)
    }

    /// Entries newest first; `None` lists every category.
    pub fn list_entries(
        &self,
        owner: OwnerId,
        category: Option<JournalCategory>,
    ) -> ServiceResult<Vec<JournalEntry>> {
        self.repo
            .list_entries(owner, category)
            .map_err(logged(MODULE, "journal_list"))
    }

    pub fn delete_entry(&self, owner: OwnerId, id: JournalEntryId) -> ServiceResult<()> {
        self.repo
            .delete_entry(owner, id)
            .map_err(logged(MODULE, "journal_delete"))?;
        info!("event=journal_delete module={MODULE} status=ok entry_id={id}");
        Ok(())
    }
}
