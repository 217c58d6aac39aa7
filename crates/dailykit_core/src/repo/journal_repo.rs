//! Journal entry repository contract and SQLite implementation.
//!
//! # Invariants
//! - `category` is stored by its lowercase name and decoded strictly.
//! - Entries are listed newest first, optionally narrowed to one category.

use crate::db::ensure_tables;
use crate::model::journal::{JournalCategory, JournalDraft, JournalEntry, JournalEntryId};
use crate::model::OwnerId;
use crate::repo::{from_millis, parse_uuid, stored_instant, to_millis, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    title,
    content,
    category,
    created_at,
    updated_at
FROM journal_entries";

const ENTRY_ORDER_SQL: &str = "ORDER BY created_at DESC, uuid ASC";

/// Store contract for journal entries.
pub trait JournalRepository {
    fn insert_entry(
        &self,
        owner: OwnerId,
        draft: &JournalDraft,
        created_at: DateTime<Utc>,
    ) -> RepoResult<JournalEntry>;
    /// Replaces title, content and category, returning the entry as stored.
    fn update_entry(
        &self,
        owner: OwnerId,
        id: JournalEntryId,
        draft: &JournalDraft,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<JournalEntry>;
    fn get_entry(&self, owner: OwnerId, id: JournalEntryId) -> RepoResult<Option<JournalEntry>>;
    /// Lists entries newest first; `None` means every category.
    fn list_entries(
        &self,
        owner: OwnerId,
        category: Option<JournalCategory>,
    ) -> RepoResult<Vec<JournalEntry>>;
    fn delete_entry(&self, owner: OwnerId, id: JournalEntryId) -> RepoResult<()>;
}

/// SQLite-backed journal repository.
pub struct SqliteJournalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteJournalRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["journal_entries"])?;
        Ok(Self { conn })
    }

    fn query_entries(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }
}

impl JournalRepository for SqliteJournalRepository<'_> {
    fn insert_entry(
        &self,
        owner: OwnerId,
        draft: &JournalDraft,
        created_at: DateTime<Utc>,
    ) -> RepoResult<JournalEntry> {
        let draft = draft.normalized()?;
        let created_at = stored_instant(created_at);
        let entry = JournalEntry {
            id: Uuid::new_v4(),
            owner,
            title: draft.title,
            content: draft.content,
            category: draft.category,
            created_at,
            updated_at: created_at,
        };

        self.conn.execute(
            "INSERT INTO journal_entries
                 (uuid, owner_uuid, title, content, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6);",
            params![
                entry.id.to_string(),
                owner.to_string(),
                entry.title.as_str(),
                entry.content.as_str(),
                entry.category.as_str(),
                to_millis(created_at),
            ],
        )?;
        Ok(entry)
    }

    fn update_entry(
        &self,
        owner: OwnerId,
        id: JournalEntryId,
        draft: &JournalDraft,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<JournalEntry> {
        let draft = draft.normalized()?;
        let changed = self.conn.execute(
            "UPDATE journal_entries
             SET title = ?1,
                 content = ?2,
                 category = ?3,
                 updated_at = MAX(created_at, ?4)
             WHERE uuid = ?5
               AND owner_uuid = ?6;",
            params![
                draft.title.as_str(),
                draft.content.as_str(),
                draft.category.as_str(),
                to_millis(updated_at),
                id.to_string(),
                owner.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        self.get_entry(owner, id)?.ok_or(RepoError::NotFound(id))
    }

    fn get_entry(&self, owner: OwnerId, id: JournalEntryId) -> RepoResult<Option<JournalEntry>> {
        let sql = format!("{ENTRY_SELECT_SQL} WHERE uuid = ?1 AND owner_uuid = ?2;");
        let entries = self.query_entries(&sql, params![id.to_string(), owner.to_string()])?;
        Ok(entries.into_iter().next())
    }

    fn list_entries(
        &self,
        owner: OwnerId,
        category: Option<JournalCategory>,
    ) -> RepoResult<Vec<JournalEntry>> {
        match category {
            Some(category) => {
                let sql = format!(
                    "{ENTRY_SELECT_SQL} WHERE owner_uuid = ?1 AND category = ?2 {ENTRY_ORDER_SQL};"
                );
                self.query_entries(&sql, params![owner.to_string(), category.as_str()])
            }
            None => {
                let sql = format!("{ENTRY_SELECT_SQL} WHERE owner_uuid = ?1 {ENTRY_ORDER_SQL};");
                self.query_entries(&sql, params![owner.to_string()])
            }
        }
    }

    fn delete_entry(&self, owner: OwnerId, id: JournalEntryId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM journal_entries WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<JournalEntry> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    let category_text: String = row.get("category")?;
    let category = match category_text.parse::<JournalCategory>() {
        Ok(category) if category.as_str() == category_text => category,
        _ => {
            return Err(RepoError::InvalidData(format!(
                "invalid category `{category_text}` in journal_entries.category"
            )));
        }
    };
    Ok(JournalEntry {
        id: parse_uuid(&uuid_text, "journal_entries.uuid")?,
        owner: parse_uuid(&owner_text, "journal_entries.owner_uuid")?,
        title: row.get("title")?,
        content: row.get("content")?,
        category,
        created_at: from_millis(row.get("created_at")?, "journal_entries.created_at")?,
        updated_at: from_millis(row.get("updated_at")?, "journal_entries.updated_at")?,
    })
}
