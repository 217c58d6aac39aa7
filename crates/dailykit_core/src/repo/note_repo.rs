//! Note repository contract and SQLite implementation.
//!
//! # Invariants
//! - Notes are listed newest first (`created_at DESC`).
//! - An edit never moves `updated_at` before `created_at`.

use crate::db::ensure_tables;
use crate::model::note::{Note, NoteDraft, NoteId};
use crate::model::OwnerId;
use crate::repo::{from_millis, parse_uuid, stored_instant, to_millis, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    owner_uuid,
    title,
    content,
    created_at,
    updated_at
FROM notes";

/// Store contract for free-text notes.
pub trait NoteRepository {
    fn insert_note(
        &self,
        owner: OwnerId,
        draft: &NoteDraft,
        created_at: DateTime<Utc>,
    ) -> RepoResult<Note>;
    /// Replaces title and content, returning the note as stored.
    fn update_note(
        &self,
        owner: OwnerId,
        id: NoteId,
        draft: &NoteDraft,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<Note>;
    fn get_note(&self, owner: OwnerId, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists the owner's notes, newest first.
    fn list_notes(&self, owner: OwnerId) -> RepoResult<Vec<Note>>;
    fn delete_note(&self, owner: OwnerId, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["notes"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(
        &self,
        owner: OwnerId,
        draft: &NoteDraft,
        created_at: DateTime<Utc>,
    ) -> RepoResult<Note> {
        let draft = draft.normalized()?;
        let created_at = stored_instant(created_at);
        let note = Note {
            id: Uuid::new_v4(),
            owner,
            title: draft.title,
            content: draft.content,
            created_at,
            updated_at: created_at,
        };

        self.conn.execute(
            "INSERT INTO notes (uuid, owner_uuid, title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
            params![
                note.id.to_string(),
                owner.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                to_millis(created_at),
            ],
        )?;
        Ok(note)
    }

    fn update_note(
        &self,
        owner: OwnerId,
        id: NoteId,
        draft: &NoteDraft,
        updated_at: DateTime<Utc>,
    ) -> RepoResult<Note> {
        let draft = draft.normalized()?;
        let changed = self.conn.execute(
            "UPDATE notes
             SET title = ?1,
                 content = ?2,
                 updated_at = MAX(created_at, ?3)
             WHERE uuid = ?4
               AND owner_uuid = ?5;",
            params![
                draft.title.as_str(),
                draft.content.as_str(),
                to_millis(updated_at),
                id.to_string(),
                owner.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        self.get_note(owner, id)?.ok_or(RepoError::NotFound(id))
    }

    fn get_note(&self, owner: OwnerId, id: NoteId) -> RepoResult<Option<Note>> {
        let sql = format!("{NOTE_SELECT_SQL} WHERE uuid = ?1 AND owner_uuid = ?2;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params![id.to_string(), owner.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_notes(&self, owner: OwnerId) -> RepoResult<Vec<Note>> {
        let sql = format!(
            "{NOTE_SELECT_SQL} WHERE owner_uuid = ?1 ORDER BY created_at DESC, uuid ASC;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn delete_note(&self, owner: OwnerId, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE uuid = ?1 AND owner_uuid = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    Ok(Note {
        id: parse_uuid(&uuid_text, "notes.uuid")?,
        owner: parse_uuid(&owner_text, "notes.owner_uuid")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: from_millis(row.get("created_at")?, "notes.created_at")?,
        updated_at: from_millis(row.get("updated_at")?, "notes.updated_at")?,
    })
}
