//! Conversation history repository contract and SQLite implementation.
//!
//! # Invariants
//! - Exchanges are listed oldest first (`created_at ASC, uuid ASC`).
//! - Keywords are stored newline-joined; normalized keywords never contain a
//!   newline, so the encoding is lossless.

use crate::db::ensure_tables;
use crate::model::conversation::{ConversationExchange, NewExchange};
use crate::model::OwnerId;
use crate::repo::{from_millis, parse_uuid, stored_instant, to_millis, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const KEYWORD_SEPARATOR: &str = "\n";

/// Store contract for chat exchanges.
pub trait ConversationRepository {
    fn insert_exchange(
        &self,
        owner: OwnerId,
        exchange: &NewExchange,
        created_at: DateTime<Utc>,
    ) -> RepoResult<ConversationExchange>;
    /// All exchanges of the owner, oldest first.
    fn list_exchanges(&self, owner: OwnerId) -> RepoResult<Vec<ConversationExchange>>;
    /// Deletes exchanges created within `[start, end]` and returns how many
    /// rows were removed.
    fn delete_exchanges_between(
        &self,
        owner: OwnerId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<usize>;
}

/// SQLite-backed conversation repository.
pub struct SqliteConversationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteConversationRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["conversations"])?;
        Ok(Self { conn })
    }
}

impl ConversationRepository for SqliteConversationRepository<'_> {
    fn insert_exchange(
        &self,
        owner: OwnerId,
        exchange: &NewExchange,
        created_at: DateTime<Utc>,
    ) -> RepoResult<ConversationExchange> {
        let exchange = exchange.normalized()?;
        let created = ConversationExchange {
            id: Uuid::new_v4(),
            owner,
            message: exchange.message,
            response: exchange.response,
            context_type: exchange.context_type,
            keywords: exchange.keywords,
            created_at: stored_instant(created_at),
        };

        self.conn.execute(
            "INSERT INTO conversations (
                uuid,
                owner_uuid,
                message,
                response,
                context_type,
                keywords,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                created.id.to_string(),
                owner.to_string(),
                created.message.as_str(),
                created.response.as_str(),
                created.context_type.as_deref(),
                created.keywords.join(KEYWORD_SEPARATOR),
                to_millis(created_at),
            ],
        )?;

        Ok(created)
    }

    fn list_exchanges(&self, owner: OwnerId) -> RepoResult<Vec<ConversationExchange>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, owner_uuid, message, response, context_type, keywords, created_at
             FROM conversations
             WHERE owner_uuid = ?1
             ORDER BY created_at ASC, uuid ASC;",
        )?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut exchanges = Vec::new();
        while let Some(row) = rows.next()? {
            exchanges.push(parse_exchange_row(row)?);
        }
        Ok(exchanges)
    }

    fn delete_exchanges_between(
        &self,
        owner: OwnerId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM conversations
             WHERE owner_uuid = ?1
               AND created_at >= ?2
               AND created_at <= ?3;",
            params![owner.to_string(), to_millis(start), to_millis(end)],
        )?;
        Ok(removed)
    }
}

fn parse_exchange_row(row: &Row<'_>) -> RepoResult<ConversationExchange> {
    let uuid_text: String = row.get("uuid")?;
    let owner_text: String = row.get("owner_uuid")?;
    let keywords_text: String = row.get("keywords")?;
    let keywords = keywords_text
        .split(KEYWORD_SEPARATOR)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ConversationExchange {
        id: parse_uuid(&uuid_text, "conversations.uuid")?,
        owner: parse_uuid(&owner_text, "conversations.owner_uuid")?,
        message: row.get("message")?,
        response: row.get("response")?,
        context_type: row.get("context_type")?,
        keywords,
        created_at: from_millis(row.get("created_at")?, "conversations.created_at")?,
    })
}
