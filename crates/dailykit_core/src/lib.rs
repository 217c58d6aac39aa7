//! Core domain logic for dailykit.
//! This crate is the single source of truth for habit streak rules and the
//! Store contracts behind every productivity module.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod streak;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError, DatabaseConfig, LoggingConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::conversation::{
    ChatMessage, ChatRole, ConversationDay, ConversationExchange, NewExchange,
};
pub use model::event::{CalendarEvent, NewEvent};
pub use model::habit::{Habit, HabitId, NewHabit};
pub use model::journal::{JournalCategory, JournalDraft, JournalEntry, JournalEntryId};
pub use model::note::{Note, NoteDraft, NoteId};
pub use model::plan::{ActionPlan, NewPlan, PlanTask};
pub use model::{OwnerId, ValidationError};
pub use repo::conversation_repo::{ConversationRepository, SqliteConversationRepository};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::habit_repo::{HabitRepository, SqliteHabitRepository};
pub use repo::journal_repo::{JournalRepository, SqliteJournalRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::plan_repo::{PlanRepository, SqlitePlanRepository};
pub use repo::{RepoError, RepoResult};
pub use service::conversation_service::{format_message, ConversationService, MessageSpan};
pub use service::event_service::EventService;
pub use service::habit_service::HabitService;
pub use service::journal_service::JournalService;
pub use service::note_service::NoteService;
pub use service::plan_service::PlanService;
pub use service::{ServiceError, ServiceResult};
pub use streak::{HabitState, StreakTier, StreakUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
