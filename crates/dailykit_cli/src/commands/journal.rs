//! Journal (notebook) commands.

use super::{CliResult, Context};
use clap::Subcommand;
use dailykit_core::{
    JournalCategory, JournalDraft, JournalEntry, JournalService, SqliteJournalRepository,
};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum JournalAction {
    /// List entries, newest first
    List {
        /// personal, study, thoughts or goals
        #[arg(long)]
        category: Option<JournalCategory>,
    },
    /// Write an entry
    Add {
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "personal")]
        category: JournalCategory,
    },
    /// Replace an entry's title, content and category
    Edit {
        /// Entry id
        entry: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "personal")]
        category: JournalCategory,
    },
    /// Delete an entry
    Rm {
        /// Entry id
        entry: Uuid,
    },
}

pub fn run(ctx: &Context, action: JournalAction) -> CliResult {
    let service = JournalService::new(SqliteJournalRepository::try_new(&ctx.conn)?);

    match action {
        JournalAction::List { category } => {
            let entries = service.list_entries(ctx.owner, category)?;
            ctx.emit(&entries, || {
                if entries.is_empty() {
                    return "no entries yet".to_string();
                }
                entries.iter().map(render).collect::<Vec<_>>().join("\n\n")
            })?;
        }
        JournalAction::Add {
            title,
            content,
            category,
        } => {
            let entry =
                service.create_entry(ctx.owner, &JournalDraft::new(title, content, category))?;
            ctx.emit(&entry, || render(&entry))?;
        }
        JournalAction::Edit {
            entry,
            title,
            content,
            category,
        } => {
            let entry = service.update_entry(
                ctx.owner,
                entry,
                &JournalDraft::new(title, content, category),
            )?;
            ctx.emit(&entry, || render(&entry))?;
        }
        JournalAction::Rm { entry } => {
            service.delete_entry(ctx.owner, entry)?;
            ctx.emit(&entry, || format!("deleted {entry}"))?;
        }
    }
    Ok(())
}

fn render(entry: &JournalEntry) -> String {
    format!(
        "{} {} [{}]  {}  {}\n  {}",
        entry.category.emoji(),
        entry.title,
        entry.category.label(),
        entry.created_at.format("%Y-%m-%d"),
        entry.id,
        entry.content.replace('\n', "\n  ")
    )
}
