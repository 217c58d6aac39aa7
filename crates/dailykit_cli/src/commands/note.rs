//! Note commands.

use super::{CliResult, Context};
use clap::Subcommand;
use dailykit_core::{Note, NoteDraft, NoteService, SqliteNoteRepository};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum NoteAction {
    /// List notes, newest first
    List {
        /// Keep notes whose title or content contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Write a note
    Add {
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Replace a note's title and content
    Edit {
        /// Note id
        note: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Delete a note
    Rm {
        /// Note id
        note: Uuid,
    },
}

pub fn run(ctx: &Context, action: NoteAction) -> CliResult {
    let service = NoteService::new(SqliteNoteRepository::try_new(&ctx.conn)?);

    match action {
        NoteAction::List { search } => {
            let notes = service.list_notes(ctx.owner, search.as_deref())?;
            ctx.emit(&notes, || {
                if notes.is_empty() {
                    return "no notes found".to_string();
                }
                notes.iter().map(render).collect::<Vec<_>>().join("\n\n")
            })?;
        }
        NoteAction::Add { title, content } => {
            let note = service.create_note(ctx.owner, &NoteDraft::new(title, content))?;
            ctx.emit(&note, || render(&note))?;
        }
        NoteAction::Edit {
            note,
            title,
            content,
        } => {
            let note = service.update_note(ctx.owner, note, &NoteDraft::new(title, content))?;
            ctx.emit(&note, || render(&note))?;
        }
        NoteAction::Rm { note } => {
            service.delete_note(ctx.owner, note)?;
            ctx.emit(&note, || format!("deleted {note}"))?;
        }
    }
    Ok(())
}

fn render(note: &Note) -> String {
    format!(
        "{}  {}  {}\n  {}",
        note.title,
        note.updated_at.format("%Y-%m-%d %H:%M"),
        note.id,
        note.content.replace('\n', "\n  ")
    )
}
