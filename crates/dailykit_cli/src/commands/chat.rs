//! Chat history commands.

use super::{CliResult, Context};
use chrono::NaiveDate;
use clap::Subcommand;
use dailykit_core::{
    format_message, ChatRole, ConversationDay, ConversationService, MessageSpan, NewExchange,
    SqliteConversationRepository,
};
use serde_json::json;

#[derive(Subcommand)]
pub enum ChatAction {
    /// Store one user message and the assistant's response
    Record {
        #[arg(long)]
        message: String,
        #[arg(long)]
        response: String,
        /// Assistant context label, e.g. `habits`
        #[arg(long)]
        context: Option<String>,
        /// Topic keyword; repeat for several
        #[arg(long = "keyword")]
        keywords: Vec<String>,
    },
    /// Print the history grouped by day
    History,
    /// Delete every exchange recorded on a day
    Clear {
        /// Date as YYYY-MM-DD (UTC)
        date: NaiveDate,
    },
}

pub fn run(ctx: &Context, action: ChatAction) -> CliResult {
    let service = ConversationService::new(SqliteConversationRepository::try_new(&ctx.conn)?);

    match action {
        ChatAction::Record {
            message,
            response,
            context,
            keywords,
        } => {
            let exchange = service.record_exchange(
                ctx.owner,
                &NewExchange {
                    message,
                    response,
                    context_type: context,
                    keywords,
                },
            )?;
            ctx.emit(&exchange, || format!("recorded {}", exchange.id))?;
        }
        ChatAction::History => {
            let days = service.history(ctx.owner)?;
            ctx.emit(&days, || {
                if days.is_empty() {
                    return "no conversations yet".to_string();
                }
                days.iter().map(render_day).collect::<Vec<_>>().join("\n\n")
            })?;
        }
        ChatAction::Clear { date } => {
            let removed = service.clear_day(ctx.owner, date)?;
            ctx.emit(&json!({ "day": date, "removed": removed }), || {
                format!("removed {removed} exchange(s) from {date}")
            })?;
        }
    }
    Ok(())
}

fn render_day(day: &ConversationDay) -> String {
    let mut lines = vec![format!("== {} ==", day.day)];
    for message in &day.messages {
        let text = match message.role {
            ChatRole::User => format!("you: {}", message.text),
            ChatRole::Assistant => format!("assistant: {}", render_spans(&message.text)),
        };
        lines.push(text);
    }
    lines.join("\n")
}

fn render_spans(text: &str) -> String {
    format_message(text)
        .into_iter()
        .map(|span| match span {
            MessageSpan::Plain(text) => text,
            MessageSpan::Bold(text) => format!("\x1b[1m{text}\x1b[0m"),
            MessageSpan::Italic(text) => format!("\x1b[3m{text}\x1b[0m"),
        })
        .collect()
}
