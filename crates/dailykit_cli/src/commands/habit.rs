//! Habit commands.

use super::{CliResult, Context};
use chrono::{DateTime, Utc};
use clap::Subcommand;
use dailykit_core::{Habit, HabitService, HabitState, SqliteHabitRepository, StreakTier};
use serde::Serialize;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits, newest first
    List,
    /// Create a habit
    Add {
        /// Habit title
        title: String,
    },
    /// Mark a habit done for today
    Done {
        /// Habit id
        id: Uuid,
    },
    /// Delete a habit
    Rm {
        /// Habit id
        id: Uuid,
    },
}

/// A habit plus its read-time state and tier.
#[derive(Serialize)]
struct HabitView<'a> {
    #[serde(flatten)]
    habit: &'a Habit,
    state: HabitState,
    tier: StreakTier,
}

impl<'a> HabitView<'a> {
    fn new(habit: &'a Habit, now: DateTime<Utc>) -> Self {
        Self {
            habit,
            state: HabitState::derive(habit, now),
            tier: StreakTier::for_streak(habit.streak),
        }
    }
}

pub fn run(ctx: &Context, action: HabitAction) -> CliResult {
    let service = HabitService::new(SqliteHabitRepository::try_new(&ctx.conn)?);
    let now = service.now();

    match action {
        HabitAction::List => {
            let habits = service.list_habits(ctx.owner)?;
            let views: Vec<HabitView<'_>> = habits
                .iter()
                .map(|habit| HabitView::new(habit, now))
                .collect();
            ctx.emit(&views, || {
                if views.is_empty() {
                    return "no habits yet".to_string();
                }
                views.iter().map(render).collect::<Vec<_>>().join("\n")
            })?;
        }
        HabitAction::Add { title } => {
            let habit = service.create_habit(ctx.owner, &title)?;
            let created = HabitView::new(&habit, now);
            ctx.emit(&created, || format!("created {}", render(&created)))?;
        }
        HabitAction::Done { id } => {
            let habit = service.complete_habit(ctx.owner, id)?;
            let done = HabitView::new(&habit, now);
            ctx.emit(&done, || render(&done))?;
        }
        HabitAction::Rm { id } => {
            service.delete_habit(ctx.owner, id)?;
            ctx.emit(&id, || format!("deleted {id}"))?;
        }
    }
    Ok(())
}

fn render(view: &HabitView<'_>) -> String {
    let mark = match view.state {
        HabitState::CompletedToday => "[x]",
        HabitState::Never | HabitState::Lapsed => "[ ]",
    };
    format!(
        "{mark} {} {} streak={} ({})  {}",
        view.tier.emoji(),
        view.habit.title,
        view.habit.streak,
        view.tier.label(),
        view.habit.id
    )
}
