//! `dailykit` command-line entry point.
//!
//! # Responsibility
//! - Load configuration, start logging and open the Store.
//! - Dispatch each subcommand to its core service.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "dailykit", version, about = "Habits, plans, events, notes, journal and chat history")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, default_value = "dailykit.toml")]
    config: PathBuf,
    /// Database path, overriding the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Daily habits and streaks
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Action plans (checklists)
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Calendar events
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Free-text notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Categorized journal entries
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Assistant chat history
    Chat {
        #[command(subcommand)]
        action: commands::chat::ChatAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = commands::Context::load(&cli.config, cli.db, cli.json).and_then(|ctx| {
        match cli.command {
            Commands::Habit { action } => commands::habit::run(&ctx, action),
            Commands::Plan { action } => commands::plan::run(&ctx, action),
            Commands::Event { action } => commands::event::run(&ctx, action),
            Commands::Note { action } => commands::note::run(&ctx, action),
            Commands::Journal { action } => commands::journal::run(&ctx, action),
            Commands::Chat { action } => commands::chat::run(&ctx, action),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
