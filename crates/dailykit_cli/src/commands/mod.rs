//! Subcommand handlers and the state they share.

pub mod chat;
pub mod event;
pub mod habit;
pub mod journal;
pub mod note;
pub mod plan;

use chrono::NaiveTime;
use dailykit_core::db::open_db;
use dailykit_core::{init_logging_from_config, AppConfig, OwnerId};
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};

pub type CliResult = Result<(), Box<dyn Error>>;

/// Loaded configuration plus an open Store connection.
pub struct Context {
    pub owner: OwnerId,
    pub conn: Connection,
    pub json: bool,
}

impl Context {
    pub fn load(
        config_path: &Path,
        db: Option<PathBuf>,
        json: bool,
    ) -> Result<Self, Box<dyn Error>> {
        let mut config = AppConfig::load(config_path)?;
        if let Some(path) = db {
            config.database.path = path;
        }

        if init_logging_from_config(&config.logging)? {
            info!(
                "event=cli_start module=cli status=ok version={}",
                dailykit_core::core_version()
            );
        }

        let conn = open_db(&config.database)?;
        Ok(Self {
            owner: config.owner_id,
            conn,
            json,
        })
    }

    /// Prints `value` as pretty JSON, or `text` otherwise.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> CliResult {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("invalid time `{value}`, expected HH:MM"))
}
