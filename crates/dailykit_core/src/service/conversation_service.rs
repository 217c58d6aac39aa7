//! Chat history use-case service.
//!
//! # Responsibility
//! - Persist user/assistant exchanges produced by the external assistant.
//! - Group history into UTC-day transcripts and clear one day at a time.
//! - Split assistant text into emphasis spans for rendering.
//!
//! # Invariants
//! - Day boundaries are UTC: a day covers `00:00:00.000Z..=23:59:59.999Z`.
//! - History lists the newest day first; order within a day follows
//!   `created_at`.

use crate::clock::{Clock, SystemClock};
use crate::model::conversation::{ConversationDay, ConversationExchange, NewExchange};
use crate::model::{OwnerId, ValidationError};
use crate::repo::conversation_repo::ConversationRepository;
use crate::service::{logged, ServiceResult};
use crate::streak::utc_day;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MODULE: &str = "conversation_service";

static EMPHASIS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*|__(.*?)__").expect("valid emphasis regex"));

/// Rendering unit of an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum MessageSpan {
    Plain(String),
    /// Text wrapped in `**...**`.
    Bold(String),
    /// Text wrapped in `__...__`.
    Italic(String),
}

/// Use-case facade for chat history.
pub struct ConversationService<R: ConversationRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: ConversationRepository> ConversationService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: ConversationRepository, C: Clock> ConversationService<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Stores one exchange stamped with the service clock.
    ///
    /// # Errors
    /// - `Validation` when the user message is blank.
    pub fn record_exchange(
        &self,
        owner: OwnerId,
        request: &NewExchange,
    ) -> ServiceResult<ConversationExchange> {
        let request = request
            .normalized()
            .map_err(logged(MODULE, "chat_record"))?;
        let exchange = self
            .repo
            .insert_exchange(owner, &request, self.clock.now())
            .map_err(logged(MODULE, "chat_record"))?;
        info!(
            "event=chat_record module={MODULE} status=ok exchange_id={} keywords={}",
            exchange.id,
            exchange.keywords.len()
        );
        Ok(exchange)
    }

    /// Full history grouped by UTC day, newest day first.
    pub fn history(&self, owner: OwnerId) -> ServiceResult<Vec<ConversationDay>> {
        let exchanges = self
            .repo
            .list_exchanges(owner)
            .map_err(logged(MODULE, "chat_history"))?;
        Ok(group_by_day(&exchanges))
    }

    /// Deletes every exchange recorded on `day` (UTC) and returns the count.
    ///
    /// # Errors
    /// - `Validation` for the last representable date, which has no end.
    pub fn clear_day(&self, owner: OwnerId, day: NaiveDate) -> ServiceResult<usize> {
        let (start, end) = day_bounds(day).map_err(logged(MODULE, "chat_clear_day"))?;
        let removed = self
            .repo
            .delete_exchanges_between(owner, start, end)
            .map_err(logged(MODULE, "chat_clear_day"))?;
        info!(
            "event=chat_clear_day module={MODULE} status=ok day={} removed={}",
            day, removed
        );
        Ok(removed)
    }
}

/// First and last millisecond of a UTC day.
fn day_bounds(day: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    let next = day
        .succ_opt()
        .ok_or(ValidationError::DateOutOfRange(day))?;
    let start = day.and_time(NaiveTime::default()).and_utc();
    let end = next.and_time(NaiveTime::default()).and_utc() - Duration::milliseconds(1);
    Ok((start, end))
}

/// Groups exchanges (already sorted by `created_at`) into day transcripts,
/// newest day first.
pub fn group_by_day(exchanges: &[ConversationExchange]) -> Vec<ConversationDay> {
    let mut days: Vec<ConversationDay> = Vec::new();
    for exchange in exchanges {
        let day = utc_day(exchange.created_at);
        match days.last_mut() {
            Some(current) if current.day == day => {
                current.messages.extend(exchange.messages());
            }
            _ => days.push(ConversationDay {
                day,
                messages: exchange.messages().to_vec(),
            }),
        }
    }
    days.reverse();
    days
}

/// Splits `**bold**` and `__italic__` runs out of `text`.
///
/// Markers are matched lazily on a single line; unmatched markers stay in the
/// plain text.
pub fn format_message(text: &str) -> Vec<MessageSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    for caps in EMPHASIS_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > cursor {
            spans.push(MessageSpan::Plain(text[cursor..whole.start()].to_string()));
        }
        if let Some(bold) = caps.get(1) {
            spans.push(MessageSpan::Bold(bold.as_str().to_string()));
        } else if let Some(italic) = caps.get(2) {
            spans.push(MessageSpan::Italic(italic.as_str().to_string()));
        }
        cursor = whole.end();
    }

    if cursor < text.len() {
        spans.push(MessageSpan::Plain(text[cursor..].to_string()));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::{day_bounds, format_message, MessageSpan};
    use crate::model::ValidationError;
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn day_bounds_cover_whole_utc_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let (start, end) = day_bounds(day).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()
                + chrono::Duration::milliseconds(999)
        );
    }

    #[test]
    fn last_representable_day_is_rejected() {
        assert_eq!(
            day_bounds(NaiveDate::MAX),
            Err(ValidationError::DateOutOfRange(NaiveDate::MAX))
        );
        assert!(day_bounds(NaiveDate::MIN).is_ok());
    }

    #[test]
    fn format_message_splits_bold_and_italic_runs() {
        let spans = format_message("Drink **water** and __rest__ today");
        assert_eq!(
            spans,
            vec![
                MessageSpan::Plain("Drink ".to_string()),
                MessageSpan::Bold("water".to_string()),
                MessageSpan::Plain(" and ".to_string()),
                MessageSpan::Italic("rest".to_string()),
                MessageSpan::Plain(" today".to_string()),
            ]
        );
    }

    #[test]
    fn unmatched_markers_stay_plain() {
        assert_eq!(
            format_message("2 ** 3"),
            vec![MessageSpan::Plain("2 ** 3".to_string())]
        );
        assert!(format_message("").is_empty());
    }

    #[test]
    fn markers_do_not_span_lines() {
        let spans = format_message("**open\nclosed**");
        assert_eq!(spans, vec![MessageSpan::Plain("**open\nclosed**".to_string())]);
    }
}
