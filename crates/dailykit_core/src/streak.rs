//! Habit streak engine.
//!
//! # Responsibility
//! - Decide whether a habit may be completed at a given instant.
//! - Compute the next streak value and completion timestamp.
//! - Derive display-only state and tier from stored fields.
//!
//! # Invariants
//! - Pure: no I/O, no clock reads. Callers pass `now`.
//! - Calendar days are UTC dates. Two instants are on the same day iff their
//!   UTC `(year, month, day)` match.
//! - A completion on the day after the last one extends the streak by one; a
//!   gap of two or more days restarts it at one.

use crate::model::habit::Habit;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Streak fields written by one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: u32,
    pub last_completed_at: DateTime<Utc>,
}

/// UTC calendar date of `instant`.
pub fn utc_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Whole UTC calendar days from `earlier` to `later`, ignoring time of day.
///
/// 23:59 on Monday to 00:01 on Tuesday is one day.
pub fn calendar_day_difference(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (utc_day(later) - utc_day(earlier)).num_days()
}

/// True iff the habit's last completion falls on `now`'s UTC day.
pub fn is_completed_today(habit: &Habit, now: DateTime<Utc>) -> bool {
    habit
        .last_completed_at
        .is_some_and(|last| utc_day(last) == utc_day(now))
}

/// Computes the streak state after completing `habit` at `now`.
///
/// Returns the current state unchanged when the habit was already completed
/// today, or when `now` lies on a day before the last completion (the clock
/// went backwards; history is not rewritten).
///
/// Otherwise:
/// - never completed, or last completed yesterday: `streak + 1`
/// - last completed two or more days ago: `1`
pub fn compute_next_streak(habit: &Habit, now: DateTime<Utc>) -> StreakUpdate {
    let Some(last) = habit.last_completed_at else {
        return StreakUpdate {
            streak: habit.streak.saturating_add(1),
            last_completed_at: now,
        };
    };

    match calendar_day_difference(now, last) {
        days if days <= 0 => StreakUpdate {
            streak: habit.streak,
            last_completed_at: last,
        },
        1 => StreakUpdate {
            streak: habit.streak.saturating_add(1),
            last_completed_at: now,
        },
        _ => StreakUpdate {
            streak: 1,
            last_completed_at: now,
        },
    }
}

/// Read-time state of a habit. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitState {
    /// No completion recorded yet.
    Never,
    /// Completed on `now`'s UTC day; further completions are no-ops.
    CompletedToday,
    /// Completed before, but not today.
    Lapsed,
}

impl HabitState {
    pub fn derive(habit: &Habit, now: DateTime<Utc>) -> Self {
        match habit.last_completed_at {
            None => Self::Never,
            Some(_) if is_completed_today(habit, now) => Self::CompletedToday,
            Some(_) => Self::Lapsed,
        }
    }
}

/// Magnitude bucket for a streak, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTier {
    None,
    New,
    Building,
    Consistent,
    Strong,
    Excellent,
    Champion,
}

impl StreakTier {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0 => Self::None,
            1..=2 => Self::New,
            3..=6 => Self::Building,
            7..=13 => Self::Consistent,
            14..=20 => Self::Strong,
            21..=29 => Self::Excellent,
            _ => Self::Champion,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::New => "new",
            Self::Building => "building",
            Self::Consistent => "consistent",
            Self::Strong => "strong",
            Self::Excellent => "excellent",
            Self::Champion => "champion",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::None | Self::New => "💙",
            Self::Building => "🌟",
            Self::Consistent => "💪",
            Self::Strong => "⭐",
            Self::Excellent => "🔥",
            Self::Champion => "🏆",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_day_difference, compute_next_streak, is_completed_today, HabitState, StreakTier,
    };
    use crate::model::habit::Habit;
    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, minute, 0).unwrap()
    }

    fn habit(streak: u32, last: Option<DateTime<Utc>>) -> Habit {
        Habit {
            id: Uuid::new_v4(),
            owner: Uuid::nil(),
            title: "Stretch".to_string(),
            streak,
            last_completed_at: last,
            created_at: at(1, 0, 0),
        }
    }

    #[test]
    fn never_completed_habit_starts_at_one() {
        let fresh = habit(0, None);
        let now = at(6, 9, 30);
        assert!(!is_completed_today(&fresh, now));

        let next = compute_next_streak(&fresh, now);
        assert_eq!(next.streak, 1);
        assert_eq!(next.last_completed_at, now);
    }

    #[test]
    fn day_difference_ignores_time_of_day() {
        assert_eq!(calendar_day_difference(at(7, 0, 1), at(6, 23, 59)), 1);
        assert_eq!(calendar_day_difference(at(6, 23, 59), at(6, 0, 0)), 0);
        assert_eq!(calendar_day_difference(at(9, 0, 0), at(6, 12, 0)), 3);
    }

    #[test]
    fn consecutive_day_extends_streak() {
        let current = habit(4, Some(at(6, 22, 0)));
        let next = compute_next_streak(&current, at(7, 6, 0));
        assert_eq!(next.streak, 5);
    }

    #[test]
    fn gap_of_two_or_more_days_resets_to_one() {
        for prior in [1, 9, 40] {
            let current = habit(prior, Some(at(6, 8, 0)));
            assert_eq!(compute_next_streak(&current, at(8, 8, 0)).streak, 1);
            assert_eq!(compute_next_streak(&current, at(20, 8, 0)).streak, 1);
        }
    }

    #[test]
    fn same_day_repeat_is_a_no_op() {
        let last = at(6, 7, 0);
        let current = habit(3, Some(last));
        let now = at(6, 21, 0);
        assert!(is_completed_today(&current, now));

        let next = compute_next_streak(&current, now);
        assert_eq!(next.streak, 3);
        assert_eq!(next.last_completed_at, last);
    }

    #[test]
    fn clock_behind_last_completion_leaves_state_alone() {
        let last = at(10, 7, 0);
        let current = habit(2, Some(last));
        let next = compute_next_streak(&current, at(8, 7, 0));
        assert_eq!(next.streak, 2);
        assert_eq!(next.last_completed_at, last);
    }

    #[test]
    fn state_is_derived_from_last_completion() {
        let now = at(6, 12, 0);
        assert_eq!(HabitState::derive(&habit(0, None), now), HabitState::Never);
        assert_eq!(
            HabitState::derive(&habit(1, Some(at(6, 1, 0))), now),
            HabitState::CompletedToday
        );
        assert_eq!(
            HabitState::derive(&habit(1, Some(at(5, 23, 0))), now),
            HabitState::Lapsed
        );
    }

    #[test]
    fn tiers_follow_streak_magnitude() {
        let expected = [
            (0, StreakTier::None),
            (2, StreakTier::New),
            (3, StreakTier::Building),
            (7, StreakTier::Consistent),
            (14, StreakTier::Strong),
            (21, StreakTier::Excellent),
            (30, StreakTier::Champion),
            (365, StreakTier::Champion),
        ];
        for (streak, tier) in expected {
            assert_eq!(StreakTier::for_streak(streak), tier, "streak {streak}");
        }
        assert!(StreakTier::Champion > StreakTier::Excellent);
        assert_eq!(StreakTier::for_streak(30).emoji(), "🏆");
    }
}
