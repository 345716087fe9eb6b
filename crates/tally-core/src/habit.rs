//! Habit streak calculator.
//!
//! # Algorithm Summary
//!
//! 1. Collapse the completion history to a sorted set of distinct dates
//! 2. The current streak is alive only if the most recent completion is within
//!    the frequency's alive window of `today`; it then extends backward while
//!    consecutive completions are at most `max_gap_days` apart
//! 3. The longest streak is the longest such run anywhere in the history

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::types::{OwnerId, RecordId};

/// How often a habit is meant to be done.
///
/// Unrecognized values are kept verbatim and fall back to the daily policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Daily,
    EveryOtherDay,
    ThreeTimesAWeek,
    OnceAWeek,
    EveryWeek,
    Monthly,
    Other(String),
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Daily => "daily",
            Self::EveryOtherDay => "every_other_day",
            Self::ThreeTimesAWeek => "three_times_a_week",
            Self::OnceAWeek => "once_a_week",
            Self::EveryWeek => "every_week",
            Self::Monthly => "monthly",
            Self::Other(value) => value,
        }
    }

    /// Gap tolerance for this frequency.
    pub fn policy(&self) -> StreakPolicy {
        match self {
            Self::Daily | Self::Other(_) => StreakPolicy::uniform(1),
            Self::EveryOtherDay => StreakPolicy::uniform(2),
            Self::ThreeTimesAWeek | Self::OnceAWeek | Self::EveryWeek => StreakPolicy::uniform(7),
            Self::Monthly => StreakPolicy::uniform(31),
        }
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.as_str() {
            "daily" => Self::Daily,
            "every_other_day" => Self::EveryOtherDay,
            "three_times_a_week" => Self::ThreeTimesAWeek,
            "once_a_week" => Self::OnceAWeek,
            "every_week" => Self::EveryWeek,
            "monthly" => Self::Monthly,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Frequency {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.as_str().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gap tolerance used to decide whether two completions belong to one streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakPolicy {
    /// Largest day difference between consecutive completions in a streak.
    pub max_gap_days: i64,
    /// Largest day difference between the last completion and today for the
    /// current streak to still count.
    pub alive_window_days: i64,
}

impl StreakPolicy {
    pub const fn uniform(days: i64) -> Self {
        Self {
            max_gap_days: days,
            alive_window_days: days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    pub frequency: Frequency,
    /// Completions per period the owner aims for.
    #[serde(default = "default_target")]
    pub target: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_target() -> u32 {
    1
}

const fn default_active() -> bool {
    true
}

/// Derived habit statistics. Recomputed on demand, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub days_existed: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
}

/// Computes streaks and totals for one habit as of `today`.
///
/// Duplicate dates count once. Completions dated after `today` are kept and
/// treated as a zero-day gap.
pub fn compute_habit_stats(
    habit: &Habit,
    completions: &[NaiveDate],
    today: NaiveDate,
) -> HabitStats {
    let dates: BTreeSet<NaiveDate> = completions.iter().copied().collect();
    let policy = habit.frequency.policy();

    let created = habit.created_at.date_naive();
    let days_existed = if created > today {
        0
    } else {
        saturating_u32((today - created).num_days() + 1)
    };

    HabitStats {
        days_existed,
        current_streak: current_run(&dates, policy, today),
        longest_streak: longest_run(&dates, policy),
        total_completions: u32::try_from(dates.len()).unwrap_or(u32::MAX),
    }
}

/// Length of the longest run of dates whose consecutive gaps fit `policy`.
pub fn longest_run(dates: &BTreeSet<NaiveDate>, policy: StreakPolicy) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &date in dates {
        run = match previous {
            Some(prev) if (date - prev).num_days() <= policy.max_gap_days => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }
    longest
}

/// Length of the run ending at the most recent date, or 0 if that date is
/// outside the alive window.
pub fn current_run(dates: &BTreeSet<NaiveDate>, policy: StreakPolicy, today: NaiveDate) -> u32 {
    let Some(&last) = dates.last() else {
        return 0;
    };
    if (today - last).num_days().max(0) > policy.alive_window_days {
        return 0;
    }

    let mut run = 1;
    let mut next = last;
    for &date in dates.iter().rev().skip(1) {
        if (next - date).num_days() > policy.max_gap_days {
            break;
        }
        run += 1;
        next = date;
    }
    run
}

/// Computes stats for many habits at once.
pub fn compute_all(
    habits: &[(Habit, Vec<NaiveDate>)],
    today: NaiveDate,
) -> Vec<HabitStats> {
    habits
        .par_iter()
        .map(|(habit, completions)| compute_habit_stats(habit, completions, today))
        .collect()
}

fn saturating_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// Read access to habits and their completion history.
#[async_trait]
pub trait HabitRepository: Send + Sync {
    /// Habits owned by `owner`, inactive ones included.
    async fn habits(&self, owner: &OwnerId) -> Result<Vec<Habit>, SourceError>;

    /// Every date the habit was completed, in any order.
    async fn completion_dates(&self, habit_id: &RecordId) -> Result<Vec<NaiveDate>, SourceError>;
}

/// Loads every habit of `owner` and computes its stats.
pub async fn owner_habit_stats<R: HabitRepository + ?Sized>(
    repo: &R,
    owner: &OwnerId,
    today: NaiveDate,
) -> Result<Vec<(Habit, HabitStats)>, SourceError> {
    let habits = repo.habits(owner).await?;
    let mut histories = Vec::with_capacity(habits.len());
    for habit in habits {
        let dates = repo.completion_dates(&habit.id).await?;
        histories.push((habit, dates));
    }

    let stats = compute_all(&histories, today);
    tracing::debug!(owner = %owner, habits = stats.len(), "computed habit stats");
    Ok(histories
        .into_iter()
        .map(|(habit, _)| habit)
        .zip(stats)
        .collect())
}
