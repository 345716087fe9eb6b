//! Achievement catalog, progress engine and background dispatcher.
//!
//! Progress is always recomputed from scratch by measuring the metric each
//! achievement is bound to. Unlocking is one-way: once an (owner,
//! achievement) pair is unlocked it stays unlocked and keeps its original
//! `unlocked_at`.

mod catalog;
mod dispatcher;
mod engine;
mod store;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::record::Domain;
use crate::types::ValidationError;

pub use catalog::{CATALOG, find, in_category};
pub use dispatcher::AchievementDispatcher;
pub use engine::{
    AchievementEngine, AchievementStatus, CounterSource, EvaluationReport, FailedUpdate,
    ProgressStore, ProgressUpdate, SkippedMetric, StoredProgress,
};
pub use store::MemoryProgressStore;

/// Achievement grouping; evaluation always runs for one whole category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Mood,
    Media,
    Habits,
    Tasks,
    Parks,
    Journal,
    Exercise,
    Duolingo,
    Relationship,
    Vacations,
}

impl Category {
    pub const ALL: [Self; 10] = [
        Self::Mood,
        Self::Media,
        Self::Habits,
        Self::Tasks,
        Self::Parks,
        Self::Journal,
        Self::Exercise,
        Self::Duolingo,
        Self::Relationship,
        Self::Vacations,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mood => "mood",
            Self::Media => "media",
            Self::Habits => "habits",
            Self::Tasks => "tasks",
            Self::Parks => "parks",
            Self::Journal => "journal",
            Self::Exercise => "exercise",
            Self::Duolingo => "duolingo",
            Self::Relationship => "relationship",
            Self::Vacations => "vacations",
        }
    }

    /// The category whose progress changes when records of `domain` change.
    pub const fn for_domain(domain: Domain) -> Option<Self> {
        match domain {
            Domain::Mood => Some(Self::Mood),
            Domain::Media => Some(Self::Media),
            Domain::Tasks => Some(Self::Tasks),
            Domain::Parks => Some(Self::Parks),
            Domain::Journals => Some(Self::Journal),
            Domain::Activities | Domain::Workouts => Some(Self::Exercise),
            Domain::HabitCompletions => Some(Self::Habits),
            Domain::Duolingo => Some(Self::Duolingo),
            Domain::Relationship => Some(Self::Relationship),
            Domain::Events | Domain::Github | Domain::Goals | Domain::Milestones => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownCategory {
                value: s.to_string(),
            })
    }
}

/// A measurable quantity achievement progress is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    MoodEntries,
    /// Mood entries recorded before 09:00.
    EarlyMoodEntries,
    /// Longest run of consecutive days with a mood entry.
    MoodStreak,
    BooksCompleted,
    MoviesCompleted,
    HabitCompletions,
    /// Longest streak of any of the owner's habits.
    HabitStreak,
    TasksCompletedToday,
    TasksCompleted,
    ParksVisited,
    Journals,
    /// Fitness activities plus completed workouts.
    Workouts,
    DuolingoCompletions,
    Dates,
    IntimacyEntries,
    /// Dates rated 5.
    PerfectDates,
    /// Distinct date subtypes.
    DateVariety,
    RelationshipMilestones,
    /// 1 with at least 10 rated intimacy entries averaging 4.5 or more.
    Blissful,
    VacationsPlanned,
    VacationsCompleted,
    /// Completed vacations rated 10.
    PerfectVacations,
    /// Completed vacations rated 9 or more.
    HighlyRatedVacations,
    VacationsWithinBudget,
    /// Completed trips of three days or less.
    ShortTrips,
    /// Completed trips of 14 days or more.
    LongHaulTrips,
    /// Completed trips of 30 days or more.
    EpicTrips,
    /// Distinct destinations of completed vacations.
    Destinations,
    /// Completed trips starting within 7 days of being created.
    SpontaneousTrips,
    /// Vacations created 90 or more days before they start.
    EarlyPlannedTrips,
    /// Completed trips costing 5000 or more.
    LuxuryTrips,
    /// Completed trips costing more than 0 and under 500.
    BackpackerTrips,
    VacationsWithPoster,
    VacationsWithNotes,
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub points: u32,
    pub target_value: i64,
    #[serde(skip)]
    pub metric: Metric,
}
