//! Core domain logic for the dashboard.
//!
//! This crate contains the fundamental types and logic for:
//! - Calendar: merging per-domain record streams into one day-indexed view
//! - Summary: per-day counts and previews for grid views
//! - Habits: streak statistics under frequency-specific gap tolerance
//! - Achievements: progress recomputation and one-way unlocks

pub mod achievement;
pub mod calendar;
pub mod dates;
pub mod error;
pub mod habit;
pub mod placement;
pub mod record;
pub mod summary;
pub mod types;

pub use achievement::{
    Achievement, AchievementDispatcher, AchievementEngine, Category, CounterSource,
    EvaluationReport, Metric, ProgressStore, StoredProgress,
};
pub use calendar::{
    Calendar, CalendarDay, CalendarSource, SourceRecords, bucket, build_calendar, build_month,
};
pub use dates::DateRange;
pub use error::{AchievementError, MalformedRecord, SourceError};
pub use habit::{Frequency, Habit, HabitRepository, HabitStats, compute_habit_stats};
pub use record::Domain;
pub use summary::{CalendarDaySummary, summarize, summarize_calendar};
pub use types::{OwnerId, RecordId, ValidationError};
