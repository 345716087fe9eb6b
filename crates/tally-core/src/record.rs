//! Date-stamped records from every tracked domain.
//!
//! Date fields are kept as the raw strings the store returned. They are
//! resolved to calendar days by [`crate::placement`], which is where a bad
//! value turns into a dropped record rather than a failed request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{OwnerId, RecordId, ValidationError};

/// The record streams merged into a calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Mood,
    Activities,
    Media,
    Tasks,
    Events,
    Parks,
    Journals,
    Workouts,
    Github,
    HabitCompletions,
    Duolingo,
    Goals,
    Milestones,
    Relationship,
}

impl Domain {
    /// Every domain, in calendar column order.
    pub const ALL: [Self; 14] = [
        Self::Mood,
        Self::Activities,
        Self::Media,
        Self::Tasks,
        Self::Events,
        Self::Parks,
        Self::Journals,
        Self::Workouts,
        Self::Github,
        Self::HabitCompletions,
        Self::Duolingo,
        Self::Goals,
        Self::Milestones,
        Self::Relationship,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mood => "mood",
            Self::Activities => "activities",
            Self::Media => "media",
            Self::Tasks => "tasks",
            Self::Events => "events",
            Self::Parks => "parks",
            Self::Journals => "journals",
            Self::Workouts => "workouts",
            Self::Github => "github",
            Self::HabitCompletions => "habit_completions",
            Self::Duolingo => "duolingo",
            Self::Goals => "goals",
            Self::Milestones => "milestones",
            Self::Relationship => "relationship",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownDomain {
                value: s.to_string(),
            })
    }
}

/// A logged mood. One per day is expected; extras are kept in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub date: String,
    /// 1 (awful) to 5 (great).
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// An activity synced from a fitness platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessActivity {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub name: String,
    #[serde(default)]
    pub sport_type: String,
    /// Local start timestamp; only its date portion is used.
    pub start_date_local: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
}

/// A finished book, movie, show or game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    /// `book`, `movie`, `tv`, `game`, ...
    pub media_type: String,
    #[serde(default)]
    pub completed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<String>,
}

/// A calendar event, optionally spanning several days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    pub date: String,
    /// Inclusive last day for multi-day events.
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkVisit {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub name: String,
    #[serde(default)]
    pub visited: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalKind {
    /// Bound to a specific day via `daily_date`.
    Daily,
    /// Free-form, dated by its creation timestamp.
    General,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    pub journal_type: JournalKind,
    #[serde(default)]
    pub daily_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A planned or completed workout.
///
/// A completed workout can point at the fitness activity that recorded the
/// same session; summaries use that link to avoid counting it twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutActivity {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub workout_type: String,
    pub date: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_activity_id: Option<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubEvent {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub event_type: String,
    #[serde(default)]
    pub repo: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub habit_id: RecordId,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuolingoCompletion {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub title: String,
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: RecordId,
    pub owner_id: OwnerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub target_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_date: Option<String>,
}

/// A relationship log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEntry {
    pub id: RecordId,
    pub owner_id: OwnerId,
    /// `date`, `intimacy` or `milestone`.
    pub kind: String,
    /// Free-form subtype, e.g. the kind of date (`dinner`, `hike`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    pub date: String,
    /// 1-5; for intimacy entries this is the satisfaction rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_round_trips_through_str() {
        for domain in Domain::ALL {
            assert_eq!(domain.as_str().parse::<Domain>().unwrap(), domain);
        }
        assert!("weather".parse::<Domain>().is_err());
    }

    #[test]
    fn domain_serde_matches_as_str() {
        let json = serde_json::to_string(&Domain::HabitCompletions).unwrap();
        assert_eq!(json, "\"habit_completions\"");
    }

    #[test]
    fn journal_kind_tolerates_unknown_values() {
        let json = r#"{
            "id": "j-1",
            "owner_id": "alice",
            "title": "Notes",
            "journal_type": "weekly"
        }"#;
        let journal: Journal = serde_json::from_str(json).unwrap();
        assert_eq!(journal.journal_type, JournalKind::Other);
        assert!(journal.daily_date.is_none());
    }

    #[test]
    fn task_defaults_to_incomplete() {
        let json = r#"{"id": "t-1", "owner_id": "alice", "title": "Call mom"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.completed);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn record_rejects_empty_owner() {
        let json = r#"{"id": "d-1", "owner_id": "", "date": "2024-06-01"}"#;
        let result: Result<DuolingoCompletion, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
