//! Summary compressor: lightweight per-day counts for grid views.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{Calendar, CalendarDay};
use crate::dates::parse_day;

/// Completed/overdue/upcoming split for tasks, goals and milestones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub completed: usize,
    pub overdue: usize,
    pub upcoming: usize,
}

impl StatusCounts {
    pub const fn total(&self) -> usize {
        self.completed + self.overdue + self.upcoming
    }

    /// Counts one item relative to `today`.
    ///
    /// Incomplete items without a usable due date are not counted.
    fn record(&mut self, completed: bool, due: Option<&str>, today: NaiveDate) {
        if completed {
            self.completed += 1;
            return;
        }
        match due.and_then(parse_day) {
            Some(due) if due < today => self.overdue += 1,
            Some(_) => self.upcoming += 1,
            None => {}
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkoutCounts {
    pub upcoming: usize,
    pub completed: usize,
}

/// Title and type of the item a grid cell highlights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub title: String,
    pub kind: String,
}

/// Counts and previews derived from one [`CalendarDay`].
///
/// A pure function of the day and `today`; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDaySummary {
    pub date: NaiveDate,
    pub mood_rating: Option<u8>,
    /// Fitness activities not already represented by a completed workout.
    pub activity_count: usize,
    pub media_count: usize,
    pub media_first: Option<Preview>,
    pub task_counts: StatusCounts,
    pub event_count: usize,
    pub event_first_title: Option<String>,
    pub park_count: usize,
    pub journal_count: usize,
    pub journal_first_title: Option<String>,
    pub workout_counts: WorkoutCounts,
    pub workout_first: Option<Preview>,
    pub github_event_count: usize,
    pub habit_count: usize,
    pub duolingo_completed: bool,
    pub goal_counts: StatusCounts,
    pub goal_first_title: Option<String>,
    pub milestone_counts: StatusCounts,
    pub milestone_first_title: Option<String>,
    pub relationship_count: usize,
    pub has_any_data: bool,
}

/// Compresses a day into counts and previews, categorizing tasks, goals and
/// milestones relative to `today`.
pub fn summarize(day: &CalendarDay, today: NaiveDate) -> CalendarDaySummary {
    let completed_workouts: Vec<_> = day.workouts.iter().filter(|w| w.completed).collect();
    let linked: HashSet<&str> = completed_workouts
        .iter()
        .filter_map(|w| w.fitness_activity_id.as_ref().map(|id| id.as_str()))
        .collect();
    let activity_count = day
        .activities
        .iter()
        .filter(|activity| !linked.contains(activity.id.as_str()))
        .count();

    let workout_counts = WorkoutCounts {
        upcoming: day.workouts.len() - completed_workouts.len(),
        completed: completed_workouts.len(),
    };
    let workout_first = completed_workouts.first().map(|workout| {
        let linked_activity = workout.fitness_activity_id.as_ref().and_then(|id| {
            day.activities
                .iter()
                .find(|activity| &activity.id == id)
        });
        Preview {
            title: linked_activity.map_or_else(|| workout.workout_type.clone(), |a| a.name.clone()),
            kind: workout.workout_type.clone(),
        }
    });

    let mut task_counts = StatusCounts::default();
    for task in &day.tasks {
        task_counts.record(task.completed, task.due_date.as_deref(), today);
    }
    let mut goal_counts = StatusCounts::default();
    for goal in &day.goals {
        goal_counts.record(goal.completed, goal.target_date.as_deref(), today);
    }
    let mut milestone_counts = StatusCounts::default();
    for milestone in &day.milestones {
        milestone_counts.record(milestone.completed, milestone.target_date.as_deref(), today);
    }

    let mut summary = CalendarDaySummary {
        date: day.date,
        mood_rating: day.mood.first().map(|mood| mood.rating),
        activity_count,
        media_count: day.media.len(),
        media_first: day.media.first().map(|item| Preview {
            title: item.title.clone(),
            kind: item.media_type.clone(),
        }),
        task_counts,
        event_count: day.events.len(),
        event_first_title: day.events.first().map(|event| event.title.clone()),
        park_count: day.parks.len(),
        journal_count: day.journals.len(),
        journal_first_title: day.journals.first().map(|journal| journal.title.clone()),
        workout_counts,
        workout_first,
        github_event_count: day.github_events.len(),
        habit_count: day.habit_completions.len(),
        duolingo_completed: !day.duolingo.is_empty(),
        goal_counts,
        goal_first_title: day.goals.first().map(|goal| goal.title.clone()),
        milestone_counts,
        milestone_first_title: day.milestones.first().map(|m| m.title.clone()),
        relationship_count: day.relationship.len(),
        has_any_data: false,
    };
    summary.has_any_data = summary.mood_rating.is_some()
        || summary.activity_count > 0
        || summary.media_count > 0
        || summary.task_counts.total() > 0
        || summary.event_count > 0
        || summary.park_count > 0
        || summary.journal_count > 0
        || summary.workout_counts.upcoming + summary.workout_counts.completed > 0
        || summary.github_event_count > 0
        || summary.habit_count > 0
        || summary.duolingo_completed
        || summary.goal_counts.total() > 0
        || summary.milestone_counts.total() > 0
        || summary.relationship_count > 0;
    summary
}

/// Summarizes every day of a calendar.
pub fn summarize_calendar(
    calendar: &Calendar,
    today: NaiveDate,
) -> BTreeMap<NaiveDate, CalendarDaySummary> {
    calendar
        .days()
        .map(|day| (day.date, summarize(day, today)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::record::{
        CalendarEvent, FitnessActivity, Goal, MediaItem, MoodEntry, Task, WorkoutActivity,
    };
    use crate::types::{OwnerId, RecordId};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn owner() -> OwnerId {
        OwnerId::new("alice").unwrap()
    }

    fn id(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    fn task(id_: &str, due: Option<&str>, completed: bool) -> Task {
        Task {
            id: id(id_),
            owner_id: owner(),
            title: id_.to_string(),
            due_date: due.map(String::from),
            completed,
            completed_date: completed.then(|| "2024-06-10".to_string()),
        }
    }

    fn activity(id_: &str, name: &str) -> FitnessActivity {
        FitnessActivity {
            id: id(id_),
            owner_id: owner(),
            name: name.into(),
            sport_type: "Run".into(),
            start_date_local: "2024-06-10T07:00:00".into(),
            distance_m: Some(5000.0),
        }
    }

    fn workout(id_: &str, completed: bool, linked: Option<&str>) -> WorkoutActivity {
        WorkoutActivity {
            id: id(id_),
            owner_id: owner(),
            workout_type: "run".into(),
            date: "2024-06-10".into(),
            completed,
            fitness_activity_id: linked.map(id),
        }
    }

    #[test]
    fn task_counts_relative_to_today() {
        let mut day = CalendarDay::new(d("2024-06-10"));
        day.tasks = vec![
            task("done-a", Some("2024-06-01"), true),
            task("done-b", None, true),
            task("late", Some("2024-06-09"), false),
            task("soon", Some("2024-06-10T12:00:00"), false),
        ];
        let summary = summarize(&day, d("2024-06-10"));
        assert_eq!(
            summary.task_counts,
            StatusCounts {
                completed: 2,
                overdue: 1,
                upcoming: 1
            }
        );
    }

    #[test]
    fn undated_incomplete_tasks_are_not_counted() {
        let mut day = CalendarDay::new(d("2024-06-10"));
        day.tasks = vec![task("floating", None, false), task("junk", Some("whenever"), false)];
        let summary = summarize(&day, d("2024-06-10"));
        assert_eq!(summary.task_counts.total(), 0);
        assert!(!summary.has_any_data);
    }

    #[test]
    fn categorization_uses_today_not_the_cell_date() {
        let mut day = CalendarDay::new(d("2024-06-20"));
        day.tasks = vec![task("future-cell", Some("2024-06-20"), false)];
        let summary = summarize(&day, d("2024-06-25"));
        assert_eq!(summary.task_counts.overdue, 1);
        assert_eq!(summary.task_counts.upcoming, 0);
    }

    #[test]
    fn linked_completed_workout_suppresses_its_activity() {
        let mut day = CalendarDay::new(d("2024-06-10"));
        day.activities = vec![activity("a1", "Morning Run"), activity("a2", "Evening Ride")];
        day.workouts = vec![workout("w1", true, Some("a1")), workout("w2", false, None)];

        let summary = summarize(&day, d("2024-06-10"));
        assert_eq!(summary.activity_count, 1);
        assert_eq!(
            summary.workout_counts,
            WorkoutCounts {
                upcoming: 1,
                completed: 1
            }
        );
        assert_eq!(
            summary.workout_first,
            Some(Preview {
                title: "Morning Run".into(),
                kind: "run".into()
            })
        );
    }

    #[test]
    fn link_from_incomplete_workout_does_not_suppress() {
        let mut day = CalendarDay::new(d("2024-06-10"));
        day.activities = vec![activity("a1", "Morning Run")];
        day.workouts = vec![workout("w1", false, Some("a1"))];
        let summary = summarize(&day, d("2024-06-10"));
        assert_eq!(summary.activity_count, 1);
        assert!(summary.workout_first.is_none());
    }

    #[test]
    fn goals_split_and_preview_first() {
        let goal = |id_: &str, target: Option<&str>, completed: bool| Goal {
            id: id(id_),
            owner_id: owner(),
            title: format!("Goal {id_}"),
            target_date: target.map(String::from),
            completed,
            completed_date: None,
        };
        let mut day = CalendarDay::new(d("2024-06-10"));
        day.goals = vec![
            goal("1", Some("2024-06-01"), false),
            goal("2", Some("2024-07-01"), false),
            goal("3", None, true),
        ];
        let summary = summarize(&day, d("2024-06-10"));
        assert_eq!(
            summary.goal_counts,
            StatusCounts {
                completed: 1,
                overdue: 1,
                upcoming: 1
            }
        );
        assert_eq!(summary.goal_first_title.as_deref(), Some("Goal 1"));
    }

    #[test]
    fn previews_and_counts() {
        let mut day = CalendarDay::new(d("2024-06-10"));
        day.mood = vec![MoodEntry {
            id: id("m1"),
            owner_id: owner(),
            date: "2024-06-10".into(),
            rating: 5,
            note: None,
            created_at: None,
        }];
        day.media = vec![MediaItem {
            id: id("b1"),
            owner_id: owner(),
            title: "Dune".into(),
            media_type: "book".into(),
            completed: Some("2024-06-10".into()),
        }];
        day.events = vec![CalendarEvent {
            id: id("e1"),
            owner_id: owner(),
            title: "Dentist".into(),
            date: "2024-06-10".into(),
            end_date: None,
        }];

        let summary = summarize(&day, d("2024-06-10"));
        assert_eq!(summary.mood_rating, Some(5));
        assert_eq!(summary.media_count, 1);
        assert_eq!(
            summary.media_first,
            Some(Preview {
                title: "Dune".into(),
                kind: "book".into()
            })
        );
        assert_eq!(summary.event_first_title.as_deref(), Some("Dentist"));
        assert!(summary.has_any_data);
        assert!(!summary.duolingo_completed);
    }

    #[test]
    fn empty_day_has_no_data() {
        let summary = summarize(&CalendarDay::new(d("2024-06-10")), d("2024-06-10"));
        assert!(!summary.has_any_data);
        assert_eq!(summary.mood_rating, None);
        assert_eq!(summary.activity_count, 0);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = summarize(&CalendarDay::new(d("2024-06-10")), d("2024-06-10"));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["date"], "2024-06-10");
        assert_eq!(json["taskCounts"]["completed"], 0);
        assert_eq!(json["duolingoCompleted"], false);
    }
}
