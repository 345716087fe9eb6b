//! Import command for loading records into the local `SQLite` store.
//!
//! Input is JSON Lines, one `{"domain": ..., "record": {...}}` object per
//! line. `domain` is any calendar domain name plus `habits` and `vacations`.
//! Records without `owner_id` get the configured owner and records without
//! `id` get a fresh UUID.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{SecondsFormat, Utc};
use clap::Args;
use serde::Deserialize;
use serde_json::{Map, Value};
use tally_core::record::{
    CalendarEvent, DuolingoCompletion, FitnessActivity, GithubEvent, Goal, HabitCompletion,
    Journal, MediaItem, Milestone, MoodEntry, ParkVisit, RelationshipEntry, Task,
    WorkoutActivity,
};
use tally_core::{AchievementDispatcher, Category, Domain, Habit, OwnerId};
use tally_db::{Database, DbError, SharedDatabase, Vacation};
use uuid::Uuid;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Read from this file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn run<W: Write>(
    writer: &mut W,
    db: &SharedDatabase,
    owner: &OwnerId,
    dispatcher: &AchievementDispatcher,
    args: &ImportArgs,
) -> Result<usize> {
    let batches = match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            parse_records(BufReader::new(file), owner)?
        }
        None => parse_records(io::stdin().lock(), owner)?,
    };

    let inserted = db.with(|db| batches.insert(db))?;
    writeln!(writer, "Imported {inserted} records.")?;

    for (owner, category) in batches.touched {
        dispatcher.dispatch(owner, category);
    }
    Ok(inserted)
}

#[derive(Debug, Deserialize)]
struct ImportLine {
    domain: String,
    record: Map<String, Value>,
}

fn parse_records<R: BufRead>(reader: R, owner: &OwnerId) -> Result<Batches> {
    let mut batches = Batches::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let parsed: ImportLine = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON on line {}", idx + 1))?;
        batches
            .push(parsed, owner)
            .with_context(|| format!("invalid record on line {}", idx + 1))?;
    }
    Ok(batches)
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

macro_rules! define_batches {
    ($($domain:ident => $field:ident: $ty:ty),* $(,)?) => {
        /// Parsed records grouped by table.
        #[derive(Debug, Default)]
        struct Batches {
            $($field: Vec<$ty>,)*
            habits: Vec<Habit>,
            vacations: Vec<Vacation>,
            /// Owners and categories whose achievements may have moved.
            touched: Vec<(OwnerId, Category)>,
        }

        impl Batches {
            fn push_record(&mut self, domain: Domain, record: Value) -> Result<()> {
                let owner = match domain {
                    $(Domain::$domain => {
                        let record: $ty = serde_json::from_value(record)?;
                        let owner = record.owner_id.clone();
                        self.$field.push(record);
                        owner
                    })*
                };
                if let Some(category) = Category::for_domain(domain) {
                    self.touch(owner, category);
                }
                Ok(())
            }

            fn insert(&self, db: &mut Database) -> Result<usize, DbError> {
                // Habits first: completions reference them.
                for habit in &self.habits {
                    db.upsert_habit(habit)?;
                }
                let mut inserted = self.habits.len();
                $(inserted += db.insert_records(&self.$field)?;)*
                inserted += db.insert_records(&self.vacations)?;
                Ok(inserted)
            }
        }
    };
}

define_batches! {
    Mood => moods: MoodEntry,
    Activities => activities: FitnessActivity,
    Media => media: MediaItem,
    Tasks => tasks: Task,
    Events => events: CalendarEvent,
    Parks => parks: ParkVisit,
    Journals => journals: Journal,
    Workouts => workouts: WorkoutActivity,
    Github => github_events: GithubEvent,
    HabitCompletions => habit_completions: HabitCompletion,
    Duolingo => duolingo: DuolingoCompletion,
    Goals => goals: Goal,
    Milestones => milestones: Milestone,
    Relationship => relationship: RelationshipEntry,
}

impl Batches {
    fn push(&mut self, line: ImportLine, owner: &OwnerId) -> Result<()> {
        let mut record = line.record;
        record
            .entry("owner_id")
            .or_insert_with(|| Value::String(owner.to_string()));
        record
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));

        match line.domain.as_str() {
            "habits" => {
                record.entry("created_at").or_insert_with(now);
                self.habits.push(serde_json::from_value(Value::Object(record))?);
            }
            "vacations" => {
                check_rating(&record, 10)?;
                record.entry("created_at").or_insert_with(now);
                let vacation: Vacation = serde_json::from_value(Value::Object(record))?;
                self.touch(vacation.owner_id.clone(), Category::Vacations);
                self.vacations.push(vacation);
            }
            other => {
                let domain: Domain = other.parse()?;
                if matches!(domain, Domain::Mood | Domain::Relationship) {
                    check_rating(&record, 5)?;
                }
                self.push_record(domain, Value::Object(record))?;
            }
        }
        Ok(())
    }

    fn touch(&mut self, owner: OwnerId, category: Category) {
        let pair = (owner, category);
        if !self.touched.contains(&pair) {
            self.touched.push(pair);
        }
    }
}

/// Rejects a numeric `rating` outside `1..=max`. Other shapes are left to
/// deserialization.
fn check_rating(record: &Map<String, Value>, max: u64) -> Result<()> {
    match record.get("rating").and_then(Value::as_u64) {
        Some(rating) if !(1..=max).contains(&rating) => {
            bail!("rating must be between 1 and {max}, got {rating}")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn owner() -> OwnerId {
        OwnerId::new("local").unwrap()
    }

    #[test]
    fn fills_owner_and_id() {
        let input = r#"{"domain":"tasks","record":{"title":"Pay rent","due_date":"2024-06-01"}}"#;
        let batches = parse_records(Cursor::new(input), &owner()).unwrap();
        assert_eq!(batches.tasks.len(), 1);
        assert_eq!(batches.tasks[0].owner_id, owner());
        assert!(!batches.tasks[0].id.as_str().is_empty());
        assert_eq!(batches.touched, vec![(owner(), Category::Tasks)]);
    }

    #[test]
    fn habits_and_vacations_are_accepted() {
        let input = concat!(
            r#"{"domain":"habits","record":{"id":"h1","title":"Read","frequency":"daily"}}"#,
            "\n\n",
            r#"{"domain":"vacations","record":{"destination":"Lisbon","start_date":"2024-05-01","end_date":"2024-05-08","status":"completed"}}"#,
            "\n",
            r#"{"domain":"habit_completions","record":{"habit_id":"h1","date":"2024-05-02"}}"#,
        );
        let batches = parse_records(Cursor::new(input), &owner()).unwrap();
        assert_eq!(batches.habits[0].id.as_str(), "h1");
        assert_eq!(batches.habits[0].target, 1);
        assert_eq!(batches.vacations[0].status, "completed");
        assert_eq!(
            batches.touched,
            vec![(owner(), Category::Vacations), (owner(), Category::Habits)]
        );
    }

    #[test]
    fn events_do_not_trigger_evaluation() {
        let input = r#"{"domain":"events","record":{"title":"Dentist","date":"2024-06-03"}}"#;
        let batches = parse_records(Cursor::new(input), &owner()).unwrap();
        assert_eq!(batches.events.len(), 1);
        assert!(batches.touched.is_empty());
    }

    #[test]
    fn errors_name_the_line() {
        let input = concat!(
            r#"{"domain":"mood","record":{"date":"2024-06-01","rating":4}}"#,
            "\n",
            r#"{"domain":"weather","record":{}}"#,
        );
        let err = parse_records(Cursor::new(input), &owner()).unwrap_err();
        assert!(err.to_string().contains("invalid record on line 2"));

        let err = parse_records(Cursor::new("not json"), &owner()).unwrap_err();
        assert!(err.to_string().contains("invalid JSON on line 1"));
    }

    #[test]
    fn ratings_out_of_range_are_rejected() {
        let err = parse_records(
            Cursor::new(r#"{"domain":"mood","record":{"date":"2024-06-01","rating":7}}"#),
            &owner(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid record on line 1"));
        assert!(format!("{err:#}").contains("rating must be between 1 and 5, got 7"));

        let zero = r#"{"domain":"relationship","record":{"kind":"date","date":"2024-06-01","rating":0}}"#;
        let err = parse_records(Cursor::new(zero), &owner()).unwrap_err();
        assert!(format!("{err:#}").contains("rating must be between 1 and 5, got 0"));

        let trip = |rating: u32| {
            format!(
                r#"{{"domain":"vacations","record":{{"destination":"Oslo","start_date":"2024-05-01","end_date":"2024-05-03","rating":{rating}}}}}"#
            )
        };
        let batches = parse_records(Cursor::new(trip(10)), &owner()).unwrap();
        assert_eq!(batches.vacations[0].rating, Some(10));
        let err = parse_records(Cursor::new(trip(11)), &owner()).unwrap_err();
        assert!(format!("{err:#}").contains("rating must be between 1 and 10, got 11"));
    }

    #[test]
    fn insert_writes_every_table() {
        let input = concat!(
            r#"{"domain":"habits","record":{"id":"h1","title":"Read","frequency":"daily"}}"#,
            "\n",
            r#"{"domain":"habit_completions","record":{"habit_id":"h1","date":"2024-05-02"}}"#,
            "\n",
            r#"{"domain":"mood","record":{"date":"2024-05-02","rating":5}}"#,
        );
        let batches = parse_records(Cursor::new(input), &owner()).unwrap();
        let mut db = Database::open_in_memory().expect("open in-memory db");
        assert_eq!(batches.insert(&mut db).unwrap(), 3);
        assert_eq!(db.list_habits(&owner(), true).unwrap().len(), 1);
    }
}
