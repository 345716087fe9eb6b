//! Per-domain record tables.

use rusqlite::types::Value;
use rusqlite::{Row, params, params_from_iter};
use serde::{Deserialize, Serialize};
use tally_core::record::{
    CalendarEvent, DuolingoCompletion, FitnessActivity, GithubEvent, Goal, HabitCompletion,
    Journal, JournalKind, MediaItem, Milestone, MoodEntry, ParkVisit, RelationshipEntry, Task,
    WorkoutActivity,
};
use tally_core::{DateRange, OwnerId, RecordId};

use crate::{Database, DbError, id_column};

/// A planned or completed trip. Only feeds achievement counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vacation {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    /// `planning`, `booked`, `completed`, ...
    #[serde(default = "default_status")]
    pub status: String,
    /// 1-10.
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub budget_planned: Option<f64>,
    #[serde(default)]
    pub budget_actual: Option<f64>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: String,
}

fn default_status() -> String {
    "planning".to_string()
}

/// A record type with its own table.
///
/// `SELECT_IN_RANGE` binds `?1` to the owner and `?2`/`?3` to the first and
/// last day of the range, and returns records whose date fields touch it.
pub trait StoredRecord: Sized {
    const TABLE: &'static str;
    const INSERT: &'static str;
    const SELECT_IN_RANGE: &'static str;

    /// Values for the `INSERT` placeholders, in column order.
    fn values(&self) -> Vec<Value>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

impl Database {
    /// Inserts records, replacing rows with the same id.
    pub fn insert_records<R: StoredRecord>(&mut self, records: &[R]) -> Result<usize, DbError> {
        if records.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(R::INSERT)?;
            for record in records {
                inserted += stmt.execute(params_from_iter(record.values()))?;
            }
        }
        tx.commit()?;
        tracing::debug!(table = R::TABLE, inserted, "inserted records");
        Ok(inserted)
    }

    /// Lists one owner's records touching `range`, in insertion order.
    pub fn list_records<R: StoredRecord>(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<R>, DbError> {
        let mut stmt = self.conn.prepare(R::SELECT_IN_RANGE)?;
        let rows = stmt.query_map(
            params![
                owner.as_str(),
                range.start().format("%Y-%m-%d").to_string(),
                range.end().format("%Y-%m-%d").to_string(),
            ],
            R::from_row,
        )?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn opt_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}

fn id(value: &RecordId) -> Value {
    text(value.as_str())
}

fn owner(value: &OwnerId) -> Value {
    text(value.as_str())
}

fn optional_id_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<RecordId>> {
    let raw: Option<String> = row.get(idx)?;
    match raw {
        Some(raw) if !raw.trim().is_empty() => id_column::<RecordId>(row, idx).map(Some),
        _ => Ok(None),
    }
}

impl StoredRecord for MoodEntry {
    const TABLE: &'static str = "mood_entries";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO mood_entries (id, owner_id, date, rating, note, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, date, rating, note, created_at
        FROM mood_entries
        WHERE owner_id = ?1 AND substr(date, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.date),
            Value::from(self.rating),
            opt_text(self.note.as_deref()),
            opt_text(self.created_at.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            date: row.get(2)?,
            rating: row.get(3)?,
            note: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl StoredRecord for FitnessActivity {
    const TABLE: &'static str = "fitness_activities";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO fitness_activities
        (id, owner_id, name, sport_type, start_date_local, distance_m)
        VALUES (?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, name, sport_type, start_date_local, distance_m
        FROM fitness_activities
        WHERE owner_id = ?1 AND substr(start_date_local, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY start_date_local ASC, rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.name),
            text(&self.sport_type),
            text(&self.start_date_local),
            self.distance_m.map_or(Value::Null, Value::Real),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            name: row.get(2)?,
            sport_type: row.get(3)?,
            start_date_local: row.get(4)?,
            distance_m: row.get(5)?,
        })
    }
}

impl StoredRecord for MediaItem {
    const TABLE: &'static str = "media";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO media (id, owner_id, title, media_type, completed)
        VALUES (?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, title, media_type, completed
        FROM media
        WHERE owner_id = ?1 AND substr(completed, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.title),
            text(&self.media_type),
            opt_text(self.completed.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            title: row.get(2)?,
            media_type: row.get(3)?,
            completed: row.get(4)?,
        })
    }
}

impl StoredRecord for Task {
    const TABLE: &'static str = "tasks";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO tasks (id, owner_id, title, due_date, completed, completed_date)
        VALUES (?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, title, due_date, completed, completed_date
        FROM tasks
        WHERE owner_id = ?1
          AND (substr(due_date, 1, 10) BETWEEN ?2 AND ?3
               OR (completed = 1 AND substr(completed_date, 1, 10) BETWEEN ?2 AND ?3))
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.title),
            opt_text(self.due_date.as_deref()),
            Value::from(self.completed),
            opt_text(self.completed_date.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            title: row.get(2)?,
            due_date: row.get(3)?,
            completed: row.get(4)?,
            completed_date: row.get(5)?,
        })
    }
}

impl StoredRecord for CalendarEvent {
    const TABLE: &'static str = "calendar_events";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO calendar_events (id, owner_id, title, date, end_date)
        VALUES (?, ?, ?, ?, ?)
    ";
    // Multi-day events overlap the range rather than start inside it.
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, title, date, end_date
        FROM calendar_events
        WHERE owner_id = ?1
          AND substr(date, 1, 10) <= ?3
          AND max(substr(date, 1, 10), substr(coalesce(nullif(end_date, ''), date), 1, 10)) >= ?2
        ORDER BY date ASC, rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.title),
            text(&self.date),
            opt_text(self.end_date.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            title: row.get(2)?,
            date: row.get(3)?,
            end_date: row.get(4)?,
        })
    }
}

impl StoredRecord for ParkVisit {
    const TABLE: &'static str = "parks";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO parks (id, owner_id, name, visited)
        VALUES (?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, name, visited
        FROM parks
        WHERE owner_id = ?1 AND substr(visited, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.name),
            opt_text(self.visited.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            name: row.get(2)?,
            visited: row.get(3)?,
        })
    }
}

fn journal_kind_value(kind: JournalKind) -> Value {
    text(match kind {
        JournalKind::Daily => "daily",
        JournalKind::General => "general",
        JournalKind::Other => "other",
    })
}

impl StoredRecord for Journal {
    const TABLE: &'static str = "journals";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO journals (id, owner_id, title, journal_type, daily_date, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, title, journal_type, daily_date, created_at
        FROM journals
        WHERE owner_id = ?1
          AND (substr(daily_date, 1, 10) BETWEEN ?2 AND ?3
               OR substr(created_at, 1, 10) BETWEEN ?2 AND ?3)
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.title),
            journal_kind_value(self.journal_type),
            opt_text(self.daily_date.as_deref()),
            opt_text(self.created_at.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let kind: String = row.get(3)?;
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            title: row.get(2)?,
            journal_type: match kind.as_str() {
                "daily" => JournalKind::Daily,
                "general" => JournalKind::General,
                _ => JournalKind::Other,
            },
            daily_date: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl StoredRecord for WorkoutActivity {
    const TABLE: &'static str = "workouts";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO workouts
        (id, owner_id, workout_type, date, completed, fitness_activity_id)
        VALUES (?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, workout_type, date, completed, fitness_activity_id
        FROM workouts
        WHERE owner_id = ?1 AND substr(date, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.workout_type),
            text(&self.date),
            Value::from(self.completed),
            self.fitness_activity_id.as_ref().map_or(Value::Null, id),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            workout_type: row.get(2)?,
            date: row.get(3)?,
            completed: row.get(4)?,
            fitness_activity_id: optional_id_column(row, 5)?,
        })
    }
}

impl StoredRecord for GithubEvent {
    const TABLE: &'static str = "github_events";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO github_events (id, owner_id, event_type, repo, created_at)
        VALUES (?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, event_type, repo, created_at
        FROM github_events
        WHERE owner_id = ?1 AND substr(created_at, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY created_at ASC, rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.event_type),
            text(&self.repo),
            text(&self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            event_type: row.get(2)?,
            repo: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// Completions are keyed by calendar day, so timestamps are stored as
/// `YYYY-MM-DD`. Text that is not a date is kept as given.
fn completion_day(raw: &str) -> String {
    tally_core::dates::parse_day(raw).map_or_else(|| raw.to_string(), tally_core::dates::format_day)
}

impl StoredRecord for HabitCompletion {
    const TABLE: &'static str = "habit_completions";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO habit_completions (id, owner_id, habit_id, date)
        VALUES (?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, habit_id, date
        FROM habit_completions
        WHERE owner_id = ?1 AND substr(date, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            id(&self.habit_id),
            text(&completion_day(&self.date)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            habit_id: id_column(row, 2)?,
            date: row.get(3)?,
        })
    }
}

impl StoredRecord for DuolingoCompletion {
    const TABLE: &'static str = "duolingo_completions";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO duolingo_completions (id, owner_id, date)
        VALUES (?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, date
        FROM duolingo_completions
        WHERE owner_id = ?1 AND substr(date, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![id(&self.id), owner(&self.owner_id), text(&self.date)]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            date: row.get(2)?,
        })
    }
}

impl StoredRecord for Goal {
    const TABLE: &'static str = "goals";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO goals (id, owner_id, title, target_date, completed, completed_date)
        VALUES (?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, title, target_date, completed, completed_date
        FROM goals
        WHERE owner_id = ?1
          AND (substr(target_date, 1, 10) BETWEEN ?2 AND ?3
               OR (completed = 1 AND substr(completed_date, 1, 10) BETWEEN ?2 AND ?3))
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.title),
            opt_text(self.target_date.as_deref()),
            Value::from(self.completed),
            opt_text(self.completed_date.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            title: row.get(2)?,
            target_date: row.get(3)?,
            completed: row.get(4)?,
            completed_date: row.get(5)?,
        })
    }
}

impl StoredRecord for Milestone {
    const TABLE: &'static str = "milestones";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO milestones
        (id, owner_id, goal_id, title, target_date, completed, completed_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, goal_id, title, target_date, completed, completed_date
        FROM milestones
        WHERE owner_id = ?1
          AND (substr(target_date, 1, 10) BETWEEN ?2 AND ?3
               OR (completed = 1 AND substr(completed_date, 1, 10) BETWEEN ?2 AND ?3))
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            self.goal_id.as_ref().map_or(Value::Null, id),
            text(&self.title),
            opt_text(self.target_date.as_deref()),
            Value::from(self.completed),
            opt_text(self.completed_date.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            goal_id: optional_id_column(row, 2)?,
            title: row.get(3)?,
            target_date: row.get(4)?,
            completed: row.get(5)?,
            completed_date: row.get(6)?,
        })
    }
}

impl StoredRecord for RelationshipEntry {
    const TABLE: &'static str = "relationship_entries";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO relationship_entries (id, owner_id, kind, subtype, date, rating)
        VALUES (?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, kind, subtype, date, rating
        FROM relationship_entries
        WHERE owner_id = ?1 AND substr(date, 1, 10) BETWEEN ?2 AND ?3
        ORDER BY rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.kind),
            opt_text(self.subtype.as_deref()),
            text(&self.date),
            self.rating.map_or(Value::Null, Value::from),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            kind: row.get(2)?,
            subtype: row.get(3)?,
            date: row.get(4)?,
            rating: row.get(5)?,
        })
    }
}

impl StoredRecord for Vacation {
    const TABLE: &'static str = "vacations";
    const INSERT: &'static str = "
        INSERT OR REPLACE INTO vacations
        (id, owner_id, destination, start_date, end_date, status, rating,
         budget_planned, budget_actual, poster, notes, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ";
    const SELECT_IN_RANGE: &'static str = "
        SELECT id, owner_id, destination, start_date, end_date, status, rating,
               budget_planned, budget_actual, poster, notes, created_at
        FROM vacations
        WHERE owner_id = ?1
          AND substr(start_date, 1, 10) <= ?3
          AND substr(end_date, 1, 10) >= ?2
        ORDER BY start_date ASC, rowid ASC
    ";

    fn values(&self) -> Vec<Value> {
        vec![
            id(&self.id),
            owner(&self.owner_id),
            text(&self.destination),
            text(&self.start_date),
            text(&self.end_date),
            text(&self.status),
            self.rating.map_or(Value::Null, Value::from),
            self.budget_planned.map_or(Value::Null, Value::Real),
            self.budget_actual.map_or(Value::Null, Value::Real),
            opt_text(self.poster.as_deref()),
            opt_text(self.notes.as_deref()),
            text(&self.created_at),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            destination: row.get(2)?,
            start_date: row.get(3)?,
            end_date: row.get(4)?,
            status: row.get(5)?,
            rating: row.get(6)?,
            budget_planned: row.get(7)?,
            budget_actual: row.get(8)?,
            poster: row.get(9)?,
            notes: row.get(10)?,
            created_at: row.get(11)?,
        })
    }
}
