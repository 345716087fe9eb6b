//! Storage layer for the dashboard.
//!
//! Provides persistence for per-domain records, habits and achievement
//! progress using `rusqlite`, plus [`SharedDatabase`], which exposes a
//! database to the async collaborator traits of `tally-core`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! [`SharedDatabase`] serializes access through a mutex that is held for one
//! synchronous call at a time and never across an `.await`.
//!
//! # Schema
//!
//! ## Date Format
//!
//! Record dates are stored as TEXT exactly as supplied (`YYYY-MM-DD`, or a
//! timestamp whose first ten characters are the calendar date). Range queries
//! compare `substr(column, 1, 10)`, so no timezone conversion ever happens in
//! SQL. Malformed values are kept; the calendar builder drops them at read time.
//!
//! ## Ownership
//!
//! Every table carries an `owner_id` column and every query filters on it.

mod counters;
mod habits;
mod progress;
mod records;
mod shared;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use rusqlite::types::Type;
use tally_core::ValidationError;
use tally_core::achievement::Metric;
use thiserror::Error;

pub use records::{StoredRecord, Vacation};
pub use shared::SharedDatabase;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The shared connection's lock was poisoned by a panic.
    #[error("database lock poisoned")]
    Poisoned,
    /// A habit id that does not exist.
    #[error("habit not found: {0}")]
    HabitNotFound(String),
    /// Metrics derived from streaks are computed by the engine, not counted.
    #[error("metric {0:?} is not a stored counter")]
    DerivedMetric(Metric),
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp in {table}: {timestamp}")]
    TimestampParse {
        table: &'static str,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS mood_entries (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                date TEXT NOT NULL,
                rating INTEGER NOT NULL,
                note TEXT,
                created_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_mood_entries_owner_date ON mood_entries(owner_id, date);

            CREATE TABLE IF NOT EXISTS fitness_activities (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                sport_type TEXT NOT NULL DEFAULT '',
                start_date_local TEXT NOT NULL,
                distance_m REAL
            );

            CREATE INDEX IF NOT EXISTS idx_fitness_activities_owner_date
                ON fitness_activities(owner_id, start_date_local);

            CREATE TABLE IF NOT EXISTS media (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                media_type TEXT NOT NULL,
                completed TEXT
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                due_date TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                completed_date TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_owner_due ON tasks(owner_id, due_date);

            CREATE TABLE IF NOT EXISTS calendar_events (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                end_date TEXT
            );

            CREATE TABLE IF NOT EXISTS parks (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                name TEXT NOT NULL,
                visited TEXT
            );

            -- journal_type: 'daily' (dated by daily_date) or 'general' (dated by created_at)
            CREATE TABLE IF NOT EXISTS journals (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                journal_type TEXT NOT NULL,
                daily_date TEXT,
                created_at TEXT
            );

            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                workout_type TEXT NOT NULL,
                date TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                fitness_activity_id TEXT
            );

            CREATE TABLE IF NOT EXISTS github_events (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                event_type TEXT NOT NULL,
                repo TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS habits (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                frequency TEXT NOT NULL,
                target INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS habit_completions (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                habit_id TEXT NOT NULL,
                date TEXT NOT NULL,
                UNIQUE (habit_id, date),
                FOREIGN KEY (habit_id) REFERENCES habits(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_habit_completions_owner_date
                ON habit_completions(owner_id, date);

            CREATE TABLE IF NOT EXISTS duolingo_completions (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS goals (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                target_date TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                completed_date TEXT
            );

            CREATE TABLE IF NOT EXISTS milestones (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                goal_id TEXT,
                title TEXT NOT NULL,
                target_date TEXT,
                completed INTEGER NOT NULL DEFAULT 0,
                completed_date TEXT
            );

            -- kind: 'date', 'intimacy' or 'milestone'
            CREATE TABLE IF NOT EXISTS relationship_entries (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                subtype TEXT,
                date TEXT NOT NULL,
                rating INTEGER
            );

            CREATE TABLE IF NOT EXISTS vacations (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                destination TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'planning',
                rating INTEGER,
                budget_planned REAL,
                budget_actual REAL,
                poster TEXT,
                notes TEXT,
                created_at TEXT NOT NULL
            );

            -- unlocked is one-way; see Database::upsert_progress
            CREATE TABLE IF NOT EXISTS user_achievements (
                owner_id TEXT NOT NULL,
                achievement_id TEXT NOT NULL,
                progress INTEGER NOT NULL DEFAULT 0,
                unlocked INTEGER NOT NULL DEFAULT 0,
                unlocked_at TEXT,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (owner_id, achievement_id)
            );
            ",
        )?;
        Ok(())
    }
}

fn parse_timestamp(table: &'static str, timestamp: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            table,
            timestamp: timestamp.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reads a validated id column.
fn id_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: TryFrom<String, Error = ValidationError>,
{
    let raw: String = row.get(idx)?;
    T::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
