//! Async collaborator implementations over a shared connection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tally_core::achievement::{CounterSource, Metric, ProgressStore, StoredProgress};
use tally_core::calendar::CalendarSource;
use tally_core::habit::{Habit, HabitRepository};
use tally_core::record::{
    CalendarEvent, DuolingoCompletion, FitnessActivity, GithubEvent, Goal, HabitCompletion,
    Journal, MediaItem, Milestone, MoodEntry, ParkVisit, RelationshipEntry, Task,
    WorkoutActivity,
};
use tally_core::{DateRange, OwnerId, RecordId, SourceError};

use crate::{Database, DbError};

/// A [`Database`] shared between the CLI and background evaluation.
///
/// The lock is held for exactly one synchronous query per call. Async callers
/// run that query on the blocking pool so `SQLite` never stalls a runtime
/// worker.
#[derive(Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<Database>>,
}

impl SharedDatabase {
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    /// Runs `f` with exclusive access to the database on the current thread.
    pub fn with<T>(&self, f: impl FnOnce(&mut Database) -> Result<T, DbError>) -> Result<T, DbError> {
        let mut db = self.inner.lock().map_err(|_| DbError::Poisoned)?;
        f(&mut db)
    }

    async fn call<T, F>(&self, context: &'static str, f: F) -> Result<T, SourceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T, DbError> + Send + 'static,
    {
        let shared = self.clone();
        tokio::task::spawn_blocking(move || shared.with(f))
            .await
            .map_err(|e| SourceError::new(context, e))?
            .map_err(|e| SourceError::new(context, e))
    }
}

#[async_trait]
impl CalendarSource for SharedDatabase {
    async fn fetch_moods(&self, owner: &OwnerId, range: DateRange) -> Result<Vec<MoodEntry>, SourceError> {
        let owner = owner.clone();
        self.call("fetch moods", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_activities(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<FitnessActivity>, SourceError> {
        let owner = owner.clone();
        self.call("fetch activities", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_media(&self, owner: &OwnerId, range: DateRange) -> Result<Vec<MediaItem>, SourceError> {
        let owner = owner.clone();
        self.call("fetch media", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_tasks(&self, owner: &OwnerId, range: DateRange) -> Result<Vec<Task>, SourceError> {
        let owner = owner.clone();
        self.call("fetch tasks", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_events(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<CalendarEvent>, SourceError> {
        let owner = owner.clone();
        self.call("fetch events", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_parks(&self, owner: &OwnerId, range: DateRange) -> Result<Vec<ParkVisit>, SourceError> {
        let owner = owner.clone();
        self.call("fetch parks", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_journals(&self, owner: &OwnerId, range: DateRange) -> Result<Vec<Journal>, SourceError> {
        let owner = owner.clone();
        self.call("fetch journals", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_workouts(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<WorkoutActivity>, SourceError> {
        let owner = owner.clone();
        self.call("fetch workouts", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_github_events(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<GithubEvent>, SourceError> {
        let owner = owner.clone();
        self.call("fetch github events", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_habit_completions(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<HabitCompletion>, SourceError> {
        let owner = owner.clone();
        self.call("fetch habit completions", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_duolingo(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<DuolingoCompletion>, SourceError> {
        let owner = owner.clone();
        self.call("fetch duolingo", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_goals(&self, owner: &OwnerId, range: DateRange) -> Result<Vec<Goal>, SourceError> {
        let owner = owner.clone();
        self.call("fetch goals", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_milestones(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<Milestone>, SourceError> {
        let owner = owner.clone();
        self.call("fetch milestones", move |db| db.list_records(&owner, range)).await
    }

    async fn fetch_relationship(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<RelationshipEntry>, SourceError> {
        let owner = owner.clone();
        self.call("fetch relationship", move |db| db.list_records(&owner, range)).await
    }
}

#[async_trait]
impl HabitRepository for SharedDatabase {
    async fn habits(&self, owner: &OwnerId) -> Result<Vec<Habit>, SourceError> {
        let owner = owner.clone();
        self.call("list habits", move |db| db.list_habits(&owner, true)).await
    }

    async fn completion_dates(&self, habit_id: &RecordId) -> Result<Vec<NaiveDate>, SourceError> {
        let habit_id = habit_id.clone();
        self.call("list habit completions", move |db| db.completion_dates(&habit_id))
            .await
    }
}

#[async_trait]
impl CounterSource for SharedDatabase {
    async fn count(&self, owner: &OwnerId, metric: Metric, today: NaiveDate) -> Result<i64, SourceError> {
        let owner = owner.clone();
        self.call("count metric", move |db| db.count_metric(&owner, metric, today))
            .await
    }

    async fn mood_dates(&self, owner: &OwnerId) -> Result<Vec<NaiveDate>, SourceError> {
        let owner = owner.clone();
        self.call("list mood dates", move |db| db.mood_dates(&owner)).await
    }
}

#[async_trait]
impl ProgressStore for SharedDatabase {
    async fn progress(
        &self,
        owner: &OwnerId,
        achievement_id: &str,
    ) -> Result<Option<StoredProgress>, SourceError> {
        let owner = owner.clone();
        let achievement_id = achievement_id.to_string();
        self.call("read progress", move |db| db.get_progress(&owner, &achievement_id))
            .await
    }

    async fn set_progress(
        &self,
        owner: &OwnerId,
        achievement_id: &str,
        progress: i64,
        unlocked: bool,
        at: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        let owner = owner.clone();
        let achievement_id = achievement_id.to_string();
        self.call("upsert progress", move |db| {
            db.upsert_progress(&owner, &achievement_id, progress, unlocked, at)
        })
        .await
    }

    async fn list_progress(
        &self,
        owner: &OwnerId,
    ) -> Result<HashMap<String, StoredProgress>, SourceError> {
        let owner = owner.clone();
        self.call("list progress", move |db| db.list_progress(&owner)).await
    }
}
