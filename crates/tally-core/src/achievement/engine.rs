//! Progress evaluation and the monotonic unlock transition.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use super::{Achievement, CATALOG, Category, Metric, find, in_category};
use crate::error::{AchievementError, SourceError};
use crate::habit::{Frequency, HabitRepository, longest_run, owner_habit_stats};
use crate::types::OwnerId;

/// Measures metrics from the owner's stored records.
#[async_trait]
pub trait CounterSource: Send + Sync {
    /// Current value of a counting metric as of `today`.
    ///
    /// Streak metrics are computed by the engine and never requested here.
    async fn count(
        &self,
        owner: &OwnerId,
        metric: Metric,
        today: NaiveDate,
    ) -> Result<i64, SourceError>;

    /// Every day the owner logged a mood, in any order.
    async fn mood_dates(&self, owner: &OwnerId) -> Result<Vec<NaiveDate>, SourceError>;
}

/// Stored state of one (owner, achievement) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StoredProgress {
    pub progress: i64,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Persistence for achievement progress.
///
/// Implementations must never turn `unlocked` off and must never replace an
/// existing `unlocked_at`, whatever `set_progress` is called with.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn progress(
        &self,
        owner: &OwnerId,
        achievement_id: &str,
    ) -> Result<Option<StoredProgress>, SourceError>;

    /// Upserts progress. `at` becomes `unlocked_at` when this call is the one
    /// that unlocks the pair.
    async fn set_progress(
        &self,
        owner: &OwnerId,
        achievement_id: &str,
        progress: i64,
        unlocked: bool,
        at: DateTime<Utc>,
    ) -> Result<(), SourceError>;

    /// All stored rows for `owner`, keyed by achievement id.
    async fn list_progress(
        &self,
        owner: &OwnerId,
    ) -> Result<HashMap<String, StoredProgress>, SourceError>;
}

/// Result of applying one measured value to one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub achievement_id: &'static str,
    pub progress: i64,
    pub target_value: i64,
    pub unlocked: bool,
    /// True only for the evaluation that performed the unlock.
    pub newly_unlocked: bool,
}

/// A metric that could not be measured; its achievements were left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMetric {
    pub metric: Metric,
    pub reason: String,
}

/// An achievement whose measured progress could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpdate {
    pub achievement_id: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    pub category: Category,
    pub updates: Vec<ProgressUpdate>,
    pub skipped: Vec<SkippedMetric>,
    pub failed: Vec<FailedUpdate>,
}

impl EvaluationReport {
    pub fn newly_unlocked(&self) -> impl Iterator<Item = &ProgressUpdate> {
        self.updates.iter().filter(|update| update.newly_unlocked)
    }
}

/// A catalog entry joined with the owner's stored progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub achievement: &'static Achievement,
    pub progress: i64,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

/// Recomputes achievement progress and applies unlocks.
#[derive(Clone)]
pub struct AchievementEngine {
    counters: Arc<dyn CounterSource>,
    habits: Arc<dyn HabitRepository>,
    store: Arc<dyn ProgressStore>,
}

impl AchievementEngine {
    pub fn new(
        counters: Arc<dyn CounterSource>,
        habits: Arc<dyn HabitRepository>,
        store: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            counters,
            habits,
            store,
        }
    }

    /// Evaluates every achievement in `category` for `owner` as of now.
    ///
    /// Date-based metrics are measured up to the local calendar day, the
    /// same day the CLI defaults to.
    pub async fn evaluate(
        &self,
        owner: &OwnerId,
        category: Category,
    ) -> Result<EvaluationReport, AchievementError> {
        self.evaluate_on(owner, category, Utc::now(), Local::now().date_naive())
            .await
    }

    /// Like [`Self::evaluate`] with an explicit clock; `today` is the UTC
    /// day of `now`.
    pub async fn evaluate_at(
        &self,
        owner: &OwnerId,
        category: Category,
        now: DateTime<Utc>,
    ) -> Result<EvaluationReport, AchievementError> {
        self.evaluate_on(owner, category, now, now.date_naive()).await
    }

    /// Evaluates with `now` stamped on unlocks and metrics measured as of
    /// `today`.
    ///
    /// Each distinct metric is measured once. A metric that fails to measure
    /// is logged and skipped, and so is an achievement whose progress fails
    /// to store; the rest of the category still applies. Only when every
    /// store write fails is the first failure returned as an error.
    pub async fn evaluate_on(
        &self,
        owner: &OwnerId,
        category: Category,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<EvaluationReport, AchievementError> {
        let mut measured: HashMap<Metric, Option<i64>> = HashMap::new();
        let mut first_failure = None;
        let mut report = EvaluationReport {
            category,
            updates: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        };

        for achievement in in_category(category) {
            let value = match measured.get(&achievement.metric) {
                Some(value) => *value,
                None => {
                    let value = match self.measure(owner, achievement.metric, today).await {
                        Ok(value) => Some(value),
                        Err(e) => {
                            tracing::warn!(
                                owner = %owner,
                                metric = ?achievement.metric,
                                error = %e,
                                "skipping achievements for unmeasurable metric"
                            );
                            report.skipped.push(SkippedMetric {
                                metric: achievement.metric,
                                reason: e.to_string(),
                            });
                            None
                        }
                    };
                    measured.insert(achievement.metric, value);
                    value
                }
            };

            let Some(progress) = value else { continue };
            match self.apply(owner, achievement, progress, now).await {
                Ok(update) => report.updates.push(update),
                Err(e) => {
                    tracing::warn!(
                        owner = %owner,
                        achievement = achievement.id,
                        error = %e,
                        "failed to store achievement progress"
                    );
                    report.failed.push(FailedUpdate {
                        achievement_id: achievement.id,
                        reason: e.to_string(),
                    });
                    first_failure.get_or_insert(e);
                }
            }
        }

        if report.updates.is_empty() {
            if let Some(e) = first_failure {
                return Err(e);
            }
        }

        tracing::debug!(
            owner = %owner,
            category = %category,
            updated = report.updates.len(),
            unlocked = report.newly_unlocked().count(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "evaluated achievements"
        );
        Ok(report)
    }

    /// Applies an externally measured value to one achievement.
    ///
    /// Ids not in the catalog are ignored and yield `Ok(None)`.
    pub async fn apply_progress(
        &self,
        owner: &OwnerId,
        achievement_id: &str,
        progress: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<ProgressUpdate>, AchievementError> {
        let Some(achievement) = find(achievement_id) else {
            tracing::debug!(achievement_id, "ignoring unknown achievement");
            return Ok(None);
        };
        self.apply(owner, achievement, progress, now).await.map(Some)
    }

    async fn apply(
        &self,
        owner: &OwnerId,
        achievement: &'static Achievement,
        progress: i64,
        now: DateTime<Utc>,
    ) -> Result<ProgressUpdate, AchievementError> {
        let persistence = |source| AchievementError::Persistence {
            achievement_id: achievement.id.to_string(),
            source,
        };

        let stored = self
            .store
            .progress(owner, achievement.id)
            .await
            .map_err(persistence)?;
        let already_unlocked = stored.is_some_and(|stored| stored.unlocked);
        let newly_unlocked = !already_unlocked && progress >= achievement.target_value;
        let unlocked = already_unlocked || newly_unlocked;

        self.store
            .set_progress(owner, achievement.id, progress, unlocked, now)
            .await
            .map_err(persistence)?;

        if newly_unlocked {
            tracing::info!(
                owner = %owner,
                achievement = achievement.id,
                points = achievement.points,
                "achievement unlocked"
            );
        }

        Ok(ProgressUpdate {
            achievement_id: achievement.id,
            progress,
            target_value: achievement.target_value,
            unlocked,
            newly_unlocked,
        })
    }

    async fn measure(
        &self,
        owner: &OwnerId,
        metric: Metric,
        today: NaiveDate,
    ) -> Result<i64, SourceError> {
        match metric {
            Metric::MoodStreak => {
                let dates: BTreeSet<NaiveDate> =
                    self.counters.mood_dates(owner).await?.into_iter().collect();
                Ok(i64::from(longest_run(&dates, Frequency::Daily.policy())))
            }
            Metric::HabitStreak => {
                let stats = owner_habit_stats(self.habits.as_ref(), owner, today).await?;
                Ok(stats
                    .iter()
                    .map(|(_, stats)| i64::from(stats.longest_streak))
                    .max()
                    .unwrap_or(0))
            }
            counted => self.counters.count(owner, counted, today).await,
        }
    }

    /// Every catalog entry with the owner's stored progress, optionally
    /// limited to one category. Entries never evaluated show zero progress.
    pub async fn list_progress(
        &self,
        owner: &OwnerId,
        category: Option<Category>,
    ) -> Result<Vec<AchievementStatus>, AchievementError> {
        let stored = self
            .store
            .list_progress(owner)
            .await
            .map_err(AchievementError::Store)?;

        Ok(CATALOG
            .iter()
            .filter(|achievement| category.is_none_or(|c| achievement.category == c))
            .map(|achievement| {
                let row = stored.get(achievement.id).copied().unwrap_or_default();
                AchievementStatus {
                    achievement,
                    progress: row.progress,
                    unlocked: row.unlocked,
                    unlocked_at: row.unlocked_at,
                }
            })
            .collect())
    }

    /// Sum of points over the owner's unlocked achievements.
    pub async fn total_points(&self, owner: &OwnerId) -> Result<u32, AchievementError> {
        let statuses = self.list_progress(owner, None).await?;
        Ok(statuses
            .iter()
            .filter(|status| status.unlocked)
            .map(|status| status.achievement.points)
            .sum())
    }
}

#[cfg(test)]
pub(super) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;

    use super::*;
    use crate::achievement::MemoryProgressStore;
    use crate::habit::Habit;
    use crate::types::RecordId;

    /// Counter source backed by a fixed table of metric values.
    #[derive(Default)]
    pub struct FixedCounters {
        pub values: Mutex<HashMap<Metric, i64>>,
        pub mood_dates: Vec<NaiveDate>,
        pub failing: Option<Metric>,
        pub calls: AtomicUsize,
        pub seen_days: Mutex<Vec<NaiveDate>>,
    }

    impl FixedCounters {
        pub fn with(values: &[(Metric, i64)]) -> Self {
            Self {
                values: Mutex::new(values.iter().copied().collect()),
                ..Self::default()
            }
        }

        pub fn set(&self, metric: Metric, value: i64) {
            self.values.lock().unwrap().insert(metric, value);
        }
    }

    #[async_trait]
    impl CounterSource for FixedCounters {
        async fn count(
            &self,
            _owner: &OwnerId,
            metric: Metric,
            today: NaiveDate,
        ) -> Result<i64, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen_days.lock().unwrap().push(today);
            if self.failing == Some(metric) {
                return Err(SourceError::new("count", "table missing"));
            }
            Ok(self.values.lock().unwrap().get(&metric).copied().unwrap_or(0))
        }

        async fn mood_dates(&self, _owner: &OwnerId) -> Result<Vec<NaiveDate>, SourceError> {
            Ok(self.mood_dates.clone())
        }
    }

    #[derive(Default)]
    pub struct FixedHabits {
        pub habits: Vec<(Habit, Vec<NaiveDate>)>,
    }

    #[async_trait]
    impl HabitRepository for FixedHabits {
        async fn habits(&self, owner: &OwnerId) -> Result<Vec<Habit>, SourceError> {
            Ok(self
                .habits
                .iter()
                .filter(|(habit, _)| &habit.owner_id == owner)
                .map(|(habit, _)| habit.clone())
                .collect())
        }

        async fn completion_dates(
            &self,
            habit_id: &RecordId,
        ) -> Result<Vec<NaiveDate>, SourceError> {
            Ok(self
                .habits
                .iter()
                .find(|(habit, _)| &habit.id == habit_id)
                .map(|(_, dates)| dates.clone())
                .unwrap_or_default())
        }
    }

    /// Store whose writes always fail.
    pub struct BrokenStore;

    #[async_trait]
    impl ProgressStore for BrokenStore {
        async fn progress(
            &self,
            _owner: &OwnerId,
            _achievement_id: &str,
        ) -> Result<Option<StoredProgress>, SourceError> {
            Ok(None)
        }

        async fn set_progress(
            &self,
            _owner: &OwnerId,
            _achievement_id: &str,
            _progress: i64,
            _unlocked: bool,
            _at: DateTime<Utc>,
        ) -> Result<(), SourceError> {
            Err(SourceError::new("upsert progress", "database is locked"))
        }

        async fn list_progress(
            &self,
            _owner: &OwnerId,
        ) -> Result<HashMap<String, StoredProgress>, SourceError> {
            Err(SourceError::new("list progress", "database is locked"))
        }
    }

    /// In-memory store that rejects writes for one achievement.
    struct RejectingStore {
        inner: MemoryProgressStore,
        rejected: &'static str,
    }

    #[async_trait]
    impl ProgressStore for RejectingStore {
        async fn progress(
            &self,
            owner: &OwnerId,
            achievement_id: &str,
        ) -> Result<Option<StoredProgress>, SourceError> {
            self.inner.progress(owner, achievement_id).await
        }

        async fn set_progress(
            &self,
            owner: &OwnerId,
            achievement_id: &str,
            progress: i64,
            unlocked: bool,
            at: DateTime<Utc>,
        ) -> Result<(), SourceError> {
            if achievement_id == self.rejected {
                return Err(SourceError::new("upsert progress", "disk I/O error"));
            }
            self.inner
                .set_progress(owner, achievement_id, progress, unlocked, at)
                .await
        }

        async fn list_progress(
            &self,
            owner: &OwnerId,
        ) -> Result<HashMap<String, StoredProgress>, SourceError> {
            self.inner.list_progress(owner).await
        }
    }

    pub fn owner() -> OwnerId {
        OwnerId::new("alice").unwrap()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn engine(
        counters: Arc<FixedCounters>,
        store: Arc<MemoryProgressStore>,
    ) -> AchievementEngine {
        AchievementEngine::new(counters, Arc::new(FixedHabits::default()), store)
    }

    fn update<'a>(report: &'a EvaluationReport, id: &str) -> &'a ProgressUpdate {
        report
            .updates
            .iter()
            .find(|update| update.achievement_id == id)
            .unwrap()
    }

    // ========== Evaluation Tests ==========

    #[tokio::test]
    async fn unlocks_when_target_reached() {
        let counters = Arc::new(FixedCounters::with(&[(Metric::BooksCompleted, 5)]));
        let store = Arc::new(MemoryProgressStore::new());
        let engine = engine(counters, Arc::clone(&store));

        let report = engine.evaluate_at(&owner(), Category::Media, at(1)).await.unwrap();

        let unlocked: Vec<_> = report.newly_unlocked().map(|u| u.achievement_id).collect();
        assert_eq!(unlocked, vec!["bookworm-1", "bookworm-5"]);
        assert!(!update(&report, "bookworm-10").unlocked);
        assert_eq!(update(&report, "bookworm-10").progress, 5);

        let stored = store.progress(&owner(), "bookworm-5").await.unwrap().unwrap();
        assert!(stored.unlocked);
        assert_eq!(stored.unlocked_at, Some(at(1)));
    }

    #[tokio::test]
    async fn evaluation_is_idempotent() {
        let counters = Arc::new(FixedCounters::with(&[(Metric::ParksVisited, 3)]));
        let store = Arc::new(MemoryProgressStore::new());
        let engine = engine(counters, Arc::clone(&store));

        let first = engine.evaluate_at(&owner(), Category::Parks, at(1)).await.unwrap();
        let second = engine.evaluate_at(&owner(), Category::Parks, at(2)).await.unwrap();

        assert_eq!(first.newly_unlocked().count(), 1);
        assert_eq!(second.newly_unlocked().count(), 0);
        let stored = store.progress(&owner(), "explorer-1").await.unwrap().unwrap();
        assert_eq!(stored.unlocked_at, Some(at(1)));
        assert_eq!(stored.progress, 3);
    }

    #[tokio::test]
    async fn unlock_survives_progress_dropping() {
        let counters = Arc::new(FixedCounters::with(&[(Metric::TasksCompleted, 10)]));
        let store = Arc::new(MemoryProgressStore::new());
        let engine = engine(Arc::clone(&counters), Arc::clone(&store));

        engine.evaluate_at(&owner(), Category::Tasks, at(1)).await.unwrap();
        counters.set(Metric::TasksCompleted, 2);
        let report = engine.evaluate_at(&owner(), Category::Tasks, at(2)).await.unwrap();

        let ten = update(&report, "task-master-10");
        assert!(ten.unlocked);
        assert!(!ten.newly_unlocked);
        assert_eq!(ten.progress, 2);

        let stored = store.progress(&owner(), "task-master-10").await.unwrap().unwrap();
        assert!(stored.unlocked);
        assert_eq!(stored.progress, 2);
        assert_eq!(stored.unlocked_at, Some(at(1)));
    }

    #[tokio::test]
    async fn each_metric_measured_once() {
        let counters = Arc::new(FixedCounters::with(&[(Metric::DuolingoCompletions, 8)]));
        let store = Arc::new(MemoryProgressStore::new());
        let engine = engine(Arc::clone(&counters), store);

        let report = engine.evaluate_at(&owner(), Category::Duolingo, at(1)).await.unwrap();

        assert_eq!(report.updates.len(), 4);
        assert_eq!(counters.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_metric_skips_only_its_achievements() {
        let counters = Arc::new(FixedCounters {
            failing: Some(Metric::IntimacyEntries),
            ..FixedCounters::with(&[(Metric::Dates, 1)])
        });
        let store = Arc::new(MemoryProgressStore::new());
        let engine = engine(counters, store);

        let report = engine
            .evaluate_at(&owner(), Category::Relationship, at(1))
            .await
            .unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].metric, Metric::IntimacyEntries);
        assert!(update(&report, "relationship-first-date").newly_unlocked);
        assert!(
            report
                .updates
                .iter()
                .all(|u| !u.achievement_id.contains("intimacy"))
        );
    }

    #[tokio::test]
    async fn mood_streak_uses_longest_daily_run() {
        let counters = Arc::new(FixedCounters {
            mood_dates: (1..=7)
                .map(|day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap())
                .chain([d("2024-05-20"), d("2024-05-03")])
                .collect(),
            ..FixedCounters::default()
        });
        let store = Arc::new(MemoryProgressStore::new());
        let engine = engine(counters, store);

        let report = engine.evaluate_at(&owner(), Category::Mood, at(1)).await.unwrap();

        let week = update(&report, "mood-streak-7");
        assert_eq!(week.progress, 7);
        assert!(week.newly_unlocked);
        assert!(!update(&report, "mood-streak-30").unlocked);
    }

    #[tokio::test]
    async fn habit_streak_takes_best_habit() {
        let habit = |id: &str| Habit {
            id: RecordId::new(id).unwrap(),
            owner_id: owner(),
            title: id.into(),
            frequency: Frequency::Daily,
            target: 1,
            created_at: at(1) - chrono::Duration::days(60),
            active: true,
        };
        let habits = FixedHabits {
            habits: vec![
                (habit("walk"), vec![d("2024-05-01"), d("2024-05-02")]),
                (
                    habit("read"),
                    (1..=4)
                        .map(|day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap())
                        .collect(),
                ),
            ],
        };
        let engine = AchievementEngine::new(
            Arc::new(FixedCounters::default()),
            Arc::new(habits),
            Arc::new(MemoryProgressStore::new()),
        );

        let report = engine.evaluate_at(&owner(), Category::Habits, at(1)).await.unwrap();
        assert_eq!(update(&report, "habit-streak-30").progress, 4);
    }

    #[tokio::test]
    async fn failed_write_skips_only_that_achievement() {
        let store = Arc::new(RejectingStore {
            inner: MemoryProgressStore::new(),
            rejected: "memory-keeper-100",
        });
        let engine = AchievementEngine::new(
            Arc::new(FixedCounters::with(&[(Metric::Journals, 12)])),
            Arc::new(FixedHabits::default()),
            Arc::clone(&store) as Arc<dyn ProgressStore>,
        );

        let report = engine
            .evaluate_at(&owner(), Category::Journal, at(1))
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].achievement_id, "memory-keeper-100");
        assert!(report.failed[0].reason.contains("disk I/O error"));
        assert!(update(&report, "memory-keeper-1").newly_unlocked);
        assert!(update(&report, "memory-keeper-10").newly_unlocked);
        assert!(!update(&report, "memory-keeper-50").unlocked);

        let stored = store.progress(&owner(), "memory-keeper-10").await.unwrap().unwrap();
        assert!(stored.unlocked);
        assert!(store.progress(&owner(), "memory-keeper-100").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn metrics_are_measured_as_of_the_given_day() {
        let counters = Arc::new(FixedCounters::with(&[(Metric::ParksVisited, 1)]));
        let store = Arc::new(MemoryProgressStore::new());
        let engine = engine(Arc::clone(&counters), store);

        // Late evening in UTC-7 is already the next day in UTC.
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 3, 0, 0).unwrap();
        engine
            .evaluate_on(&owner(), Category::Parks, now, d("2024-06-14"))
            .await
            .unwrap();
        assert_eq!(*counters.seen_days.lock().unwrap(), vec![d("2024-06-14")]);

        counters.seen_days.lock().unwrap().clear();
        engine.evaluate_at(&owner(), Category::Parks, now).await.unwrap();
        assert_eq!(*counters.seen_days.lock().unwrap(), vec![d("2024-06-15")]);
    }

    #[tokio::test]
    async fn store_rejecting_every_write_fails_evaluation() {
        let engine = AchievementEngine::new(
            Arc::new(FixedCounters::with(&[(Metric::Journals, 1)])),
            Arc::new(FixedHabits::default()),
            Arc::new(BrokenStore),
        );
        let err = engine
            .evaluate_at(&owner(), Category::Journal, at(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AchievementError::Persistence { ref achievement_id, .. } if achievement_id == "memory-keeper-100"
        ));
    }

    // ========== Direct Progress Tests ==========

    #[tokio::test]
    async fn unknown_achievement_is_skipped() {
        let store = Arc::new(MemoryProgressStore::new());
        let engine = engine(Arc::new(FixedCounters::default()), Arc::clone(&store));

        let result = engine
            .apply_progress(&owner(), "does-not-exist", 99, at(1))
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(store.list_progress(&owner()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn apply_progress_below_target_stays_locked() {
        let engine = engine(
            Arc::new(FixedCounters::default()),
            Arc::new(MemoryProgressStore::new()),
        );
        let update = engine
            .apply_progress(&owner(), "fitness-10", 4, at(1))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(update.progress, 4);
        assert!(!update.unlocked);
    }

    // ========== Listing Tests ==========

    #[tokio::test]
    async fn list_progress_and_points() {
        let counters = Arc::new(FixedCounters::with(&[(Metric::ParksVisited, 5)]));
        let engine = engine(counters, Arc::new(MemoryProgressStore::new()));
        engine.evaluate_at(&owner(), Category::Parks, at(1)).await.unwrap();

        let parks = engine
            .list_progress(&owner(), Some(Category::Parks))
            .await
            .unwrap();
        assert_eq!(parks.len(), 3);
        assert_eq!(parks.iter().filter(|s| s.unlocked).count(), 2);

        let everything = engine.list_progress(&owner(), None).await.unwrap();
        assert_eq!(everything.len(), CATALOG.len());

        // explorer-1 (5) + explorer-5 (20)
        assert_eq!(engine.total_points(&owner()).await.unwrap(), 25);
    }
}
