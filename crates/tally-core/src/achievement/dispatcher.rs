//! Fire-and-forget achievement evaluation on a background task.
//!
//! Callers enqueue `(owner, category)` jobs and return immediately. A single
//! worker drains the queue in order; each evaluation runs on its own task so
//! a panic is contained and logged like any other failure. Nothing a job does
//! is ever reported back to the caller.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::Category;
use super::engine::AchievementEngine;
use crate::types::OwnerId;

struct Job {
    owner: OwnerId,
    category: Category,
}

/// Handle to the background evaluation worker.
pub struct AchievementDispatcher {
    jobs: mpsc::UnboundedSender<Job>,
    worker: JoinHandle<()>,
}

impl AchievementDispatcher {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn(engine: AchievementEngine) -> Self {
        let (jobs, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(worker_task(engine, rx));
        tracing::debug!(target: "tally::achievements", "achievement dispatcher started");
        Self { jobs, worker }
    }

    /// Queues an evaluation. Never blocks and never fails.
    pub fn dispatch(&self, owner: OwnerId, category: Category) {
        if self.jobs.send(Job { owner, category }).is_err() {
            tracing::error!(
                target: "tally::achievements",
                %category,
                "achievement worker has stopped; evaluation dropped"
            );
        }
    }

    /// Closes the queue and waits for already queued jobs to finish.
    pub async fn shutdown(self) {
        drop(self.jobs);
        if let Err(e) = self.worker.await {
            tracing::error!(target: "tally::achievements", error = %e, "achievement worker failed");
        }
    }
}

async fn worker_task(engine: AchievementEngine, mut rx: mpsc::UnboundedReceiver<Job>) {
    while let Some(Job { owner, category }) = rx.recv().await {
        let engine = engine.clone();
        let task_owner = owner.clone();
        let handle =
            tokio::spawn(async move { engine.evaluate(&task_owner, category).await });

        match handle.await {
            Ok(Ok(report)) => {
                for update in report.newly_unlocked() {
                    tracing::info!(
                        target: "tally::achievements",
                        owner = %owner,
                        achievement = update.achievement_id,
                        "unlocked"
                    );
                }
                for skipped in &report.skipped {
                    tracing::warn!(
                        target: "tally::achievements",
                        owner = %owner,
                        metric = ?skipped.metric,
                        reason = %skipped.reason,
                        "metric skipped"
                    );
                }
                for failed in &report.failed {
                    tracing::warn!(
                        target: "tally::achievements",
                        owner = %owner,
                        achievement = failed.achievement_id,
                        reason = %failed.reason,
                        "progress not stored"
                    );
                }
            }
            Ok(Err(e)) => {
                tracing::error!(
                    target: "tally::achievements",
                    owner = %owner,
                    %category,
                    error = %e,
                    "achievement evaluation failed"
                );
            }
            Err(e) => {
                tracing::error!(
                    target: "tally::achievements",
                    owner = %owner,
                    %category,
                    error = %e,
                    "achievement evaluation panicked"
                );
            }
        }
    }
    tracing::debug!(target: "tally::achievements", "achievement queue closed");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::achievement::engine::tests::{BrokenStore, FixedCounters, FixedHabits, owner};
    use crate::achievement::{CounterSource, Metric, MemoryProgressStore, ProgressStore};
    use crate::error::SourceError;

    #[tokio::test]
    async fn queued_jobs_finish_before_shutdown_returns() {
        let store = Arc::new(MemoryProgressStore::new());
        let engine = AchievementEngine::new(
            Arc::new(FixedCounters::with(&[(Metric::ParksVisited, 1)])),
            Arc::new(FixedHabits::default()),
            Arc::clone(&store) as Arc<dyn ProgressStore>,
        );

        let dispatcher = AchievementDispatcher::spawn(engine);
        dispatcher.dispatch(owner(), Category::Parks);
        dispatcher.shutdown().await;

        let row = store.progress(&owner(), "explorer-1").await.unwrap().unwrap();
        assert!(row.unlocked);
    }

    #[tokio::test]
    async fn persistence_errors_stay_in_the_worker() {
        let engine = AchievementEngine::new(
            Arc::new(FixedCounters::with(&[(Metric::Journals, 3)])),
            Arc::new(FixedHabits::default()),
            Arc::new(BrokenStore),
        );

        let dispatcher = AchievementDispatcher::spawn(engine);
        dispatcher.dispatch(owner(), Category::Journal);
        dispatcher.dispatch(owner(), Category::Journal);
        dispatcher.shutdown().await;
    }

    struct PanickyCounters;

    #[async_trait]
    impl CounterSource for PanickyCounters {
        async fn count(
            &self,
            _owner: &OwnerId,
            metric: Metric,
            _today: NaiveDate,
        ) -> Result<i64, SourceError> {
            assert_ne!(metric, Metric::Journals, "journal table exploded");
            Ok(1)
        }

        async fn mood_dates(&self, _owner: &OwnerId) -> Result<Vec<NaiveDate>, SourceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn panicking_job_does_not_stop_the_worker() {
        let store = Arc::new(MemoryProgressStore::new());
        let engine = AchievementEngine::new(
            Arc::new(PanickyCounters),
            Arc::new(FixedHabits::default()),
            Arc::clone(&store) as Arc<dyn ProgressStore>,
        );

        let dispatcher = AchievementDispatcher::spawn(engine);
        dispatcher.dispatch(owner(), Category::Journal);
        dispatcher.dispatch(owner(), Category::Duolingo);
        dispatcher.shutdown().await;

        let row = store.progress(&owner(), "duolingo-1").await.unwrap().unwrap();
        assert!(row.unlocked);
        assert!(store.progress(&owner(), "memory-keeper-1").await.unwrap().is_none());
    }
}
