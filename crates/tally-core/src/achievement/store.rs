//! In-memory progress store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::engine::{ProgressStore, StoredProgress};
use crate::error::SourceError;
use crate::types::OwnerId;

type Rows = HashMap<(OwnerId, String), StoredProgress>;

/// A [`ProgressStore`] held in process memory.
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    rows: Mutex<Rows>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<MutexGuard<'_, Rows>, SourceError> {
        self.rows
            .lock()
            .map_err(|_| SourceError::new("lock progress store", "mutex poisoned"))
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn progress(
        &self,
        owner: &OwnerId,
        achievement_id: &str,
    ) -> Result<Option<StoredProgress>, SourceError> {
        let rows = self.rows()?;
        Ok(rows
            .get(&(owner.clone(), achievement_id.to_string()))
            .copied())
    }

    async fn set_progress(
        &self,
        owner: &OwnerId,
        achievement_id: &str,
        progress: i64,
        unlocked: bool,
        at: DateTime<Utc>,
    ) -> Result<(), SourceError> {
        let mut rows = self.rows()?;
        let row = rows
            .entry((owner.clone(), achievement_id.to_string()))
            .or_default();
        row.progress = progress;
        if unlocked && !row.unlocked {
            row.unlocked = true;
            row.unlocked_at = row.unlocked_at.or(Some(at));
        }
        Ok(())
    }

    async fn list_progress(
        &self,
        owner: &OwnerId,
    ) -> Result<HashMap<String, StoredProgress>, SourceError> {
        let rows = self.rows()?;
        Ok(rows
            .iter()
            .filter(|((row_owner, _), _)| row_owner == owner)
            .map(|((_, id), row)| (id.clone(), *row))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn owner(name: &str) -> OwnerId {
        OwnerId::new(name).unwrap()
    }

    #[tokio::test]
    async fn never_relocks() {
        let store = MemoryProgressStore::new();
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        store
            .set_progress(&owner("a"), "mood-first", 1, true, first)
            .await
            .unwrap();
        store
            .set_progress(&owner("a"), "mood-first", 0, false, later)
            .await
            .unwrap();
        store
            .set_progress(&owner("a"), "mood-first", 3, true, later)
            .await
            .unwrap();

        let row = store.progress(&owner("a"), "mood-first").await.unwrap().unwrap();
        assert_eq!(
            row,
            StoredProgress {
                progress: 3,
                unlocked: true,
                unlocked_at: Some(first),
            }
        );
    }

    #[tokio::test]
    async fn rows_are_scoped_to_owner() {
        let store = MemoryProgressStore::new();
        let now = Utc::now();
        store
            .set_progress(&owner("a"), "fitness-1", 1, true, now)
            .await
            .unwrap();

        assert!(store.progress(&owner("b"), "fitness-1").await.unwrap().is_none());
        assert!(store.list_progress(&owner("b")).await.unwrap().is_empty());
        assert_eq!(store.list_progress(&owner("a")).await.unwrap().len(), 1);
    }
}
