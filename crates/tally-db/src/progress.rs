//! Achievement progress rows.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params};
use tally_core::{OwnerId, StoredProgress};

use crate::{Database, DbError, format_timestamp, parse_timestamp};

fn progress_row(row: &Row<'_>) -> rusqlite::Result<(i64, bool, Option<String>)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_progress(
    (progress, unlocked, unlocked_at): (i64, bool, Option<String>),
) -> Result<StoredProgress, DbError> {
    Ok(StoredProgress {
        progress,
        unlocked,
        unlocked_at: unlocked_at
            .map(|raw| parse_timestamp("user_achievements", &raw))
            .transpose()?,
    })
}

impl Database {
    pub fn get_progress(
        &self,
        owner: &OwnerId,
        achievement_id: &str,
    ) -> Result<Option<StoredProgress>, DbError> {
        let row = self
            .conn
            .query_row(
                "
                SELECT progress, unlocked, unlocked_at
                FROM user_achievements
                WHERE owner_id = ? AND achievement_id = ?
                ",
                params![owner.as_str(), achievement_id],
                progress_row,
            )
            .optional()?;
        row.map(into_progress).transpose()
    }

    /// Upserts progress for one (owner, achievement) pair.
    ///
    /// `unlocked` only ever goes from 0 to 1 and `unlocked_at` is written
    /// once, by the call that performs the unlock.
    pub fn upsert_progress(
        &mut self,
        owner: &OwnerId,
        achievement_id: &str,
        progress: i64,
        unlocked: bool,
        at: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let at = format_timestamp(at);
        self.conn.execute(
            "
            INSERT INTO user_achievements
            (owner_id, achievement_id, progress, unlocked, unlocked_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, CASE WHEN ?4 THEN ?5 END, ?5)
            ON CONFLICT(owner_id, achievement_id) DO UPDATE SET
                progress = excluded.progress,
                unlocked = max(unlocked, excluded.unlocked),
                unlocked_at = coalesce(unlocked_at, excluded.unlocked_at),
                updated_at = excluded.updated_at
            ",
            params![owner.as_str(), achievement_id, progress, unlocked, at],
        )?;
        Ok(())
    }

    /// Every stored progress row for `owner`, keyed by achievement id.
    pub fn list_progress(&self, owner: &OwnerId) -> Result<HashMap<String, StoredProgress>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT achievement_id, progress, unlocked, unlocked_at
            FROM user_achievements
            WHERE owner_id = ?
            ORDER BY achievement_id ASC
            ",
        )?;
        let rows = stmt.query_map([owner.as_str()], |row| {
            let id: String = row.get(0)?;
            Ok((id, (row.get(1)?, row.get(2)?, row.get(3)?)))
        })?;
        let mut progress = HashMap::new();
        for row in rows {
            let (id, raw) = row?;
            progress.insert(id, into_progress(raw)?);
        }
        Ok(progress)
    }
}
