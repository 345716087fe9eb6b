//! Habits and their completion history.

use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row, params};
use tally_core::{Frequency, Habit, OwnerId, RecordId};
use uuid::Uuid;

use crate::{Database, DbError, format_timestamp, id_column, parse_timestamp};

const HABIT_COLUMNS: &str = "id, owner_id, title, frequency, target, created_at, active";

/// Raw habit row; `created_at` is parsed after the query.
struct HabitRow {
    id: RecordId,
    owner_id: OwnerId,
    title: String,
    frequency: String,
    target: u32,
    created_at: String,
    active: bool,
}

impl HabitRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: id_column(row, 0)?,
            owner_id: id_column(row, 1)?,
            title: row.get(2)?,
            frequency: row.get(3)?,
            target: row.get(4)?,
            created_at: row.get(5)?,
            active: row.get(6)?,
        })
    }

    fn into_habit(self) -> Result<Habit, DbError> {
        Ok(Habit {
            created_at: parse_timestamp("habits", &self.created_at)?,
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            frequency: Frequency::from(self.frequency),
            target: self.target,
            active: self.active,
        })
    }
}

impl Database {
    /// Inserts or replaces a habit.
    pub fn upsert_habit(&mut self, habit: &Habit) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO habits (id, owner_id, title, frequency, target, created_at, active)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                frequency = excluded.frequency,
                target = excluded.target,
                active = excluded.active
            ",
            params![
                habit.id.as_str(),
                habit.owner_id.as_str(),
                habit.title,
                habit.frequency.as_str(),
                habit.target,
                format_timestamp(habit.created_at),
                habit.active,
            ],
        )?;
        Ok(())
    }

    /// Lists an owner's habits ordered by creation.
    pub fn list_habits(
        &self,
        owner: &OwnerId,
        include_inactive: bool,
    ) -> Result<Vec<Habit>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {HABIT_COLUMNS}
            FROM habits
            WHERE owner_id = ?1 AND (?2 OR active = 1)
            ORDER BY created_at ASC, id ASC
            "
        ))?;
        let rows = stmt.query_map(params![owner.as_str(), include_inactive], HabitRow::from_row)?;
        let mut habits = Vec::new();
        for row in rows {
            habits.push(row?.into_habit()?);
        }
        Ok(habits)
    }

    pub fn get_habit(&self, habit_id: &RecordId) -> Result<Option<Habit>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?"),
                [habit_id.as_str()],
                HabitRow::from_row,
            )
            .optional()?;
        row.map(HabitRow::into_habit).transpose()
    }

    /// Archives or restores one of the owner's habits.
    ///
    /// Returns `false` if the owner has no habit with that id.
    pub fn set_habit_active(
        &mut self,
        owner: &OwnerId,
        habit_id: &RecordId,
        active: bool,
    ) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "UPDATE habits SET active = ? WHERE id = ? AND owner_id = ?",
            params![active, habit_id.as_str(), owner.as_str()],
        )?;
        tracing::debug!(habit = %habit_id, active, changed, "set habit active");
        Ok(changed > 0)
    }

    /// Deletes one of the owner's habits along with its completions.
    pub fn delete_habit(&mut self, owner: &OwnerId, habit_id: &RecordId) -> Result<bool, DbError> {
        let removed = self.conn.execute(
            "DELETE FROM habits WHERE id = ? AND owner_id = ?",
            params![habit_id.as_str(), owner.as_str()],
        )?;
        tracing::debug!(habit = %habit_id, removed, "deleted habit");
        Ok(removed > 0)
    }

    /// Adds the completion if absent, removes it if present.
    ///
    /// Returns whether the habit is completed on `date` afterwards.
    pub fn toggle_completion(
        &mut self,
        habit_id: &RecordId,
        date: NaiveDate,
    ) -> Result<bool, DbError> {
        let date = date.format("%Y-%m-%d").to_string();
        let tx = self.conn.transaction()?;
        let owner: Option<String> = tx
            .query_row(
                "SELECT owner_id FROM habits WHERE id = ?",
                [habit_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(owner) = owner else {
            return Err(DbError::HabitNotFound(habit_id.to_string()));
        };

        let removed = tx.execute(
            "DELETE FROM habit_completions WHERE habit_id = ? AND substr(date, 1, 10) = ?",
            params![habit_id.as_str(), date],
        )?;
        if removed == 0 {
            tx.execute(
                "INSERT INTO habit_completions (id, owner_id, habit_id, date) VALUES (?, ?, ?, ?)",
                params![Uuid::new_v4().to_string(), owner, habit_id.as_str(), date],
            )?;
        }
        tx.commit()?;

        tracing::debug!(habit = %habit_id, %date, completed = removed == 0, "toggled habit");
        Ok(removed == 0)
    }

    /// Every date the habit was completed, oldest first.
    ///
    /// Stored dates that do not parse are skipped.
    pub fn completion_dates(&self, habit_id: &RecordId) -> Result<Vec<NaiveDate>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT date FROM habit_completions WHERE habit_id = ? ORDER BY date ASC",
        )?;
        let rows = stmt.query_map([habit_id.as_str()], |row| row.get::<_, String>(0))?;
        let mut dates = Vec::new();
        for row in rows {
            let raw = row?;
            match tally_core::dates::parse_day(&raw) {
                Some(date) => dates.push(date),
                None => tracing::warn!(habit = %habit_id, date = %raw, "skipping unparseable completion"),
            }
        }
        Ok(dates)
    }
}
