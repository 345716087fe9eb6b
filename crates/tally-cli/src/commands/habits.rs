//! `tally habits`: create habits, toggle completions, view streaks.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use serde::Serialize;
use tally_core::habit::owner_habit_stats;
use tally_core::{
    AchievementDispatcher, Category, Frequency, Habit, HabitStats, OwnerId, RecordId,
    compute_habit_stats,
};
use tally_db::SharedDatabase;
use uuid::Uuid;

use super::local_today;

#[derive(Debug, Subcommand)]
pub enum HabitsAction {
    /// List habits with their streaks.
    List {
        /// Include deactivated habits.
        #[arg(long)]
        all: bool,

        /// Day streaks are measured up to. Defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Create a habit.
    Add {
        title: String,

        /// daily, every_other_day, three_times_a_week, once_a_week, every_week, monthly.
        #[arg(long, default_value = "daily")]
        frequency: String,

        /// Completions per period.
        #[arg(long, default_value_t = 1)]
        target: u32,
    },

    /// Mark a habit done for a day, or undo it if already done.
    Toggle {
        habit_id: String,

        /// Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Hide a habit from the default list, keeping its history.
    Archive {
        habit_id: String,

        /// Make an archived habit active again.
        #[arg(long)]
        restore: bool,
    },

    /// Delete a habit and all of its completions.
    Remove { habit_id: String },

    /// Streak statistics for one habit, as JSON.
    Stats {
        habit_id: String,

        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Debug, Serialize)]
struct HabitRow<'a> {
    #[serde(flatten)]
    habit: &'a Habit,
    stats: HabitStats,
}

pub async fn run<W: Write>(
    writer: &mut W,
    db: &SharedDatabase,
    owner: &OwnerId,
    action: &HabitsAction,
    dispatcher: &AchievementDispatcher,
) -> Result<()> {
    match action {
        HabitsAction::List { all, today, json } => {
            let today = today.unwrap_or_else(local_today);
            let mut rows = owner_habit_stats(db, owner, today).await?;
            if !all {
                rows.retain(|(habit, _)| habit.active);
            }
            if *json {
                let rows: Vec<_> = rows
                    .iter()
                    .map(|(habit, stats)| HabitRow {
                        habit,
                        stats: *stats,
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut *writer, &rows)?;
                writeln!(writer)?;
            } else {
                write_habits(writer, &rows)?;
            }
        }
        HabitsAction::Add {
            title,
            frequency,
            target,
        } => {
            if title.trim().is_empty() {
                bail!("habit title cannot be empty");
            }
            let habit = Habit {
                id: RecordId::new(Uuid::new_v4().to_string())?,
                owner_id: owner.clone(),
                title: title.clone(),
                frequency: Frequency::from(frequency.as_str()),
                target: *target,
                created_at: Utc::now(),
                active: true,
            };
            db.with(|db| db.upsert_habit(&habit))?;
            if let Frequency::Other(raw) = &habit.frequency {
                tracing::warn!(frequency = %raw, "unknown frequency; streaks use the daily rule");
            }
            writeln!(writer, "{}", habit.id)?;
        }
        HabitsAction::Toggle { habit_id, date } => {
            let habit = owned_habit(db, owner, habit_id)?;
            let date = date.unwrap_or_else(local_today);
            let done = db.with(|db| db.toggle_completion(&habit.id, date))?;
            if done {
                writeln!(writer, "{}: done on {date}", habit.title)?;
            } else {
                writeln!(writer, "{}: cleared {date}", habit.title)?;
            }
            dispatcher.dispatch(owner.clone(), Category::Habits);
        }
        HabitsAction::Archive { habit_id, restore } => {
            let habit = owned_habit(db, owner, habit_id)?;
            db.with(|db| db.set_habit_active(owner, &habit.id, *restore))?;
            if *restore {
                writeln!(writer, "Restored {}", habit.title)?;
            } else {
                writeln!(writer, "Archived {}", habit.title)?;
            }
        }
        HabitsAction::Remove { habit_id } => {
            let habit = owned_habit(db, owner, habit_id)?;
            db.with(|db| db.delete_habit(owner, &habit.id))?;
            writeln!(writer, "Removed {}", habit.title)?;
            dispatcher.dispatch(owner.clone(), Category::Habits);
        }
        HabitsAction::Stats { habit_id, today } => {
            let habit = owned_habit(db, owner, habit_id)?;
            let dates = db.with(|db| db.completion_dates(&habit.id))?;
            let stats = compute_habit_stats(&habit, &dates, today.unwrap_or_else(local_today));
            serde_json::to_writer_pretty(&mut *writer, &stats)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn owned_habit(db: &SharedDatabase, owner: &OwnerId, habit_id: &str) -> Result<Habit> {
    let id = RecordId::new(habit_id)?;
    db.with(|db| db.get_habit(&id))?
        .filter(|habit| &habit.owner_id == owner)
        .with_context(|| format!("no habit with id {habit_id}"))
}

pub fn write_habits<W: Write>(writer: &mut W, rows: &[(Habit, HabitStats)]) -> std::io::Result<()> {
    if rows.is_empty() {
        return writeln!(writer, "No habits yet. Add one with 'tally habits add <title>'.");
    }
    for (habit, stats) in rows {
        writeln!(
            writer,
            "{} ({}): current {}, longest {}, {} total  [{}]",
            habit.title,
            habit.frequency,
            stats.current_streak,
            stats.longest_streak,
            stats.total_completions,
            habit.id
        )?;
    }
    Ok(())
}
