//! CLI subcommand implementations.

pub mod achievements;
pub mod calendar;
pub mod habits;
pub mod import;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tally_core::AchievementEngine;
use tally_db::SharedDatabase;

/// The current date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// An engine that counts, reads habits and stores progress in `db`.
pub fn engine(db: &SharedDatabase) -> AchievementEngine {
    AchievementEngine::new(
        Arc::new(db.clone()),
        Arc::new(db.clone()),
        Arc::new(db.clone()),
    )
}
