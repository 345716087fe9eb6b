//! `tally achievements`: evaluate progress and list the catalog.

use std::io::Write;

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use tally_core::achievement::AchievementStatus;
use tally_core::{AchievementEngine, Category, EvaluationReport, OwnerId};

use super::local_today;

#[derive(Debug, Subcommand)]
pub enum AchievementsAction {
    /// Recompute progress now and report new unlocks.
    Check {
        /// Only this category (mood, media, habits, tasks, ...).
        #[arg(long)]
        category: Option<Category>,
    },

    /// List achievements with stored progress.
    List {
        #[arg(long)]
        category: Option<Category>,

        /// Only unlocked achievements.
        #[arg(long)]
        unlocked: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

pub async fn run<W: Write>(
    writer: &mut W,
    engine: &AchievementEngine,
    owner: &OwnerId,
    action: &AchievementsAction,
) -> Result<()> {
    match action {
        AchievementsAction::Check { category } => {
            let categories = category.map_or_else(|| Category::ALL.to_vec(), |c| vec![c]);
            let today = local_today();
            let mut reports = Vec::with_capacity(categories.len());
            for category in categories {
                reports.push(engine.evaluate_on(owner, category, Utc::now(), today).await?);
            }
            write_reports(writer, &reports)?;
        }
        AchievementsAction::List {
            category,
            unlocked,
            json,
        } => {
            let mut statuses = engine.list_progress(owner, *category).await?;
            if *unlocked {
                statuses.retain(|status| status.unlocked);
            }
            if *json {
                serde_json::to_writer_pretty(&mut *writer, &statuses)?;
                writeln!(writer)?;
            } else {
                write_statuses(writer, &statuses)?;
                writeln!(writer)?;
                writeln!(writer, "{} points", engine.total_points(owner).await?)?;
            }
        }
    }
    Ok(())
}

pub fn write_reports<W: Write>(writer: &mut W, reports: &[EvaluationReport]) -> std::io::Result<()> {
    let mut unlocked = 0;
    for report in reports {
        for update in report.newly_unlocked() {
            let title = tally_core::achievement::find(update.achievement_id)
                .map_or(update.achievement_id, |a| a.title);
            writeln!(writer, "Unlocked: {title} [{}]", report.category)?;
            unlocked += 1;
        }
        for skipped in &report.skipped {
            writeln!(
                writer,
                "Skipped {:?} in {}: {}",
                skipped.metric, report.category, skipped.reason
            )?;
        }
        for failed in &report.failed {
            writeln!(
                writer,
                "Could not save {} in {}: {}",
                failed.achievement_id, report.category, failed.reason
            )?;
        }
    }
    if unlocked == 0 {
        writeln!(writer, "No new achievements.")?;
    }
    Ok(())
}

pub fn write_statuses<W: Write>(writer: &mut W, statuses: &[AchievementStatus]) -> std::io::Result<()> {
    for status in statuses {
        let mark = if status.unlocked { "x" } else { " " };
        let achievement = status.achievement;
        writeln!(
            writer,
            "[{mark}] {:<28} {:>5}/{:<5} {:>3} pts  {}",
            achievement.title,
            status.progress.min(achievement.target_value),
            achievement.target_value,
            achievement.points,
            achievement.category
        )?;
    }
    Ok(())
}
