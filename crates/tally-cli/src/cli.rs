//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{achievements, calendar, habits, import};

/// Personal dashboard.
///
/// Builds calendar summaries from logged records, tracks habit streaks and
/// awards achievements as records come in.
#[derive(Debug, Parser)]
#[command(name = "tally", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize every day in a date range.
    Calendar(calendar::CalendarArgs),

    /// Summarize one calendar month.
    Month(calendar::MonthArgs),

    /// Manage habits and view streaks.
    #[command(subcommand)]
    Habits(habits::HabitsAction),

    /// Evaluate and list achievements.
    #[command(subcommand)]
    Achievements(achievements::AchievementsAction),

    /// Import records as JSON Lines from stdin.
    Import(import::ImportArgs),
}
