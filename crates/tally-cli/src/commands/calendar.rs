//! `tally calendar` and `tally month`: per-day summaries over a range.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tally_core::summary::StatusCounts;
use tally_core::{
    Calendar, CalendarDaySummary, DateRange, OwnerId, build_calendar, build_month,
    summarize_calendar,
};
use tally_db::SharedDatabase;

use super::local_today;

#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// First day of the range (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the range, inclusive.
    #[arg(long)]
    pub end: NaiveDate,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct MonthArgs {
    /// Month to summarize (YYYY-MM).
    pub month: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Date tasks and goals are judged against. Defaults to today.
    #[arg(long)]
    pub today: Option<NaiveDate>,

    /// Print every day as JSON instead of a table of non-empty days.
    #[arg(long)]
    pub json: bool,
}

pub async fn run<W: Write>(
    writer: &mut W,
    db: &SharedDatabase,
    owner: &OwnerId,
    args: &CalendarArgs,
) -> Result<()> {
    let range = DateRange::new(args.start, args.end)?;
    let calendar = build_calendar(db, owner, range).await;
    render(writer, &calendar, &args.output)
}

pub async fn run_month<W: Write>(
    writer: &mut W,
    db: &SharedDatabase,
    owner: &OwnerId,
    args: &MonthArgs,
) -> Result<()> {
    let (year, month) = parse_month(&args.month)?;
    let calendar = build_month(db, owner, year, month).await?;
    render(writer, &calendar, &args.output)
}

fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .with_context(|| format!("expected YYYY-MM, got {raw:?}"))?;
    let year = year
        .parse()
        .with_context(|| format!("invalid year in {raw:?}"))?;
    let month = month
        .parse()
        .with_context(|| format!("invalid month in {raw:?}"))?;
    Ok((year, month))
}

fn render<W: Write>(writer: &mut W, calendar: &Calendar, output: &OutputArgs) -> Result<()> {
    let today = output.today.unwrap_or_else(local_today);
    let summaries = summarize_calendar(calendar, today);
    let days: Vec<&CalendarDaySummary> = summaries.values().collect();

    if output.json {
        serde_json::to_writer_pretty(&mut *writer, &days)?;
        writeln!(writer)?;
    } else {
        write_table(writer, calendar.range(), &days)?;
    }

    if !calendar.degraded().is_empty() {
        let missing: Vec<_> = calendar.degraded().iter().map(|d| d.as_str()).collect();
        eprintln!("warning: could not load {}", missing.join(", "));
    }
    Ok(())
}

/// One line per day that has any data.
pub fn write_table<W: Write>(
    writer: &mut W,
    range: DateRange,
    days: &[&CalendarDaySummary],
) -> std::io::Result<()> {
    let busy: Vec<_> = days.iter().filter(|day| day.has_any_data).collect();
    if busy.is_empty() {
        return writeln!(writer, "No records between {} and {}.", range.start(), range.end());
    }
    for day in busy {
        writeln!(writer, "{}  {}", day.date, describe(day).join(", "))?;
    }
    Ok(())
}

fn describe(day: &CalendarDaySummary) -> Vec<String> {
    let mut parts = Vec::new();
    if let Some(rating) = day.mood_rating {
        parts.push(format!("mood {rating}"));
    }
    if day.activity_count > 0 {
        parts.push(plural(day.activity_count, "activity", "activities"));
    }
    if let Some(first) = &day.workout_first {
        let done = plural(day.workout_counts.completed, "workout", "workouts");
        parts.push(format!("{done} ({})", first.title));
    }
    if day.workout_counts.upcoming > 0 {
        let planned = plural(day.workout_counts.upcoming, "workout", "workouts");
        parts.push(format!("{planned} planned"));
    }
    if let Some(first) = &day.media_first {
        let media = plural(day.media_count, "title", "titles");
        parts.push(format!("{media} ({})", first.title));
    }
    if day.task_counts.total() > 0 {
        parts.push(format!("tasks {}", status(day.task_counts)));
    }
    if day.event_count > 0 {
        let title = day.event_first_title.as_deref().unwrap_or_default();
        parts.push(format!("{} ({title})", plural(day.event_count, "event", "events")));
    }
    if day.park_count > 0 {
        parts.push(plural(day.park_count, "park", "parks"));
    }
    if day.journal_count > 0 {
        parts.push(plural(day.journal_count, "journal", "journals"));
    }
    if day.github_event_count > 0 {
        let events = plural(day.github_event_count, "event", "events");
        parts.push(format!("{events} on github"));
    }
    if day.habit_count > 0 {
        parts.push(plural(day.habit_count, "habit", "habits"));
    }
    if day.duolingo_completed {
        parts.push("duolingo".to_string());
    }
    if day.goal_counts.total() > 0 {
        parts.push(format!("goals {}", status(day.goal_counts)));
    }
    if day.milestone_counts.total() > 0 {
        parts.push(format!("milestones {}", status(day.milestone_counts)));
    }
    if day.relationship_count > 0 {
        parts.push(plural(
            day.relationship_count,
            "relationship entry",
            "relationship entries",
        ));
    }
    parts
}

fn status(counts: StatusCounts) -> String {
    let mut pieces = Vec::new();
    if counts.completed > 0 {
        pieces.push(format!("{} done", counts.completed));
    }
    if counts.overdue > 0 {
        pieces.push(format!("{} overdue", counts.overdue));
    }
    if counts.upcoming > 0 {
        pieces.push(format!("{} upcoming", counts.upcoming));
    }
    pieces.join("/")
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("1 {one}")
    } else {
        format!("{n} {many}")
    }
}
