//! Placement: which calendar days a record belongs to.
//!
//! Every record type resolves its raw date fields into a [`Placement`]. The
//! placement is then clipped to the requested range and reduced to a set of
//! days, so a record never lands in the same day twice.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::calendar::CalendarDay;
use crate::dates::{DateRange, parse_day};
use crate::error::{MalformedReason, MalformedRecord};
use crate::record::{
    CalendarEvent, Domain, DuolingoCompletion, FitnessActivity, GithubEvent, Goal,
    HabitCompletion, Journal, JournalKind, MediaItem, Milestone, MoodEntry, ParkVisit,
    RelationshipEntry, Task, WorkoutActivity,
};
use crate::types::{OwnerId, RecordId};

/// Where a record sits on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// One day.
    Single(NaiveDate),
    /// Due (or target) day, plus the completion day once completed.
    Dual {
        due: Option<NaiveDate>,
        completed: Option<NaiveDate>,
    },
    /// Every day from `start` through `end`.
    Span { start: NaiveDate, end: NaiveDate },
}

impl Placement {
    /// The days inside `range` this placement touches.
    pub fn days_within(&self, range: &DateRange) -> BTreeSet<NaiveDate> {
        match *self {
            Self::Single(day) => range.contains(day).then_some(day).into_iter().collect(),
            Self::Dual { due, completed } => due
                .into_iter()
                .chain(completed)
                .filter(|day| range.contains(*day))
                .collect(),
            Self::Span { start, end } => range
                .clip(start, end)
                .map(|overlap| overlap.days().collect())
                .unwrap_or_default(),
        }
    }
}

/// A date-stamped record that can be bucketed into a [`CalendarDay`].
pub trait DomainRecord: Clone {
    const DOMAIN: Domain;

    fn record_id(&self) -> &RecordId;

    fn owner_id(&self) -> &OwnerId;

    /// Resolves the record's date fields.
    fn placement(&self) -> Result<Placement, MalformedRecord>;

    /// The collection of this record type inside a day.
    fn bucket(day: &mut CalendarDay) -> &mut Vec<Self>;
}

/// Builds the error for a record that cannot be placed.
fn malformed<R: DomainRecord>(record: &R, reason: MalformedReason) -> MalformedRecord {
    MalformedRecord {
        domain: R::DOMAIN,
        record_id: record.record_id().to_string(),
        reason,
    }
}

/// Parses a required date field.
fn required<R: DomainRecord>(
    record: &R,
    field: &'static str,
    raw: Option<&str>,
) -> Result<NaiveDate, MalformedRecord> {
    match optional(record, field, raw)? {
        Some(day) => Ok(day),
        None => Err(malformed(record, MalformedReason::Missing { field })),
    }
}

/// Parses an optional date field. Empty strings count as absent; anything
/// else that does not parse is malformed.
fn optional<R: DomainRecord>(
    record: &R,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, MalformedRecord> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };
    parse_day(raw).map(Some).ok_or_else(|| {
        malformed(
            record,
            MalformedReason::Unparseable {
                field,
                value: raw.to_string(),
            },
        )
    })
}

/// Placement shared by tasks, goals and milestones.
fn dual<R: DomainRecord>(
    record: &R,
    due_field: &'static str,
    due: Option<&str>,
    completed: bool,
    completed_date: Option<&str>,
) -> Result<Placement, MalformedRecord> {
    let due = optional(record, due_field, due)?;
    let completed = if completed {
        optional(record, "completed_date", completed_date)?
    } else {
        None
    };
    if due.is_none() && completed.is_none() {
        return Err(malformed(record, MalformedReason::Missing { field: due_field }));
    }
    Ok(Placement::Dual { due, completed })
}

macro_rules! impl_domain_record {
    ($ty:ty, $domain:expr, $field:ident) => {
        impl DomainRecord for $ty {
            const DOMAIN: Domain = $domain;

            fn record_id(&self) -> &RecordId {
                &self.id
            }

            fn owner_id(&self) -> &OwnerId {
                &self.owner_id
            }

            fn placement(&self) -> Result<Placement, MalformedRecord> {
                Place::place(self)
            }

            fn bucket(day: &mut CalendarDay) -> &mut Vec<Self> {
                &mut day.$field
            }
        }
    };
}

/// Per-type placement rules, dispatched from [`DomainRecord::placement`].
trait Place {
    fn place(&self) -> Result<Placement, MalformedRecord>;
}

impl Place for MoodEntry {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "date", Some(&self.date)).map(Placement::Single)
    }
}

impl Place for FitnessActivity {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "start_date_local", Some(&self.start_date_local)).map(Placement::Single)
    }
}

impl Place for MediaItem {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "completed", self.completed.as_deref()).map(Placement::Single)
    }
}

impl Place for Task {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        dual(
            self,
            "due_date",
            self.due_date.as_deref(),
            self.completed,
            self.completed_date.as_deref(),
        )
    }
}

impl Place for CalendarEvent {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        let start = required(self, "date", Some(&self.date))?;
        match optional(self, "end_date", self.end_date.as_deref())? {
            Some(end) if end > start => Ok(Placement::Span { start, end }),
            _ => Ok(Placement::Single(start)),
        }
    }
}

impl Place for ParkVisit {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "visited", self.visited.as_deref()).map(Placement::Single)
    }
}

impl Place for Journal {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        match self.journal_type {
            JournalKind::Daily => required(self, "daily_date", self.daily_date.as_deref()),
            JournalKind::General => required(self, "created_at", self.created_at.as_deref()),
            JournalKind::Other => Err(malformed(
                self,
                MalformedReason::JournalType {
                    value: "other".to_string(),
                },
            )),
        }
        .map(Placement::Single)
    }
}

impl Place for WorkoutActivity {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "date", Some(&self.date)).map(Placement::Single)
    }
}

impl Place for GithubEvent {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "created_at", Some(&self.created_at)).map(Placement::Single)
    }
}

impl Place for HabitCompletion {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "date", Some(&self.date)).map(Placement::Single)
    }
}

impl Place for DuolingoCompletion {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "date", Some(&self.date)).map(Placement::Single)
    }
}

impl Place for Goal {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        dual(
            self,
            "target_date",
            self.target_date.as_deref(),
            self.completed,
            self.completed_date.as_deref(),
        )
    }
}

impl Place for Milestone {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        dual(
            self,
            "target_date",
            self.target_date.as_deref(),
            self.completed,
            self.completed_date.as_deref(),
        )
    }
}

impl Place for RelationshipEntry {
    fn place(&self) -> Result<Placement, MalformedRecord> {
        required(self, "date", Some(&self.date)).map(Placement::Single)
    }
}

impl_domain_record!(MoodEntry, Domain::Mood, mood);
impl_domain_record!(FitnessActivity, Domain::Activities, activities);
impl_domain_record!(MediaItem, Domain::Media, media);
impl_domain_record!(Task, Domain::Tasks, tasks);
impl_domain_record!(CalendarEvent, Domain::Events, events);
impl_domain_record!(ParkVisit, Domain::Parks, parks);
impl_domain_record!(Journal, Domain::Journals, journals);
impl_domain_record!(WorkoutActivity, Domain::Workouts, workouts);
impl_domain_record!(GithubEvent, Domain::Github, github_events);
impl_domain_record!(HabitCompletion, Domain::HabitCompletions, habit_completions);
impl_domain_record!(DuolingoCompletion, Domain::Duolingo, duolingo);
impl_domain_record!(Goal, Domain::Goals, goals);
impl_domain_record!(Milestone, Domain::Milestones, milestones);
impl_domain_record!(RelationshipEntry, Domain::Relationship, relationship);
