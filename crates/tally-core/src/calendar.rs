//! Day-bucket builder.
//!
//! Turns per-domain record streams into one [`CalendarDay`] per date.
//!
//! # Algorithm Summary
//!
//! 1. Fetch every domain for the owner and range concurrently. A failed fetch
//!    contributes nothing and marks the domain as degraded.
//! 2. Create an empty day for every date in the range.
//! 3. Resolve each record's [`Placement`](crate::placement::Placement) and
//!    append it to every day it touches, in the order records were supplied.
//!    Malformed records are logged and dropped.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::dates::DateRange;
use crate::error::SourceError;
use crate::placement::DomainRecord;
use crate::record::{
    CalendarEvent, Domain, DuolingoCompletion, FitnessActivity, GithubEvent, Goal,
    HabitCompletion, Journal, MediaItem, Milestone, MoodEntry, ParkVisit, RelationshipEntry,
    Task, WorkoutActivity,
};
use crate::types::{OwnerId, ValidationError};

/// Everything tracked on one calendar date for one owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub mood: Vec<MoodEntry>,
    pub activities: Vec<FitnessActivity>,
    pub media: Vec<MediaItem>,
    pub tasks: Vec<Task>,
    pub events: Vec<CalendarEvent>,
    pub parks: Vec<ParkVisit>,
    pub journals: Vec<Journal>,
    pub workouts: Vec<WorkoutActivity>,
    pub github_events: Vec<GithubEvent>,
    pub habit_completions: Vec<HabitCompletion>,
    pub duolingo: Vec<DuolingoCompletion>,
    pub goals: Vec<Goal>,
    pub milestones: Vec<Milestone>,
    pub relationship: Vec<RelationshipEntry>,
}

impl CalendarDay {
    /// An empty day.
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            mood: Vec::new(),
            activities: Vec::new(),
            media: Vec::new(),
            tasks: Vec::new(),
            events: Vec::new(),
            parks: Vec::new(),
            journals: Vec::new(),
            workouts: Vec::new(),
            github_events: Vec::new(),
            habit_completions: Vec::new(),
            duolingo: Vec::new(),
            goals: Vec::new(),
            milestones: Vec::new(),
            relationship: Vec::new(),
        }
    }
}

/// Records fetched for a range, one collection per domain.
#[derive(Debug, Clone, Default)]
pub struct SourceRecords {
    pub mood: Vec<MoodEntry>,
    pub activities: Vec<FitnessActivity>,
    pub media: Vec<MediaItem>,
    pub tasks: Vec<Task>,
    pub events: Vec<CalendarEvent>,
    pub parks: Vec<ParkVisit>,
    pub journals: Vec<Journal>,
    pub workouts: Vec<WorkoutActivity>,
    pub github_events: Vec<GithubEvent>,
    pub habit_completions: Vec<HabitCompletion>,
    pub duolingo: Vec<DuolingoCompletion>,
    pub goals: Vec<Goal>,
    pub milestones: Vec<Milestone>,
    pub relationship: Vec<RelationshipEntry>,
}

/// The day-indexed view of a range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calendar {
    #[serde(skip)]
    range: DateRange,
    days: BTreeMap<NaiveDate, CalendarDay>,
    /// Domains whose fetch failed; their records are missing from every day.
    degraded: Vec<Domain>,
}

impl Calendar {
    /// An empty day for every date in `range`.
    pub fn empty(range: DateRange) -> Self {
        let days = range.days().map(|date| (date, CalendarDay::new(date))).collect();
        Self {
            range,
            days,
            degraded: Vec::new(),
        }
    }

    pub const fn range(&self) -> DateRange {
        self.range
    }

    pub fn get(&self, date: NaiveDate) -> Option<&CalendarDay> {
        self.days.get(&date)
    }

    /// Days in ascending date order.
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.days.values()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn degraded(&self) -> &[Domain] {
        &self.degraded
    }

    pub fn into_days(self) -> BTreeMap<NaiveDate, CalendarDay> {
        self.days
    }
}

/// Per-domain readers for one owner's records.
///
/// Each method returns the records of one domain whose date fields touch the
/// range. Returning records outside the range is harmless; they are ignored.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    async fn fetch_moods(&self, owner: &OwnerId, range: DateRange)
    -> Result<Vec<MoodEntry>, SourceError>;

    async fn fetch_activities(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<FitnessActivity>, SourceError>;

    async fn fetch_media(&self, owner: &OwnerId, range: DateRange)
    -> Result<Vec<MediaItem>, SourceError>;

    async fn fetch_tasks(&self, owner: &OwnerId, range: DateRange)
    -> Result<Vec<Task>, SourceError>;

    async fn fetch_events(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<CalendarEvent>, SourceError>;

    async fn fetch_parks(&self, owner: &OwnerId, range: DateRange)
    -> Result<Vec<ParkVisit>, SourceError>;

    async fn fetch_journals(&self, owner: &OwnerId, range: DateRange)
    -> Result<Vec<Journal>, SourceError>;

    async fn fetch_workouts(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<WorkoutActivity>, SourceError>;

    async fn fetch_github_events(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<GithubEvent>, SourceError>;

    async fn fetch_habit_completions(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<HabitCompletion>, SourceError>;

    async fn fetch_duolingo(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<DuolingoCompletion>, SourceError>;

    async fn fetch_goals(&self, owner: &OwnerId, range: DateRange)
    -> Result<Vec<Goal>, SourceError>;

    async fn fetch_milestones(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<Milestone>, SourceError>;

    async fn fetch_relationship(
        &self,
        owner: &OwnerId,
        range: DateRange,
    ) -> Result<Vec<RelationshipEntry>, SourceError>;
}

/// Fetches every domain concurrently and buckets the results.
///
/// Never fails: a domain whose fetch errors is logged, left empty, and listed
/// in [`Calendar::degraded`].
pub async fn build_calendar<S>(source: &S, owner: &OwnerId, range: DateRange) -> Calendar
where
    S: CalendarSource + ?Sized,
{
    let (
        mood,
        activities,
        media,
        tasks,
        events,
        parks,
        journals,
        workouts,
        github_events,
        habit_completions,
        duolingo,
        goals,
        milestones,
        relationship,
    ) = futures::join!(
        source.fetch_moods(owner, range),
        source.fetch_activities(owner, range),
        source.fetch_media(owner, range),
        source.fetch_tasks(owner, range),
        source.fetch_events(owner, range),
        source.fetch_parks(owner, range),
        source.fetch_journals(owner, range),
        source.fetch_workouts(owner, range),
        source.fetch_github_events(owner, range),
        source.fetch_habit_completions(owner, range),
        source.fetch_duolingo(owner, range),
        source.fetch_goals(owner, range),
        source.fetch_milestones(owner, range),
        source.fetch_relationship(owner, range),
    );

    let mut degraded = Vec::new();
    let records = SourceRecords {
        mood: settle(Domain::Mood, mood, &mut degraded),
        activities: settle(Domain::Activities, activities, &mut degraded),
        media: settle(Domain::Media, media, &mut degraded),
        tasks: settle(Domain::Tasks, tasks, &mut degraded),
        events: settle(Domain::Events, events, &mut degraded),
        parks: settle(Domain::Parks, parks, &mut degraded),
        journals: settle(Domain::Journals, journals, &mut degraded),
        workouts: settle(Domain::Workouts, workouts, &mut degraded),
        github_events: settle(Domain::Github, github_events, &mut degraded),
        habit_completions: settle(Domain::HabitCompletions, habit_completions, &mut degraded),
        duolingo: settle(Domain::Duolingo, duolingo, &mut degraded),
        goals: settle(Domain::Goals, goals, &mut degraded),
        milestones: settle(Domain::Milestones, milestones, &mut degraded),
        relationship: settle(Domain::Relationship, relationship, &mut degraded),
    };

    let mut calendar = bucket(owner, range, records);
    calendar.degraded = degraded;
    calendar
}

/// Builds the calendar for one month (`month` is 1-12).
pub async fn build_month<S>(
    source: &S,
    owner: &OwnerId,
    year: i32,
    month: u32,
) -> Result<Calendar, ValidationError>
where
    S: CalendarSource + ?Sized,
{
    let range = DateRange::month(year, month)?;
    Ok(build_calendar(source, owner, range).await)
}

/// Turns a fetch result into records, logging and recording failures.
fn settle<T>(
    domain: Domain,
    result: Result<Vec<T>, SourceError>,
    degraded: &mut Vec<Domain>,
) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(err) => {
            warn!(%domain, error = %err, "domain fetch failed; continuing without it");
            degraded.push(domain);
            Vec::new()
        }
    }
}

/// Distributes already-fetched records into days. Pure; no I/O.
pub fn bucket(owner: &OwnerId, range: DateRange, records: SourceRecords) -> Calendar {
    let mut calendar = Calendar::empty(range);
    let SourceRecords {
        mood,
        activities,
        media,
        tasks,
        events,
        parks,
        journals,
        workouts,
        github_events,
        habit_completions,
        duolingo,
        goals,
        milestones,
        relationship,
    } = records;

    let mut placed = 0;
    placed += distribute(&mut calendar, owner, mood);
    placed += distribute(&mut calendar, owner, activities);
    placed += distribute(&mut calendar, owner, media);
    placed += distribute(&mut calendar, owner, tasks);
    placed += distribute(&mut calendar, owner, events);
    placed += distribute(&mut calendar, owner, parks);
    placed += distribute(&mut calendar, owner, journals);
    placed += distribute(&mut calendar, owner, workouts);
    placed += distribute(&mut calendar, owner, github_events);
    placed += distribute(&mut calendar, owner, habit_completions);
    placed += distribute(&mut calendar, owner, duolingo);
    placed += distribute(&mut calendar, owner, goals);
    placed += distribute(&mut calendar, owner, milestones);
    placed += distribute(&mut calendar, owner, relationship);

    debug!(%owner, %range, days = calendar.len(), placed, "calendar built");
    calendar
}

/// Appends each record to every day it touches. Returns how many
/// (record, day) placements were made.
fn distribute<R: DomainRecord>(calendar: &mut Calendar, owner: &OwnerId, records: Vec<R>) -> usize {
    let range = calendar.range;
    let mut placed = 0;
    for record in records {
        if record.owner_id() != owner {
            warn!(
                domain = %R::DOMAIN,
                record_id = %record.record_id(),
                record_owner = %record.owner_id(),
                "dropping record that belongs to another owner"
            );
            continue;
        }
        let placement = match record.placement() {
            Ok(placement) => placement,
            Err(err) => {
                warn!(error = %err, "dropping record with unusable date");
                continue;
            }
        };
        for date in placement.days_within(&range) {
            if let Some(day) = calendar.days.get_mut(&date) {
                R::bucket(day).push(record.clone());
                placed += 1;
            }
        }
    }
    placed
}
