//! Metric counters for achievement progress.

use chrono::NaiveDate;
use rusqlite::params;
use tally_core::OwnerId;
use tally_core::achievement::Metric;

use crate::{Database, DbError};

/// `?1` is always the owner and `?2` today's date.
fn counter_sql(metric: Metric) -> Option<&'static str> {
    Some(match metric {
        Metric::MoodEntries => "SELECT COUNT(*) FROM mood_entries WHERE owner_id = ?1",
        Metric::EarlyMoodEntries => {
            "SELECT COUNT(DISTINCT substr(date, 1, 10)) FROM mood_entries
             WHERE owner_id = ?1 AND length(created_at) >= 16
               AND substr(created_at, 12, 5) < '09:00'"
        }
        Metric::BooksCompleted => {
            "SELECT COUNT(*) FROM media
             WHERE owner_id = ?1 AND media_type = 'book' AND nullif(completed, '') IS NOT NULL"
        }
        Metric::MoviesCompleted => {
            "SELECT COUNT(*) FROM media
             WHERE owner_id = ?1 AND media_type = 'movie' AND nullif(completed, '') IS NOT NULL"
        }
        Metric::HabitCompletions => "SELECT COUNT(*) FROM habit_completions WHERE owner_id = ?1",
        Metric::TasksCompletedToday => {
            "SELECT COUNT(*) FROM tasks
             WHERE owner_id = ?1 AND completed = 1 AND substr(completed_date, 1, 10) = ?2"
        }
        Metric::TasksCompleted => "SELECT COUNT(*) FROM tasks WHERE owner_id = ?1 AND completed = 1",
        Metric::ParksVisited => {
            "SELECT COUNT(*) FROM parks WHERE owner_id = ?1 AND nullif(visited, '') IS NOT NULL"
        }
        Metric::Journals => "SELECT COUNT(*) FROM journals WHERE owner_id = ?1",
        Metric::Workouts => {
            "SELECT (SELECT COUNT(*) FROM fitness_activities WHERE owner_id = ?1)
                  + (SELECT COUNT(*) FROM workouts WHERE owner_id = ?1 AND completed = 1)"
        }
        Metric::DuolingoCompletions => {
            "SELECT COUNT(*) FROM duolingo_completions WHERE owner_id = ?1"
        }
        Metric::Dates => {
            "SELECT COUNT(*) FROM relationship_entries WHERE owner_id = ?1 AND kind = 'date'"
        }
        Metric::IntimacyEntries => {
            "SELECT COUNT(*) FROM relationship_entries WHERE owner_id = ?1 AND kind = 'intimacy'"
        }
        Metric::PerfectDates => {
            "SELECT COUNT(*) FROM relationship_entries
             WHERE owner_id = ?1 AND kind = 'date' AND rating = 5"
        }
        Metric::DateVariety => {
            "SELECT COUNT(DISTINCT subtype) FROM relationship_entries
             WHERE owner_id = ?1 AND kind = 'date' AND nullif(subtype, '') IS NOT NULL"
        }
        Metric::RelationshipMilestones => {
            "SELECT COUNT(*) FROM relationship_entries WHERE owner_id = ?1 AND kind = 'milestone'"
        }
        Metric::Blissful => {
            "SELECT CASE WHEN COUNT(*) >= 10 AND AVG(rating) >= 4.5 THEN 1 ELSE 0 END
             FROM relationship_entries
             WHERE owner_id = ?1 AND kind = 'intimacy' AND rating IS NOT NULL"
        }
        Metric::VacationsPlanned => "SELECT COUNT(*) FROM vacations WHERE owner_id = ?1",
        Metric::VacationsCompleted => {
            "SELECT COUNT(*) FROM vacations WHERE owner_id = ?1 AND status = 'completed'"
        }
        Metric::PerfectVacations => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed' AND rating = 10"
        }
        Metric::HighlyRatedVacations => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed' AND rating >= 9"
        }
        Metric::VacationsWithinBudget => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed'
               AND budget_planned IS NOT NULL AND budget_actual IS NOT NULL
               AND budget_actual <= budget_planned"
        }
        Metric::ShortTrips => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed'
               AND julianday(substr(end_date, 1, 10)) - julianday(substr(start_date, 1, 10)) + 1 <= 3"
        }
        Metric::LongHaulTrips => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed'
               AND julianday(substr(end_date, 1, 10)) - julianday(substr(start_date, 1, 10)) + 1 >= 14"
        }
        Metric::EpicTrips => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed'
               AND julianday(substr(end_date, 1, 10)) - julianday(substr(start_date, 1, 10)) + 1 >= 30"
        }
        Metric::Destinations => {
            "SELECT COUNT(DISTINCT destination) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed'"
        }
        Metric::SpontaneousTrips => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed'
               AND julianday(substr(start_date, 1, 10)) - julianday(substr(created_at, 1, 10)) <= 7"
        }
        Metric::EarlyPlannedTrips => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1
               AND julianday(substr(start_date, 1, 10)) - julianday(substr(created_at, 1, 10)) >= 90"
        }
        Metric::LuxuryTrips => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed' AND budget_actual >= 5000"
        }
        Metric::BackpackerTrips => {
            "SELECT COUNT(*) FROM vacations
             WHERE owner_id = ?1 AND status = 'completed'
               AND budget_actual > 0 AND budget_actual < 500"
        }
        Metric::VacationsWithPoster => {
            "SELECT COUNT(*) FROM vacations WHERE owner_id = ?1 AND nullif(poster, '') IS NOT NULL"
        }
        Metric::VacationsWithNotes => {
            "SELECT COUNT(*) FROM vacations WHERE owner_id = ?1 AND nullif(notes, '') IS NOT NULL"
        }
        Metric::MoodStreak | Metric::HabitStreak => return None,
    })
}

impl Database {
    /// Counts a metric for `owner` as of `today`.
    pub fn count_metric(
        &self,
        owner: &OwnerId,
        metric: Metric,
        today: NaiveDate,
    ) -> Result<i64, DbError> {
        let sql = counter_sql(metric).ok_or(DbError::DerivedMetric(metric))?;
        // rusqlite rejects parameters the statement never references.
        let mut stmt = self.conn.prepare(sql)?;
        let count = if stmt.parameter_count() >= 2 {
            stmt.query_row(
                params![owner.as_str(), today.format("%Y-%m-%d").to_string()],
                |row| row.get(0),
            )?
        } else {
            stmt.query_row(params![owner.as_str()], |row| row.get(0))?
        };
        Ok(count)
    }

    /// Distinct days the owner logged a mood, oldest first.
    pub fn mood_dates(&self, owner: &OwnerId) -> Result<Vec<NaiveDate>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT substr(date, 1, 10) FROM mood_entries WHERE owner_id = ? ORDER BY 1",
        )?;
        let rows = stmt.query_map([owner.as_str()], |row| row.get::<_, String>(0))?;
        let mut dates = Vec::new();
        for row in rows {
            if let Some(date) = tally_core::dates::parse_day(&row?) {
                dates.push(date);
            }
        }
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use tally_core::record::{MediaItem, MoodEntry, RelationshipEntry};

    use super::*;
    use crate::Vacation;
    use crate::records::tests::{alice, rid, task};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn count(db: &Database, metric: Metric) -> i64 {
        db.count_metric(&alice(), metric, d("2024-06-10")).unwrap()
    }

    #[test]
    fn task_counters() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.insert_records(&[
            task("a", alice(), None, Some("2024-06-10T09:00:00Z")),
            task("b", alice(), None, Some("2024-06-10")),
            task("c", alice(), None, Some("2024-06-09")),
            task("d", alice(), Some("2024-06-10"), None),
        ])
        .unwrap();

        assert_eq!(count(&db, Metric::TasksCompletedToday), 2);
        assert_eq!(count(&db, Metric::TasksCompleted), 3);
    }

    #[test]
    fn media_counts_by_type() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let item = |id: &str, kind: &str, completed: Option<&str>| MediaItem {
            id: rid(id),
            owner_id: alice(),
            title: id.into(),
            media_type: kind.into(),
            completed: completed.map(String::from),
        };
        db.insert_records(&[
            item("b1", "book", Some("2024-01-01")),
            item("b2", "book", None),
            item("m1", "movie", Some("2024-02-01")),
        ])
        .unwrap();

        assert_eq!(count(&db, Metric::BooksCompleted), 1);
        assert_eq!(count(&db, Metric::MoviesCompleted), 1);
    }

    #[test]
    fn early_mood_and_dates() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let mood = |id: &str, date: &str, created: Option<&str>| MoodEntry {
            id: rid(id),
            owner_id: alice(),
            date: date.into(),
            rating: 3,
            note: None,
            created_at: created.map(String::from),
        };
        db.insert_records(&[
            mood("1", "2024-06-01", Some("2024-06-01T07:15:00Z")),
            mood("2", "2024-06-02", Some("2024-06-02 21:00:00")),
            mood("3", "2024-06-02", None),
            mood("4", "2024-06-04", Some("2024-06-04T08:59:00")),
        ])
        .unwrap();

        assert_eq!(count(&db, Metric::MoodEntries), 4);
        assert_eq!(count(&db, Metric::EarlyMoodEntries), 2);
        assert_eq!(
            db.mood_dates(&alice()).unwrap(),
            vec![d("2024-06-01"), d("2024-06-02"), d("2024-06-04")]
        );
    }

    #[test]
    fn blissful_requires_ten_rated_entries() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let entries: Vec<_> = (0..10)
            .map(|i| RelationshipEntry {
                id: rid(&format!("i{i}")),
                owner_id: alice(),
                kind: "intimacy".into(),
                subtype: None,
                date: "2024-05-01".into(),
                rating: Some(if i == 0 { 4 } else { 5 }),
            })
            .collect();
        db.insert_records(&entries[..9]).unwrap();
        assert_eq!(count(&db, Metric::Blissful), 0);

        db.insert_records(&entries[9..]).unwrap();
        assert_eq!(count(&db, Metric::Blissful), 1);
        assert_eq!(count(&db, Metric::IntimacyEntries), 10);
    }

    #[test]
    fn vacation_counters() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let trip = |id: &str, start: &str, end: &str, actual: Option<f64>| Vacation {
            id: rid(id),
            owner_id: alice(),
            destination: "Lisbon".into(),
            start_date: start.into(),
            end_date: end.into(),
            status: "completed".into(),
            rating: Some(9),
            budget_planned: Some(1000.0),
            budget_actual: actual,
            poster: None,
            notes: Some("tiles everywhere".into()),
            created_at: "2024-01-01T00:00:00Z".into(),
        };
        db.insert_records(&[
            trip("weekend", "2024-03-01", "2024-03-03", Some(400.0)),
            trip("long", "2024-05-01", "2024-05-20", Some(6000.0)),
        ])
        .unwrap();

        assert_eq!(count(&db, Metric::VacationsCompleted), 2);
        assert_eq!(count(&db, Metric::ShortTrips), 1);
        assert_eq!(count(&db, Metric::LongHaulTrips), 1);
        assert_eq!(count(&db, Metric::EpicTrips), 0);
        assert_eq!(count(&db, Metric::VacationsWithinBudget), 1);
        assert_eq!(count(&db, Metric::LuxuryTrips), 1);
        assert_eq!(count(&db, Metric::BackpackerTrips), 1);
        assert_eq!(count(&db, Metric::Destinations), 1);
        assert_eq!(count(&db, Metric::EarlyPlannedTrips), 1);
        assert_eq!(count(&db, Metric::VacationsWithNotes), 2);
        assert_eq!(count(&db, Metric::VacationsWithPoster), 0);
    }

    #[test]
    fn streak_metrics_are_not_counters() {
        let db = Database::open_in_memory().expect("open in-memory db");
        let err = db
            .count_metric(&alice(), Metric::MoodStreak, d("2024-06-10"))
            .unwrap_err();
        assert!(matches!(err, DbError::DerivedMetric(Metric::MoodStreak)));
    }
}
