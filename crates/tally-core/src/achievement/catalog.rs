//! The fixed achievement catalog.

use super::{Achievement, Category, Metric};

/// Every achievement that can be earned, grouped by category.
pub static CATALOG: &[Achievement] = &[
    Achievement {
        id: "mood-first",
        title: "First Step",
        description: "Log your first mood entry",
        category: Category::Mood,
        points: 5,
        target_value: 1,
        metric: Metric::MoodEntries,
    },
    Achievement {
        id: "early-bird",
        title: "Early Bird",
        description: "Log your mood before 9 AM for 7 days",
        category: Category::Mood,
        points: 20,
        target_value: 7,
        metric: Metric::EarlyMoodEntries,
    },
    Achievement {
        id: "mood-streak-7",
        title: "Mood Tracker",
        description: "Log your mood for 7 consecutive days",
        category: Category::Mood,
        points: 10,
        target_value: 7,
        metric: Metric::MoodStreak,
    },
    Achievement {
        id: "mood-streak-30",
        title: "Mood Master",
        description: "Log your mood for 30 consecutive days",
        category: Category::Mood,
        points: 50,
        target_value: 30,
        metric: Metric::MoodStreak,
    },
    Achievement {
        id: "bookworm-1",
        title: "Page Turner",
        description: "Read your first book",
        category: Category::Media,
        points: 5,
        target_value: 1,
        metric: Metric::BooksCompleted,
    },
    Achievement {
        id: "bookworm-5",
        title: "Avid Reader",
        description: "Read 5 books",
        category: Category::Media,
        points: 15,
        target_value: 5,
        metric: Metric::BooksCompleted,
    },
    Achievement {
        id: "bookworm-10",
        title: "Bookworm",
        description: "Read 10 books",
        category: Category::Media,
        points: 30,
        target_value: 10,
        metric: Metric::BooksCompleted,
    },
    Achievement {
        id: "bookworm-25",
        title: "Library Regular",
        description: "Read 25 books",
        category: Category::Media,
        points: 40,
        target_value: 25,
        metric: Metric::BooksCompleted,
    },
    Achievement {
        id: "bookworm-50",
        title: "Bibliophile",
        description: "Read 50 books",
        category: Category::Media,
        points: 50,
        target_value: 50,
        metric: Metric::BooksCompleted,
    },
    Achievement {
        id: "movie-buff-10",
        title: "Movie Enthusiast",
        description: "Watch 10 movies",
        category: Category::Media,
        points: 10,
        target_value: 10,
        metric: Metric::MoviesCompleted,
    },
    Achievement {
        id: "movie-buff-1",
        title: "Movie Fan",
        description: "Watch your first movie",
        category: Category::Media,
        points: 5,
        target_value: 1,
        metric: Metric::MoviesCompleted,
    },
    Achievement {
        id: "movie-buff-25",
        title: "Film Critic",
        description: "Watch 25 movies",
        category: Category::Media,
        points: 20,
        target_value: 25,
        metric: Metric::MoviesCompleted,
    },
    Achievement {
        id: "movie-buff-50",
        title: "Cinephile",
        description: "Watch 50 movies",
        category: Category::Media,
        points: 35,
        target_value: 50,
        metric: Metric::MoviesCompleted,
    },
    Achievement {
        id: "movie-buff-100",
        title: "Movie Buff",
        description: "Watch 100 movies",
        category: Category::Media,
        points: 50,
        target_value: 100,
        metric: Metric::MoviesCompleted,
    },
    Achievement {
        id: "habit-streak-30",
        title: "Habit Forming",
        description: "Maintain a 30-day streak on any habit",
        category: Category::Habits,
        points: 50,
        target_value: 30,
        metric: Metric::HabitStreak,
    },
    Achievement {
        id: "habit-master-1",
        title: "Habit Starter",
        description: "Complete your first habit",
        category: Category::Habits,
        points: 5,
        target_value: 1,
        metric: Metric::HabitCompletions,
    },
    Achievement {
        id: "habit-master-10",
        title: "Consistency",
        description: "Complete 10 habits",
        category: Category::Habits,
        points: 15,
        target_value: 10,
        metric: Metric::HabitCompletions,
    },
    Achievement {
        id: "habit-master-50",
        title: "Routine Builder",
        description: "Complete 50 habits",
        category: Category::Habits,
        points: 30,
        target_value: 50,
        metric: Metric::HabitCompletions,
    },
    Achievement {
        id: "habit-master-100",
        title: "Habit Master",
        description: "Complete 100 habits",
        category: Category::Habits,
        points: 50,
        target_value: 100,
        metric: Metric::HabitCompletions,
    },
    Achievement {
        id: "task-master-5",
        title: "Productive Day",
        description: "Complete 5 tasks in a single day",
        category: Category::Tasks,
        points: 15,
        target_value: 5,
        metric: Metric::TasksCompletedToday,
    },
    Achievement {
        id: "task-master-1",
        title: "Getting Started",
        description: "Complete your first task",
        category: Category::Tasks,
        points: 5,
        target_value: 1,
        metric: Metric::TasksCompleted,
    },
    Achievement {
        id: "task-master-10",
        title: "Task Doer",
        description: "Complete 10 tasks",
        category: Category::Tasks,
        points: 15,
        target_value: 10,
        metric: Metric::TasksCompleted,
    },
    Achievement {
        id: "task-master-50",
        title: "Productivity Pro",
        description: "Complete 50 tasks",
        category: Category::Tasks,
        points: 30,
        target_value: 50,
        metric: Metric::TasksCompleted,
    },
    Achievement {
        id: "task-master-100",
        title: "Task Master",
        description: "Complete 100 tasks",
        category: Category::Tasks,
        points: 50,
        target_value: 100,
        metric: Metric::TasksCompleted,
    },
    Achievement {
        id: "fitness-1",
        title: "First Workout",
        description: "Log your first workout",
        category: Category::Exercise,
        points: 5,
        target_value: 1,
        metric: Metric::Workouts,
    },
    Achievement {
        id: "fitness-10",
        title: "Getting Fit",
        description: "Log 10 workouts",
        category: Category::Exercise,
        points: 15,
        target_value: 10,
        metric: Metric::Workouts,
    },
    Achievement {
        id: "fitness-50",
        title: "Athlete",
        description: "Log 50 workouts",
        category: Category::Exercise,
        points: 30,
        target_value: 50,
        metric: Metric::Workouts,
    },
    Achievement {
        id: "fitness-100",
        title: "Iron Will",
        description: "Log 100 workouts",
        category: Category::Exercise,
        points: 50,
        target_value: 100,
        metric: Metric::Workouts,
    },
    Achievement {
        id: "explorer-10",
        title: "Explorer",
        description: "Visit 10 national parks",
        category: Category::Parks,
        points: 50,
        target_value: 10,
        metric: Metric::ParksVisited,
    },
    Achievement {
        id: "explorer-1",
        title: "First Steps",
        description: "Visit your first national park",
        category: Category::Parks,
        points: 5,
        target_value: 1,
        metric: Metric::ParksVisited,
    },
    Achievement {
        id: "explorer-5",
        title: "Adventurer",
        description: "Visit 5 national parks",
        category: Category::Parks,
        points: 20,
        target_value: 5,
        metric: Metric::ParksVisited,
    },
    Achievement {
        id: "memory-keeper-100",
        title: "Memory Keeper",
        description: "Create 100 journal entries",
        category: Category::Journal,
        points: 50,
        target_value: 100,
        metric: Metric::Journals,
    },
    Achievement {
        id: "memory-keeper-1",
        title: "Dear Diary",
        description: "Create your first journal entry",
        category: Category::Journal,
        points: 5,
        target_value: 1,
        metric: Metric::Journals,
    },
    Achievement {
        id: "memory-keeper-10",
        title: "Storyteller",
        description: "Create 10 journal entries",
        category: Category::Journal,
        points: 15,
        target_value: 10,
        metric: Metric::Journals,
    },
    Achievement {
        id: "memory-keeper-50",
        title: "Chronicler",
        description: "Create 50 journal entries",
        category: Category::Journal,
        points: 30,
        target_value: 50,
        metric: Metric::Journals,
    },
    Achievement {
        id: "duolingo-1",
        title: "Language Learner",
        description: "Complete your first Duolingo lesson",
        category: Category::Duolingo,
        points: 5,
        target_value: 1,
        metric: Metric::DuolingoCompletions,
    },
    Achievement {
        id: "duolingo-7",
        title: "Week Streak",
        description: "Complete Duolingo lessons for 7 days",
        category: Category::Duolingo,
        points: 15,
        target_value: 7,
        metric: Metric::DuolingoCompletions,
    },
    Achievement {
        id: "duolingo-30",
        title: "Dedicated Student",
        description: "Complete Duolingo lessons for 30 days",
        category: Category::Duolingo,
        points: 30,
        target_value: 30,
        metric: Metric::DuolingoCompletions,
    },
    Achievement {
        id: "duolingo-100",
        title: "Polyglot",
        description: "Complete Duolingo lessons for 100 days",
        category: Category::Duolingo,
        points: 50,
        target_value: 100,
        metric: Metric::DuolingoCompletions,
    },
    Achievement {
        id: "relationship-first-date",
        title: "Date Night",
        description: "Log your first date",
        category: Category::Relationship,
        points: 5,
        target_value: 1,
        metric: Metric::Dates,
    },
    Achievement {
        id: "relationship-10-dates",
        title: "Making Memories",
        description: "Log 10 dates",
        category: Category::Relationship,
        points: 15,
        target_value: 10,
        metric: Metric::Dates,
    },
    Achievement {
        id: "relationship-25-dates",
        title: "Date Expert",
        description: "Log 25 dates",
        category: Category::Relationship,
        points: 30,
        target_value: 25,
        metric: Metric::Dates,
    },
    Achievement {
        id: "relationship-50-dates",
        title: "Date Night Champions",
        description: "Log 50 dates",
        category: Category::Relationship,
        points: 50,
        target_value: 50,
        metric: Metric::Dates,
    },
    Achievement {
        id: "relationship-first-intimacy",
        title: "Connected",
        description: "Log your first intimacy entry",
        category: Category::Relationship,
        points: 5,
        target_value: 1,
        metric: Metric::IntimacyEntries,
    },
    Achievement {
        id: "relationship-10-intimacy",
        title: "Passionate",
        description: "Log 10 intimacy entries",
        category: Category::Relationship,
        points: 15,
        target_value: 10,
        metric: Metric::IntimacyEntries,
    },
    Achievement {
        id: "relationship-50-intimacy",
        title: "Lovers",
        description: "Log 50 intimacy entries",
        category: Category::Relationship,
        points: 30,
        target_value: 50,
        metric: Metric::IntimacyEntries,
    },
    Achievement {
        id: "relationship-perfect-dates-5",
        title: "Perfect Nights",
        description: "Log 5 dates with 5-star ratings",
        category: Category::Relationship,
        points: 25,
        target_value: 5,
        metric: Metric::PerfectDates,
    },
    Achievement {
        id: "relationship-variety",
        title: "Variety Seeker",
        description: "Try at least 5 different date types",
        category: Category::Relationship,
        points: 30,
        target_value: 5,
        metric: Metric::DateVariety,
    },
    Achievement {
        id: "relationship-first-milestone",
        title: "Special Moment",
        description: "Record your first milestone",
        category: Category::Relationship,
        points: 10,
        target_value: 1,
        metric: Metric::RelationshipMilestones,
    },
    Achievement {
        id: "relationship-5-milestones",
        title: "Memory Maker",
        description: "Record 5 milestones",
        category: Category::Relationship,
        points: 25,
        target_value: 5,
        metric: Metric::RelationshipMilestones,
    },
    Achievement {
        id: "relationship-10-milestones",
        title: "Milestone Master",
        description: "Record 10 milestones",
        category: Category::Relationship,
        points: 40,
        target_value: 10,
        metric: Metric::RelationshipMilestones,
    },
    Achievement {
        id: "relationship-blissful",
        title: "Blissful",
        description: "Maintain an average satisfaction rating of 4.5 or higher across 10+ entries",
        category: Category::Relationship,
        points: 40,
        target_value: 1,
        metric: Metric::Blissful,
    },
    Achievement {
        id: "vacation-first",
        title: "Wanderlust",
        description: "Plan your first vacation",
        category: Category::Vacations,
        points: 5,
        target_value: 1,
        metric: Metric::VacationsPlanned,
    },
    Achievement {
        id: "vacation-5",
        title: "Travel Enthusiast",
        description: "Plan 5 vacations",
        category: Category::Vacations,
        points: 15,
        target_value: 5,
        metric: Metric::VacationsPlanned,
    },
    Achievement {
        id: "vacation-10",
        title: "Frequent Traveler",
        description: "Plan 10 vacations",
        category: Category::Vacations,
        points: 30,
        target_value: 10,
        metric: Metric::VacationsPlanned,
    },
    Achievement {
        id: "vacation-25",
        title: "Globetrotter",
        description: "Plan 25 vacations",
        category: Category::Vacations,
        points: 40,
        target_value: 25,
        metric: Metric::VacationsPlanned,
    },
    Achievement {
        id: "vacation-50",
        title: "World Traveler",
        description: "Plan 50 vacations",
        category: Category::Vacations,
        points: 50,
        target_value: 50,
        metric: Metric::VacationsPlanned,
    },
    Achievement {
        id: "vacation-completed-1",
        title: "Trip Complete",
        description: "Complete your first vacation",
        category: Category::Vacations,
        points: 10,
        target_value: 1,
        metric: Metric::VacationsCompleted,
    },
    Achievement {
        id: "vacation-completed-5",
        title: "Seasoned Traveler",
        description: "Complete 5 vacations",
        category: Category::Vacations,
        points: 20,
        target_value: 5,
        metric: Metric::VacationsCompleted,
    },
    Achievement {
        id: "vacation-completed-10",
        title: "Travel Veteran",
        description: "Complete 10 vacations",
        category: Category::Vacations,
        points: 35,
        target_value: 10,
        metric: Metric::VacationsCompleted,
    },
    Achievement {
        id: "vacation-perfect-trip",
        title: "Perfect Getaway",
        description: "Complete a vacation with a 10/10 rating",
        category: Category::Vacations,
        points: 25,
        target_value: 1,
        metric: Metric::PerfectVacations,
    },
    Achievement {
        id: "vacation-perfect-5",
        title: "Five Star Traveler",
        description: "Complete 5 vacations with 9+ ratings",
        category: Category::Vacations,
        points: 40,
        target_value: 5,
        metric: Metric::HighlyRatedVacations,
    },
    Achievement {
        id: "vacation-budget-keeper",
        title: "Budget Keeper",
        description: "Complete a vacation staying within budget",
        category: Category::Vacations,
        points: 30,
        target_value: 1,
        metric: Metric::VacationsWithinBudget,
    },
    Achievement {
        id: "vacation-budget-master",
        title: "Budget Master",
        description: "Complete 3 vacations staying within budget",
        category: Category::Vacations,
        points: 45,
        target_value: 3,
        metric: Metric::VacationsWithinBudget,
    },
    Achievement {
        id: "vacation-weekend-warrior",
        title: "Weekend Warrior",
        description: "Complete 5 short trips (3 days or less)",
        category: Category::Vacations,
        points: 25,
        target_value: 5,
        metric: Metric::ShortTrips,
    },
    Achievement {
        id: "vacation-long-haul",
        title: "Long Haul Explorer",
        description: "Complete a vacation lasting 14+ days",
        category: Category::Vacations,
        points: 30,
        target_value: 1,
        metric: Metric::LongHaulTrips,
    },
    Achievement {
        id: "vacation-epic-journey",
        title: "Epic Journey",
        description: "Complete a vacation lasting 30+ days",
        category: Category::Vacations,
        points: 50,
        target_value: 1,
        metric: Metric::EpicTrips,
    },
    Achievement {
        id: "vacation-destination-collector",
        title: "Destination Collector",
        description: "Visit 10 unique destinations",
        category: Category::Vacations,
        points: 35,
        target_value: 10,
        metric: Metric::Destinations,
    },
    Achievement {
        id: "vacation-spontaneous",
        title: "Spontaneous Adventurer",
        description: "Go on a trip from planning to completion within 7 days",
        category: Category::Vacations,
        points: 30,
        target_value: 1,
        metric: Metric::SpontaneousTrips,
    },
    Achievement {
        id: "vacation-early-bird",
        title: "Early Planner",
        description: "Plan a vacation 90+ days in advance",
        category: Category::Vacations,
        points: 20,
        target_value: 1,
        metric: Metric::EarlyPlannedTrips,
    },
    Achievement {
        id: "vacation-luxury-traveler",
        title: "Luxury Traveler",
        description: "Complete a vacation with a budget of $5000+",
        category: Category::Vacations,
        points: 35,
        target_value: 1,
        metric: Metric::LuxuryTrips,
    },
    Achievement {
        id: "vacation-budget-backpacker",
        title: "Budget Backpacker",
        description: "Complete a vacation spending under $500",
        category: Category::Vacations,
        points: 30,
        target_value: 1,
        metric: Metric::BackpackerTrips,
    },
    Achievement {
        id: "vacation-memory-keeper",
        title: "Memory Keeper",
        description: "Add photos to 5 vacations",
        category: Category::Vacations,
        points: 20,
        target_value: 5,
        metric: Metric::VacationsWithPoster,
    },
    Achievement {
        id: "vacation-travel-writer",
        title: "Travel Writer",
        description: "Write trip notes for 10 vacations",
        category: Category::Vacations,
        points: 25,
        target_value: 10,
        metric: Metric::VacationsWithNotes,
    },
];

/// Looks up an achievement by id.
pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|achievement| achievement.id == id)
}

/// Achievements in `category`, in catalog order.
pub fn in_category(category: Category) -> impl Iterator<Item = &'static Achievement> {
    CATALOG
        .iter()
        .filter(move |achievement| achievement.category == category)
}
