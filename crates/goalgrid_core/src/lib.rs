//! Core domain logic for monthly goal tracking.
//!
//! Goals and their tasks are tracked per user and month; each task keeps one
//! completion flag per day, projected to callers as a 5x7 week grid. Moods
//! are recorded once per user and day.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{CalendarError, WeekGrid, YearMonth};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{Completion, Goal, Lifecycle, Mood, RecordId, Task, User};
pub use model::transport::{
    DailyStats, DayHighlight, GoalPayload, MonthData, MonthInsights, SaveGoalsRequest,
    SaveMoodRequest, TaskPayload, Trend, WeekCompletions,
};
pub use repo::sqlite_store::SqliteTrackerStore;
pub use repo::store::{RepoError, RepoResult, TrackerStore};
pub use repo::unit_of_work::{SqliteUnitOfWork, UnitOfWork};
pub use service::month_service::{
    MonthService, ReconcileCount, SaveGoalsSummary, ServiceResult, TrackerServiceError,
};
pub use service::reconcile::Reconciled;
