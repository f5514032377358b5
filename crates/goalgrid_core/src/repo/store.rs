//! Tracker storage capability.
//!
//! # Responsibility
//! - Name every read/write the month aggregator needs, independent of the
//!   persistence engine behind it.
//!
//! # Invariants
//! - `save_*` returns the persisted record with its storage-assigned id.
//! - Month queries match on the stored year/month of each record.

use crate::calendar::YearMonth;
use crate::db::DbError;
use crate::model::record::{Completion, Goal, Mood, RecordId, Task, User};
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage failure surfaced by a `TrackerStore`.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Update addressed a row that is missing or soft-deleted.
    NotFound { entity: &'static str, id: RecordId },
    /// Persisted row could not be decoded.
    InvalidData(String),
    /// Connection is missing a table the tracker schema requires.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted tracker data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence operations for users, goals, tasks, completions, and moods.
pub trait TrackerStore {
    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    /// Creates the user, or returns the existing one for the same username.
    fn create_user(&self, username: &str) -> RepoResult<User>;

    fn find_active_goals(&self, user_id: RecordId) -> RepoResult<Vec<Goal>>;
    fn find_active_goal(&self, user_id: RecordId, goal_key: &str) -> RepoResult<Option<Goal>>;
    fn save_goal(&self, goal: &Goal) -> RepoResult<Goal>;

    fn find_active_tasks(&self, goal_id: RecordId) -> RepoResult<Vec<Task>>;
    fn find_active_task(&self, goal_id: RecordId, task_key: &str) -> RepoResult<Option<Task>>;
    fn save_task(&self, task: &Task) -> RepoResult<Task>;

    fn find_completions_by_task_and_month(
        &self,
        task_id: RecordId,
        year_month: YearMonth,
    ) -> RepoResult<Vec<Completion>>;
    fn find_completion(&self, task_id: RecordId, date: NaiveDate)
        -> RepoResult<Option<Completion>>;
    fn save_completion(&self, completion: &Completion) -> RepoResult<Completion>;

    fn find_moods_by_user_and_month(
        &self,
        user_id: RecordId,
        year_month: YearMonth,
    ) -> RepoResult<Vec<Mood>>;
    fn find_mood_by_user_and_date(&self, user_id: RecordId, date: NaiveDate)
        -> RepoResult<Option<Mood>>;
    fn save_mood(&self, mood: &Mood) -> RepoResult<Mood>;
}
