//! Persisted tracker records.
//!
//! # Responsibility
//! - Mirror one row of each tracker table as a plain value type.
//! - Express soft deletion as a lifecycle variant rather than a nullable field.
//!
//! # Invariants
//! - `id == None` means the record has not been written yet.
//! - At most one active goal per `(user_id, goal_key)` and one active task
//!   per `(goal_id, task_key)`.
//! - At most one completion per `(task_id, date)` and one mood per
//!   `(user_id, date)`.

use chrono::NaiveDate;

/// Storage-assigned numeric identifier.
pub type RecordId = i64;

/// Soft-delete state of goals and tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    #[default]
    Active,
    /// Logically removed at the given Unix epoch milliseconds.
    Deleted { deleted_at_ms: i64 },
}

impl Lifecycle {
    pub fn from_deleted_at(deleted_at_ms: Option<i64>) -> Self {
        match deleted_at_ms {
            Some(deleted_at_ms) => Self::Deleted { deleted_at_ms },
            None => Self::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Identity anchor; created lazily on first reference by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: RecordId,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: Option<RecordId>,
    pub user_id: RecordId,
    /// Caller-supplied external identifier.
    pub goal_key: String,
    pub name: String,
    pub lifecycle: Lifecycle,
}

impl Goal {
    /// Builds an unsaved active goal.
    pub fn new(user_id: RecordId, goal_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            goal_key: goal_key.into(),
            name: name.into(),
            lifecycle: Lifecycle::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Option<RecordId>,
    pub goal_id: RecordId,
    /// Caller-supplied external identifier, unique within the goal.
    pub task_key: String,
    pub name: String,
    pub description: String,
    pub lifecycle: Lifecycle,
}

impl Task {
    /// Builds an unsaved active task.
    pub fn new(
        goal_id: RecordId,
        task_key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            goal_id,
            task_key: task_key.into(),
            name: name.into(),
            description: description.into(),
            lifecycle: Lifecycle::Active,
        }
    }
}

/// Completion state of one task on one calendar day.
///
/// Year/month/day columns are derived from `date` by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: Option<RecordId>,
    pub task_id: RecordId,
    pub date: NaiveDate,
    pub completed: bool,
}

impl Completion {
    pub fn new(task_id: RecordId, date: NaiveDate, completed: bool) -> Self {
        Self {
            id: None,
            task_id,
            date,
            completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mood {
    pub id: Option<RecordId>,
    pub user_id: RecordId,
    pub date: NaiveDate,
    pub emoji: String,
}

impl Mood {
    pub fn new(user_id: RecordId, date: NaiveDate, emoji: impl Into<String>) -> Self {
        Self {
            id: None,
            user_id,
            date,
            emoji: emoji.into(),
        }
    }
}
