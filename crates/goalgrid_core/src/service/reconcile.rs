//! Get-or-create reconciliation keyed by natural identifiers.
//!
//! # Responsibility
//! - Look up one user/goal/task/completion/mood by its natural key and
//!   create it with defaults on a miss.
//!
//! # Invariants
//! - One read per call, plus one write on a miss.
//! - A hit is returned untouched; callers apply field updates and persist.
//! - Created records are persisted before returning, so children can link
//!   to their storage-assigned id.

use crate::model::record::{Completion, Goal, Mood, RecordId, Task, User};
use crate::repo::store::{RepoResult, TrackerStore};
use chrono::NaiveDate;

/// A reconciled record and whether this call created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled<T> {
    pub record: T,
    pub created: bool,
}

impl<T> Reconciled<T> {
    fn existing(record: T) -> Self {
        Self {
            record,
            created: false,
        }
    }

    fn created(record: T) -> Self {
        Self {
            record,
            created: true,
        }
    }
}

pub fn user<S>(store: &S, username: &str) -> RepoResult<Reconciled<User>>
where
    S: TrackerStore + ?Sized,
{
    match store.find_user_by_username(username)? {
        Some(user) => Ok(Reconciled::existing(user)),
        None => Ok(Reconciled::created(store.create_user(username)?)),
    }
}

/// Reconciles the active goal `goal_key` of `user_id`, creating it named `name`.
pub fn goal<S>(store: &S, user_id: RecordId, goal_key: &str, name: &str) -> RepoResult<Reconciled<Goal>>
where
    S: TrackerStore + ?Sized,
{
    match store.find_active_goal(user_id, goal_key)? {
        Some(goal) => Ok(Reconciled::existing(goal)),
        None => {
            let goal = store.save_goal(&Goal::new(user_id, goal_key, name))?;
            Ok(Reconciled::created(goal))
        }
    }
}

pub fn task<S>(
    store: &S,
    goal_id: RecordId,
    task_key: &str,
    name: &str,
    description: &str,
) -> RepoResult<Reconciled<Task>>
where
    S: TrackerStore + ?Sized,
{
    match store.find_active_task(goal_id, task_key)? {
        Some(task) => Ok(Reconciled::existing(task)),
        None => {
            let task = store.save_task(&Task::new(goal_id, task_key, name, description))?;
            Ok(Reconciled::created(task))
        }
    }
}

/// New completions start as not completed.
pub fn completion<S>(store: &S, task_id: RecordId, date: NaiveDate) -> RepoResult<Reconciled<Completion>>
where
    S: TrackerStore + ?Sized,
{
    match store.find_completion(task_id, date)? {
        Some(completion) => Ok(Reconciled::existing(completion)),
        None => {
            let completion = store.save_completion(&Completion::new(task_id, date, false))?;
            Ok(Reconciled::created(completion))
        }
    }
}

pub fn mood<S>(
    store: &S,
    user_id: RecordId,
    date: NaiveDate,
    emoji: &str,
) -> RepoResult<Reconciled<Mood>>
where
    S: TrackerStore + ?Sized,
{
    match store.find_mood_by_user_and_date(user_id, date)? {
        Some(mood) => Ok(Reconciled::existing(mood)),
        None => {
            let mood = store.save_mood(&Mood::new(user_id, date, emoji))?;
            Ok(Reconciled::created(mood))
        }
    }
}
