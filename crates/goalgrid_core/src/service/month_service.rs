//! Month aggregation use-cases.
//!
//! # Responsibility
//! - Answer "what is this user's state for month M" in transport shape.
//! - Apply a submitted month state (goals, tasks, per-day completions).
//! - Record one mood per user and day.
//!
//! # Invariants
//! - Each public operation runs inside exactly one unit of work; a failure
//!   anywhere leaves storage as it was before the call.
//! - Saves overwrite names, descriptions, flags, and emoji unconditionally,
//!   so resubmitting the same payload is idempotent.
//! - Reads create nothing except the lazily provisioned user.
//! - Input is validated before any storage access.

use crate::calendar::{submitted_days, to_grid, CalendarError, YearMonth};
use crate::model::record::{Mood, RecordId};
use crate::model::transport::{
    DailyStats, GoalPayload, MonthData, MonthInsights, SaveGoalsRequest, SaveMoodRequest,
    TaskPayload,
};
use crate::repo::store::{RepoError, TrackerStore};
use crate::repo::unit_of_work::UnitOfWork;
use crate::service::{reconcile, stats};
use chrono::NaiveDate;
use log::{error, info};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const USERNAME_MAX_CHARS: usize = 100;
const EXTERNAL_ID_MAX_CHARS: usize = 50;
const EMOJI_MAX_CHARS: usize = 10;

pub type ServiceResult<T> = Result<T, TrackerServiceError>;

/// Service error for month use-cases.
#[derive(Debug)]
pub enum TrackerServiceError {
    /// Username is blank or too long.
    InvalidUsername(&'static str),
    /// Goal or task external id is blank or too long.
    InvalidExternalId {
        kind: &'static str,
        reason: &'static str,
    },
    /// Emoji label is blank or too long.
    InvalidEmoji(&'static str),
    /// Date string is not `YYYY-MM-DD`.
    InvalidDate(String),
    /// Year/month pair rejected at the boundary.
    Calendar(CalendarError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Storage returned a record that violates a write contract.
    InconsistentState(&'static str),
}

impl TrackerServiceError {
    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUsername(_) => "invalid_username",
            Self::InvalidExternalId { .. } => "invalid_external_id",
            Self::InvalidEmoji(_) => "invalid_emoji",
            Self::InvalidDate(_) => "invalid_date",
            Self::Calendar(_) => "invalid_calendar_month",
            Self::Repo(_) => "storage_failed",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}

impl Display for TrackerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername(reason) => write!(f, "invalid username: {reason}"),
            Self::InvalidExternalId { kind, reason } => write!(f, "invalid {kind} id: {reason}"),
            Self::InvalidEmoji(reason) => write!(f, "invalid emoji: {reason}"),
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`; expected YYYY-MM-DD"),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent tracker state: {details}"),
        }
    }
}

impl Error for TrackerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Calendar(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TrackerServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CalendarError> for TrackerServiceError {
    fn from(value: CalendarError) -> Self {
        Self::Calendar(value)
    }
}

/// Reconcile counters for one entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileCount {
    pub reconciled: u32,
    pub created: u32,
}

impl ReconcileCount {
    fn record(&mut self, created: bool) {
        self.reconciled += 1;
        if created {
            self.created += 1;
        }
    }
}

/// What one `save_goals` call touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveGoalsSummary {
    pub goals: ReconcileCount,
    pub tasks: ReconcileCount,
    pub completions: ReconcileCount,
}

/// Month aggregator over a transactional tracker store.
pub struct MonthService<U: UnitOfWork> {
    uow: U,
}

impl<U: UnitOfWork> MonthService<U> {
    /// Creates a service using the provided unit-of-work implementation.
    pub fn new(uow: U) -> Self {
        Self { uow }
    }

    /// Returns goals (with week grids) and moods of `username` for one month.
    ///
    /// `month` is 0-indexed. The user is created on first reference.
    pub fn get_month_data(
        &mut self,
        username: &str,
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthData> {
        let started_at = Instant::now();
        info!("event=month_read module=service status=start");
        let result = self.read_month(username, year, month);
        finish("month_read", started_at, result)
    }

    /// Applies submitted goals, tasks, and week grids for one month.
    pub fn save_goals(&mut self, request: &SaveGoalsRequest) -> ServiceResult<SaveGoalsSummary> {
        let started_at = Instant::now();
        info!(
            "event=goals_save module=service status=start goal_count={}",
            request.goals.len()
        );
        let result = self.write_goals(request);
        if let Ok(summary) = &result {
            info!(
                "event=goals_save module=service status=summary goals={} goals_created={} tasks={} tasks_created={} completions={} completions_created={}",
                summary.goals.reconciled,
                summary.goals.created,
                summary.tasks.reconciled,
                summary.tasks.created,
                summary.completions.reconciled,
                summary.completions.created
            );
        }
        finish("goals_save", started_at, result)
    }

    /// Records the mood of `username` for one day, replacing any earlier one.
    pub fn save_mood(&mut self, request: &SaveMoodRequest) -> ServiceResult<Mood> {
        let started_at = Instant::now();
        info!("event=mood_save module=service status=start");
        let result = self.write_mood(request);
        finish("mood_save", started_at, result)
    }

    /// Per-day completion statistics for one month (`month` 0-indexed).
    pub fn daily_stats(
        &mut self,
        username: &str,
        year: i32,
        month: u32,
    ) -> ServiceResult<Vec<DailyStats>> {
        let started_at = Instant::now();
        info!("event=stats_read module=service status=start");
        let result = self.read_daily_stats(username, year, month);
        finish("stats_read", started_at, result)
    }

    /// Month-level insights (average rate, best and worst day, streak,
    /// trend) built on top of [`Self::daily_stats`].
    pub fn month_insights(
        &mut self,
        username: &str,
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthInsights> {
        let started_at = Instant::now();
        info!("event=insights_read module=service status=start");
        let result = self
            .read_daily_stats(username, year, month)
            .map(|days| stats::month_insights(&days));
        finish("insights_read", started_at, result)
    }

    fn read_daily_stats(
        &mut self,
        username: &str,
        year: i32,
        month: u32,
    ) -> ServiceResult<Vec<DailyStats>> {
        let year_month = YearMonth::from_zero_based(year, month)?;
        let data = self.read_month(username, year, month)?;
        Ok(stats::daily_stats(year_month, &data.goals))
    }

    fn read_month(&mut self, username: &str, year: i32, month: u32) -> ServiceResult<MonthData> {
        let username = validate_username(username)?;
        let year_month = YearMonth::from_zero_based(year, month)?;
        self.uow.atomically(|store| load_month(store, username, year_month))
    }

    fn write_goals(&mut self, request: &SaveGoalsRequest) -> ServiceResult<SaveGoalsSummary> {
        let username = validate_username(&request.username)?;
        let year_month = YearMonth::from_zero_based(request.year, request.month)?;
        for goal in &request.goals {
            validate_external_id("goal", &goal.id)?;
            for task in &goal.tasks {
                validate_external_id("task", &task.id)?;
            }
        }

        self.uow
            .atomically(|store| apply_goals(store, username, year_month, &request.goals))
    }

    fn write_mood(&mut self, request: &SaveMoodRequest) -> ServiceResult<Mood> {
        let username = validate_username(&request.username)?;
        let date = parse_iso_date(&request.date)?;
        let emoji = validate_emoji(&request.emoji)?;

        self.uow.atomically(|store| -> ServiceResult<Mood> {
            let user = reconcile::user(store, username)?.record;
            let mut mood = reconcile::mood(store, user.id, date, emoji)?.record;
            mood.emoji = emoji.to_string();
            Ok(store.save_mood(&mood)?)
        })
    }
}

fn load_month(
    store: &dyn TrackerStore,
    username: &str,
    year_month: YearMonth,
) -> ServiceResult<MonthData> {
    let user = reconcile::user(store, username)?.record;

    let mut goals = Vec::new();
    for goal in store.find_active_goals(user.id)? {
        let goal_id = require_id(goal.id, "stored goal has no id")?;
        let mut tasks = Vec::new();
        for task in store.find_active_tasks(goal_id)? {
            let task_id = require_id(task.id, "stored task has no id")?;
            let completed: BTreeSet<NaiveDate> = store
                .find_completions_by_task_and_month(task_id, year_month)?
                .into_iter()
                .filter(|completion| completion.completed)
                .map(|completion| completion.date)
                .collect();
            tasks.push(TaskPayload {
                id: task.task_key,
                name: task.name,
                description: task.description,
                week_completions: to_grid(year_month, &completed).into(),
            });
        }
        goals.push(GoalPayload {
            id: goal.goal_key,
            name: goal.name,
            tasks,
        });
    }

    let moods = store
        .find_moods_by_user_and_month(user.id, year_month)?
        .into_iter()
        .map(|mood| (mood.date.format("%Y-%m-%d").to_string(), mood.emoji))
        .collect();

    Ok(MonthData { goals, moods })
}

fn apply_goals(
    store: &dyn TrackerStore,
    username: &str,
    year_month: YearMonth,
    goals: &[GoalPayload],
) -> ServiceResult<SaveGoalsSummary> {
    let mut summary = SaveGoalsSummary::default();
    let user = reconcile::user(store, username)?.record;

    for goal_payload in goals {
        let reconciled = reconcile::goal(store, user.id, &goal_payload.id, &goal_payload.name)?;
        summary.goals.record(reconciled.created);
        let mut goal = reconciled.record;
        goal.name = goal_payload.name.clone();
        let goal = store.save_goal(&goal)?;
        let goal_id = require_id(goal.id, "saved goal has no id")?;

        for task_payload in &goal_payload.tasks {
            let reconciled = reconcile::task(
                store,
                goal_id,
                &task_payload.id,
                &task_payload.name,
                &task_payload.description,
            )?;
            summary.tasks.record(reconciled.created);
            let mut task = reconciled.record;
            task.name = task_payload.name.clone();
            task.description = task_payload.description.clone();
            let task = store.save_task(&task)?;
            let task_id = require_id(task.id, "saved task has no id")?;

            for (date, completed) in submitted_days(year_month, task_payload.week_completions.rows())
            {
                let reconciled = reconcile::completion(store, task_id, date)?;
                summary.completions.record(reconciled.created);
                let mut completion = reconciled.record;
                completion.completed = completed;
                store.save_completion(&completion)?;
            }
        }
    }

    Ok(summary)
}

fn finish<T>(
    event: &'static str,
    started_at: Instant,
    result: ServiceResult<T>,
) -> ServiceResult<T> {
    match &result {
        Ok(_) => info!(
            "event={event} module=service status=ok duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event={event} module=service status=error duration_ms={} error_code={} error={}",
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
    result
}

fn require_id(id: Option<RecordId>, details: &'static str) -> ServiceResult<RecordId> {
    id.ok_or(TrackerServiceError::InconsistentState(details))
}

/// Usernames are identity keys and are stored exactly as given.
fn validate_username(username: &str) -> ServiceResult<&str> {
    if username.trim().is_empty() {
        return Err(TrackerServiceError::InvalidUsername("must not be blank"));
    }
    if username.trim() != username {
        return Err(TrackerServiceError::InvalidUsername(
            "must not have leading or trailing whitespace",
        ));
    }
    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(TrackerServiceError::InvalidUsername("longer than 100 characters"));
    }
    Ok(username)
}

fn validate_external_id(kind: &'static str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(TrackerServiceError::InvalidExternalId {
            kind,
            reason: "must not be blank",
        });
    }
    if value.chars().count() > EXTERNAL_ID_MAX_CHARS {
        return Err(TrackerServiceError::InvalidExternalId {
            kind,
            reason: "longer than 50 characters",
        });
    }
    Ok(())
}

fn validate_emoji(emoji: &str) -> ServiceResult<&str> {
    if emoji.trim().is_empty() {
        return Err(TrackerServiceError::InvalidEmoji("must not be blank"));
    }
    if emoji.trim() != emoji {
        return Err(TrackerServiceError::InvalidEmoji(
            "must not have leading or trailing whitespace",
        ));
    }
    if emoji.chars().count() > EMOJI_MAX_CHARS {
        return Err(TrackerServiceError::InvalidEmoji("longer than 10 characters"));
    }
    Ok(emoji)
}

fn parse_iso_date(value: &str) -> ServiceResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TrackerServiceError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_iso_date, validate_emoji, validate_external_id, validate_username};

    #[test]
    fn username_is_kept_verbatim_and_bounded() {
        assert_eq!(validate_username("alice").unwrap(), "alice");
        assert_eq!(validate_username("alice smith").unwrap(), "alice smith");
        let err = validate_username("  alice ").unwrap_err();
        assert_eq!(err.code(), "invalid_username");
        assert!(err.to_string().contains("whitespace"));
        assert!(validate_username("   ").is_err());
        assert!(validate_username(&"a".repeat(101)).is_err());
        assert!(validate_username(&"a".repeat(100)).is_ok());
    }

    #[test]
    fn external_ids_must_be_present_and_short() {
        assert!(validate_external_id("goal", "g1").is_ok());
        assert!(validate_external_id("goal", "").is_err());
        let err = validate_external_id("task", &"x".repeat(51)).unwrap_err();
        assert_eq!(err.code(), "invalid_external_id");
        assert!(err.to_string().contains("task"));
    }

    #[test]
    fn emoji_counts_characters_not_bytes() {
        assert_eq!(validate_emoji("😀").unwrap(), "😀");
        assert!(validate_emoji(" 😀 ").is_err());
        assert!(validate_emoji("😀😀😀😀😀😀😀😀😀😀").is_ok());
        assert!(validate_emoji("😀😀😀😀😀😀😀😀😀😀😀").is_err());
    }

    #[test]
    fn iso_dates_parse_strictly() {
        assert_eq!(parse_iso_date("2026-01-05").unwrap().to_string(), "2026-01-05");
        assert!(parse_iso_date("2026-02-30").is_err());
        assert!(parse_iso_date("05/01/2026").is_err());
    }
}
