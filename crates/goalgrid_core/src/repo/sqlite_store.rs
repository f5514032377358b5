//! SQLite implementation of the tracker storage capability.
//!
//! # Responsibility
//! - Keep SQL details for users/goals/tasks/completions/moods in one place.
//! - Derive the denormalized year/month/day columns from dates on write.
//!
//! # Invariants
//! - Inserts are upserts on the natural keys, so a concurrent
//!   get-or-create race resolves to one row instead of a duplicate.
//! - Read paths reject malformed rows instead of masking them.

use crate::calendar::YearMonth;
use crate::model::record::{Completion, Goal, Lifecycle, Mood, RecordId, Task, User};
use crate::repo::store::{RepoError, RepoResult, TrackerStore};
use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Row};

const GOAL_SELECT_SQL: &str = "SELECT id, user_id, goal_key, name, deleted_at FROM goals";
const TASK_SELECT_SQL: &str =
    "SELECT id, goal_id, task_key, name, description, deleted_at FROM tasks";
const COMPLETION_SELECT_SQL: &str =
    "SELECT id, task_id, completion_date, is_completed FROM task_completions";
const MOOD_SELECT_SQL: &str = "SELECT id, user_id, mood_date, emoji FROM moods";

const REQUIRED_TABLES: [&str; 5] = ["users", "goals", "tasks", "task_completions", "moods"];

/// SQLite-backed tracker store borrowing a connection or open transaction.
pub struct SqliteTrackerStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrackerStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Builds a store after checking the tracker schema is present.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tracker_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_list<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        parse: fn(&Row<'_>) -> RepoResult<T>,
    ) -> RepoResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse(row)?);
        }
        Ok(items)
    }

    fn query_optional<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        parse: fn(&Row<'_>) -> RepoResult<T>,
    ) -> RepoResult<Option<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(parse(row)?)),
            None => Ok(None),
        }
    }
}

impl TrackerStore for SqliteTrackerStore<'_> {
    fn find_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, username FROM users WHERE username = ?1;",
                [username],
                |row| {
                    Ok(User {
                        id: row.get("id")?,
                        username: row.get("username")?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn create_user(&self, username: &str) -> RepoResult<User> {
        let user = self.conn.query_row(
            "INSERT INTO users (username) VALUES (?1)
             ON CONFLICT (username) DO UPDATE SET username = excluded.username
             RETURNING id, username;",
            [username],
            |row| {
                Ok(User {
                    id: row.get("id")?,
                    username: row.get("username")?,
                })
            },
        )?;
        Ok(user)
    }

    fn find_active_goals(&self, user_id: RecordId) -> RepoResult<Vec<Goal>> {
        self.query_list(
            &format!(
                "{GOAL_SELECT_SQL}
                 WHERE user_id = ?1 AND deleted_at IS NULL
                 ORDER BY id ASC;"
            ),
            [user_id],
            parse_goal_row,
        )
    }

    fn find_active_goal(&self, user_id: RecordId, goal_key: &str) -> RepoResult<Option<Goal>> {
        self.query_optional(
            &format!(
                "{GOAL_SELECT_SQL}
                 WHERE user_id = ?1 AND goal_key = ?2 AND deleted_at IS NULL;"
            ),
            params![user_id, goal_key],
            parse_goal_row,
        )
    }

    fn save_goal(&self, goal: &Goal) -> RepoResult<Goal> {
        if !goal.lifecycle.is_active() {
            return Err(RepoError::InvalidData(format!(
                "goal `{}` is soft-deleted and cannot be saved",
                goal.goal_key
            )));
        }
        let id = match goal.id {
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE goals SET name = ?2 WHERE id = ?1 AND deleted_at IS NULL;",
                    params![id, goal.name.as_str()],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound { entity: "goal", id });
                }
                id
            }
            None => self.conn.query_row(
                "INSERT INTO goals (user_id, goal_key, name) VALUES (?1, ?2, ?3)
                 ON CONFLICT (user_id, goal_key) WHERE deleted_at IS NULL
                 DO UPDATE SET name = excluded.name
                 RETURNING id;",
                params![goal.user_id, goal.goal_key.as_str(), goal.name.as_str()],
                |row| row.get(0),
            )?,
        };

        Ok(Goal {
            id: Some(id),
            lifecycle: Lifecycle::Active,
            ..goal.clone()
        })
    }

    fn find_active_tasks(&self, goal_id: RecordId) -> RepoResult<Vec<Task>> {
        self.query_list(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE goal_id = ?1 AND deleted_at IS NULL
                 ORDER BY id ASC;"
            ),
            [goal_id],
            parse_task_row,
        )
    }

    fn find_active_task(&self, goal_id: RecordId, task_key: &str) -> RepoResult<Option<Task>> {
        self.query_optional(
            &format!(
                "{TASK_SELECT_SQL}
                 WHERE goal_id = ?1 AND task_key = ?2 AND deleted_at IS NULL;"
            ),
            params![goal_id, task_key],
            parse_task_row,
        )
    }

    fn save_task(&self, task: &Task) -> RepoResult<Task> {
        if !task.lifecycle.is_active() {
            return Err(RepoError::InvalidData(format!(
                "task `{}` is soft-deleted and cannot be saved",
                task.task_key
            )));
        }
        let id = match task.id {
            Some(id) => {
                let changed = self.conn.execute(
                    "UPDATE tasks
                     SET name = ?2, description = ?3
                     WHERE id = ?1 AND deleted_at IS NULL;",
                    params![id, task.name.as_str(), task.description.as_str()],
                )?;
                if changed == 0 {
                    return Err(RepoError::NotFound { entity: "task", id });
                }
                id
            }
            None => self.conn.query_row(
                "INSERT INTO tasks (goal_id, task_key, name, description) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (goal_id, task_key) WHERE deleted_at IS NULL
                 DO UPDATE SET name = excluded.name, description = excluded.description
                 RETURNING id;",
                params![
                    task.goal_id,
                    task.task_key.as_str(),
                    task.name.as_str(),
                    task.description.as_str()
                ],
                |row| row.get(0),
            )?,
        };

        Ok(Task {
            id: Some(id),
            lifecycle: Lifecycle::Active,
            ..task.clone()
        })
    }

    fn find_completions_by_task_and_month(
        &self,
        task_id: RecordId,
        year_month: YearMonth,
    ) -> RepoResult<Vec<Completion>> {
        self.query_list(
            &format!(
                "{COMPLETION_SELECT_SQL}
                 WHERE task_id = ?1 AND year = ?2 AND month = ?3
                 ORDER BY completion_date ASC;"
            ),
            params![task_id, year_month.year(), year_month.month()],
            parse_completion_row,
        )
    }

    fn find_completion(
        &self,
        task_id: RecordId,
        date: NaiveDate,
    ) -> RepoResult<Option<Completion>> {
        self.query_optional(
            &format!("{COMPLETION_SELECT_SQL} WHERE task_id = ?1 AND completion_date = ?2;"),
            params![task_id, date],
            parse_completion_row,
        )
    }

    /// Writes by `(task_id, date)`; a set `id` is not used for addressing.
    fn save_completion(&self, completion: &Completion) -> RepoResult<Completion> {
        let date = completion.date;
        let id = self.conn.query_row(
            "INSERT INTO task_completions (
                task_id,
                completion_date,
                year,
                month,
                day,
                is_completed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (task_id, completion_date)
            DO UPDATE SET is_completed = excluded.is_completed
            RETURNING id;",
            params![
                completion.task_id,
                date,
                date.year(),
                date.month(),
                date.day(),
                bool_to_int(completion.completed),
            ],
            |row| row.get(0),
        )?;

        Ok(Completion {
            id: Some(id),
            ..completion.clone()
        })
    }

    fn find_moods_by_user_and_month(
        &self,
        user_id: RecordId,
        year_month: YearMonth,
    ) -> RepoResult<Vec<Mood>> {
        self.query_list(
            &format!(
                "{MOOD_SELECT_SQL}
                 WHERE user_id = ?1 AND year = ?2 AND month = ?3
                 ORDER BY mood_date ASC;"
            ),
            params![user_id, year_month.year(), year_month.month()],
            parse_mood_row,
        )
    }

    fn find_mood_by_user_and_date(
        &self,
        user_id: RecordId,
        date: NaiveDate,
    ) -> RepoResult<Option<Mood>> {
        self.query_optional(
            &format!("{MOOD_SELECT_SQL} WHERE user_id = ?1 AND mood_date = ?2;"),
            params![user_id, date],
            parse_mood_row,
        )
    }

    /// Writes by `(user_id, date)`; a set `id` is not used for addressing.
    fn save_mood(&self, mood: &Mood) -> RepoResult<Mood> {
        let date = mood.date;
        let id = self.conn.query_row(
            "INSERT INTO moods (user_id, mood_date, year, month, day, emoji)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (user_id, mood_date)
             DO UPDATE SET emoji = excluded.emoji
             RETURNING id;",
            params![
                mood.user_id,
                date,
                date.year(),
                date.month(),
                date.day(),
                mood.emoji.as_str(),
            ],
            |row| row.get(0),
        )?;

        Ok(Mood {
            id: Some(id),
            ..mood.clone()
        })
    }
}

/// Fails when any tracker table is missing from the connection.
pub fn ensure_tracker_connection_ready(conn: &Connection) -> RepoResult<()> {
    for table in REQUIRED_TABLES {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }
    Ok(())
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    Ok(Goal {
        id: Some(row.get("id")?),
        user_id: row.get("user_id")?,
        goal_key: row.get("goal_key")?,
        name: row.get("name")?,
        lifecycle: Lifecycle::from_deleted_at(row.get("deleted_at")?),
    })
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    Ok(Task {
        id: Some(row.get("id")?),
        goal_id: row.get("goal_id")?,
        task_key: row.get("task_key")?,
        name: row.get("name")?,
        description: row.get("description")?,
        lifecycle: Lifecycle::from_deleted_at(row.get("deleted_at")?),
    })
}

fn parse_completion_row(row: &Row<'_>) -> RepoResult<Completion> {
    let completed = match row.get::<_, i64>("is_completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_completed value `{other}` in task_completions.is_completed"
            )));
        }
    };

    Ok(Completion {
        id: Some(row.get("id")?),
        task_id: row.get("task_id")?,
        date: parse_date_column(row, "completion_date")?,
        completed,
    })
}

fn parse_mood_row(row: &Row<'_>) -> RepoResult<Mood> {
    Ok(Mood {
        id: Some(row.get("id")?),
        user_id: row.get("user_id")?,
        date: parse_date_column(row, "mood_date")?,
        emoji: row.get("emoji")?,
    })
}

fn parse_date_column(row: &Row<'_>, column: &str) -> RepoResult<NaiveDate> {
    let raw: String = row.get(column)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{raw}` in column {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
