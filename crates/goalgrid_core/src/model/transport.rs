//! Boundary transport shapes.
//!
//! Field names are camelCase on the wire (`weekCompletions`). Months in
//! these shapes are 0-indexed (`0 = January`).

use crate::calendar::WeekGrid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-day completion cells as submitted or returned.
///
/// Requests may carry ragged rows; responses are always 5x7.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekCompletions(pub Vec<Vec<bool>>);

impl WeekCompletions {
    /// Returns the cell at `(row, column)` or `false` when not submitted.
    pub fn cell(&self, row: usize, column: usize) -> bool {
        self.0
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .unwrap_or(false)
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.0
    }
}

impl From<WeekGrid> for WeekCompletions {
    fn from(grid: WeekGrid) -> Self {
        Self(grid.iter().map(|row| row.to_vec()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// External task identifier.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub week_completions: WeekCompletions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPayload {
    /// External goal identifier.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<TaskPayload>,
}

/// Month state for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthData {
    pub goals: Vec<GoalPayload>,
    /// ISO date (`YYYY-MM-DD`) to emoji.
    pub moods: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveGoalsRequest {
    pub username: String,
    pub year: i32,
    /// 0-indexed month.
    pub month: u32,
    #[serde(default)]
    pub goals: Vec<GoalPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveMoodRequest {
    pub username: String,
    /// ISO date string (`YYYY-MM-DD`).
    pub date: String,
    pub emoji: String,
}

/// Completion counts for one day of a month, across all active tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// 1-indexed day of month.
    pub day: u32,
    pub completed: u32,
    pub not_completed: u32,
    /// Rounded half up; `0` when there are no tasks.
    pub percentage: u32,
}

/// Direction of completion rates between the first and second half of a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    #[default]
    Stable,
}

/// One day singled out by [`MonthInsights`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHighlight {
    pub day: u32,
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

/// Month-level summary derived from [`DailyStats`].
///
/// Only days with at least one tracked task take part in the rates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthInsights {
    /// Mean per-day completion rate in percent, unrounded.
    pub average_completion: f64,
    /// Earliest day with the highest rate.
    pub best_day: Option<DayHighlight>,
    /// Earliest day with the lowest rate.
    pub worst_day: Option<DayHighlight>,
    /// Fully completed days counted back from the last tracked day.
    pub perfect_day_streak: u32,
    pub total_tasks: u32,
    pub total_completed: u32,
    pub trend: Trend,
}
