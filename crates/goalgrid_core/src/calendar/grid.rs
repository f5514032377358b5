//! Week-grid projection of a month's completion state.
//!
//! The grid is lossy: a day recorded as not completed and a day never
//! recorded both render as `false`.

use super::YearMonth;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

pub const GRID_ROWS: usize = 5;
pub const GRID_COLUMNS: usize = 7;

/// Fixed 5-row by 7-column completion matrix, row = week-of-month.
pub type WeekGrid = [[bool; GRID_COLUMNS]; GRID_ROWS];

/// Returns `(row, column)` for a 1-indexed day of month.
pub fn day_cell(day: u32) -> (usize, usize) {
    let offset = day.saturating_sub(1) as usize;
    (offset / GRID_COLUMNS, offset % GRID_COLUMNS)
}

/// Projects the completed dates of `year_month` onto a week grid.
///
/// Dates outside the month are ignored; every other cell is `false`.
pub fn to_grid(year_month: YearMonth, completed: &BTreeSet<NaiveDate>) -> WeekGrid {
    let mut grid = [[false; GRID_COLUMNS]; GRID_ROWS];
    for date in completed.iter().filter(|date| year_month.contains(**date)) {
        let (row, column) = day_cell(date.day());
        grid[row][column] = true;
    }
    grid
}

/// Expands a week grid into one `(date, completed)` entry per day of the month.
///
/// Cells past the last day are ignored even when set.
pub fn from_grid(year_month: YearMonth, grid: &WeekGrid) -> Vec<(NaiveDate, bool)> {
    year_month
        .dates()
        .map(|date| {
            let (row, column) = day_cell(date.day());
            (date, grid[row][column])
        })
        .collect()
}

/// Expands a submitted, possibly ragged, grid into `(date, completed)` entries.
///
/// Only cells that were actually submitted and map to a valid day are
/// returned; days the submission does not cover are left out rather than
/// reported as `false`.
pub fn submitted_days(year_month: YearMonth, rows: &[Vec<bool>]) -> Vec<(NaiveDate, bool)> {
    let mut days = Vec::new();
    for (row, cells) in rows.iter().enumerate().take(GRID_ROWS) {
        for (column, completed) in cells.iter().enumerate().take(GRID_COLUMNS) {
            let day = (row * GRID_COLUMNS + column + 1) as u32;
            if let Some(date) = year_month.date(day) {
                days.push((date, *completed));
            }
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::{day_cell, from_grid, submitted_days, to_grid, GRID_COLUMNS, GRID_ROWS};
    use crate::calendar::YearMonth;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn day_cell_buckets_by_seven() {
        assert_eq!(day_cell(1), (0, 0));
        assert_eq!(day_cell(7), (0, 6));
        assert_eq!(day_cell(8), (1, 0));
        assert_eq!(day_cell(31), (4, 2));
        assert_eq!(day_cell(35), (4, 6));
    }

    #[test]
    fn to_grid_marks_only_completed_days() {
        let january = ym(2026, 1);
        let completed = BTreeSet::from([date(2026, 1, 1), date(2026, 1, 15), date(2026, 1, 31)]);
        let grid = to_grid(january, &completed);

        assert_eq!(grid.len(), GRID_ROWS);
        assert!(grid.iter().all(|row| row.len() == GRID_COLUMNS));
        assert!(grid[0][0]);
        assert!(grid[2][0]);
        assert!(grid[4][2]);
        let set_cells = grid.iter().flatten().filter(|cell| **cell).count();
        assert_eq!(set_cells, 3);
    }

    #[test]
    fn to_grid_ignores_dates_from_other_months() {
        let february = ym(2026, 2);
        let completed = BTreeSet::from([date(2026, 1, 3), date(2025, 2, 3)]);
        let grid = to_grid(february, &completed);
        assert!(grid.iter().flatten().all(|cell| !cell));
    }

    #[test]
    fn from_grid_ignores_cells_past_month_end() {
        let february = ym(2027, 2);
        let grid = [[true; GRID_COLUMNS]; GRID_ROWS];
        let days = from_grid(february, &grid);
        assert_eq!(days.len(), 28);
        assert!(days.iter().all(|(_, completed)| *completed));
        assert_eq!(days.last().map(|(d, _)| *d), Some(date(2027, 2, 28)));
    }

    #[test]
    fn from_grid_yields_leap_day() {
        let grid = [[false; GRID_COLUMNS]; GRID_ROWS];
        assert_eq!(from_grid(ym(2028, 2), &grid).len(), 29);
        assert_eq!(from_grid(ym(2027, 2), &grid).len(), 28);
    }

    #[test]
    fn completed_subsets_survive_grid_round_trip() {
        for (year, month) in [(2026, 1), (2026, 4), (2027, 2), (2028, 2), (2026, 12)] {
            let month = ym(year, month);
            let dates: Vec<_> = month.dates().collect();
            for stride in 1..=5 {
                let subset: BTreeSet<_> = dates.iter().copied().step_by(stride).collect();
                let grid = to_grid(month, &subset);
                let restored: BTreeSet<_> = from_grid(month, &grid)
                    .into_iter()
                    .filter(|(_, completed)| *completed)
                    .map(|(day, _)| day)
                    .collect();
                assert_eq!(restored, subset, "month {month} stride {stride}");
            }
        }
    }

    #[test]
    fn thirty_first_lands_on_last_grid_row() {
        let march = ym(2026, 3);
        let grid = to_grid(march, &BTreeSet::from([date(2026, 3, 31)]));
        assert!(grid[4][2]);
    }

    #[test]
    fn submitted_days_follow_submission_shape() {
        let january = ym(2026, 1);
        let mut rows = vec![vec![false; 7]; 4];
        rows[0] = vec![true; 7];
        rows.push(vec![false, true]);
        let days = submitted_days(january, &rows);

        assert_eq!(days.len(), 30);
        assert_eq!(days[0], (date(2026, 1, 1), true));
        assert_eq!(days.last().copied(), Some((date(2026, 1, 30), true)));
        assert!(!days.iter().any(|(day, _)| *day == date(2026, 1, 31)));
    }

    #[test]
    fn submitted_days_drop_extra_rows_and_invalid_days() {
        let february = ym(2027, 2);
        let rows = vec![vec![true; 9]; 7];
        let days = submitted_days(february, &rows);
        assert_eq!(days.len(), 28);
    }
}
