//! Per-day completion statistics over a month's goals, and the month-level
//! insights derived from them.

use crate::calendar::{day_cell, YearMonth};
use crate::model::transport::{DailyStats, DayHighlight, GoalPayload, MonthInsights, Trend};

/// Percentage points the second half of a month must move before the trend
/// stops being stable.
const TREND_MARGIN: f64 = 5.0;

/// Counts, for each day of `year_month`, how many tasks were completed.
///
/// Every task counts toward every day's total, matching the dashboard view
/// where a task is tracked for the whole month.
pub fn daily_stats(year_month: YearMonth, goals: &[GoalPayload]) -> Vec<DailyStats> {
    let tasks: Vec<_> = goals.iter().flat_map(|goal| goal.tasks.iter()).collect();
    let total = tasks.len() as u32;

    (1..=year_month.days_in_month())
        .map(|day| {
            let (row, column) = day_cell(day);
            let completed = tasks
                .iter()
                .filter(|task| task.week_completions.cell(row, column))
                .count() as u32;
            DailyStats {
                day,
                completed,
                not_completed: total - completed,
                percentage: rounded_percentage(completed, total),
            }
        })
        .collect()
}

/// Summarizes a month of [`DailyStats`].
///
/// Days without tracked tasks are skipped for rates, highlights, streak and
/// trend. The trend compares the mean rate of the first half of tracked days
/// against the second half; an odd middle day belongs to the second half.
pub fn month_insights(days: &[DailyStats]) -> MonthInsights {
    let tracked: Vec<&DailyStats> = days.iter().filter(|day| day_total(day) > 0).collect();
    if tracked.is_empty() {
        return MonthInsights::default();
    }

    // Strict comparisons keep the earliest day on ties.
    let best_day = tracked.iter().copied().reduce(|best, day| {
        if completion_rate(day) > completion_rate(best) {
            day
        } else {
            best
        }
    });
    let worst_day = tracked.iter().copied().reduce(|worst, day| {
        if completion_rate(day) < completion_rate(worst) {
            day
        } else {
            worst
        }
    });

    let (first_half, second_half) = tracked.split_at(tracked.len() / 2);

    MonthInsights {
        average_completion: mean_rate(&tracked),
        best_day: best_day.map(highlight),
        worst_day: worst_day.map(highlight),
        perfect_day_streak: tracked
            .iter()
            .rev()
            .take_while(|day| day.not_completed == 0)
            .count() as u32,
        total_tasks: days.iter().map(day_total).sum(),
        total_completed: days.iter().map(|day| day.completed).sum(),
        trend: trend(mean_rate(first_half), mean_rate(second_half)),
    }
}

fn trend(first_half: f64, second_half: f64) -> Trend {
    if second_half > first_half + TREND_MARGIN {
        Trend::Improving
    } else if second_half < first_half - TREND_MARGIN {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

fn day_total(day: &DailyStats) -> u32 {
    day.completed + day.not_completed
}

fn completion_rate(day: &DailyStats) -> f64 {
    match day_total(day) {
        0 => 0.0,
        total => f64::from(day.completed) * 100.0 / f64::from(total),
    }
}

fn mean_rate(days: &[&DailyStats]) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    days.iter().map(|day| completion_rate(day)).sum::<f64>() / days.len() as f64
}

fn highlight(day: &DailyStats) -> DayHighlight {
    DayHighlight {
        day: day.day,
        completed: day.completed,
        total: day_total(day),
        percentage: rounded_percentage(day.completed, day_total(day)),
    }
}

fn rounded_percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (part * 100 + total / 2) / total
}

#[cfg(test)]
mod tests {
    use super::{daily_stats, month_insights, rounded_percentage};
    use crate::calendar::{YearMonth, GRID_COLUMNS, GRID_ROWS};
    use crate::model::transport::{
        DailyStats, GoalPayload, MonthInsights, TaskPayload, Trend, WeekCompletions,
    };

    fn task(id: &str, marked_days: &[u32]) -> TaskPayload {
        let mut grid = [[false; GRID_COLUMNS]; GRID_ROWS];
        for day in marked_days {
            let (row, column) = crate::calendar::day_cell(*day);
            grid[row][column] = true;
        }
        TaskPayload {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            week_completions: WeekCompletions::from(grid),
        }
    }

    fn day(day: u32, completed: u32, total: u32) -> DailyStats {
        DailyStats {
            day,
            completed,
            not_completed: total - completed,
            percentage: rounded_percentage(completed, total),
        }
    }

    fn days_with_completed(completed: &[u32]) -> Vec<DailyStats> {
        completed
            .iter()
            .enumerate()
            .map(|(index, completed)| day(index as u32 + 1, *completed, 100))
            .collect()
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(0, 0), 0);
    }

    #[test]
    fn stats_cover_every_day_across_goals() {
        let goals = vec![
            GoalPayload {
                id: "g1".to_string(),
                name: "Read".to_string(),
                tasks: vec![task("t1", &[1, 2]), task("t2", &[2])],
            },
            GoalPayload {
                id: "g2".to_string(),
                name: "Move".to_string(),
                tasks: vec![task("t3", &[2, 30])],
            },
        ];
        let stats = daily_stats(YearMonth::new(2026, 4).unwrap(), &goals);

        assert_eq!(stats.len(), 30);
        assert_eq!(stats[0].completed, 1);
        assert_eq!(stats[0].not_completed, 2);
        assert_eq!(stats[0].percentage, 33);
        assert_eq!(stats[1].completed, 3);
        assert_eq!(stats[1].percentage, 100);
        assert_eq!(stats[29].day, 30);
        assert_eq!(stats[29].completed, 1);
    }

    #[test]
    fn stats_without_tasks_are_zero() {
        let stats = daily_stats(YearMonth::new(2027, 2).unwrap(), &[]);
        assert_eq!(stats.len(), 28);
        assert!(stats
            .iter()
            .all(|day| day.completed == 0 && day.not_completed == 0 && day.percentage == 0));
    }

    #[test]
    fn insights_without_tasks_are_empty() {
        let stats = daily_stats(YearMonth::new(2026, 1).unwrap(), &[]);
        let insights = month_insights(&stats);

        assert_eq!(insights, MonthInsights::default());
        assert_eq!(insights.best_day, None);
        assert_eq!(insights.trend, Trend::Stable);
        assert_eq!(month_insights(&[]), MonthInsights::default());
    }

    #[test]
    fn best_and_worst_day_ties_resolve_to_earliest_day() {
        let days = vec![
            day(1, 1, 2),
            day(2, 2, 2),
            day(3, 2, 2),
            day(4, 0, 2),
            day(5, 0, 2),
        ];
        let insights = month_insights(&days);

        let best = insights.best_day.unwrap();
        assert_eq!((best.day, best.completed, best.total, best.percentage), (2, 2, 2, 100));
        let worst = insights.worst_day.unwrap();
        assert_eq!((worst.day, worst.percentage), (4, 0));
        assert_eq!(insights.total_tasks, 10);
        assert_eq!(insights.total_completed, 5);
        assert!((insights.average_completion - 50.0).abs() < 1e-9);
    }

    #[test]
    fn untracked_days_are_skipped_for_rates_but_not_totals() {
        let days = vec![day(1, 0, 0), day(2, 1, 4), day(3, 0, 0), day(4, 3, 4)];
        let insights = month_insights(&days);

        assert_eq!(insights.best_day.map(|best| best.day), Some(4));
        assert_eq!(insights.worst_day.map(|worst| worst.day), Some(2));
        assert!((insights.average_completion - 50.0).abs() < 1e-9);
        assert_eq!(insights.total_tasks, 8);
        assert_eq!(insights.total_completed, 4);
    }

    #[test]
    fn trend_needs_more_than_five_points_between_halves() {
        let trend_of = |completed: &[u32]| month_insights(&days_with_completed(completed)).trend;

        assert_eq!(trend_of(&[50, 50, 55, 55]), Trend::Stable);
        assert_eq!(trend_of(&[50, 50, 56, 56]), Trend::Improving);
        assert_eq!(trend_of(&[50, 50, 45, 45]), Trend::Stable);
        assert_eq!(trend_of(&[50, 50, 44, 44]), Trend::Declining);
        // The middle day of an odd count joins the second half.
        assert_eq!(trend_of(&[50, 70, 70]), Trend::Improving);
    }

    #[test]
    fn perfect_day_streak_counts_back_from_last_tracked_day() {
        let days = vec![
            day(1, 2, 2),
            day(2, 1, 2),
            day(3, 2, 2),
            day(4, 2, 2),
            day(5, 0, 0),
        ];
        assert_eq!(month_insights(&days).perfect_day_streak, 2);

        let days = vec![day(1, 2, 2), day(2, 1, 2)];
        assert_eq!(month_insights(&days).perfect_day_streak, 0);
    }

    #[test]
    fn insights_serialize_with_lowercase_trend() {
        let insights = month_insights(&days_with_completed(&[20, 80]));
        let json = serde_json::to_value(&insights).unwrap();

        assert_eq!(json["trend"], "improving");
        assert_eq!(json["bestDay"]["day"], 2);
        assert_eq!(json["perfectDayStreak"], 0);
        assert_eq!(json["totalTasks"], 200);
    }
}
