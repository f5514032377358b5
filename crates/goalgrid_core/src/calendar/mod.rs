//! Calendar arithmetic for month-scoped tracking.
//!
//! # Responsibility
//! - Validate year/month pairs at the boundary (`YearMonth`).
//! - Map days of a month onto the fixed 5x7 week grid and back.
//!
//! # Invariants
//! - Month lengths come from chrono's proleptic Gregorian calendar.
//! - Months are 1-indexed internally.
//! - Day `d` lives at cell `[(d - 1) / 7][(d - 1) % 7]`, independent of weekday.

use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod grid;

pub use grid::{day_cell, from_grid, submitted_days, to_grid, WeekGrid, GRID_COLUMNS, GRID_ROWS};

/// Errors raised while validating calendar input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Month outside `1..=12` (or `0..=11` for transport input).
    InvalidMonth(u32),
    /// Year outside the supported calendar range.
    YearOutOfRange(i32),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMonth(month) => write!(f, "invalid month: {month}"),
            Self::YearOutOfRange(year) => write!(f, "year out of supported range: {year}"),
        }
    }
}

impl Error for CalendarError {}

/// A validated calendar month, anchored on its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Builds from a 1-indexed calendar month.
    pub fn new(year: i32, month: u32) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth(month));
        }
        let first =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::YearOutOfRange(year))?;
        Ok(Self { first })
    }

    /// Builds from a transport month where `0 = January`.
    pub fn from_zero_based(year: i32, month: u32) -> Result<Self, CalendarError> {
        if month > 11 {
            return Err(CalendarError::InvalidMonth(month));
        }
        Self::new(year, month + 1)
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-indexed month.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// Month length as chrono's calendar reports it. Every month has day 28.
    pub fn days_in_month(&self) -> u32 {
        let extra = (29..=31)
            .take_while(|day| self.first.with_day(*day).is_some())
            .count();
        28 + extra as u32
    }

    /// Returns the date for a 1-indexed day, or `None` past the month end.
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    /// Every date of the month in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days_in_month()).filter_map(move |day| self.date(day))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarError, YearMonth};
    use chrono::Datelike;

    #[test]
    fn february_follows_leap_year_rules() {
        assert_eq!(YearMonth::new(2028, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(2027, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2000, 2).unwrap().days_in_month(), 29);
    }

    #[test]
    fn month_lengths_match_calendar() {
        let lengths: Vec<_> = (1..=12)
            .map(|month| YearMonth::new(2026, month).unwrap().days_in_month())
            .collect();
        assert_eq!(lengths, [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]);
    }

    #[test]
    fn last_supported_month_still_has_full_length() {
        let last = YearMonth::new(chrono::NaiveDate::MAX.year(), 12).unwrap();
        assert_eq!(last.days_in_month(), 31);
        assert_eq!(last.dates().count(), 31);
    }

    #[test]
    fn zero_based_month_maps_to_calendar_month() {
        let january = YearMonth::from_zero_based(2026, 0).unwrap();
        assert_eq!(january.month(), 1);
        let december = YearMonth::from_zero_based(2026, 11).unwrap();
        assert_eq!(december.month(), 12);
        assert_eq!(december.to_string(), "2026-12");
    }

    #[test]
    fn out_of_range_months_are_rejected() {
        assert_eq!(
            YearMonth::from_zero_based(2026, 12),
            Err(CalendarError::InvalidMonth(12))
        );
        assert_eq!(YearMonth::new(2026, 0), Err(CalendarError::InvalidMonth(0)));
        assert_eq!(YearMonth::new(2026, 13), Err(CalendarError::InvalidMonth(13)));
    }

    #[test]
    fn unsupported_years_are_rejected() {
        assert_eq!(
            YearMonth::new(i32::MAX, 1),
            Err(CalendarError::YearOutOfRange(i32::MAX))
        );
    }

    #[test]
    fn dates_cover_whole_month() {
        let april = YearMonth::new(2026, 4).unwrap();
        let dates: Vec<_> = april.dates().collect();
        assert_eq!(dates.len(), 30);
        assert_eq!(dates.first().map(|d| d.to_string()).as_deref(), Some("2026-04-01"));
        assert_eq!(dates.last().map(|d| d.to_string()).as_deref(), Some("2026-04-30"));
        assert_eq!(april.date(31), None);
        assert_eq!(april.date(0), None);
    }
}
