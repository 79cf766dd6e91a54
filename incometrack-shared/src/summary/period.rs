/// Calendar month periods
///
/// `YearMonth` identifies a single calendar month and is the unit every
/// aggregation is bucketed by. It is always valid: the month is in `1..=12`
/// and the year is within `1..=9999`, so the first day of the month (and of
/// the following month) always exists.
///
/// # Example
///
/// ```
/// use incometrack_shared::summary::period::YearMonth;
///
/// let march = YearMonth::new(2024, 3).unwrap();
/// assert_eq!(march.month_name(), "March");
/// assert_eq!(march.next(), YearMonth::new(2024, 4).unwrap());
/// assert_eq!(YearMonth::new(2024, 1).unwrap().prev(), YearMonth::new(2023, 12).unwrap());
/// ```

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;

/// English month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Error type for period construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    /// Month outside 1..=12
    #[error("Month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),

    /// Year outside 1..=9999
    #[error("Year must be between 1 and 9999, got {0}")]
    InvalidYear(i32),
}

/// A calendar month of a specific year
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    /// First day of the month
    first: NaiveDate,
}

impl YearMonth {
    /// Creates a period, validating month and year
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        if !(1..=9999).contains(&year) {
            return Err(PeriodError::InvalidYear(year));
        }

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(PeriodError::InvalidYear(year))?;
        Ok(Self { first })
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date - Duration::days(i64::from(date.day0())),
        }
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-based
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// English month name
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.first.month0() as usize]
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month
    pub fn last_day(&self) -> NaiveDate {
        self.next().first - Duration::days(1)
    }

    /// Number of days in the month
    pub fn days(&self) -> u32 {
        match self.month() {
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(self.year()) => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// The following month (December wraps to January of the next year)
    pub fn next(&self) -> Self {
        Self {
            first: self.first + Duration::days(i64::from(self.days())),
        }
    }

    /// The preceding month (January wraps to December of the previous year)
    pub fn prev(&self) -> Self {
        Self::from_date(self.first - Duration::days(1))
    }

    /// Whether `date` falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::from_date(date) == *self
    }

    /// The `count` months ending at `end` (inclusive), oldest first
    ///
    /// ```
    /// use incometrack_shared::summary::period::YearMonth;
    ///
    /// let end = YearMonth::new(2024, 2).unwrap();
    /// let window = YearMonth::trailing(end, 3);
    /// let labels: Vec<String> = window.iter().map(|m| m.to_string()).collect();
    /// assert_eq!(labels, ["December 2023", "January 2024", "February 2024"]);
    /// ```
    pub fn trailing(end: YearMonth, count: usize) -> Vec<YearMonth> {
        let mut months = Vec::with_capacity(count);
        let mut current = end;
        for _ in 0..count {
            months.push(current);
            current = current.prev();
        }
        months.reverse();
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year())
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
