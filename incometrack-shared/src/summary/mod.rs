/// Aggregation engine
///
/// Pure functions that turn a user's income entries into derived summaries:
///
/// - [`monthly_summary`]: total, target and remaining for one calendar month
/// - [`year_to_date`]: sum of entries from January 1 through today
/// - [`yearly_rollup`]: twelve monthly summaries, oldest first, ending at the
///   current month
///
/// Entries are passed as `(date, amount)` pairs. Nothing here caches: every
/// summary is recomputed from the entries it is given, so a deleted entry
/// disappears from the next computation.
///
/// Amounts are `Decimal`, so sums are exact at 2-decimal precision.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use incometrack_shared::summary::{monthly_summary, period::YearMonth};
/// use rust_decimal::Decimal;
///
/// let entries = vec![
///     (NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(), Decimal::new(500, 0)),
///     (NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(), Decimal::new(300, 0)),
/// ];
///
/// let march = YearMonth::new(2024, 3).unwrap();
/// let summary = monthly_summary(march, entries, Decimal::new(1000, 0));
/// assert_eq!(summary.total, Decimal::new(800, 0));
/// assert_eq!(summary.remaining, Decimal::new(200, 0));
/// ```

pub mod period;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use period::YearMonth;

/// Number of months in the yearly rollup
pub const ROLLUP_MONTHS: usize = 12;

/// Aggregated income for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month number (1-12)
    pub month: u32,

    /// Calendar year
    pub year: i32,

    /// English month name
    pub month_name: String,

    /// Sum of entry amounts in the month
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Monthly target (0 when unset)
    #[serde(with = "rust_decimal::serde::float")]
    pub target: Decimal,

    /// `target - total`; negative when the target was exceeded
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining: Decimal,

    /// Number of entries in the month
    pub entries_count: u32,
}

impl MonthlySummary {
    /// Builds a summary from an already-computed total
    pub fn new(period: YearMonth, total: Decimal, entries_count: u32, target: Decimal) -> Self {
        Self {
            month: period.month(),
            year: period.year(),
            month_name: period.month_name().to_string(),
            total,
            target,
            remaining: target - total,
            entries_count,
        }
    }

    /// Whether a target is configured (a zero target means "unset")
    pub fn has_target(&self) -> bool {
        self.target > Decimal::ZERO
    }

    /// Whether the total reached or exceeded the target
    pub fn target_met(&self) -> bool {
        self.remaining <= Decimal::ZERO
    }

    /// Total as a percentage of target, `None` when no target is set
    pub fn progress_percent(&self) -> Option<Decimal> {
        if !self.has_target() {
            return None;
        }
        Some(self.total * Decimal::ONE_HUNDRED / self.target)
    }
}

/// Sum of the current calendar year's entries through today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearToDateSummary {
    /// Year-to-date total
    #[serde(with = "rust_decimal::serde::float")]
    pub ytd_total: Decimal,

    /// Calendar year the total covers
    pub year: i32,
}

/// Summarizes the entries falling within `period`
///
/// Entries outside the month are ignored, so callers may pass a wider set.
pub fn monthly_summary<I>(period: YearMonth, entries: I, target: Decimal) -> MonthlySummary
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let (total, count) = entries
        .into_iter()
        .filter(|(date, _)| period.contains(*date))
        .fold((Decimal::ZERO, 0u32), |(sum, count), (_, amount)| {
            (sum + amount, count + 1)
        });

    MonthlySummary::new(period, total, count, target)
}

/// Sums entries dated from January 1 of `today`'s year through `today`
///
/// Future-dated entries in the current year are excluded.
pub fn year_to_date<I>(entries: I, today: NaiveDate) -> YearToDateSummary
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let year = today.year();
    let ytd_total = entries
        .into_iter()
        .filter(|(date, _)| date.year() == year && *date <= today)
        .map(|(_, amount)| amount)
        .sum();

    YearToDateSummary { ytd_total, year }
}

/// Twelve monthly summaries ending at `today`'s month, oldest first
///
/// Every month in the window is present even when it has no entries.
pub fn yearly_rollup<I>(entries: I, target: Decimal, today: NaiveDate) -> Vec<MonthlySummary>
where
    I: IntoIterator<Item = (NaiveDate, Decimal)>,
{
    let window = YearMonth::trailing(YearMonth::from_date(today), ROLLUP_MONTHS);

    let mut buckets: BTreeMap<YearMonth, (Decimal, u32)> =
        window.iter().map(|m| (*m, (Decimal::ZERO, 0))).collect();

    for (date, amount) in entries {
        if let Some((sum, count)) = buckets.get_mut(&YearMonth::from_date(date)) {
            *sum += amount;
            *count += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(period, (total, count))| MonthlySummary::new(period, total, count, target))
        .collect()
}

/// Date range `[start, end)` covered by the rollup ending at `today`
///
/// Used to fetch exactly the entries the rollup needs.
pub fn rollup_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = YearMonth::from_date(today);
    let start = YearMonth::trailing(end, ROLLUP_MONTHS)
        .first()
        .copied()
        .unwrap_or(end);

    (start.first_day(), end.next().first_day())
}

/// Date range `[start, end]` covered by the year-to-date total
pub fn year_to_date_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - chrono::Duration::days(i64::from(today.ordinal0()));
    (start, today)
}
