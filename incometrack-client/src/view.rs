/// View helpers
///
/// Pure formatting and navigation state. Nothing here aggregates: every
/// figure shown comes straight from a server response.

use chrono::NaiveDate;
use incometrack_shared::{
    models::income_entry::IncomeEntry,
    summary::{period::YearMonth, MonthlySummary, YearToDateSummary},
};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use std::{fmt::Write as _, ops::Range};

/// Cards shown at once in the yearly carousel
pub const CAROUSEL_VISIBLE: usize = 3;

/// Cards shown at once in compact mode
pub const CAROUSEL_VISIBLE_COMPACT: usize = 1;

/// Width of rendered progress bars, in cells
pub const PROGRESS_BAR_WIDTH: usize = 20;

/// Color hint for a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Warning,
    Success,
}

/// Text plus tone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub tone: Tone,
}

impl Label {
    fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Formats an amount as `€1,234.50`
///
/// Negative amounts get a leading minus: `-€5.00`.
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}€{}.{}", sign, grouped, cents)
}

/// Monthly remaining: "to go" while short of target, "over" once past it
pub fn remaining_label(remaining: Decimal) -> Label {
    if remaining < Decimal::ZERO {
        Label::new(format!("{} over", format_money(remaining.abs())), Tone::Success)
    } else {
        Label::new(format!("{} to go", format_money(remaining)), Tone::Warning)
    }
}

/// Yearly card status
pub fn yearly_status(summary: &MonthlySummary) -> Label {
    if summary.target_met() {
        Label::new("✓ Target Met", Tone::Success)
    } else {
        Label::new(format!("{} to go", format_money(summary.remaining)), Tone::Warning)
    }
}

/// "N% of target", or "No target set" when the target is zero
pub fn progress_label(summary: &MonthlySummary) -> Label {
    match summary.progress_percent() {
        Some(percent) => {
            let rounded = percent.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            Label::new(format!("{}% of target", rounded.normalize()), Tone::Neutral)
        }
        None => Label::new("No target set", Tone::Neutral),
    }
}

/// Progress bar fill in percent, clamped to `0..=100`
pub fn progress_fill(summary: &MonthlySummary) -> u8 {
    summary
        .progress_percent()
        .map(|p| p.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
        .and_then(|p| p.round().to_u8())
        .unwrap_or(0)
}

/// Text progress bar such as `[#####---------------]`
pub fn progress_bar(fill: u8, width: usize) -> String {
    let filled = (usize::from(fill.min(100)) * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Month being viewed; starts at the current month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    period: YearMonth,
}

impl MonthCursor {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            period: YearMonth::from_date(today),
        }
    }

    pub fn at(period: YearMonth) -> Self {
        Self { period }
    }

    pub fn period(&self) -> YearMonth {
        self.period
    }

    /// Moves forward one month, December wrapping to January
    pub fn next(&mut self) {
        self.period = self.period.next();
    }

    /// Moves back one month, January wrapping to December
    pub fn prev(&mut self) {
        self.period = self.period.prev();
    }
}

/// Window over the yearly cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    visible: usize,
    index: usize,
}

impl Carousel {
    pub fn new(len: usize, compact: bool) -> Self {
        let visible = if compact {
            CAROUSEL_VISIBLE_COMPACT
        } else {
            CAROUSEL_VISIBLE
        };
        Self { len, visible, index: 0 }
    }

    /// Carousel positioned on the most recent cards
    pub fn at_end(len: usize, compact: bool) -> Self {
        let mut carousel = Self::new(len, compact);
        carousel.index = carousel.max_index();
        carousel
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn is_compact(&self) -> bool {
        self.visible == CAROUSEL_VISIBLE_COMPACT
    }

    fn max_index(&self) -> usize {
        self.len.saturating_sub(self.visible)
    }

    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index < self.max_index()
    }

    pub fn prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1).min(self.max_index());
    }

    /// Switches between full and compact width, keeping the index in range
    pub fn set_compact(&mut self, compact: bool) {
        self.visible = if compact {
            CAROUSEL_VISIBLE_COMPACT
        } else {
            CAROUSEL_VISIBLE
        };
        self.index = self.index.min(self.max_index());
    }

    /// Updates the card count after a refresh
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.index = self.index.min(self.max_index());
    }

    /// Indices of the cards currently shown
    pub fn window(&self) -> Range<usize> {
        self.index..(self.index + self.visible).min(self.len)
    }
}

/// Monthly view: totals, remaining, progress and the month's entries
pub fn render_month(summary: &MonthlySummary, entries: &[IncomeEntry]) -> String {
    let mut out = String::new();
    let remaining = remaining_label(summary.remaining);
    let progress = progress_label(summary);

    let _ = writeln!(out, "{} {}", summary.month_name, summary.year);
    let _ = writeln!(out, "  Total:     {}", format_money(summary.total));
    let _ = writeln!(out, "  Target:    {}", format_money(summary.target));
    let _ = writeln!(out, "  Remaining: {}", remaining.text);
    let _ = writeln!(
        out,
        "  {} {}",
        progress_bar(progress_fill(summary), PROGRESS_BAR_WIDTH),
        progress.text
    );

    if entries.is_empty() {
        let _ = writeln!(out, "  No income recorded this month");
    } else {
        let _ = writeln!(out, "  Entries ({}):", entries.len());
        for entry in entries {
            let _ = writeln!(
                out,
                "    {}  {:>14}  {}  [{}]",
                entry.date.format("%Y-%m-%d"),
                format_money(entry.amount),
                entry.source,
                entry.id
            );
        }
    }

    out
}

/// One yearly card
pub fn render_year_card(summary: &MonthlySummary) -> String {
    let short_name: String = summary.month_name.chars().take(3).collect();
    format!(
        "{} {}: {} / {}  {}",
        short_name,
        summary.year,
        format_money(summary.total),
        format_money(summary.target),
        yearly_status(summary).text
    )
}

/// The cards inside the carousel window, with scroll hints
pub fn render_carousel(summaries: &[MonthlySummary], carousel: &Carousel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Last 12 months {}{}",
        if carousel.can_prev() { "◀ " } else { "" },
        if carousel.can_next() { "▶" } else { "" }
    );

    for summary in summaries.get(carousel.window()).unwrap_or_default() {
        let _ = writeln!(out, "  {}", render_year_card(summary));
    }

    out
}

pub fn render_year_to_date(ytd: &YearToDateSummary) -> String {
    format!("{} year to date: {}", ytd.year, format_money(ytd.ytd_total))
}
