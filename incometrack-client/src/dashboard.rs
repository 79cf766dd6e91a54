/// Dashboard state
///
/// Holds what the main screen shows: the selected month's summary and
/// entries, the year-to-date total, the target, and the twelve-month
/// carousel. All of it is server data. After any mutation the whole screen
/// is fetched again rather than patched locally.
///
/// Failed actions leave the previous state untouched and set a
/// notification. Errors that need a fresh login are returned instead, so
/// the caller can route back to the login form.

use crate::{
    api::{ApiClient, DeleteOutcome},
    error::{ClientError, ClientResult},
    forms::{EntryForm, TargetForm},
    session::SessionContext,
    view::{self, Carousel, MonthCursor, Tone},
};
use chrono::NaiveDate;
use incometrack_shared::{
    models::income_entry::IncomeEntry,
    summary::{period::YearMonth, MonthlySummary, YearToDateSummary},
};
use rust_decimal::Decimal;
use std::fmt::Write as _;
use uuid::Uuid;

/// Message shown after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub tone: Tone,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Success,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Warning,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    pub cursor: MonthCursor,
    pub summary: Option<MonthlySummary>,
    pub entries: Vec<IncomeEntry>,
    pub ytd: Option<YearToDateSummary>,
    pub target: Decimal,
    pub yearly: Vec<MonthlySummary>,
    pub carousel: Carousel,
    pub notification: Option<Notification>,
}

/// Everything one refresh fetches
struct Snapshot {
    summary: MonthlySummary,
    entries: Vec<IncomeEntry>,
    ytd: YearToDateSummary,
    target: Decimal,
    yearly: Vec<MonthlySummary>,
}

impl Dashboard {
    /// Empty dashboard on the month containing `today`
    pub fn new(today: NaiveDate, compact: bool) -> Self {
        Self {
            cursor: MonthCursor::new(today),
            summary: None,
            entries: Vec::new(),
            ytd: None,
            target: Decimal::ZERO,
            yearly: Vec::new(),
            carousel: Carousel::new(0, compact),
            notification: None,
        }
    }

    /// Fetches every panel again for the current month
    pub async fn refresh(&mut self, api: &ApiClient, ctx: &mut SessionContext) -> ClientResult<()> {
        let period = self.cursor.period();
        self.show(api, ctx, period).await
    }

    /// Fetches every panel for `period` and moves the cursor there
    ///
    /// State, cursor included, is replaced only once all requests have
    /// succeeded.
    async fn show(
        &mut self,
        api: &ApiClient,
        ctx: &mut SessionContext,
        period: YearMonth,
    ) -> ClientResult<()> {
        let snapshot = Snapshot {
            summary: api.monthly_summary(ctx, period).await?,
            entries: api.list_entries(ctx, Some(period)).await?,
            ytd: api.year_to_date(ctx).await?,
            target: api.get_target(ctx).await?,
            yearly: api.yearly(ctx).await?,
        };

        let first_load = self.yearly.is_empty();
        self.cursor = MonthCursor::at(period);
        self.summary = Some(snapshot.summary);
        self.entries = snapshot.entries;
        self.ytd = Some(snapshot.ytd);
        self.target = snapshot.target;
        self.yearly = snapshot.yearly;

        if first_load {
            self.carousel = Carousel::at_end(self.yearly.len(), self.carousel.is_compact());
        } else {
            self.carousel.set_len(self.yearly.len());
        }

        Ok(())
    }

    /// Refresh that turns ordinary failures into a notification
    pub async fn reload(&mut self, api: &ApiClient, ctx: &mut SessionContext) -> ClientResult<()> {
        let result = self.refresh(api, ctx).await;
        self.settle(result, None)
    }

    pub async fn next_month(&mut self, api: &ApiClient, ctx: &mut SessionContext) -> ClientResult<()> {
        let mut cursor = self.cursor;
        cursor.next();
        let result = self.show(api, ctx, cursor.period()).await;
        self.settle(result, None)
    }

    pub async fn prev_month(&mut self, api: &ApiClient, ctx: &mut SessionContext) -> ClientResult<()> {
        let mut cursor = self.cursor;
        cursor.prev();
        let result = self.show(api, ctx, cursor.period()).await;
        self.settle(result, None)
    }

    pub async fn add_entry(
        &mut self,
        api: &ApiClient,
        ctx: &mut SessionContext,
        form: &EntryForm,
    ) -> ClientResult<()> {
        let result: ClientResult<()> = async {
            let entry = form.validate()?;
            api.create_entry(ctx, &entry).await?;
            self.refresh(api, ctx).await
        }
        .await;

        self.settle(result, Some("Income added"))
    }

    pub async fn delete_entry(
        &mut self,
        api: &ApiClient,
        ctx: &mut SessionContext,
        id: Uuid,
    ) -> ClientResult<()> {
        let result: ClientResult<()> = async {
            let outcome = api.delete_entry(ctx, id).await?;
            if outcome == DeleteOutcome::AlreadyGone {
                tracing::debug!(entry_id = %id, "Entry was already deleted");
            }
            self.refresh(api, ctx).await
        }
        .await;

        self.settle(result, Some("Entry deleted"))
    }

    pub async fn set_target(
        &mut self,
        api: &ApiClient,
        ctx: &mut SessionContext,
        form: &TargetForm,
    ) -> ClientResult<()> {
        let result: ClientResult<()> = async {
            let amount = form.validate()?;
            api.set_target(ctx, amount).await?;
            self.refresh(api, ctx).await
        }
        .await;

        self.settle(result, Some("Target updated"))
    }

    fn settle(&mut self, result: ClientResult<()>, success: Option<&str>) -> ClientResult<()> {
        match result {
            Ok(()) => {
                self.notification = success.map(Notification::success);
                Ok(())
            }
            Err(e) if e.requires_login() => Err(e),
            Err(e) => {
                if !matches!(e, ClientError::Validation(_)) {
                    tracing::warn!(error = %e, "Dashboard action failed");
                }
                self.notification = Some(Notification::failure(e.user_message()));
                Ok(())
            }
        }
    }

    /// Whole screen as text
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(note) = &self.notification {
            let _ = writeln!(out, "{}\n", note.message);
        }

        if let Some(ytd) = &self.ytd {
            let _ = writeln!(out, "{}", view::render_year_to_date(ytd));
        }
        let _ = writeln!(out, "Monthly target: {}\n", view::format_money(self.target));

        if let Some(summary) = &self.summary {
            out.push_str(&view::render_month(summary, &self.entries));
            out.push('\n');
        }

        out.push_str(&view::render_carousel(&self.yearly, &self.carousel));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn dashboard() -> Dashboard {
        Dashboard::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), false)
    }

    #[test]
    fn test_settle_keeps_login_errors() {
        let mut d = dashboard();
        assert!(matches!(
            d.settle(Err(ClientError::SessionExpired), None),
            Err(ClientError::SessionExpired)
        ));
        assert!(d.notification.is_none());
    }

    #[test]
    fn test_settle_turns_failures_into_notifications() {
        let mut d = dashboard();
        d.settle(
            Err(ClientError::Server {
                status: StatusCode::FORBIDDEN,
                message: "Not allowed to delete this entry".into(),
            }),
            Some("Entry deleted"),
        )
        .unwrap();

        assert_eq!(
            d.notification,
            Some(Notification::failure("Not allowed to delete this entry"))
        );

        d.settle(Ok(()), Some("Entry deleted")).unwrap();
        assert_eq!(d.notification, Some(Notification::success("Entry deleted")));
    }

    #[test]
    fn test_new_dashboard_is_empty() {
        let d = dashboard();
        assert_eq!(d.cursor.period().month(), 3);
        assert!(d.summary.is_none());
        assert_eq!(d.target, Decimal::ZERO);
        assert!(d.render().contains("Monthly target: €0.00"));
    }
}
