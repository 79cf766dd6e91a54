/// Income entry endpoints
///
/// All routes require a bearer token and only ever touch the caller's rows.
/// Summaries are recomputed from the stored entries on every request.
///
/// # Endpoints
///
/// - `GET    /api/income?month=M&year=Y` - List entries, newest first
/// - `POST   /api/income` - Create entry
/// - `DELETE /api/income/:id` - Delete entry
/// - `GET    /api/income/monthly-summary?month=M&year=Y`
/// - `GET    /api/income/ytd`
/// - `GET    /api/income/yearly`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{Duration, NaiveDate, Utc};
use incometrack_shared::{
    auth::middleware::AuthContext,
    models::{
        income_entry::{CreateIncomeEntry, IncomeEntry, IncomeFilter},
        monthly_target::MonthlyTarget,
        MAX_AMOUNT,
    },
    summary::{self, period::YearMonth, MonthlySummary, YearToDateSummary},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest accepted source label, in characters
pub const MAX_SOURCE_LENGTH: usize = 100;

/// Optional list filters
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Period selector for the monthly summary
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Create entry request
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Calendar date, `YYYY-MM-DD`
    pub date: String,

    /// Positive amount; rounded to cents
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Where the income came from
    pub source: String,
}

/// Validated form of [`CreateEntryRequest`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub source: String,
}

impl CreateEntryRequest {
    /// Checks every field, normalizing amount and source
    pub fn validate(self) -> ApiResult<NewEntry> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::invalid_field("date", "Date must be in YYYY-MM-DD format"))?;

        let amount = self.amount.round_dp(2);
        if amount <= Decimal::ZERO {
            return Err(ApiError::invalid_field("amount", "Amount must be greater than 0"));
        }
        if amount > MAX_AMOUNT {
            return Err(ApiError::invalid_field("amount", "Amount is too large"));
        }

        let source = self.source.trim().to_string();
        if source.is_empty() {
            return Err(ApiError::invalid_field("source", "Source is required"));
        }
        if source.chars().count() > MAX_SOURCE_LENGTH {
            return Err(ApiError::invalid_field(
                "source",
                format!("Source must be at most {} characters", MAX_SOURCE_LENGTH),
            ));
        }

        Ok(NewEntry { date, amount, source })
    }
}

/// Delete confirmation
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// List the caller's entries
///
/// Filters are optional and independent; entries come back newest date first.
pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<IncomeEntry>>> {
    if let Some(month) = query.month {
        if !(1..=12).contains(&month) {
            return Err(ApiError::BadRequest(format!(
                "Month must be between 1 and 12, got {}",
                month
            )));
        }
    }

    let entries = IncomeEntry::list_for_user(
        &state.db,
        auth.user_id,
        IncomeFilter {
            month: query.month,
            year: query.year,
        },
    )
    .await?;

    Ok(Json(entries))
}

/// Create an entry
///
/// ```text
/// POST /api/income
/// { "date": "2024-03-05", "amount": 500, "source": "Consulting" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: bad date, non-positive amount, empty or long source
pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateEntryRequest>,
) -> ApiResult<Json<IncomeEntry>> {
    let entry = req.validate()?;

    let created = IncomeEntry::create(
        &state.db,
        CreateIncomeEntry {
            user_id: auth.user_id,
            date: entry.date,
            amount: entry.amount,
            source: entry.source,
        },
    )
    .await?;

    tracing::info!(
        user_id = %auth.user_id,
        entry_id = %created.id,
        date = %created.date,
        "Income entry created"
    );

    Ok(Json(created))
}

/// Delete an entry
///
/// # Errors
///
/// - `404 Not Found`: no entry with that id
/// - `403 Forbidden`: entry belongs to another user
pub async fn delete_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let not_found = || ApiError::NotFound("Entry not found".to_string());

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let entry = IncomeEntry::find_by_id(&state.db, id)
        .await?
        .ok_or_else(not_found)?;

    if entry.user_id != auth.user_id {
        tracing::warn!(user_id = %auth.user_id, entry_id = %id, "Cross-owner delete rejected");
        return Err(ApiError::Forbidden("Not allowed to delete this entry".to_string()));
    }

    if !IncomeEntry::delete(&state.db, id, auth.user_id).await? {
        return Err(not_found());
    }

    tracing::info!(user_id = %auth.user_id, entry_id = %id, "Income entry deleted");

    Ok(Json(DeleteResponse {
        message: "Entry deleted successfully".to_string(),
    }))
}

/// Summary for one calendar month
///
/// # Errors
///
/// - `400 Bad Request`: month or year missing, or month outside 1..=12
pub async fn monthly_summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<MonthlySummary>> {
    let (Some(month), Some(year)) = (query.month, query.year) else {
        return Err(ApiError::BadRequest("month and year are required".to_string()));
    };

    let period = YearMonth::new(year, month)?;

    let entries = IncomeEntry::list_between(
        &state.db,
        auth.user_id,
        period.first_day(),
        period.next().first_day(),
    )
    .await?;
    let target = MonthlyTarget::amount_for_user(&state.db, auth.user_id).await?;

    Ok(Json(summary::monthly_summary(
        period,
        entries.iter().map(IncomeEntry::dated_amount),
        target,
    )))
}

/// Total from January 1 of the current year through today
pub async fn year_to_date(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<YearToDateSummary>> {
    let today = today();
    let (start, end) = summary::year_to_date_range(today);

    let entries =
        IncomeEntry::list_between(&state.db, auth.user_id, start, end + Duration::days(1)).await?;

    Ok(Json(summary::year_to_date(
        entries.iter().map(IncomeEntry::dated_amount),
        today,
    )))
}

/// Last twelve months including the current one, oldest first
pub async fn yearly(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<MonthlySummary>>> {
    let today = today();
    let (start, end) = summary::rollup_range(today);

    let entries = IncomeEntry::list_between(&state.db, auth.user_id, start, end).await?;
    let target = MonthlyTarget::amount_for_user(&state.db, auth.user_id).await?;

    Ok(Json(summary::yearly_rollup(
        entries.iter().map(IncomeEntry::dated_amount),
        target,
        today,
    )))
}
