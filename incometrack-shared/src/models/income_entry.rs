/// Income entry model and database operations
///
/// An entry is a single dated, sourced income amount owned by one user.
/// There is no update operation: edits are a delete followed by a create.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE income_entries (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     entry_date DATE NOT NULL,
///     amount NUMERIC(12, 2) NOT NULL CHECK (amount > 0),
///     source VARCHAR(100) NOT NULL CHECK (length(btrim(source)) > 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    id, user_id, entry_date AS date, amount, source,
    EXTRACT(MONTH FROM entry_date)::INT4 AS month,
    EXTRACT(YEAR FROM entry_date)::INT4 AS year,
    created_at
"#;

/// Income entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct IncomeEntry {
    /// Entry ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Calendar day the income was received
    pub date: NaiveDate,

    /// Positive amount, 2-decimal precision
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Free-text label (e.g. "Client A", "Salary")
    pub source: String,

    /// Month of `date` (1-12)
    pub month: i32,

    /// Year of `date`
    pub year: i32,

    /// When the entry was recorded
    pub created_at: DateTime<Utc>,
}

/// Input for creating an entry
#[derive(Debug, Clone)]
pub struct CreateIncomeEntry {
    /// Owning user
    pub user_id: Uuid,

    /// Calendar day
    pub date: NaiveDate,

    /// Positive amount (rounded to cents by the caller)
    pub amount: Decimal,

    /// Non-empty label
    pub source: String,
}

/// Optional month/year filter for listing entries
#[derive(Debug, Clone, Copy, Default)]
pub struct IncomeFilter {
    /// Month (1-12)
    pub month: Option<u32>,

    /// Calendar year
    pub year: Option<i32>,
}

impl IncomeEntry {
    /// `(date, amount)` pair consumed by the aggregation engine
    pub fn dated_amount(&self) -> (NaiveDate, Decimal) {
        (self.date, self.amount)
    }

    /// Inserts a new entry
    pub async fn create(pool: &PgPool, data: CreateIncomeEntry) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO income_entries (user_id, entry_date, amount, source)
             VALUES ($1, $2, $3, $4)
             RETURNING {SELECT_COLUMNS}"
        );

        sqlx::query_as::<_, IncomeEntry>(&query)
            .bind(data.user_id)
            .bind(data.date)
            .bind(data.amount)
            .bind(data.source)
            .fetch_one(pool)
            .await
    }

    /// Finds an entry by ID regardless of owner
    ///
    /// Callers must check `user_id` before exposing or mutating it.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM income_entries WHERE id = $1");

        sqlx::query_as::<_, IncomeEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a user's entries, newest date first
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: Uuid,
        filter: IncomeFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {SELECT_COLUMNS}
             FROM income_entries
             WHERE user_id = $1
               AND ($2::INT4 IS NULL OR EXTRACT(MONTH FROM entry_date)::INT4 = $2)
               AND ($3::INT4 IS NULL OR EXTRACT(YEAR FROM entry_date)::INT4 = $3)
             ORDER BY entry_date DESC, created_at DESC"
        );

        sqlx::query_as::<_, IncomeEntry>(&query)
            .bind(user_id)
            .bind(filter.month.map(|m| m as i32))
            .bind(filter.year)
            .fetch_all(pool)
            .await
    }

    /// Lists a user's entries dated within `[start, end)`, oldest first
    pub async fn list_between(
        pool: &PgPool,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {SELECT_COLUMNS}
             FROM income_entries
             WHERE user_id = $1 AND entry_date >= $2 AND entry_date < $3
             ORDER BY entry_date ASC, created_at ASC"
        );

        sqlx::query_as::<_, IncomeEntry>(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Deletes an entry owned by `user_id`
    ///
    /// Returns false when no such entry exists for that owner.
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM income_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_unrestricted() {
        let empty = IncomeFilter::default();
        assert!(empty.month.is_none() && empty.year.is_none());
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = IncomeEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            amount: Decimal::new(50025, 2),
            source: "Client A".to_string(),
            month: 3,
            year: 2024,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["amount"], serde_json::json!(500.25));
        assert_eq!(json["source"], "Client A");

        assert_eq!(entry.dated_amount(), (entry.date, entry.amount));
    }
}
