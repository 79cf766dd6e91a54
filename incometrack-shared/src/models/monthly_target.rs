/// Monthly target model and database operations
///
/// Each user has at most one target. Setting it again overwrites the value;
/// history is not kept.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE monthly_targets (
///     user_id UUID PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
///     monthly_target NUMERIC(12, 2) NOT NULL CHECK (monthly_target >= 0),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A user's monthly income goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MonthlyTarget {
    /// Owning user
    pub user_id: Uuid,

    /// Target amount
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_target: Decimal,

    /// When the target was last set
    pub updated_at: DateTime<Utc>,
}

impl MonthlyTarget {
    /// Sets the user's target, replacing any previous value
    pub async fn upsert(pool: &PgPool, user_id: Uuid, amount: Decimal) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, MonthlyTarget>(
            r#"
            INSERT INTO monthly_targets (user_id, monthly_target)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET monthly_target = EXCLUDED.monthly_target, updated_at = NOW()
            RETURNING user_id, monthly_target, updated_at
            "#,
        )
        .bind(user_id)
        .bind(amount)
        .fetch_one(pool)
        .await
    }

    /// The user's target, if one was ever set
    pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, MonthlyTarget>(
            "SELECT user_id, monthly_target, updated_at FROM monthly_targets WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// The user's target amount, zero when unset
    pub async fn amount_for_user(pool: &PgPool, user_id: Uuid) -> Result<Decimal, sqlx::Error> {
        Ok(Self::find_by_user(pool, user_id)
            .await?
            .map(|t| t.monthly_target)
            .unwrap_or(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_json_shape() {
        let target = MonthlyTarget {
            user_id: Uuid::new_v4(),
            monthly_target: Decimal::new(500000, 2),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["monthly_target"], serde_json::json!(5000.0));
    }
}
