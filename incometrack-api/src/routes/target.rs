/// Monthly target endpoints
///
/// # Endpoints
///
/// - `GET  /api/target` - Current target (404 if never set)
/// - `POST /api/target` - Set or replace the target

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use incometrack_shared::{
    auth::middleware::AuthContext,
    models::{monthly_target::MonthlyTarget, MAX_AMOUNT},
};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Set target request
#[derive(Debug, Deserialize)]
pub struct SetTargetRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_target: Decimal,
}

impl SetTargetRequest {
    /// Rounded target amount, between zero and [`MAX_AMOUNT`]
    pub fn amount(&self) -> ApiResult<Decimal> {
        let amount = self.monthly_target.round_dp(2);
        if amount < Decimal::ZERO {
            return Err(ApiError::invalid_field(
                "monthly_target",
                "Target must be zero or greater",
            ));
        }
        if amount > MAX_AMOUNT {
            return Err(ApiError::invalid_field("monthly_target", "Target is too large"));
        }
        Ok(amount)
    }
}

/// Fetch the caller's target
///
/// # Errors
///
/// - `404 Not Found`: no target has been set yet
pub async fn get_target(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MonthlyTarget>> {
    let target = MonthlyTarget::find_by_user(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Target not set".to_string()))?;

    Ok(Json(target))
}

/// Set the caller's target, replacing any previous value
pub async fn set_target(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SetTargetRequest>,
) -> ApiResult<Json<MonthlyTarget>> {
    let amount = req.amount()?;
    let target = MonthlyTarget::upsert(&state.db, auth.user_id, amount).await?;

    tracing::info!(user_id = %auth.user_id, monthly_target = %target.monthly_target, "Monthly target set");

    Ok(Json(target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_amount() {
        let req: SetTargetRequest = serde_json::from_str(r#"{"monthly_target": 1000.556}"#).unwrap();
        assert_eq!(req.amount().unwrap(), Decimal::new(100056, 2));

        let zero: SetTargetRequest = serde_json::from_str(r#"{"monthly_target": 0}"#).unwrap();
        assert_eq!(zero.amount().unwrap(), Decimal::ZERO);

        let negative: SetTargetRequest = serde_json::from_str(r#"{"monthly_target": -1}"#).unwrap();
        assert!(matches!(negative.amount(), Err(ApiError::ValidationError(_))));
    }

    #[test]
    fn test_target_capped_at_column_limit() {
        let max: SetTargetRequest =
            serde_json::from_str(r#"{"monthly_target": 9999999999.99}"#).unwrap();
        assert_eq!(max.amount().unwrap(), MAX_AMOUNT);

        let oversized: SetTargetRequest =
            serde_json::from_str(r#"{"monthly_target": 100000000000.0}"#).unwrap();
        match oversized.amount() {
            Err(ApiError::ValidationError(details)) => {
                assert_eq!(details[0].field, "monthly_target");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
