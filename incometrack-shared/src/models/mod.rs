/// Database models for IncomeTrack
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `income_entry`: Dated income amounts owned by a user
/// - `monthly_target`: Per-user monthly income goal

use rust_decimal::Decimal;

pub mod income_entry;
pub mod monthly_target;
pub mod user;

/// Largest amount a `NUMERIC(12, 2)` column can hold
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);
