/// Form validation
///
/// Checks done before any request is sent. A form that fails here never
/// reaches the server; the error text is shown to the user directly.

use crate::error::{ClientError, ClientResult};
use chrono::NaiveDate;
use incometrack_shared::auth::password::MIN_PASSWORD_LENGTH;
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

fn invalid<T>(message: impl Into<String>) -> ClientResult<T> {
    Err(ClientError::Validation(message.into()))
}

/// Email and password as sent to the auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> ClientResult<Credentials> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return invalid("Please enter your email and password");
        }

        Ok(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> ClientResult<Credentials> {
        let email = self.email.trim();
        if email.is_empty() {
            return invalid("Please enter your email");
        }
        if self.password != self.confirm_password {
            return invalid("Passwords don't match");
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return invalid(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            ));
        }

        Ok(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Validated income entry, ready to send
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIncome {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub source: String,
}

/// Raw text fields of the add-income form
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub date: String,
    pub amount: String,
    pub source: String,
}

impl EntryForm {
    pub fn validate(&self) -> ClientResult<NewIncome> {
        let (date, amount, source) = (self.date.trim(), self.amount.trim(), self.source.trim());
        if date.is_empty() || amount.is_empty() || source.is_empty() {
            return invalid("Please fill all fields");
        }

        let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
            return invalid("Please enter a valid date (YYYY-MM-DD)");
        };

        let amount = match parse_amount(amount) {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => return invalid("Please enter a valid amount"),
        };

        Ok(NewIncome {
            date,
            amount,
            source: source.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TargetForm {
    pub amount: String,
}

impl TargetForm {
    pub fn validate(&self) -> ClientResult<Decimal> {
        match parse_amount(self.amount.trim()) {
            Some(amount) if amount > Decimal::ZERO => Ok(amount),
            _ => invalid("Please enter a valid target amount"),
        }
    }
}

/// Parses a user-typed amount, tolerating a leading `€` and `,` separators
///
/// Rounded to cents; zero after rounding is still zero.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('€')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    Decimal::from_str(&cleaned).ok().map(|d| d.round_dp(2))
}
