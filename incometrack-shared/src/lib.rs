//! # IncomeTrack Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the IncomeTrack API server and client.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication utilities (password hashing, JWT, middleware)
//! - `db`: Connection pool and migrations
//! - `summary`: Aggregation engine (monthly, year-to-date and 12-month rollups)

pub mod auth;
pub mod db;
pub mod models;
pub mod summary;

/// Current version of the IncomeTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
