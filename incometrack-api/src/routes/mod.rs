/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `income`: Income entries and their summaries
/// - `target`: Monthly income target

pub mod auth;
pub mod health;
pub mod income;
pub mod target;
