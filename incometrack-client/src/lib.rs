//! # IncomeTrack Client
//!
//! Front end for the IncomeTrack API: an HTTP client bound to an explicit
//! session, local form validation, and text rendering of the dashboard.
//!
//! ## Modules
//!
//! - `config`: API location and session file path
//! - `error`: Client error type
//! - `session`: Persisted session and the context passed to every call
//! - `api`: Typed wrappers over the REST endpoints
//! - `forms`: Validation done before any request is sent
//! - `view`: Money formatting, labels, month and carousel navigation
//! - `dashboard`: Screen state refreshed from the server after each action

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forms;
pub mod session;
pub mod view;
