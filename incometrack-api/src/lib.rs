//! # IncomeTrack API Server Library
//!
//! Core of the IncomeTrack HTTP API: personal income entries, a monthly
//! target, and the summaries derived from them.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
