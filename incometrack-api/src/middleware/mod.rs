/// Middleware for the API server
///
/// - `security`: Security response headers
///
/// Bearer token authentication lives in `app` because it needs `AppState`.

pub mod security;
