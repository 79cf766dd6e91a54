/// Client configuration
///
/// # Environment Variables
///
/// - `INCOMETRACK_API_URL`: API base URL (default: `http://127.0.0.1:8080`)
/// - `INCOMETRACK_SESSION_FILE`: Where the session is stored
///   (default: `.incometrack/session.json`)

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_SESSION_FILE: &str = ".incometrack/session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without trailing slash
    pub api_url: String,

    /// Session file path
    pub session_file: PathBuf,
}

impl ClientConfig {
    /// Loads configuration from the environment (`.env` honored)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("INCOMETRACK_API_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_file = lookup("INCOMETRACK_SESSION_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            session_file,
        }
    }
}
