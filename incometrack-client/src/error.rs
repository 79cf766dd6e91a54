/// Client error type
///
/// Every failure a user action can hit. Variants are grouped by how the
/// front end reacts: validation and auth messages are shown as-is,
/// `SessionExpired` and `NotAuthenticated` send the user back to login,
/// everything else becomes a generic notification.

use reqwest::StatusCode;

/// Result alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input rejected locally or by the server's validation
    #[error("{0}")]
    Validation(String),

    /// Login/registration rejected; server message verbatim
    #[error("{0}")]
    Auth(String),

    /// Server rejected the stored token; the session has been cleared
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,

    /// No session stored
    #[error("Not logged in")]
    NotAuthenticated,

    /// Any other non-success response
    #[error("Server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    /// Request never completed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Session file could not be read or written
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Session file or response body is not valid JSON
    #[error("Invalid data: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the user has to log in before retrying
    pub fn requires_login(&self) -> bool {
        matches!(self, ClientError::SessionExpired | ClientError::NotAuthenticated)
    }

    /// Text for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) | ClientError::Auth(msg) => msg.clone(),
            ClientError::SessionExpired | ClientError::NotAuthenticated => self.to_string(),
            ClientError::Server { status, .. } if status.is_server_error() => {
                "The server ran into a problem. Please try again.".to_string()
            }
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Network(_) => "Could not reach the server".to_string(),
            ClientError::Storage(_) | ClientError::Serialization(_) => {
                "Something went wrong".to_string()
            }
        }
    }
}
