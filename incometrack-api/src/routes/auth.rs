/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get an access token
///
/// Both return the same [`AuthResponse`] shape so clients can store the
/// session the same way after either call.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use incometrack_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserProfile},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Token type reported to clients
pub const TOKEN_TYPE: &str = "bearer";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl RegisterRequest {
    /// Strips surrounding whitespace from the email
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

impl LoginRequest {
    /// Strips surrounding whitespace from the email
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

/// Register and login response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Authenticated user
    pub user: UserProfile,

    /// Access token
    pub access_token: String,

    /// Always `bearer`
    pub token_type: String,
}

impl AuthResponse {
    fn issue(state: &AppState, user: &User) -> ApiResult<Self> {
        let claims = jwt::Claims::new(user.id, state.token_lifetime());
        let access_token = jwt::create_token(&claims, state.jwt_secret())?;

        Ok(Self {
            user: user.profile(),
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }
}

/// Register a new user
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict`: Concurrent registration won the race for the email
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let req = req.normalized();
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(Json(AuthResponse::issue(&state, &user)?))
}

/// Login endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
/// - `422 Unprocessable Entity`: Validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let req = req.normalized();
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected");
        return Err(invalid());
    }

    User::update_last_login(&state.db, user.id).await?;

    Ok(Json(AuthResponse::issue(&state, &user)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let ok = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "12345".to_string(),
        };
        assert!(short.validate().is_err());

        let bad_email = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_padded_email_is_accepted() {
        let register = RegisterRequest {
            email: "  user@example.com\n".to_string(),
            password: "secret".to_string(),
        }
        .normalized();
        assert_eq!(register.email, "user@example.com");
        assert!(register.validate().is_ok());

        let login = LoginRequest {
            email: " user@example.com".to_string(),
            password: "secret".to_string(),
        }
        .normalized();
        assert!(login.validate().is_ok());
    }

    #[test]
    fn test_login_requires_password() {
        let req = LoginRequest {
            email: "user@example.com".to_string(),
            password: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
