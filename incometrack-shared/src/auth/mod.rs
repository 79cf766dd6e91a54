/// Authentication primitives for IncomeTrack
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: JWT access token generation and validation
/// - [`middleware`]: Bearer token extraction and the `AuthContext` extension
///
/// # Example
///
/// ```no_run
/// use chrono::Duration;
/// use incometrack_shared::auth::jwt::{create_token, Claims};
/// use incometrack_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), Duration::hours(24));
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
