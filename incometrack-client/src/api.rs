/// HTTP client for the IncomeTrack API
///
/// Every call that needs a token takes the [`SessionContext`] explicitly.
/// A 401 from any of them clears that context (memory and disk) and comes
/// back as [`ClientError::SessionExpired`]. Nothing is cached: each method
/// is one request and returns exactly what the server said.
///
/// # Example
///
/// ```no_run
/// use incometrack_client::{
///     api::ApiClient,
///     forms::LoginForm,
///     session::{SessionContext, SessionStore},
/// };
///
/// # async fn example() -> Result<(), incometrack_client::error::ClientError> {
/// let api = ApiClient::new("http://127.0.0.1:8080")?;
/// let mut ctx = SessionContext::load(SessionStore::new(".incometrack/session.json"))?;
///
/// let form = LoginForm { email: "me@example.com".into(), password: "secret1".into() };
/// api.login(&mut ctx, &form.validate()?).await?;
///
/// let ytd = api.year_to_date(&mut ctx).await?;
/// println!("{}", ytd.ytd_total);
/// # Ok(())
/// # }
/// ```

use crate::{
    error::{ClientError, ClientResult},
    forms::{Credentials, NewIncome},
    session::{Session, SessionContext},
};
use incometrack_shared::{
    models::{income_entry::IncomeEntry, monthly_target::MonthlyTarget, user::UserProfile},
    summary::{period::YearMonth, MonthlySummary, YearToDateSummary},
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Body of register and login responses
#[derive(Debug, Deserialize)]
struct AuthResponse {
    user: UserProfile,
    access_token: String,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct SetTarget {
    #[serde(with = "rust_decimal::serde::float")]
    monthly_target: Decimal,
}

/// What a delete did on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Entry was removed by this call
    Deleted,
    /// Entry no longer existed; nothing left to do
    AlreadyGone,
}

/// Typed wrapper over the REST endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Creates a client for the API at `base_url`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Creates an account and logs it in
    pub async fn register(
        &self,
        ctx: &mut SessionContext,
        credentials: &Credentials,
    ) -> ClientResult<UserProfile> {
        self.authenticate(ctx, "/api/auth/register", credentials).await
    }

    /// Logs in and stores the session
    pub async fn login(
        &self,
        ctx: &mut SessionContext,
        credentials: &Credentials,
    ) -> ClientResult<UserProfile> {
        self.authenticate(ctx, "/api/auth/login", credentials).await
    }

    /// Drops the session locally; the server keeps no session state
    pub fn logout(&self, ctx: &mut SessionContext) -> ClientResult<()> {
        ctx.invalidate()
    }

    async fn authenticate(
        &self,
        ctx: &mut SessionContext,
        path: &str,
        credentials: &Credentials,
    ) -> ClientResult<UserProfile> {
        let response = self
            .http
            .post(self.url(path))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_message(response).await;
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST | StatusCode::CONFLICT => {
                    ClientError::Auth(message)
                }
                StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(message),
                _ => ClientError::Server { status, message },
            });
        }

        let body: AuthResponse = response.json().await?;
        let user = body.user.clone();
        ctx.establish(Session {
            token: body.access_token,
            user: body.user,
        })?;

        tracing::info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// Entries, newest first, optionally limited to one month
    pub async fn list_entries(
        &self,
        ctx: &mut SessionContext,
        period: Option<YearMonth>,
    ) -> ClientResult<Vec<IncomeEntry>> {
        let query: Vec<(&str, String)> = period
            .map(|p| vec![("month", p.month().to_string()), ("year", p.year().to_string())])
            .unwrap_or_default();

        self.fetch(ctx, Method::GET, "/api/income", |req| req.query(&query))
            .await
    }

    pub async fn create_entry(
        &self,
        ctx: &mut SessionContext,
        entry: &NewIncome,
    ) -> ClientResult<IncomeEntry> {
        self.fetch(ctx, Method::POST, "/api/income", |req| req.json(entry))
            .await
    }

    /// Deletes an entry; a 404 means it is already gone
    pub async fn delete_entry(
        &self,
        ctx: &mut SessionContext,
        id: Uuid,
    ) -> ClientResult<DeleteOutcome> {
        let path = format!("/api/income/{}", id);
        let response = self.send(ctx, Method::DELETE, &path, |req| req).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::AlreadyGone),
            status if status.is_success() => Ok(DeleteOutcome::Deleted),
            status => Err(ClientError::Server {
                status,
                message: error_message(response).await,
            }),
        }
    }

    /// Current target; zero when none has been set
    pub async fn get_target(&self, ctx: &mut SessionContext) -> ClientResult<Decimal> {
        let response = self.send(ctx, Method::GET, "/api/target", |req| req).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Decimal::ZERO);
        }
        let target: MonthlyTarget = parse(response).await?;
        Ok(target.monthly_target)
    }

    pub async fn set_target(
        &self,
        ctx: &mut SessionContext,
        amount: Decimal,
    ) -> ClientResult<MonthlyTarget> {
        let body = SetTarget {
            monthly_target: amount,
        };
        self.fetch(ctx, Method::POST, "/api/target", |req| req.json(&body))
            .await
    }

    pub async fn monthly_summary(
        &self,
        ctx: &mut SessionContext,
        period: YearMonth,
    ) -> ClientResult<MonthlySummary> {
        let query = [("month", period.month().to_string()), ("year", period.year().to_string())];
        self.fetch(ctx, Method::GET, "/api/income/monthly-summary", |req| {
            req.query(&query)
        })
        .await
    }

    pub async fn year_to_date(&self, ctx: &mut SessionContext) -> ClientResult<YearToDateSummary> {
        self.fetch(ctx, Method::GET, "/api/income/ytd", |req| req)
            .await
    }

    /// Last twelve months, oldest first
    pub async fn yearly(&self, ctx: &mut SessionContext) -> ClientResult<Vec<MonthlySummary>> {
        self.fetch(ctx, Method::GET, "/api/income/yearly", |req| req)
            .await
    }

    /// Sends an authenticated request and decodes a success body
    async fn fetch<T, F>(
        &self,
        ctx: &mut SessionContext,
        method: Method,
        path: &str,
        build: F,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let response = self.send(ctx, method, path, build).await?;
        parse(response).await
    }

    /// Sends an authenticated request
    ///
    /// Returns the response for any status except 401, which invalidates
    /// the session.
    async fn send<F>(
        &self,
        ctx: &mut SessionContext,
        method: Method,
        path: &str,
        build: F,
    ) -> ClientResult<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let token = ctx.token().ok_or(ClientError::NotAuthenticated)?;

        let request = self.http.request(method, self.url(path)).bearer_auth(token);
        let response = build(request).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(path, "Token rejected, clearing session");
            ctx.invalidate()?;
            return Err(ClientError::SessionExpired);
        }

        Ok(response)
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let message = error_message(response).await;
        return Err(match status {
            StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(message),
            _ => ClientError::Server { status, message },
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// The `message` field of an error body, or the status text
async fn error_message(response: Response) -> String {
    let status = response.status();
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    };

    match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.message)
            .unwrap_or_else(|_| fallback()),
        Err(_) => fallback(),
    }
}
