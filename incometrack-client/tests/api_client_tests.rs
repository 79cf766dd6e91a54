//! Client tests against an in-process stub of the API
//!
//! The stub answers with canned bodies shaped like the real server's, so
//! these run without a database.

use axum::{
    extract::{Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use incometrack_client::{
    api::{ApiClient, DeleteOutcome},
    dashboard::Dashboard,
    error::ClientError,
    forms::{Credentials, EntryForm},
    session::{Session, SessionContext, SessionStore},
};
use incometrack_shared::{models::user::UserProfile, summary::period::YearMonth};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::{collections::HashMap, path::PathBuf};
use uuid::Uuid;

const GOOD_TOKEN: &str = "good-token";
const USER_ID: &str = "6f1c1d5e-1d2b-4b53-9d1e-0d8c2c0a6a11";
const MISSING_ID: &str = "00000000-0000-0000-0000-000000000404";

fn error_body(error: &str, message: &str) -> Json<Value> {
    Json(json!({ "error": error, "message": message }))
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", GOOD_TOKEN))
        .unwrap_or(false)
}

fn unauthorized() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        error_body("unauthorized", "Could not validate credentials"),
    )
        .into_response()
}

fn user_json() -> Value {
    json!({
        "id": USER_ID,
        "email": "stub@example.com",
        "created_at": "2024-01-01T00:00:00Z"
    })
}

fn summary_json(month: u32, name: &str, total: f64, target: f64) -> Value {
    json!({
        "month": month,
        "year": 2024,
        "month_name": name,
        "total": total,
        "target": target,
        "remaining": target - total,
        "entries_count": 2
    })
}

async fn login(Json(body): Json<Value>) -> axum::response::Response {
    if body["password"] == "secret1" {
        Json(json!({
            "user": user_json(),
            "access_token": GOOD_TOKEN,
            "token_type": "bearer"
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            error_body("unauthorized", "Invalid email or password"),
        )
            .into_response()
    }
}

async fn register() -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        error_body("bad_request", "Email already registered"),
    )
        .into_response()
}

async fn list_income(headers: HeaderMap) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([{
        "id": Uuid::new_v4(),
        "user_id": USER_ID,
        "date": "2024-03-05",
        "amount": 500.0,
        "source": "Consulting",
        "month": 3,
        "year": 2024,
        "created_at": "2024-03-05T10:00:00Z"
    }]))
    .into_response()
}

async fn create_income(headers: HeaderMap, Json(body): Json<Value>) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "id": Uuid::new_v4(),
        "user_id": USER_ID,
        "date": body["date"],
        "amount": body["amount"],
        "source": body["source"],
        "month": 3,
        "year": 2024,
        "created_at": "2024-03-05T10:00:00Z"
    }))
    .into_response()
}

async fn delete_income(headers: HeaderMap, Path(id): Path<String>) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if id == MISSING_ID {
        return (StatusCode::NOT_FOUND, error_body("not_found", "Entry not found")).into_response();
    }
    Json(json!({ "message": "Entry deleted successfully" })).into_response()
}

async fn get_target(headers: HeaderMap) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::NOT_FOUND, error_body("not_found", "Target not set")).into_response()
}

/// April 2024 always fails with a server error
async fn monthly_summary(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    if query.get("month").map(String::as_str) == Some("4") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body("internal_error", "An internal error occurred"),
        )
            .into_response();
    }
    Json(summary_json(3, "March", 1200.0, 1000.0)).into_response()
}

async fn ytd(headers: HeaderMap) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({ "ytd_total": 1234.5, "year": 2024 })).into_response()
}

async fn yearly(headers: HeaderMap) -> axum::response::Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let months: Vec<Value> = (1..=12)
        .map(|m| summary_json(m, "March", 100.0, 100.0))
        .collect();
    Json(Value::Array(months)).into_response()
}

async fn spawn_stub() -> ApiClient {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/income", get(list_income).post(create_income))
        .route("/api/income/:id", delete(delete_income))
        .route("/api/income/monthly-summary", get(monthly_summary))
        .route("/api/income/ytd", get(ytd))
        .route("/api/income/yearly", get(yearly))
        .route("/api/target", get(get_target));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(&format!("http://{}", addr)).unwrap()
}

fn session_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("incometrack-client-{}", Uuid::new_v4()))
        .join("session.json")
}

fn context_with(token: &str) -> (SessionContext, PathBuf) {
    let path = session_path();
    let mut ctx = SessionContext::empty(SessionStore::new(path.clone()));
    ctx.establish(Session {
        token: token.to_string(),
        user: UserProfile {
            id: Uuid::parse_str(USER_ID).unwrap(),
            email: "stub@example.com".to_string(),
            created_at: Utc::now(),
        },
    })
    .unwrap();
    (ctx, path)
}

#[tokio::test]
async fn test_login_stores_session() {
    let api = spawn_stub().await;
    let path = session_path();
    let mut ctx = SessionContext::empty(SessionStore::new(path.clone()));

    let user = api
        .login(
            &mut ctx,
            &Credentials {
                email: "stub@example.com".into(),
                password: "secret1".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(user.email, "stub@example.com");
    assert_eq!(ctx.token(), Some(GOOD_TOKEN));
    assert!(path.exists());

    let reloaded = SessionContext::load(SessionStore::new(path.clone())).unwrap();
    assert_eq!(reloaded.token(), Some(GOOD_TOKEN));

    ctx.invalidate().unwrap();
}

#[tokio::test]
async fn test_auth_errors_pass_server_message_through() {
    let api = spawn_stub().await;
    let mut ctx = SessionContext::empty(SessionStore::new(session_path()));
    let credentials = Credentials {
        email: "stub@example.com".into(),
        password: "wrong".into(),
    };

    match api.login(&mut ctx, &credentials).await {
        Err(ClientError::Auth(message)) => assert_eq!(message, "Invalid email or password"),
        other => panic!("expected auth error, got {:?}", other),
    }
    match api.register(&mut ctx, &credentials).await {
        Err(ClientError::Auth(message)) => assert_eq!(message, "Email already registered"),
        other => panic!("expected auth error, got {:?}", other),
    }
    assert!(!ctx.is_authenticated());
}

#[tokio::test]
async fn test_unauthorized_response_invalidates_session() {
    let api = spawn_stub().await;
    let (mut ctx, path) = context_with("stale-token");
    assert!(path.exists());

    let result = api.year_to_date(&mut ctx).await;

    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert!(!ctx.is_authenticated());
    assert!(!path.exists());

    // Without a session nothing is sent
    assert!(matches!(
        api.yearly(&mut ctx).await,
        Err(ClientError::NotAuthenticated)
    ));
}

#[tokio::test]
async fn test_missing_target_reads_as_zero() {
    let api = spawn_stub().await;
    let (mut ctx, _) = context_with(GOOD_TOKEN);

    assert_eq!(api.get_target(&mut ctx).await.unwrap(), Decimal::ZERO);
    ctx.invalidate().unwrap();
}

#[tokio::test]
async fn test_delete_missing_entry_is_already_gone() {
    let api = spawn_stub().await;
    let (mut ctx, _) = context_with(GOOD_TOKEN);

    let missing = Uuid::parse_str(MISSING_ID).unwrap();
    assert_eq!(
        api.delete_entry(&mut ctx, missing).await.unwrap(),
        DeleteOutcome::AlreadyGone
    );
    assert_eq!(
        api.delete_entry(&mut ctx, Uuid::new_v4()).await.unwrap(),
        DeleteOutcome::Deleted
    );
    ctx.invalidate().unwrap();
}

#[tokio::test]
async fn test_parses_summaries_and_entries() {
    let api = spawn_stub().await;
    let (mut ctx, _) = context_with(GOOD_TOKEN);
    let period = YearMonth::new(2024, 3).unwrap();

    let summary = api.monthly_summary(&mut ctx, period).await.unwrap();
    assert_eq!(summary.month_name, "March");
    assert_eq!(summary.total, Decimal::from(1200));
    assert_eq!(summary.remaining, Decimal::from(-200));

    let entries = api.list_entries(&mut ctx, Some(period)).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    assert_eq!(entries[0].amount, Decimal::from(500));

    let ytd = api.year_to_date(&mut ctx).await.unwrap();
    assert_eq!(ytd.ytd_total, Decimal::new(12345, 1));

    assert_eq!(api.yearly(&mut ctx).await.unwrap().len(), 12);
    ctx.invalidate().unwrap();
}

#[tokio::test]
async fn test_dashboard_refresh_and_add() {
    let api = spawn_stub().await;
    let (mut ctx, _) = context_with(GOOD_TOKEN);
    let mut dashboard = Dashboard::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), false);

    dashboard.reload(&api, &mut ctx).await.unwrap();
    assert_eq!(dashboard.entries.len(), 1);
    assert_eq!(dashboard.target, Decimal::ZERO);
    assert_eq!(dashboard.carousel.window(), 9..12);

    let screen = dashboard.render();
    assert!(screen.contains("€1,234.50"));
    assert!(screen.contains("€200.00 over"));

    // Rejected locally, state kept
    dashboard
        .add_entry(&api, &mut ctx, &EntryForm::default())
        .await
        .unwrap();
    assert_eq!(
        dashboard.notification.as_ref().map(|n| n.message.as_str()),
        Some("Please fill all fields")
    );
    assert_eq!(dashboard.entries.len(), 1);

    let form = EntryForm {
        date: "2024-03-20".into(),
        amount: "€1,000".into(),
        source: "Salary".into(),
    };
    dashboard.add_entry(&api, &mut ctx, &form).await.unwrap();
    assert_eq!(
        dashboard.notification.as_ref().map(|n| n.message.as_str()),
        Some("Income added")
    );
    ctx.invalidate().unwrap();
}

#[tokio::test]
async fn test_dashboard_returns_expired_session() {
    let api = spawn_stub().await;
    let (mut ctx, _) = context_with("stale-token");
    let mut dashboard = Dashboard::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), false);

    let result = dashboard.reload(&api, &mut ctx).await;
    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert!(dashboard.summary.is_none());
}

fn assert_unchanged(before: &Dashboard, after: &Dashboard) {
    assert_eq!(after.cursor, before.cursor);
    assert_eq!(after.summary, before.summary);
    assert_eq!(after.entries, before.entries);
    assert_eq!(after.ytd, before.ytd);
    assert_eq!(after.target, before.target);
    assert_eq!(after.yearly, before.yearly);
    assert_eq!(after.carousel, before.carousel);
}

fn snapshot(d: &Dashboard) -> Dashboard {
    Dashboard {
        cursor: d.cursor,
        summary: d.summary.clone(),
        entries: d.entries.clone(),
        ytd: d.ytd.clone(),
        target: d.target,
        yearly: d.yearly.clone(),
        carousel: d.carousel,
        notification: d.notification.clone(),
    }
}

#[tokio::test]
async fn test_failed_month_change_keeps_view() {
    let api = spawn_stub().await;
    let (mut ctx, _) = context_with(GOOD_TOKEN);
    let mut dashboard = Dashboard::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), false);
    dashboard.reload(&api, &mut ctx).await.unwrap();
    let before = snapshot(&dashboard);

    // April fails on the server
    dashboard.next_month(&api, &mut ctx).await.unwrap();
    assert_unchanged(&before, &dashboard);
    assert_eq!(dashboard.cursor.period(), YearMonth::new(2024, 3).unwrap());
    assert_eq!(
        dashboard.notification.as_ref().map(|n| n.message.as_str()),
        Some("The server ran into a problem. Please try again.")
    );

    // Server unreachable
    let offline = ApiClient::new("http://127.0.0.1:1").unwrap();
    dashboard.prev_month(&offline, &mut ctx).await.unwrap();
    assert_unchanged(&before, &dashboard);
    assert_eq!(
        dashboard.notification.as_ref().map(|n| n.message.as_str()),
        Some("Could not reach the server")
    );
    assert!(ctx.is_authenticated());

    // A successful move updates the cursor
    dashboard.prev_month(&api, &mut ctx).await.unwrap();
    assert_eq!(dashboard.cursor.period(), YearMonth::new(2024, 2).unwrap());
    ctx.invalidate().unwrap();
}
