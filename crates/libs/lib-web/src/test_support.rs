//! Shared fixtures for handler tests: in-memory database, canned market data
//! and request builders.

use crate::server::{create_router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use lib_auth::{encode_session_token, hash_password};
use lib_core::model::store::{run_migrations, User, UserRepository};
use lib_core::{Config, DbPool};
use lib_market::{
    ChartOptions, ColumnKey, MarketDataProvider, MarketError, RawColumn, RawFrame, ReportBuilder,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret-key-must-be-at-least-32-characters-long!";

/// Provider returning a fixed frame, or a fixed failure.
pub struct MockProvider {
    pub frame: Option<RawFrame>,
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn fetch(
        &self,
        _ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<RawFrame, MarketError> {
        self.frame.clone().ok_or(MarketError::Status(503))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        session_secret: TEST_SECRET.to_string(),
        session_expiration_hours: 24,
        market_data_url: "http://127.0.0.1:9".to_string(),
        market_data_timeout_secs: 1,
    }
}

pub async fn setup_test_db() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    run_migrations(&pool).await.expect("Failed to run migrations");

    pool
}

pub async fn test_state(frame: Option<RawFrame>) -> AppState {
    AppState {
        db: setup_test_db().await,
        config: test_config(),
        provider: Arc::new(MockProvider { frame }),
        report: ReportBuilder::new(ChartOptions {
            width: 400,
            height: 300,
        }),
    }
}

pub fn test_app(state: &AppState) -> Router {
    create_router(state.clone())
}

/// Daily bars starting 2023-01-01 with closes `152 + i`, columns labelled
/// the way a multi-ticker download labels them.
pub fn bars_frame(days: usize) -> RawFrame {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).expect("valid date");
    let key = |field: &str| ColumnKey::Composite(vec![field.to_string(), "AAPL".to_string()]);
    let series = |base: f64| (0..days).map(|i| Some(base + i as f64)).collect::<Vec<_>>();

    RawFrame {
        index: (0..days).map(|i| start + chrono::Duration::days(i as i64)).collect(),
        columns: vec![
            RawColumn::new(key("Open"), series(150.0)),
            RawColumn::new(key("High"), series(155.0)),
            RawColumn::new(key("Low"), series(149.0)),
            RawColumn::new(key("Close"), series(152.0)),
            RawColumn::new(key("Volume"), (0..days).map(|i| Some(1000.0 + i as f64 * 100.0)).collect()),
        ],
    }
}

pub async fn create_user(db: &DbPool, username: &str, password: &str) -> User {
    let hash = hash_password(password).expect("Password hashing should succeed in test");
    UserRepository::create(db, username, &hash)
        .await
        .expect("User creation should succeed in test")
}

/// `Cookie` header value for a logged-in `user`.
pub fn session_cookie(user: &User) -> String {
    let token = encode_session_token(user.id, user.username.clone(), TEST_SECRET, 24)
        .expect("token encoding should succeed in test");
    format!("auth-token={}", token)
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `name=value` pairs from every `Set-Cookie` header.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .collect()
}

/// The decoded flash messages set on a response, as `(category, message)`.
pub fn flashes(response: &Response<Body>) -> Vec<(String, String)> {
    set_cookies(response)
        .into_iter()
        .filter_map(|c| c.strip_prefix("flash=").map(str::to_string))
        .filter(|v| !v.is_empty())
        .flat_map(|v| {
            let json = lib_utils::b64u_decode_to_string(&v).unwrap();
            serde_json::from_str::<Vec<crate::flash::Flash>>(&json).unwrap()
        })
        .map(|f| (f.category.as_str().to_string(), f.message))
        .collect()
}
