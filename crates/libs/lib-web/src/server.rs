//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! [`start_server`] loads configuration, prepares the SQLite database, builds
//! the Yahoo Finance client and serves the router from [`create_router`].

// region: --- Imports
use crate::handlers::{auth, pages, plot};
use crate::middleware::{log_requests, require_auth, stamp_req};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use lib_core::model::store::run_migrations;
use lib_core::{create_pool, prepare_sqlite_path, Config, DbPool};
use lib_market::{MarketDataProvider, ProviderConfig, ReportBuilder, YahooFinanceClient};
use lib_utils::get_env_or;
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub provider: Arc<dyn MarketDataProvider>,
    pub report: ReportBuilder,
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";

/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:5000")
    pub bind_address: String,
}

impl ServerConfig {
    /// Read `BIND_ADDRESS`, falling back to the default.
    pub fn from_env() -> Self {
        Self {
            bind_address: get_env_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Install the global tracing subscriber, filtered by `LOG_LEVEL`.
pub fn init_tracing() -> String {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let level = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => log_level.as_str(),
        _ => "info",
    };
    let filter = tracing_subscriber::EnvFilter::new(level);

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .try_init();

    level.to_string()
}

/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading or validation fails
/// - The database directory cannot be created
/// - Database connection or migrations fail
/// - The market data client cannot be built
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = init_tracing();

    info!("STOCK PLOT SERVER STARTING");
    info!("Log level: {}", log_level);

    info!("Loading configuration...");
    let app_config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    app_config.validate().map_err(|e| anyhow::anyhow!(e))?;
    info!("Database URL: {}", app_config.database_url);

    if let Some(dir) = prepare_sqlite_path(&app_config.database_url)? {
        info!("Created database directory: {:?}", dir);
    }

    info!("Connecting to database...");
    let pool = create_pool(&app_config.database_url).await?;

    info!("Running database migrations...");
    run_migrations(&pool).await?;
    info!("Migrations complete");

    let provider = YahooFinanceClient::new(ProviderConfig::new(
        app_config.market_data_url.clone(),
        app_config.market_data_timeout_secs,
    ))?;
    info!(
        "Market data provider: {} (timeout {}s)",
        app_config.market_data_url, app_config.market_data_timeout_secs
    );

    let state = AppState {
        db: pool,
        config: app_config,
        provider: Arc::new(provider),
        report: ReportBuilder::default(),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("SERVER READY: http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the main application router with all routes
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(pages::index))
        .route("/plot", post(plot::plot))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/health", get(pages::health))
        .merge(protected)
        .layer(from_fn(log_requests))
        .layer(from_fn(stamp_req))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

/// Log server information
fn log_server_info() {
    info!(" PAGES:");
    info!("   • GET  /            (login required)");
    info!("   • POST /plot        ticker, start_date, end_date (login required)");
    info!(" AUTH:");
    info!("   • GET/POST /register");
    info!("   • GET/POST /login");
    info!("   • GET      /logout");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
