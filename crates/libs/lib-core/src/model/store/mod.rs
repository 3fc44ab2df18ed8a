//! # Database Store
//!
//! Database connection pool, migrations and repository implementations.

// region: --- Modules
pub mod models;
pub mod user_repository;
// endregion: --- Modules

// region: --- Re-exports
pub use models::{User, UserForCreate};
pub use user_repository::UserRepository;
// endregion: --- Re-exports

// region: --- Types and Functions
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::path::Path;

/// Type alias for SQLite connection pool.
pub type DbPool = SqlitePool;

/// Create a new SQLite connection pool, creating the file if it is missing.
pub async fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;

    Ok(pool)
}

/// Apply the embedded migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../../migrations").run(pool).await
}

/// Make sure the directory holding a file-backed SQLite database exists.
///
/// Returns the directory when it had to be created. In-memory URLs are ignored.
pub fn prepare_sqlite_path(database_url: &str) -> std::io::Result<Option<std::path::PathBuf>> {
    let Some(db_path) = database_url.strip_prefix("sqlite:") else {
        return Ok(None);
    };
    let db_path = db_path.trim_start_matches("//");
    if db_path.starts_with(":memory:") {
        return Ok(None);
    }
    let db_path = db_path.split('?').next().unwrap_or(db_path);

    match Path::new(db_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent)?;
            Ok(Some(parent.to_path_buf()))
        }
        _ => Ok(None),
    }
}
// endregion: --- Types and Functions
