//! # Application Configuration
//!
//! Configuration is loaded from environment variables (after `.env` has been
//! read by the binary) and validated once on startup so a misconfigured
//! server fails fast instead of on the first request.
//!
//! ```rust,no_run
//! use lib_core::Config;
//!
//! let config = Config::from_env()?;
//! config.validate()?;
//! # Ok::<(), String>(())
//! ```

use lib_utils::envs::{get_env, get_env_or, get_env_parse_or};

/// Default SQLite location, next to the binary's working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:instance/site.db";

/// Default market data endpoint (Yahoo Finance chart API host).
pub const DEFAULT_MARKET_DATA_URL: &str = "https://query1.finance.yahoo.com";

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret used to sign session tokens
    ///
    /// **Must be at least 32 characters long.**
    pub session_secret: String,

    /// Session validity period in hours
    ///
    /// Valid range: 1-720 hours (1 hour to 30 days)
    pub session_expiration_hours: i64,

    /// Base URL of the market data provider
    pub market_data_url: String,

    /// Timeout applied to each market data request
    pub market_data_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", DEFAULT_DATABASE_URL);

        let session_secret = get_env("SESSION_SECRET").map_err(|e| e.to_string())?;

        let session_expiration_hours =
            get_env_parse_or("SESSION_EXPIRATION_HOURS", 24).map_err(|e| e.to_string())?;

        let market_data_url = get_env_or("MARKET_DATA_URL", DEFAULT_MARKET_DATA_URL);

        let market_data_timeout_secs =
            get_env_parse_or("MARKET_DATA_TIMEOUT_SECS", 10).map_err(|e| e.to_string())?;

        Ok(Self {
            database_url,
            session_secret,
            session_expiration_hours,
            market_data_url,
            market_data_timeout_secs,
        })
    }

    /// Validate configuration values against security rules.
    pub fn validate(&self) -> Result<(), String> {
        if self.session_secret.len() < 32 {
            return Err("SESSION_SECRET must be at least 32 characters long".to_string());
        }

        if self.session_expiration_hours < 1 || self.session_expiration_hours > 720 {
            return Err("SESSION_EXPIRATION_HOURS must be between 1 and 720 (30 days)".to_string());
        }

        if self.market_data_timeout_secs == 0 {
            return Err("MARKET_DATA_TIMEOUT_SECS must be at least 1".to_string());
        }

        Ok(())
    }
}
