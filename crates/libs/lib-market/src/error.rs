//! # Market Errors

use lib_core::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("provider error: {0}")]
    Api(String),
    #[error("invalid provider url: {0}")]
    Url(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("chart error: {0}")]
    Chart(String),
    #[error("image encoding error: {0}")]
    Encode(String),
    #[error("report task failed: {0}")]
    Task(String),
}

impl From<MarketError> for AppError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::Http(_)
            | MarketError::Status(_)
            | MarketError::Api(_)
            | MarketError::Parse(_) => AppError::Provider(err.to_string()),
            MarketError::Url(_) => AppError::Config(err.to_string()),
            MarketError::Chart(_) | MarketError::Encode(_) => AppError::Render(err.to_string()),
            MarketError::Task(_) => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_failures_become_provider_errors() {
        assert!(matches!(AppError::from(MarketError::Status(503)), AppError::Provider(_)));
        assert!(matches!(
            AppError::from(MarketError::Api("Bad Request".into())),
            AppError::Provider(_)
        ));
        assert!(matches!(
            AppError::from(MarketError::Parse("truncated body".into())),
            AppError::Provider(_)
        ));
    }

    #[test]
    fn test_rendering_failures_become_render_errors() {
        assert!(matches!(
            AppError::from(MarketError::Chart("font".into())),
            AppError::Render(_)
        ));
        assert!(matches!(
            AppError::from(MarketError::Encode("png".into())),
            AppError::Render(_)
        ));
    }
}
