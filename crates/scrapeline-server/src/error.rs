//! Server-side error type.

use scrapeline_core::MetricsError;
use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("config: {0}")]
    Config(String),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}
