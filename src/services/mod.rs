pub mod analysis_service;
pub mod price_service;

use crate::api_client::ApiError;
use crate::indicators::AnalysisError;
use thiserror::Error;

/// Every way a request can fail before it reaches the presentation layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unknown ticker: {0}")]
    UnknownTicker(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("invalid date range: {0}")]
    InvalidRange(String),
    #[error(transparent)]
    Fetch(#[from] ApiError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
