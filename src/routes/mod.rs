pub mod indicators;
pub mod price;
pub mod signal;
pub mod tickers;

use crate::indicators::AnalysisError;
use crate::models::{AssetClass, DateRange, ViewMode};
use crate::services::price_service::{default_today, resolve_range};
use crate::services::ServiceError;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(tickers::health))
        .route("/tickers", get(tickers::list_tickers))
        .route("/price", get(price::get_price))
        .route("/indicators", get(indicators::get_indicators))
        .route("/signal", get(signal::get_signal));

    let mut app = Router::new().nest("/api", api_routes);
    if let Some(dir) = state.config.static_dir.clone() {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub ticker: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub mode: ViewMode,
}

impl AnalysisQuery {
    /// Unwrap the extractor result, turning a malformed query string into
    /// a `ServiceError` so it gets the same JSON error body as everything else.
    pub fn from_extractor(query: Result<Query<Self>, QueryRejection>) -> Result<Self, ServiceError> {
        match query {
            Ok(Query(query)) => Ok(query),
            Err(rejection) => {
                let detail = rejection.body_text();
                tracing::debug!(%detail, "Rejected query string");
                Err(ServiceError::InvalidQuery(detail))
            }
        }
    }

    pub fn resolve(&self, state: &AppState) -> Result<(AssetClass, DateRange), ServiceError> {
        let asset = self
            .ticker
            .parse::<AssetClass>()
            .map_err(|_| ServiceError::UnknownTicker(self.ticker.clone()))?;
        let range = resolve_range(self.start, self.end, state.config.lookback_days, default_today())?;
        Ok((asset, range))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, kind, error) = match &self {
            ServiceError::UnknownTicker(ticker) => (
                StatusCode::NOT_FOUND,
                "unknown_ticker",
                format!(
                    "Unknown ticker '{}'. Choose one of: equity, crypto, gold, bond.",
                    ticker
                ),
            ),
            ServiceError::InvalidQuery(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_query",
                "The request could not be read. Pass ticker=equity|crypto|gold|bond, dates as YYYY-MM-DD and mode=beginner|expert, then try again.".to_string(),
            ),
            ServiceError::InvalidRange(msg) => (StatusCode::BAD_REQUEST, "invalid_range", msg.clone()),
            ServiceError::Analysis(AnalysisError::InsufficientData { required, available }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_data",
                format!(
                    "Only {} trading days of history are available but {} are needed. Try a longer date range or check back later.",
                    available, required
                ),
            ),
            ServiceError::Fetch(_) => (
                StatusCode::BAD_GATEWAY,
                "fetch_failure",
                "Market data could not be loaded right now. Please try again in a moment.".to_string(),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error,
                kind: kind.to_string(),
            }),
        )
            .into_response()
    }
}
