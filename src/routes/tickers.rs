use crate::config::TickerConfig;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "stock-analyzer",
    })
}

pub async fn list_tickers(State(state): State<AppState>) -> Json<Vec<TickerConfig>> {
    Json(state.config.tickers.clone())
}
