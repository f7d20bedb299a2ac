use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;
use stock_analyzer::{
    api_client::{ApiError, PriceSource},
    config::Config,
    models::{DateRange, PricePoint, PriceSeries},
    routes,
    state::AppState,
};
use tower::ServiceExt;

/// Serves canned series keyed by the default symbols.
struct StubSource;

fn series_from(range: DateRange, closes: impl Iterator<Item = f64>) -> PriceSeries {
    let points = closes
        .enumerate()
        .map(|(i, close)| PricePoint {
            date: range.start + Duration::days(i as i64),
            close,
            high: Some(close * 1.02),
            volume: Some(1_000_000.0),
        })
        .collect();
    PriceSeries::new(points).unwrap()
}

#[async_trait]
impl PriceSource for StubSource {
    async fn fetch_daily_series(&self, symbol: &str, range: DateRange) -> Result<PriceSeries, ApiError> {
        match symbol {
            "AAPL" => Ok(series_from(range, (0..30).map(|i| 100.0 + i as f64))),
            "BTC-USD" => Ok(series_from(range, (0..10).map(|i| 40_000.0 + 100.0 * i as f64))),
            "TLT" => Ok(series_from(range, std::iter::repeat(92.5).take(25))),
            other => Err(ApiError::RequestFailed(format!("connection refused for {}", other))),
        }
    }
}

fn app() -> Router {
    let config = Config::from_lookup(|_| None).unwrap();
    routes::router(AppState::new(config, Arc::new(StubSource)))
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn tickers_lists_fixed_set() {
    let (status, body) = get("/api/tickers").await;

    assert_eq!(status, StatusCode::OK);
    let tickers = body.as_array().unwrap();
    assert_eq!(tickers.len(), 4);
    assert_eq!(tickers[0]["asset"], "equity");
    assert_eq!(tickers[0]["symbol"], "AAPL");
    assert_eq!(tickers[2]["symbol"], "GC=F");
}

#[tokio::test]
async fn signal_for_rising_equity_is_overheated() {
    let (status, body) = get("/api/signal?ticker=equity&start=2024-01-01&end=2024-03-01&mode=expert").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "AAPL");
    assert_eq!(body["signal"], "overheated");
    assert_eq!(body["label"], "Overheated");
    assert_eq!(body["price"], 129.0);
    assert_eq!(body["sma"], 119.5);
    assert_eq!(body["rsi"]["state"], "value");
    assert_eq!(body["rsi"]["value"], 100.0);
    assert_eq!(body["date"], "2024-01-30");
    assert_eq!(body["report"]["mode"], "expert");
    assert!(body["rationale"].as_str().unwrap().contains("overbought"));
}

#[tokio::test]
async fn flat_bond_resolves_to_neutral() {
    let (status, body) = get("/api/signal?ticker=bond").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["signal"], "neutral");
    assert_eq!(body["rsi"]["state"], "flat");
    assert_eq!(body["report"]["mode"], "beginner");
}

#[tokio::test]
async fn indicators_are_aligned_with_prices() {
    let (status, body) = get("/api/indicators?ticker=equity").await;

    assert_eq!(status, StatusCode::OK);
    let prices = body["prices"].as_array().unwrap();
    let sma = body["sma"].as_array().unwrap();
    let rsi = body["rsi"].as_array().unwrap();
    assert_eq!(prices.len(), 30);
    assert_eq!(sma.len(), 30);
    assert_eq!(rsi.len(), 30);
    assert!(sma[18].is_null());
    assert_eq!(sma[19], 109.5);
    assert!(rsi[13].is_null());
    assert_eq!(rsi[14]["state"], "value");
}

#[tokio::test]
async fn short_history_is_insufficient_for_signal() {
    let (status, body) = get("/api/signal?ticker=crypto").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "insufficient_data");
    assert!(body["error"].as_str().unwrap().contains("Only 10"));
}

#[tokio::test]
async fn short_history_still_has_summary() {
    let (status, body) = get("/api/price?ticker=crypto").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_price"], 40_900.0);
    assert_eq!(body["change"], 100.0);
    assert_eq!(body["recent"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn fetch_failure_is_reported_without_details() {
    let (status, body) = get("/api/signal?ticker=gold").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "fetch_failure");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("try again"));
    assert!(!message.contains("connection refused"));
}

#[tokio::test]
async fn unknown_ticker_is_not_found() {
    let (status, body) = get("/api/signal?ticker=forex").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "unknown_ticker");
}

#[tokio::test]
async fn inverted_range_is_rejected() {
    let (status, body) = get("/api/indicators?ticker=equity&start=2024-05-01&end=2024-04-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_range");
}

#[tokio::test]
async fn malformed_date_is_a_json_error() {
    let (status, body) = get("/api/signal?ticker=equity&start=2024-13-01").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_query");
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("try again"));
    assert!(!message.contains("deserialize"));
}

#[tokio::test]
async fn missing_ticker_is_a_json_error() {
    let (status, body) = get("/api/signal").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_query");
    assert!(!body["error"].as_str().unwrap().contains("missing field"));
}

#[tokio::test]
async fn unknown_mode_is_a_json_error() {
    let (status, body) = get("/api/signal?ticker=equity&mode=novice").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_query");
}

#[tokio::test]
async fn malformed_query_on_every_analysis_route() {
    for path in ["/api/price", "/api/indicators", "/api/signal"] {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(format!("{}?ticker=gold&end=yesterday", path))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
        let content_type = response.headers()["content-type"].to_str().unwrap();
        assert!(content_type.starts_with("application/json"), "{} returned {}", path, content_type);
    }
}

#[tokio::test]
async fn end_date_at_calendar_limit_is_rejected() {
    let (status, body) = get("/api/price?ticker=equity&end=-262143-01-05").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_range");
}
