use super::price_service::load_series;
use super::ServiceError;
use crate::config::TickerConfig;
use crate::indicators::{Analysis, IndicatorFrame};
use crate::models::{AssetClass, DateRange, PricePoint, PriceSeries, ViewMode};
use crate::report::{render, Report};
use crate::state::AppState;
use serde::Serialize;
use tracing::info;

/// Rows shown in the "recent data" table.
const RECENT_ROWS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorView {
    pub asset: AssetClass,
    pub symbol: String,
    #[serde(flatten)]
    pub frame: IndicatorFrame,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignalView {
    pub asset: AssetClass,
    pub symbol: String,
    #[serde(flatten)]
    pub analysis: Analysis,
    pub label: &'static str,
    pub report: Report,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub asset: AssetClass,
    pub symbol: String,
    pub current_price: f64,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
    pub period_high: f64,
    pub latest_volume: Option<f64>,
    pub recent: Vec<PricePoint>,
}

pub async fn indicators(
    state: &AppState,
    asset: AssetClass,
    range: DateRange,
) -> Result<IndicatorView, ServiceError> {
    let (ticker, series) = load_series(state, asset, range).await?;
    let frame = state.engine.compute_indicators(&series)?;

    Ok(IndicatorView {
        asset,
        symbol: ticker.symbol,
        frame,
    })
}

pub async fn signal(
    state: &AppState,
    asset: AssetClass,
    range: DateRange,
    mode: ViewMode,
) -> Result<SignalView, ServiceError> {
    let (ticker, series) = load_series(state, asset, range).await?;
    let analysis = state.engine.analyze(&series)?;

    info!(
        symbol = %ticker.symbol,
        date = %analysis.date,
        signal = ?analysis.call.signal,
        "Derived signal"
    );

    let report = render(&analysis, mode);
    Ok(SignalView {
        asset,
        symbol: ticker.symbol,
        label: analysis.call.signal.label(),
        analysis,
        report,
    })
}

pub async fn summary(
    state: &AppState,
    asset: AssetClass,
    range: DateRange,
) -> Result<MarketSummary, ServiceError> {
    let (ticker, series) = load_series(state, asset, range).await?;
    Ok(summarize(&ticker, &series))
}

/// Headline metrics for a series: last close, day-over-day change, range
/// high and last reported volume.
pub fn summarize(ticker: &TickerConfig, series: &PriceSeries) -> MarketSummary {
    let points = series.points();
    let last = series.last();

    let previous = points.len().checked_sub(2).map(|i| points[i].close);
    let change = previous.map(|prev| last.close - prev);
    let change_pct = previous.map(|prev| (last.close - prev) / prev * 100.0);

    let period_high = points
        .iter()
        .map(|p| p.high.unwrap_or(p.close))
        .fold(f64::MIN, f64::max);

    let recent_start = points.len().saturating_sub(RECENT_ROWS);

    MarketSummary {
        asset: ticker.asset,
        symbol: ticker.symbol.clone(),
        current_price: last.close,
        change,
        change_pct,
        period_high,
        latest_volume: last.volume,
        recent: points[recent_start..].to_vec(),
    }
}
