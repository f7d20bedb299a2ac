use super::ServiceError;
use crate::config::TickerConfig;
use crate::models::{AssetClass, DateRange, PriceSeries};
use crate::state::{AppState, CacheKey};
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fill in missing bounds: `end` defaults to today, `start` to
/// `end - lookback_days`.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    lookback_days: i64,
    today: NaiveDate,
) -> Result<DateRange, ServiceError> {
    let end = end.unwrap_or(today);
    let start = match start {
        Some(start) => start,
        None => Duration::try_days(lookback_days)
            .and_then(|lookback| end.checked_sub_signed(lookback))
            .ok_or_else(|| {
                ServiceError::InvalidRange(format!(
                    "end date {} is too early to look back {} days",
                    end, lookback_days
                ))
            })?,
    };
    DateRange::new(start, end).map_err(ServiceError::InvalidRange)
}

pub fn default_today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn ticker_for(state: &AppState, asset: AssetClass) -> Result<TickerConfig, ServiceError> {
    state
        .config
        .ticker(asset)
        .cloned()
        .ok_or_else(|| ServiceError::UnknownTicker(asset.to_string()))
}

/// Load the daily series for `asset`, reusing a cached fetch when one is
/// still fresh. Failed fetches are not cached.
pub async fn load_series(
    state: &AppState,
    asset: AssetClass,
    range: DateRange,
) -> Result<(TickerConfig, Arc<PriceSeries>), ServiceError> {
    let ticker = ticker_for(state, asset)?;
    let key = CacheKey {
        symbol: ticker.symbol.clone(),
        range,
    };

    if let Some(series) = state.cached_series(&key).await {
        debug!(symbol = %ticker.symbol, "Series cache hit");
        return Ok((ticker, series));
    }

    match state.source.fetch_daily_series(&ticker.symbol, range).await {
        Ok(series) => {
            info!(
                symbol = %ticker.symbol,
                observations = series.len(),
                start = %range.start,
                end = %range.end,
                "Fetched daily series"
            );
            let series = Arc::new(series);
            state.store_series(key, Arc::clone(&series)).await;
            Ok((ticker, series))
        }
        Err(e) => {
            warn!(symbol = %ticker.symbol, error = %e, "Failed to fetch series");
            Err(e.into())
        }
    }
}
