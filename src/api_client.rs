use crate::models::{DateRange, PricePoint, PriceSeries};
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
}

// Columns may contain nulls for holidays or halted sessions
#[derive(Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Upstream returned HTTP {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("No price data available for {0}")]
    NoData(String),
}

/// Anything that can supply a daily close series for a symbol.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_daily_series(&self, symbol: &str, range: DateRange) -> Result<PriceSeries, ApiError>;
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::RequestFailed(format!("Invalid market data URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::RequestFailed(format!("Market data URL {} cannot carry a path", base_url)));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
        })
    }

    fn chart_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v8", "finance", "chart", symbol]);
        }
        url
    }
}

/// Query parameters selecting daily bars between the range bounds (UTC midnight).
fn chart_query(range: DateRange) -> [(&'static str, String); 3] {
    let period1 = range.start.and_time(NaiveTime::MIN).and_utc().timestamp();
    let period2 = range.end.and_time(NaiveTime::MIN).and_utc().timestamp();
    [
        ("period1", period1.to_string()),
        ("period2", period2.to_string()),
        ("interval", "1d".to_string()),
    ]
}

#[async_trait]
impl PriceSource for ApiClient {
    async fn fetch_daily_series(&self, symbol: &str, range: DateRange) -> Result<PriceSeries, ApiError> {
        let url = self.chart_url(symbol);
        tracing::debug!(%url, start = %range.start, end = %range.end, "Requesting daily candles");

        let response = self
            .client
            .get(url)
            .query(&chart_query(range))
            .header("User-Agent", "stock-analyzer/0.1")
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::ParseError(format!("Failed to get response text: {}", e)))?;

        // The chart endpoint reports unknown symbols as 404 with a JSON error body
        if !status.is_success() && status.as_u16() != 404 {
            return Err(ApiError::Status(status.as_u16()));
        }

        parse_chart(symbol, &body)
    }
}

/// Convert a chart response body into a validated series.
pub fn parse_chart(symbol: &str, body: &str) -> Result<PriceSeries, ApiError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::ParseError(format!("Failed to parse chart for {}: {}", symbol, e)))?;

    if let Some(err) = envelope.chart.error {
        tracing::warn!(symbol, code = %err.code, description = %err.description, "Upstream chart error");
        return Err(ApiError::NoData(symbol.to_string()));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| ApiError::NoData(symbol.to_string()))?;

    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Err(ApiError::NoData(symbol.to_string())),
    };

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let close = match quote.close.get(i).copied().flatten() {
            Some(close) => close,
            None => continue,
        };
        let date = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| ApiError::ParseError(format!("Invalid timestamp {}", ts)))?
            .date_naive();

        points.push(PricePoint {
            date,
            close,
            high: quote.high.get(i).copied().flatten(),
            volume: quote.volume.get(i).copied().flatten(),
        });
    }

    PriceSeries::from_unordered(points).map_err(|_| ApiError::NoData(symbol.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "currency": "USD"},
                "timestamp": [1704205800, 1704292200, 1704378600, 1704465000],
                "indicators": {
                    "quote": [{
                        "open": [187.1, 184.2, 182.1, 181.9],
                        "close": [185.64, 184.25, null, 181.18],
                        "high": [188.44, 185.88, 183.09, 182.76],
                        "volume": [82488700, 58414500, null, 62303300]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_skips_null_closes() {
        let series = parse_chart("AAPL", SAMPLE).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![185.64, 184.25, 181.18]);
        assert_eq!(series.points()[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(series.points()[0].high, Some(188.44));
        assert_eq!(series.last().volume, Some(62303300.0));
    }

    #[test]
    fn test_parse_chart_upstream_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart("NOPE", body).unwrap_err();

        assert!(matches!(err, ApiError::NoData(ref s) if s == "NOPE"));
    }

    #[test]
    fn test_parse_chart_all_null_is_no_data() {
        let body = r#"{"chart":{"result":[{"timestamp":[1704205800],"indicators":{"quote":[{"close":[null]}]}}],"error":null}}"#;

        assert!(matches!(parse_chart("AAPL", body), Err(ApiError::NoData(_))));
    }

    #[test]
    fn test_parse_chart_rejects_garbage() {
        assert!(matches!(parse_chart("AAPL", "<html>"), Err(ApiError::ParseError(_))));
    }

    #[test]
    fn test_chart_url_escapes_symbol_segment() {
        let client = ApiClient::new("https://example.test/").unwrap();

        assert_eq!(
            client.chart_url("GC=F").as_str(),
            "https://example.test/v8/finance/chart/GC=F"
        );
        // A slash in a symbol must stay inside one path segment
        assert_eq!(
            client.chart_url("BRK/B").as_str(),
            "https://example.test/v8/finance/chart/BRK%2FB"
        );
    }

    #[test]
    fn test_chart_query_uses_utc_midnight_bounds() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        )
        .unwrap();

        let query = chart_query(range);
        assert_eq!(query[0], ("period1", "1704067200".to_string()));
        assert_eq!(query[1], ("period2", "1706745600".to_string()));
        assert_eq!(query[2], ("interval", "1d".to_string()));
    }

    #[test]
    fn test_new_rejects_unusable_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::RequestFailed(_))));
        assert!(matches!(ApiClient::new("mailto:data@example.test"), Err(ApiError::RequestFailed(_))));
    }
}
