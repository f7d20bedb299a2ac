use crate::models::AssetClass;
use anyhow::{anyhow, Context};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MARKET_DATA_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_CACHE_TTL_SECS: u64 = 600;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 64;
const DEFAULT_LOOKBACK_DAYS: i64 = 365;
const MAX_LOOKBACK_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerConfig {
    pub asset: AssetClass,
    pub symbol: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub environment: String,
    pub market_data_url: String,
    pub cache_ttl: Duration,
    pub cache_max_entries: usize,
    pub lookback_days: i64,
    pub static_dir: Option<PathBuf>,
    pub tickers: Vec<TickerConfig>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup; unset keys fall back to
    /// defaults, malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr: SocketAddr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:3000")?;

        let cache_ttl_secs = parse_or(get("CACHE_TTL_SECS"), DEFAULT_CACHE_TTL_SECS, "CACHE_TTL_SECS")?;
        let cache_max_entries = parse_or(get("CACHE_MAX_ENTRIES"), DEFAULT_CACHE_MAX_ENTRIES, "CACHE_MAX_ENTRIES")?;
        let lookback_days = parse_or(get("LOOKBACK_DAYS"), DEFAULT_LOOKBACK_DAYS, "LOOKBACK_DAYS")?;
        if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback_days) {
            return Err(anyhow!(
                "LOOKBACK_DAYS must be between 1 and {}, got {}",
                MAX_LOOKBACK_DAYS,
                lookback_days
            ));
        }

        let tickers = AssetClass::ALL
            .iter()
            .map(|&asset| {
                let (env_key, default_symbol, label) = match asset {
                    AssetClass::Equity => ("EQUITY_SYMBOL", "AAPL", "Equity"),
                    AssetClass::Crypto => ("CRYPTO_SYMBOL", "BTC-USD", "Bitcoin"),
                    AssetClass::Gold => ("GOLD_SYMBOL", "GC=F", "Gold futures"),
                    AssetClass::Bond => ("BOND_SYMBOL", "TLT", "Treasury bond ETF"),
                };
                TickerConfig {
                    asset,
                    symbol: get(env_key).unwrap_or_else(|| default_symbol.to_string()),
                    label: label.to_string(),
                }
            })
            .collect();

        Ok(Self {
            bind_addr,
            environment: get("APP_ENV").unwrap_or_else(|| "development".to_string()),
            market_data_url: get("MARKET_DATA_URL").unwrap_or_else(|| DEFAULT_MARKET_DATA_URL.to_string()),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_max_entries,
            lookback_days,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            tickers,
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }

    pub fn ticker(&self, asset: AssetClass) -> Option<&TickerConfig> {
        self.tickers.iter().find(|t| t.asset == asset)
    }
}

fn parse_or<T>(value: Option<String>, default: T, key: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} has invalid value {:?}", key, raw)),
        None => Ok(default),
    }
}
