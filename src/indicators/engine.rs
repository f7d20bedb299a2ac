use super::moving_averages::SMA;
use super::rsi::{RsiReading, RSI};
use super::signal::{derive_signal, Signal, SignalCall};
use crate::models::PriceSeries;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

pub const SMA_PERIOD: usize = 20;
pub const RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("insufficient data: need at least {required} observations, have {available}")]
    InsufficientData { required: usize, available: usize },
}

/// Indicator columns aligned index-for-index with the source series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorFrame {
    pub dates: Vec<NaiveDate>,
    pub prices: Vec<f64>,
    pub sma: Vec<Option<f64>>,
    pub rsi: Vec<Option<RsiReading>>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Most recent row where both indicators are present, as
    /// `(index, sma, rsi)`.
    pub fn latest_complete(&self) -> Option<(usize, f64, RsiReading)> {
        (0..self.len()).rev().find_map(|i| match (self.sma[i], self.rsi[i]) {
            (Some(sma), Some(rsi)) => Some((i, sma, rsi)),
            _ => None,
        })
    }
}

/// Signal for the most recent analyzable observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub date: NaiveDate,
    pub price: f64,
    pub sma: f64,
    pub rsi: RsiReading,
    #[serde(flatten)]
    pub call: SignalCall,
}

/// Pure SMA/RSI computation plus signal derivation. Holds no state beyond
/// its window lengths.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorEngine {
    sma: SMA,
    rsi: RSI,
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self {
            sma: SMA::new(SMA_PERIOD),
            rsi: RSI::new(RSI_PERIOD),
        }
    }

    /// Shortest series for which the latest row carries both indicators.
    pub fn min_observations(&self) -> usize {
        self.sma.period().max(self.rsi.period() + 1)
    }

    pub fn compute_indicators(&self, series: &PriceSeries) -> Result<IndicatorFrame, AnalysisError> {
        let required = self.min_observations();
        if series.len() < required {
            return Err(AnalysisError::InsufficientData {
                required,
                available: series.len(),
            });
        }

        let prices = series.closes();
        let sma = self.sma.calculate(&prices);
        let rsi = self.rsi.calculate(&prices);

        Ok(IndicatorFrame {
            dates: series.dates(),
            prices,
            sma,
            rsi,
        })
    }

    pub fn analyze(&self, series: &PriceSeries) -> Result<Analysis, AnalysisError> {
        let frame = self.compute_indicators(series)?;
        let (index, sma, rsi) =
            frame
                .latest_complete()
                .ok_or(AnalysisError::InsufficientData {
                    required: self.min_observations(),
                    available: series.len(),
                })?;
        let price = frame.prices[index];

        // A flat window means no recent movement at all.
        let call = match rsi {
            RsiReading::Value(value) => derive_signal(price, sma, value),
            RsiReading::Flat => SignalCall::from(Signal::Neutral),
        };

        Ok(Analysis {
            date: frame.dates[index],
            price,
            sma,
            rsi,
            call,
        })
    }
}
