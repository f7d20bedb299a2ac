use serde::Serialize;

/// One RSI observation.
///
/// `Flat` marks a window whose average gain and average loss are both zero,
/// where the ratio is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum RsiReading {
    Value(f64),
    Flat,
}

impl RsiReading {
    pub fn value(&self) -> Option<f64> {
        match self {
            RsiReading::Value(v) => Some(*v),
            RsiReading::Flat => None,
        }
    }
}

/// Relative Strength Index (RSI)
/// Measures momentum by comparing magnitude of recent gains to recent losses
/// Returns values between 0-100:
/// - Below 30: Oversold (potentially undervalued)
/// - Above 70: Overbought (potentially overvalued)
#[derive(Debug, Clone, Copy)]
pub struct RSI {
    period: usize,
}

impl RSI {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Calculate RSI using plain trailing means of gains and losses over
    /// the last `period` price changes.
    /// Returns a vector of the same length as input; the first `period`
    /// entries are None because index 0 has no change.
    pub fn calculate(&self, prices: &[f64]) -> Vec<Option<RsiReading>> {
        let mut result = vec![None; prices.len()];

        if prices.len() < self.period + 1 {
            return result;
        }

        // gains[j] / losses[j] belong to the change ending at prices[j + 1]
        let mut gains = Vec::with_capacity(prices.len() - 1);
        let mut losses = Vec::with_capacity(prices.len() - 1);

        for i in 1..prices.len() {
            let change = prices[i] - prices[i - 1];
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        for i in self.period..prices.len() {
            let window = (i - self.period)..i;
            let avg_gain = gains[window.clone()].iter().sum::<f64>() / self.period as f64;
            let avg_loss = losses[window].iter().sum::<f64>() / self.period as f64;

            result[i] = Some(Self::reading(avg_gain, avg_loss));
        }

        result
    }

    fn reading(avg_gain: f64, avg_loss: f64) -> RsiReading {
        if avg_loss == 0.0 {
            if avg_gain > 0.0 {
                RsiReading::Value(100.0)
            } else {
                RsiReading::Flat
            }
        } else {
            let rs = avg_gain / avg_loss;
            RsiReading::Value(100.0 - (100.0 / (1.0 + rs)))
        }
    }
}
