/// Simple Moving Average (SMA)
/// Calculates the arithmetic mean of the last N prices
#[derive(Debug, Clone, Copy)]
pub struct SMA {
    period: usize,
}

impl SMA {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Calculate SMA for a price series
    /// Returns a vector of the same length as input
    /// First (period - 1) values are None (warmup period)
    pub fn calculate(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; prices.len()];

        if prices.len() < self.period {
            return result;
        }

        for i in (self.period - 1)..prices.len() {
            let window_start = i + 1 - self.period;
            let window = &prices[window_start..=i];
            let sum: f64 = window.iter().sum();
            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}
