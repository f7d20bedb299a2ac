use serde::Serialize;

/// Price must close above `sma * UPPER_BAND` to count as trending up.
pub const UPPER_BAND: f64 = 1.01;
/// Price must close below `sma * LOWER_BAND` to count as trending down.
pub const LOWER_BAND: f64 = 0.99;
pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    StrongBuyHold,
    Overheated,
    SellCaution,
    Oversold,
    Neutral,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::StrongBuyHold => "Strong buy / hold",
            Signal::Overheated => "Overheated",
            Signal::SellCaution => "Sell / caution",
            Signal::Oversold => "Oversold",
            Signal::Neutral => "Neutral",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            Signal::StrongBuyHold => {
                "Price is trading above its 20-day average while momentum is not yet stretched. The uptrend looks healthy."
            }
            Signal::Overheated => {
                "Price is above its 20-day average but RSI is in overbought territory. A pullback is likely; avoid chasing."
            }
            Signal::SellCaution => {
                "Price has fallen below its 20-day average without being oversold. The downtrend may continue."
            }
            Signal::Oversold => {
                "Price is below its 20-day average and RSI shows heavy selling. A technical rebound is possible."
            }
            Signal::Neutral => {
                "Price is moving within 1% of its 20-day average. No clear direction; wait for a breakout."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalCall {
    pub signal: Signal,
    pub rationale: &'static str,
}

impl From<Signal> for SignalCall {
    fn from(signal: Signal) -> Self {
        Self {
            signal,
            rationale: signal.rationale(),
        }
    }
}

/// Classify the latest (price, SMA, RSI) triple. Rules are checked top to
/// bottom and the first match wins; all band comparisons are strict.
pub fn derive_signal(price: f64, sma: f64, rsi: f64) -> SignalCall {
    let signal = if price > sma * UPPER_BAND {
        if rsi < OVERBOUGHT {
            Signal::StrongBuyHold
        } else {
            Signal::Overheated
        }
    } else if price < sma * LOWER_BAND {
        if rsi > OVERSOLD {
            Signal::SellCaution
        } else {
            Signal::Oversold
        }
    } else {
        Signal::Neutral
    };

    signal.into()
}
