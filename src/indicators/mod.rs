// Technical indicators and the signal derived from them

pub mod engine;
pub mod moving_averages;
pub mod rsi;
pub mod signal;

pub use engine::{Analysis, AnalysisError, IndicatorEngine, IndicatorFrame};
pub use moving_averages::SMA;
pub use rsi::{RsiReading, RSI};
pub use signal::{derive_signal, Signal, SignalCall};
