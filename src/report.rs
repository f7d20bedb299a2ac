use crate::indicators::engine::{RSI_PERIOD, SMA_PERIOD};
use crate::indicators::signal::{OVERBOUGHT, OVERSOLD};
use crate::indicators::{Analysis, RsiReading, Signal};
use crate::models::ViewMode;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub mode: ViewMode,
    pub headline: String,
    pub lines: Vec<String>,
}

/// Turn an analysis into display text for the requested audience.
pub fn render(analysis: &Analysis, mode: ViewMode) -> Report {
    let signal = analysis.call.signal;
    match mode {
        ViewMode::Beginner => Report {
            mode,
            headline: beginner_headline(signal).to_string(),
            lines: vec![
                analysis.call.rationale.to_string(),
                rsi_zone(analysis.rsi).to_string(),
            ],
        },
        ViewMode::Expert => {
            let distance = (analysis.price / analysis.sma - 1.0) * 100.0;
            let rsi = match analysis.rsi {
                RsiReading::Value(v) => format!("RSI({}) {:.1}", RSI_PERIOD, v),
                RsiReading::Flat => format!("RSI({}) flat (no price movement)", RSI_PERIOD),
            };
            Report {
                mode,
                headline: format!("{} as of {}", signal.label(), analysis.date),
                lines: vec![
                    format!(
                        "Close {:.2} vs SMA({}) {:.2} ({:+.2}%)",
                        analysis.price, SMA_PERIOD, analysis.sma, distance
                    ),
                    rsi,
                    format!("Rule: {}", rule_fired(signal)),
                ],
            }
        }
    }
}

fn beginner_headline(signal: Signal) -> &'static str {
    match signal {
        Signal::StrongBuyHold => "Trend is up. Holding or buying looks reasonable.",
        Signal::Overheated => "Trend is up, but the market looks overheated.",
        Signal::SellCaution => "Trend is down. Be careful.",
        Signal::Oversold => "Prices dropped a lot. A bounce may come.",
        Signal::Neutral => "No clear direction right now.",
    }
}

fn rsi_zone(rsi: RsiReading) -> &'static str {
    match rsi {
        RsiReading::Flat => "The price has not moved recently, so momentum cannot be measured.",
        RsiReading::Value(v) if v >= OVERBOUGHT => {
            "Momentum is very strong (RSI 70 or above); buyers may be running out of steam."
        }
        RsiReading::Value(v) if v <= OVERSOLD => {
            "Momentum is very weak (RSI 30 or below); sellers may be exhausted."
        }
        RsiReading::Value(_) => "Momentum is in a normal range (RSI between 30 and 70).",
    }
}

fn rule_fired(signal: Signal) -> &'static str {
    match signal {
        Signal::StrongBuyHold => "close > SMA x 1.01 and RSI < 70",
        Signal::Overheated => "close > SMA x 1.01 and RSI >= 70",
        Signal::SellCaution => "close < SMA x 0.99 and RSI > 30",
        Signal::Oversold => "close < SMA x 0.99 and RSI <= 30",
        Signal::Neutral => "close within 1% of SMA, or flat RSI",
    }
}
