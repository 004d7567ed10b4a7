use std::fmt;
use std::str::FromStr;

use analysis_core::{AnalysisError, PriceSeries, Signal};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::indicators::*;

const GOLDEN_CROSS_FAST: usize = 50;
const GOLDEN_CROSS_SLOW: usize = 200;
const MACD_FAST: usize = 12;
const MACD_SLOW: usize = 26;
const MACD_SIGNAL: usize = 9;
const RSI_PERIOD: usize = 14;
const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const SMA_PERIOD: usize = 20;

/// The canned indicator rules a user can pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    #[serde(rename = "Golden Cross")]
    GoldenCross,
    #[serde(rename = "MACD")]
    Macd,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "SMA")]
    Sma,
}

/// Outcome of one evaluation: the signal on the latest bar and its close.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorResult {
    pub indicator: Indicator,
    pub signal: Signal,
    pub reference_price: f64,
    /// Latest indicator values, for display
    pub readings: serde_json::Value,
}

struct Computed {
    signals: Vec<Signal>,
    readings: serde_json::Value,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::GoldenCross,
        Indicator::Macd,
        Indicator::Rsi,
        Indicator::Sma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Indicator::GoldenCross => "Golden Cross",
            Indicator::Macd => "MACD",
            Indicator::Rsi => "RSI",
            Indicator::Sma => "SMA",
        }
    }

    /// Fewest bars needed before `evaluate` produces a result.
    pub fn min_bars(&self) -> usize {
        match self {
            Indicator::GoldenCross => GOLDEN_CROSS_SLOW,
            Indicator::Macd => MACD_SLOW,
            Indicator::Rsi => RSI_PERIOD + 1,
            Indicator::Sma => SMA_PERIOD,
        }
    }

    pub fn risk_reward_label(&self) -> &'static str {
        match self {
            Indicator::GoldenCross => "2:1",
            Indicator::Macd => "5:3",
            Indicator::Rsi => "6:2",
            Indicator::Sma => "1:1",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Indicator::GoldenCross => {
                "A long-term moving average strategy. A buy signal is generated while the \
                 50-bar moving average sits above the 200-bar moving average."
            }
            Indicator::Macd => {
                "A momentum strategy. The MACD line (12-bar EMA minus 26-bar EMA) crossing \
                 above its 9-bar signal line generates a buy signal."
            }
            Indicator::Rsi => {
                "A momentum oscillator. RSI below 30 marks the stock oversold (buy), above 70 \
                 overbought (sell)."
            }
            Indicator::Sma => {
                "A trend-following strategy. Price above its 20-bar simple moving average is a \
                 buy, below it a sell."
            }
        }
    }

    /// One signal per bar; bars inside the warm-up window are neutral.
    pub fn signal_series(&self, closes: &[f64]) -> Vec<Signal> {
        self.compute(closes).signals
    }

    pub fn evaluate(&self, series: &PriceSeries) -> Result<IndicatorResult, AnalysisError> {
        if series.len() < self.min_bars() {
            return Err(AnalysisError::InsufficientData(format!(
                "{} needs at least {} bars, got {}",
                self.name(),
                self.min_bars(),
                series.len()
            )));
        }

        let computed = self.compute(&series.closes());
        let signal = computed.signals.last().copied().unwrap_or(Signal::Neutral);

        Ok(IndicatorResult {
            indicator: *self,
            signal,
            reference_price: series.last_close(),
            readings: computed.readings,
        })
    }

    fn compute(&self, closes: &[f64]) -> Computed {
        match self {
            Indicator::GoldenCross => {
                let fast = sma(closes, GOLDEN_CROSS_FAST);
                let slow = sma(closes, GOLDEN_CROSS_SLOW);
                let signals = fast
                    .iter()
                    .zip(&slow)
                    .map(|pair| match pair {
                        (Some(f), Some(s)) if f > s => Signal::Buy,
                        _ => Signal::Neutral,
                    })
                    .collect();

                Computed {
                    signals,
                    readings: json!({
                        "sma_50": fast.last().copied().flatten(),
                        "sma_200": slow.last().copied().flatten(),
                    }),
                }
            }
            Indicator::Macd => {
                let result = macd(closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
                let signals = result
                    .macd_line
                    .iter()
                    .zip(&result.signal_line)
                    .enumerate()
                    .map(|(i, (m, s))| {
                        if i + 1 >= MACD_SLOW && m > s {
                            Signal::Buy
                        } else {
                            Signal::Neutral
                        }
                    })
                    .collect();

                Computed {
                    signals,
                    readings: json!({
                        "macd": result.macd_line.last(),
                        "signal_line": result.signal_line.last(),
                        "histogram": result.histogram.last(),
                    }),
                }
            }
            Indicator::Rsi => {
                let values = rsi(closes, RSI_PERIOD);
                let signals = values
                    .iter()
                    .map(|v| match v {
                        Some(r) if *r < RSI_OVERSOLD => Signal::Buy,
                        Some(r) if *r > RSI_OVERBOUGHT => Signal::Sell,
                        _ => Signal::Neutral,
                    })
                    .collect();

                Computed {
                    signals,
                    readings: json!({ "rsi": values.last().copied().flatten() }),
                }
            }
            Indicator::Sma => {
                let averages = sma(closes, SMA_PERIOD);
                let signals = closes
                    .iter()
                    .zip(&averages)
                    .map(|(close, avg)| match avg {
                        Some(a) if close > a => Signal::Buy,
                        Some(_) => Signal::Sell,
                        None => Signal::Neutral,
                    })
                    .collect();

                Computed {
                    signals,
                    readings: json!({ "sma_20": averages.last().copied().flatten() }),
                }
            }
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Indicator {
    type Err = AnalysisError;

    /// Accepts display names and loose spellings such as `golden_cross`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "goldencross" => Ok(Indicator::GoldenCross),
            "macd" => Ok(Indicator::Macd),
            "rsi" => Ok(Indicator::Rsi),
            "sma" => Ok(Indicator::Sma),
            _ => Err(AnalysisError::UnknownIndicator(s.to_string())),
        }
    }
}

/// Evaluate the indicator called `indicator_name` against `series`.
pub fn evaluate(indicator_name: &str, series: &PriceSeries) -> Result<IndicatorResult, AnalysisError> {
    indicator_name.parse::<Indicator>()?.evaluate(series)
}
