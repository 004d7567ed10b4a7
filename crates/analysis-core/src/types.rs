use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Time-ordered bars for one ticker. Never empty, timestamps strictly increasing.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(AnalysisError::InvalidData(format!(
                "price series for {} is empty",
                symbol
            )));
        }

        if let Some(pair) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(AnalysisError::InvalidData(format!(
                "bars for {} are not strictly increasing at {}",
                symbol, pair[1].timestamp
            )));
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn last_close(&self) -> f64 {
        self.bars[self.bars.len() - 1].close
    }
}

/// Discrete trading signal: -1 sell, 0 neutral, 1 buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    Sell,
    Neutral,
    Buy,
}

impl Signal {
    pub fn value(self) -> i8 {
        match self {
            Signal::Sell => -1,
            Signal::Neutral => 0,
            Signal::Buy => 1,
        }
    }

    pub fn is_buy(self) -> bool {
        self.value() > 0
    }

    pub fn to_label(self) -> &'static str {
        match self {
            Signal::Sell => "Sell",
            Signal::Neutral => "Neutral",
            Signal::Buy => "Buy",
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.value()
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Sell),
            0 => Ok(Signal::Neutral),
            1 => Ok(Signal::Buy),
            other => Err(format!("signal must be -1, 0 or 1, got {}", other)),
        }
    }
}

/// Period/interval pair passed to the price source, e.g. `5d` of `1m` bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesWindow {
    pub period: String,
    pub interval: String,
}

impl SeriesWindow {
    pub fn new(period: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            period: period.into(),
            interval: interval.into(),
        }
    }

    pub fn daily(period: impl Into<String>) -> Self {
        Self::new(period, "1d")
    }
}

impl Default for SeriesWindow {
    fn default() -> Self {
        Self::new("5d", "1m")
    }
}

/// Financial statement type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    BalanceSheet,
    ProfitAndLoss,
    CashFlow,
}

impl StatementKind {
    pub const ALL: [StatementKind; 3] = [
        StatementKind::BalanceSheet,
        StatementKind::ProfitAndLoss,
        StatementKind::CashFlow,
    ];

    pub fn to_label(&self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "Balance Sheet",
            StatementKind::ProfitAndLoss => "P&L Statement",
            StatementKind::CashFlow => "Cash Flow Statement",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            StatementKind::BalanceSheet => "balance_sheet",
            StatementKind::ProfitAndLoss => "profit_and_loss",
            StatementKind::CashFlow => "cash_flow",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

impl FromStr for StatementKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        StatementKind::ALL
            .into_iter()
            .find(|k| k.slug() == wanted || k.to_label().eq_ignore_ascii_case(wanted))
            .or(match wanted.to_ascii_lowercase().as_str() {
                "balance" => Some(StatementKind::BalanceSheet),
                "pnl" | "p&l" | "income" | "financials" => Some(StatementKind::ProfitAndLoss),
                "cashflow" => Some(StatementKind::CashFlow),
                _ => None,
            })
            .ok_or_else(|| AnalysisError::InvalidData(format!("unknown statement kind: {}", s)))
    }
}

/// One reporting period of a statement, line items keyed by provider field name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub end_date: NaiveDate,
    pub line_items: BTreeMap<String, f64>,
}

impl StatementPeriod {
    pub fn line_item(&self, name: &str) -> Option<f64> {
        self.line_items.get(name).copied()
    }
}

/// Company statement, most recent period first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialStatement {
    pub symbol: String,
    pub kind: StatementKind,
    pub periods: Vec<StatementPeriod>,
}

/// Quote data used by the stock advisor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub price: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<f64>,
}

/// News headline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub link: String,
}
