use analysis_core::{AnalysisError, Signal};
use serde::Serialize;

use crate::strategy::Indicator;

/// Risk-to-reward ratio attached to one indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskProfile {
    pub indicator: Indicator,
    pub ratio: f64,
}

/// Static indicator -> ratio lookup, built once and shared read-only.
#[derive(Debug, Clone)]
pub struct RiskPolicyTable {
    profiles: Vec<RiskProfile>,
}

impl Default for RiskPolicyTable {
    fn default() -> Self {
        Self::new(vec![
            RiskProfile { indicator: Indicator::GoldenCross, ratio: 2.0 },
            RiskProfile { indicator: Indicator::Macd, ratio: 5.0 / 3.0 },
            RiskProfile { indicator: Indicator::Rsi, ratio: 6.0 / 2.0 },
            RiskProfile { indicator: Indicator::Sma, ratio: 1.0 },
        ])
    }
}

impl RiskPolicyTable {
    pub fn new(profiles: Vec<RiskProfile>) -> Self {
        Self { profiles }
    }

    pub fn profiles(&self) -> &[RiskProfile] {
        &self.profiles
    }

    pub fn get_ratio(&self, indicator_name: &str) -> Result<f64, AnalysisError> {
        let indicator = indicator_name.parse::<Indicator>()?;
        self.ratio_for(indicator)
    }

    pub fn ratio_for(&self, indicator: Indicator) -> Result<f64, AnalysisError> {
        self.profiles
            .iter()
            .find(|p| p.indicator == indicator)
            .map(|p| p.ratio)
            .ok_or_else(|| AnalysisError::UnknownIndicator(indicator.name().to_string()))
    }
}

/// Entry, target and stop for a recommended buy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradePlan {
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    pub ratio: f64,
}

impl TradePlan {
    /// `None` unless the signal is a buy; the ratio is read as a percentage.
    pub fn derive(signal: Signal, reference_price: f64, ratio: f64) -> Option<Self> {
        if !signal.is_buy() {
            return None;
        }

        Some(Self {
            entry_price: reference_price,
            target_price: reference_price * (1.0 + ratio / 100.0),
            stop_loss: reference_price * (1.0 - ratio / 100.0),
            ratio,
        })
    }
}
