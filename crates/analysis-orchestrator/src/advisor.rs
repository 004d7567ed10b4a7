use serde::Serialize;
use technical_analysis::sma;

pub const MOVING_AVERAGE_DAYS: usize = 50;

/// Daily history fetched for the moving average.
pub const ADVISOR_HISTORY_PERIOD: &str = "6mo";

/// What the advisor page shows for one company.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorReport {
    pub name: String,
    pub exchange_code: String,
    pub ticker: String,
    pub pe_ratio: Option<f64>,
    pub market_cap: Option<f64>,
    /// Mean of the last 50 daily closes; `None` with shorter history
    pub moving_average_50: Option<f64>,
    pub description: Option<String>,
    pub description_error: Option<String>,
}

/// Mean of the trailing `days` closes, if there are that many.
pub fn trailing_average(closes: &[f64], days: usize) -> Option<f64> {
    sma(closes, days).last().copied().flatten()
}
