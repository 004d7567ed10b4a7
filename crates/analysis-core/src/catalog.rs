use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// A company the advisor knows by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockListing {
    pub name: String,
    /// BSE scrip code
    pub exchange_code: String,
    pub ticker: String,
}

/// Tickers offered for selection plus the name-to-code table.
///
/// Built once at startup and shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCatalog {
    pub tickers: Vec<String>,
    pub listings: Vec<StockListing>,
}

const DEFAULT_TICKERS: &[&str] = &[
    "RELIANCE.NS",
    "INFY.NS",
    "TATAMOTORS.NS",
    "WIPRO.NS",
    "HDFCBANK.NS",
    "ICICIBANK.NS",
    "SBIN.NS",
    "AXISBANK.NS",
    "BHARTIARTL.NS",
    "AAPL",
    "AMZN",
];

const DEFAULT_LISTINGS: &[(&str, &str, &str)] = &[
    ("Reliance", "500325", "RELIANCE.NS"),
    ("Tata Motors", "500570", "TATAMOTORS.NS"),
    ("Infosys", "500209", "INFY.NS"),
    ("Wipro", "507685", "WIPRO.NS"),
    ("HDFC Bank", "500180", "HDFCBANK.NS"),
    ("ICICI Bank", "532174", "ICICIBANK.NS"),
    ("SBI", "500112", "SBIN.NS"),
    ("Axis Bank", "532215", "AXISBANK.NS"),
    ("Bharti Airtel", "532454", "BHARTIARTL.NS"),
    ("TCS", "532540", "TCS.NS"),
    ("HCL Tech", "532281", "HCLTECH.NS"),
    ("L&T", "500510", "LT.NS"),
    ("ITC", "500875", "ITC.NS"),
    ("Bajaj Finance", "500034", "BAJFINANCE.NS"),
    ("Hind Unilever", "500696", "HINDUNILVR.NS"),
];

impl Default for StockCatalog {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            listings: DEFAULT_LISTINGS
                .iter()
                .map(|(name, code, ticker)| StockListing {
                    name: name.to_string(),
                    exchange_code: code.to_string(),
                    ticker: ticker.to_string(),
                })
                .collect(),
        }
    }
}

impl StockCatalog {
    /// Built-in catalog, or the JSON file at `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, AnalysisError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidData(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AnalysisError> {
        let catalog: StockCatalog = serde_json::from_str(raw)
            .map_err(|e| AnalysisError::InvalidData(format!("invalid catalog: {}", e)))?;

        if catalog.tickers.is_empty() {
            return Err(AnalysisError::InvalidData(
                "catalog must list at least one ticker".to_string(),
            ));
        }
        Ok(catalog)
    }

    /// Case-insensitive lookup by company name.
    pub fn find_by_name(&self, name: &str) -> Result<&StockListing, AnalysisError> {
        let wanted = name.trim();
        self.listings
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AnalysisError::UnknownTicker(
                    "Stock name not found. Please check the name and try again.".to_string(),
                )
            })
    }

    pub fn has_ticker(&self, ticker: &str) -> bool {
        self.tickers.iter().any(|t| t.eq_ignore_ascii_case(ticker))
    }
}
