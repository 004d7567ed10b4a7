use std::time::Duration;

use analysis_core::{
    AnalysisError, FetchFailure, FinancialStatement, MarketDataProvider, PriceSeries,
    QuoteSnapshot, SeriesWindow, StatementKind,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

pub mod chart;
pub mod summary;

pub use chart::parse_chart;
pub use summary::{parse_quote, parse_statement};

const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const QUOTE_URL: &str = "https://query2.finance.yahoo.com/v7/finance/quote";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Clone)]
pub struct YahooFinanceClient {
    client: Client,
}

impl YahooFinanceClient {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// GET `url` and decode the JSON body, classifying every failure.
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, AnalysisError> {
        tracing::debug!("Yahoo request: {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(AnalysisError::data_unavailable(
                FetchFailure::NotFound,
                format!("{} returned 404", url),
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Yahoo returned HTTP {} for {}", status, url);
            return Err(AnalysisError::data_unavailable(
                FetchFailure::Http(status.as_u16()),
                body.chars().take(200).collect::<String>(),
            ));
        }

        response.json().await.map_err(|e| {
            AnalysisError::data_unavailable(FetchFailure::Malformed, e.to_string())
        })
    }

    /// Get historical price data for a period such as `5d` at an interval such as `1m`
    pub async fn get_price_series(
        &self,
        symbol: &str,
        window: &SeriesWindow,
    ) -> Result<PriceSeries, AnalysisError> {
        let url = format!("{}/{}", CHART_URL, symbol);
        let json = self
            .get_json(
                &url,
                &[
                    ("range", window.period.as_str()),
                    ("interval", window.interval.as_str()),
                    ("includePrePost", "false"),
                ],
            )
            .await?;

        let series = parse_chart(symbol, &json)?;
        tracing::info!(
            "Fetched {} bars for {} ({} @ {})",
            series.len(),
            symbol,
            window.period,
            window.interval
        );
        Ok(series)
    }

    /// Get annual balance sheet, income or cash flow history
    pub async fn get_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<FinancialStatement, AnalysisError> {
        let url = format!("{}/{}", SUMMARY_URL, symbol);
        let json = self
            .get_json(&url, &[("modules", summary::module_name(kind))])
            .await?;

        parse_statement(symbol, kind, &json)
    }

    /// Get quote data for a symbol
    pub async fn get_quote(&self, symbol: &str) -> Result<QuoteSnapshot, AnalysisError> {
        let json = self.get_json(QUOTE_URL, &[("symbols", symbol)]).await?;
        parse_quote(symbol, &json)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn price_series(
        &self,
        symbol: &str,
        window: &SeriesWindow,
    ) -> Result<PriceSeries, AnalysisError> {
        self.get_price_series(symbol, window).await
    }

    async fn financial_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<FinancialStatement, AnalysisError> {
        self.get_statement(symbol, kind).await
    }

    async fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, AnalysisError> {
        self.get_quote(symbol).await
    }
}
