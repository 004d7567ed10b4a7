use async_trait::async_trait;
use crate::{AnalysisError, FinancialStatement, PriceSeries, QuoteSnapshot, SeriesWindow, StatementKind};

/// Source of price history, statements and quotes for a ticker
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn price_series(&self, symbol: &str, window: &SeriesWindow) -> Result<PriceSeries, AnalysisError>;

    async fn financial_statement(&self, symbol: &str, kind: StatementKind) -> Result<FinancialStatement, AnalysisError>;

    async fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, AnalysisError>;
}

/// Headline search for a ticker
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn headlines(&self, symbol: &str) -> Result<Vec<crate::Headline>, AnalysisError>;
}
