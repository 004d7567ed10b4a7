use std::sync::Arc;

use analysis_core::{
    AnalysisError, FinancialStatement, Headline, MarketDataProvider, ModelFailure, NewsProvider,
    SeriesWindow, StatementKind, StockCatalog,
};
use chrono::{DateTime, Utc};
use llm_client::{prompt_messages, LanguageModel, LlmError};
use serde::Serialize;
use technical_analysis::{Indicator, IndicatorResult, RiskPolicyTable, TradePlan};

pub mod advisor;
pub mod fundamentals;

#[cfg(test)]
mod orchestrator_tests;

pub use advisor::{trailing_average, AdvisorReport, ADVISOR_HISTORY_PERIOD, MOVING_AVERAGE_DAYS};
pub use fundamentals::FundamentalSnapshot;

/// Outcome of the "Analyze Strategy" action.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub symbol: String,
    pub indicator: Indicator,
    pub result: IndicatorResult,
    pub ratio: f64,
    pub plan: Option<TradePlan>,
    pub suitable: bool,
    pub message: String,
    /// Only filled for the Golden Cross
    pub fundamentals: Option<FundamentalSnapshot>,
    pub generated_at: DateTime<Utc>,
}

fn language_model_error(e: LlmError) -> AnalysisError {
    let kind = match &e {
        LlmError::MissingApiKey => ModelFailure::MissingApiKey,
        LlmError::InvalidApiKey => ModelFailure::InvalidApiKey,
        LlmError::RateLimited => ModelFailure::RateLimited,
        LlmError::Timeout => ModelFailure::Timeout,
        LlmError::RequestFailed(_) | LlmError::ServiceUnavailable { .. } => ModelFailure::Unavailable,
        LlmError::InvalidResponse(_) => ModelFailure::InvalidResponse,
    };
    AnalysisError::language_model(kind, e.to_string())
}

/// Wires the data, news and language-model collaborators to the indicator
/// evaluator and the risk table.
pub struct AnalysisOrchestrator {
    market_data: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    language_model: Arc<dyn LanguageModel>,
    risk_table: RiskPolicyTable,
    catalog: StockCatalog,
    analysis_window: SeriesWindow,
}

impl AnalysisOrchestrator {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
        language_model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            market_data,
            news,
            language_model,
            risk_table: RiskPolicyTable::default(),
            catalog: StockCatalog::default(),
            analysis_window: SeriesWindow::default(),
        }
    }

    pub fn with_catalog(mut self, catalog: StockCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_risk_table(mut self, risk_table: RiskPolicyTable) -> Self {
        self.risk_table = risk_table;
        self
    }

    /// Period/interval used by `analyze_strategy`
    pub fn with_analysis_window(mut self, window: SeriesWindow) -> Self {
        self.analysis_window = window;
        self
    }

    pub fn catalog(&self) -> &StockCatalog {
        &self.catalog
    }

    pub fn risk_table(&self) -> &RiskPolicyTable {
        &self.risk_table
    }

    pub fn analysis_window(&self) -> &SeriesWindow {
        &self.analysis_window
    }

    /// Evaluate one indicator on the latest bars and size a trade from it.
    pub async fn analyze_strategy(
        &self,
        symbol: &str,
        indicator_name: &str,
    ) -> Result<StrategyReport, AnalysisError> {
        let indicator: Indicator = indicator_name.parse()?;
        let ratio = self.risk_table.ratio_for(indicator)?;

        tracing::info!(
            "Analyzing {} with {} over {}/{}",
            symbol,
            indicator,
            self.analysis_window.period,
            self.analysis_window.interval
        );

        let series = self
            .market_data
            .price_series(symbol, &self.analysis_window)
            .await?;
        let result = indicator.evaluate(&series)?;

        let fundamentals = if indicator == Indicator::GoldenCross {
            match self.fundamentals(symbol).await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    tracing::warn!("Fundamentals for {} unavailable: {}", symbol, e);
                    None
                }
            }
        } else {
            None
        };

        let plan = TradePlan::derive(result.signal, result.reference_price, ratio);
        let suitable = plan.is_some();
        let message = if suitable {
            format!("The stock {} is suitable for the {} strategy.", symbol, indicator)
        } else {
            format!("The stock {} is not suitable for the {} strategy.", symbol, indicator)
        };

        tracing::info!("{} -> {} signal {}", symbol, indicator, result.signal.to_label());

        Ok(StrategyReport {
            symbol: symbol.to_string(),
            indicator,
            result,
            ratio,
            plan,
            suitable,
            message,
            fundamentals,
            generated_at: Utc::now(),
        })
    }

    pub async fn financial_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<FinancialStatement, AnalysisError> {
        tracing::debug!("Fetching {} for {}", kind, symbol);
        self.market_data.financial_statement(symbol, kind).await
    }

    pub async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, AnalysisError> {
        let statement = self
            .market_data
            .financial_statement(symbol, StatementKind::ProfitAndLoss)
            .await?;
        Ok(FundamentalSnapshot::from_income_statement(&statement))
    }

    pub async fn news(&self, symbol: &str) -> Result<Vec<Headline>, AnalysisError> {
        self.news.headlines(symbol).await
    }

    /// Quote figures, 50-day average and an AI description for a company name.
    pub async fn advise(&self, stock_name: &str) -> Result<AdvisorReport, AnalysisError> {
        let listing = self.catalog.find_by_name(stock_name)?;
        let history_window = SeriesWindow::daily(ADVISOR_HISTORY_PERIOD);

        let (quote, history) = tokio::join!(
            self.market_data.quote(&listing.ticker),
            self.market_data.price_series(&listing.ticker, &history_window),
        );

        // the description is requested only after the quote succeeds
        let quote = quote?;
        let moving_average_50 = match history {
            Ok(series) => trailing_average(&series.closes(), MOVING_AVERAGE_DAYS),
            Err(e) => {
                tracing::warn!("Daily history for {} unavailable: {}", listing.ticker, e);
                None
            }
        };

        let description = self.language_model.describe_stock(&listing.name).await;
        let (description, description_error) = match description {
            Ok(text) => (Some(text), None),
            Err(e) => {
                tracing::warn!("Description for {} failed: {}", listing.name, e);
                (None, Some(e.to_string()))
            }
        };

        Ok(AdvisorReport {
            name: listing.name.clone(),
            exchange_code: listing.exchange_code.clone(),
            ticker: listing.ticker.clone(),
            pe_ratio: quote.pe_ratio,
            market_cap: quote.market_cap,
            moving_average_50,
            description,
            description_error,
        })
    }

    pub async fn chat(&self, prompt: &str) -> Result<String, AnalysisError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AnalysisError::InvalidData("prompt must not be empty".to_string()));
        }

        tracing::debug!("Chat prompt via {}", self.language_model.model_name());
        self.language_model
            .complete(&prompt_messages(prompt))
            .await
            .map_err(language_model_error)
    }
}
