use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use analysis_core::{
    AnalysisError, Bar, FetchFailure, FinancialStatement, Headline, MarketDataProvider,
    ModelFailure, NewsProvider, PriceSeries, QuoteSnapshot, SeriesWindow, Signal, StatementKind,
    StatementPeriod, StockCatalog, StockListing,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use llm_client::{ChatMessage, LanguageModel, LlmError, LlmResult};

use super::*;

fn series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 15, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + Duration::minutes(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        })
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

struct FakeMarket {
    closes: Vec<f64>,
    statements: bool,
}

#[async_trait]
impl MarketDataProvider for FakeMarket {
    async fn price_series(
        &self,
        symbol: &str,
        _window: &SeriesWindow,
    ) -> Result<PriceSeries, AnalysisError> {
        if symbol == "MISSING" {
            return Err(AnalysisError::data_unavailable(
                FetchFailure::NotFound,
                "no such ticker",
            ));
        }
        Ok(series(symbol, &self.closes))
    }

    async fn financial_statement(
        &self,
        symbol: &str,
        kind: StatementKind,
    ) -> Result<FinancialStatement, AnalysisError> {
        if !self.statements {
            return Err(AnalysisError::data_unavailable(FetchFailure::Timeout, "slow"));
        }

        let period = |year: i32, revenue: f64, income: f64| StatementPeriod {
            end_date: NaiveDate::from_ymd_opt(year, 3, 31).unwrap(),
            line_items: BTreeMap::from([
                ("totalRevenue".to_string(), revenue),
                ("netIncome".to_string(), income),
            ]),
        };

        Ok(FinancialStatement {
            symbol: symbol.to_string(),
            kind,
            periods: vec![period(2024, 1200.0, 240.0), period(2023, 1000.0, 150.0)],
        })
    }

    async fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, AnalysisError> {
        if symbol == "BROKEN" {
            return Err(AnalysisError::data_unavailable(
                FetchFailure::Http(500),
                "quote service down",
            ));
        }
        Ok(QuoteSnapshot {
            symbol: symbol.to_string(),
            price: self.closes.last().copied(),
            pe_ratio: Some(24.5),
            market_cap: Some(1.5e12),
        })
    }
}

struct FakeNews;

#[async_trait]
impl NewsProvider for FakeNews {
    async fn headlines(&self, symbol: &str) -> Result<Vec<Headline>, AnalysisError> {
        Ok(vec![Headline {
            title: format!("{} rallies", symbol),
            link: "https://news.example/search".to_string(),
        }])
    }
}

#[derive(Default)]
struct FakeModel {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::RateLimited);
        }
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(format!("echo: {}", last))
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

fn orchestrator(closes: Vec<f64>, statements: bool, fail_model: bool) -> AnalysisOrchestrator {
    AnalysisOrchestrator::new(
        Arc::new(FakeMarket { closes, statements }),
        Arc::new(FakeNews),
        Arc::new(FakeModel {
            fail: fail_model,
            ..FakeModel::default()
        }),
    )
}

fn rising(n: usize) -> Vec<f64> {
    (0..n).map(|i| 100.0 + i as f64).collect()
}

#[tokio::test]
async fn test_sma_buy_produces_plan() {
    let orch = orchestrator(rising(30), true, false);
    let report = orch.analyze_strategy("INFY.NS", "SMA").await.unwrap();

    assert_eq!(report.result.signal, Signal::Buy);
    assert!(report.suitable);
    assert_eq!(report.message, "The stock INFY.NS is suitable for the SMA strategy.");
    let plan = report.plan.unwrap();
    assert_eq!(plan.entry_price, 129.0);
    assert!((plan.target_price - 129.0 * 1.01).abs() < 1e-9);
    assert!(report.fundamentals.is_none());
}

#[tokio::test]
async fn test_rsi_overbought_is_not_suitable() {
    let orch = orchestrator(rising(30), true, false);
    let report = orch.analyze_strategy("INFY.NS", "rsi").await.unwrap();

    assert_eq!(report.result.signal, Signal::Sell);
    assert!(!report.suitable);
    assert!(report.plan.is_none());
    assert_eq!(report.message, "The stock INFY.NS is not suitable for the RSI strategy.");
}

#[tokio::test]
async fn test_golden_cross_attaches_fundamentals() {
    let orch = orchestrator(rising(250), true, false);
    let report = orch.analyze_strategy("TCS.NS", "Golden Cross").await.unwrap();

    assert_eq!(report.ratio, 2.0);
    let fundamentals = report.fundamentals.unwrap();
    assert!((fundamentals.revenue_growth.unwrap() - 0.2).abs() < 1e-12);
    assert!((fundamentals.profit_margin.unwrap() - 0.2).abs() < 1e-12);
}

#[tokio::test]
async fn test_golden_cross_survives_fundamentals_failure() {
    let orch = orchestrator(rising(250), false, false);
    let report = orch.analyze_strategy("TCS.NS", "Golden Cross").await.unwrap();

    assert!(report.fundamentals.is_none());
    assert!(report.suitable);
}

#[tokio::test]
async fn test_short_series_is_insufficient() {
    let orch = orchestrator(rising(120), true, false);
    let err = orch.analyze_strategy("TCS.NS", "Golden Cross").await.unwrap_err();
    assert!(matches!(err, AnalysisError::InsufficientData(_)));
}

#[tokio::test]
async fn test_unknown_indicator_and_ticker() {
    let orch = orchestrator(rising(30), true, false);

    let err = orch.analyze_strategy("INFY.NS", "Bollinger").await.unwrap_err();
    assert!(matches!(err, AnalysisError::UnknownIndicator(_)));

    let err = orch.analyze_strategy("MISSING", "SMA").await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::DataUnavailable { kind: FetchFailure::NotFound, .. }
    ));
}

#[tokio::test]
async fn test_advise_known_name() {
    let orch = orchestrator(rising(60), true, false);
    let report = orch.advise("wipro").await.unwrap();

    assert_eq!(report.name, "Wipro");
    assert_eq!(report.exchange_code, "507685");
    assert_eq!(report.pe_ratio, Some(24.5));
    assert_eq!(report.moving_average_50, Some(134.5));
    assert_eq!(
        report.description.as_deref(),
        Some("echo: Write a concise and informative description of the stock named Wipro.")
    );
    assert!(report.description_error.is_none());
}

#[tokio::test]
async fn test_advise_surfaces_model_failure() {
    let orch = orchestrator(rising(10), true, true);
    let report = orch.advise("Infosys").await.unwrap();

    assert!(report.description.is_none());
    assert_eq!(
        report.description_error.as_deref(),
        Some("Language model rate limit exceeded")
    );
    assert_eq!(report.moving_average_50, None);
}

#[tokio::test]
async fn test_advise_quote_failure_skips_description() {
    let model = Arc::new(FakeModel::default());
    let catalog = StockCatalog {
        tickers: vec!["BROKEN".to_string()],
        listings: vec![StockListing {
            name: "Broken Co".to_string(),
            exchange_code: "999999".to_string(),
            ticker: "BROKEN".to_string(),
        }],
    };
    let orch = AnalysisOrchestrator::new(
        Arc::new(FakeMarket {
            closes: rising(60),
            statements: true,
        }),
        Arc::new(FakeNews),
        model.clone(),
    )
    .with_catalog(catalog);

    let err = orch.advise("Broken Co").await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::DataUnavailable { kind: FetchFailure::Http(500), .. }
    ));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_advise_unknown_name() {
    let orch = orchestrator(rising(10), true, false);
    let err = orch.advise("Initech").await.unwrap_err();

    match err {
        AnalysisError::UnknownTicker(msg) => {
            assert_eq!(msg, "Stock name not found. Please check the name and try again.")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_chat() {
    let orch = orchestrator(rising(10), true, false);
    assert_eq!(orch.chat("  hello ").await.unwrap(), "echo: hello");
    assert!(matches!(
        orch.chat("   ").await,
        Err(AnalysisError::InvalidData(_))
    ));

    let failing = orchestrator(rising(10), true, true);
    assert!(matches!(
        failing.chat("hello").await,
        Err(AnalysisError::LanguageModel { kind: ModelFailure::RateLimited, .. })
    ));
}

#[tokio::test]
async fn test_news_and_statement_pass_through() {
    let orch = orchestrator(rising(10), true, false);

    let news = orch.news("SBIN.NS").await.unwrap();
    assert_eq!(news[0].title, "SBIN.NS rallies");

    let statement = orch
        .financial_statement("SBIN.NS", StatementKind::BalanceSheet)
        .await
        .unwrap();
    assert_eq!(statement.kind, StatementKind::BalanceSheet);
}
