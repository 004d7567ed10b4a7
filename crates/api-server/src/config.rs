use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub bind_addr: String,

    // Language model
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub llm_timeout_secs: u64,

    // Market data and news
    pub http_timeout_secs: u64,
    pub analysis_period: String,
    pub analysis_interval: String,
    pub news_search_url: String,

    /// JSON catalog replacing the built-in ticker list
    pub stock_catalog_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            openai_api_key: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            llm_timeout_secs: 60,
            http_timeout_secs: 30,
            analysis_period: "5d".to_string(),
            analysis_interval: "1m".to_string(),
            news_search_url: news_scraper::DEFAULT_SEARCH_URL.to_string(),
            stock_catalog_path: None,
        }
    }
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let config = Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            openai_model: env::var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: env::var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.llm_timeout_secs.to_string())
                .parse()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.http_timeout_secs.to_string())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            analysis_period: env::var("ANALYSIS_PERIOD").unwrap_or(defaults.analysis_period),
            analysis_interval: env::var("ANALYSIS_INTERVAL").unwrap_or(defaults.analysis_interval),
            news_search_url: env::var("NEWS_SEARCH_URL").unwrap_or(defaults.news_search_url),
            stock_catalog_path: non_empty("STOCK_CATALOG_PATH").map(PathBuf::from),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<SocketAddr>()
            .with_context(|| format!("BIND_ADDR is not a socket address: {}", self.bind_addr))?;

        if self.llm_timeout_secs == 0 || self.http_timeout_secs == 0 {
            bail!("timeouts must be greater than zero");
        }
        if self.analysis_period.trim().is_empty() || self.analysis_interval.trim().is_empty() {
            bail!("ANALYSIS_PERIOD and ANALYSIS_INTERVAL must not be empty");
        }
        if self.openai_model.trim().is_empty() {
            bail!("OPENAI_MODEL must not be empty");
        }

        Ok(())
    }
}
