use std::time::Duration;

use analysis_core::{AnalysisError, FetchFailure, Headline, NewsProvider};
use async_trait::async_trait;
use reqwest::{Client, Url};

pub mod headlines;

pub use headlines::{extract_headlines, filter_headlines, BLOCKED_HEADLINES};

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Scrapes headline text from a web search for `<ticker> stock news`.
#[derive(Clone)]
pub struct NewsScraper {
    http_client: Client,
    search_url: String,
}

impl NewsScraper {
    pub fn new(search_url: impl Into<String>, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http_client,
            search_url: search_url.into(),
        }
    }

    /// Search page URL for a ticker; every headline links back to it.
    pub fn search_url_for(&self, symbol: &str) -> Result<Url, AnalysisError> {
        let query = format!("{} stock news", symbol);
        Url::parse_with_params(
            &self.search_url,
            &[
                ("q", query.as_str()),
                ("oq", query.as_str()),
                ("sourceid", "chrome"),
                ("ie", "UTF-8"),
            ],
        )
        .map_err(|e| AnalysisError::InvalidData(format!("bad search url: {}", e)))
    }

    pub async fn fetch_headlines(&self, symbol: &str) -> Result<Vec<Headline>, AnalysisError> {
        let url = self.search_url_for(symbol)?;

        let response = self.http_client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!("News search for {} failed: {}", symbol, e);
            AnalysisError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("News search for {} returned HTTP {}", symbol, status);
            return Err(AnalysisError::data_unavailable(
                FetchFailure::Http(status.as_u16()),
                format!("news search returned {}", status),
            ));
        }

        let html = response.text().await?;
        let titles = extract_headlines(&html);
        tracing::info!("Found {} headlines for {}", titles.len(), symbol);

        let link = url.to_string();
        Ok(titles
            .into_iter()
            .map(|title| Headline {
                title,
                link: link.clone(),
            })
            .collect())
    }
}

impl Default for NewsScraper {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_URL, Duration::from_secs(15))
    }
}

#[async_trait]
impl NewsProvider for NewsScraper {
    async fn headlines(&self, symbol: &str) -> Result<Vec<Headline>, AnalysisError> {
        self.fetch_headlines(symbol).await
    }
}
