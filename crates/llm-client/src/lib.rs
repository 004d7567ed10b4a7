pub mod chat;
pub mod error;

pub use chat::{describe_stock_prompt, prompt_messages, ChatMessage};
pub use error::{LlmError, LlmResult};

use async_trait::async_trait;
use std::time::Duration;

use chat::{ChatCompletionRequest, ChatCompletionResponse};

/// Configuration for an OpenAI-compatible chat endpoint
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: None,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Backend-agnostic text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String>;

    fn model_name(&self) -> &str;

    async fn describe_stock(&self, stock_name: &str) -> LlmResult<String> {
        let prompt = describe_stock_prompt(stock_name);
        self.complete(&prompt_messages(&prompt)).await
    }
}

#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client, config }
    }

    pub fn has_api_key(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> LlmResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        tracing::debug!("Sending {} messages to {}", messages.len(), url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Language model returned HTTP {}", status);
            return Err(match status.as_u16() {
                401 | 403 => LlmError::InvalidApiKey,
                429 => LlmError::RateLimited,
                code => LlmError::ServiceUnavailable {
                    status: code,
                    body: response.text().await.unwrap_or_default(),
                },
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        completion.into_content()
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let client = LlmClient::new(LlmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..LlmConfig::default()
        });

        assert!(!client.has_api_key());
        let result = client.describe_stock("Wipro").await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[test]
    fn test_default_model() {
        let client = LlmClient::new(LlmConfig::default());
        assert_eq!(client.model_name(), "gpt-3.5-turbo");
    }
}
