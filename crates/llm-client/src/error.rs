use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No API key configured for the language model")]
    MissingApiKey,

    #[error("Language model rejected the API key")]
    InvalidApiKey,

    #[error("Language model rate limit exceeded")]
    RateLimited,

    #[error("Language model request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    RequestFailed(reqwest::Error),

    #[error("Service unavailable: status {status}: {body}")]
    ServiceUnavailable { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::RequestFailed(e)
        }
    }
}

pub type LlmResult<T> = Result<T, LlmError>;
