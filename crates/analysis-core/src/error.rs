use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("Data unavailable ({kind}): {message}")]
    DataUnavailable { kind: FetchFailure, message: String },

    #[error("Language model error ({kind}): {message}")]
    LanguageModel { kind: ModelFailure, message: String },
}

impl AnalysisError {
    pub fn data_unavailable(kind: FetchFailure, message: impl Into<String>) -> Self {
        AnalysisError::DataUnavailable {
            kind,
            message: message.into(),
        }
    }

    pub fn language_model(kind: ModelFailure, message: impl Into<String>) -> Self {
        AnalysisError::LanguageModel {
            kind,
            message: message.into(),
        }
    }
}

/// Why the language model could not answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFailure {
    MissingApiKey,
    InvalidApiKey,
    RateLimited,
    Timeout,
    Unavailable,
    InvalidResponse,
}

impl fmt::Display for ModelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFailure::MissingApiKey => write!(f, "missing API key"),
            ModelFailure::InvalidApiKey => write!(f, "invalid API key"),
            ModelFailure::RateLimited => write!(f, "rate limited"),
            ModelFailure::Timeout => write!(f, "timeout"),
            ModelFailure::Unavailable => write!(f, "service unavailable"),
            ModelFailure::InvalidResponse => write!(f, "invalid response"),
        }
    }
}

/// Why an upstream data provider could not deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum FetchFailure {
    Timeout,
    Connection,
    Http(u16),
    NotFound,
    Empty,
    Malformed,
    Other,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Timeout => write!(f, "timeout"),
            FetchFailure::Connection => write!(f, "connection error"),
            FetchFailure::Http(status) => write!(f, "HTTP {}", status),
            FetchFailure::NotFound => write!(f, "not found"),
            FetchFailure::Empty => write!(f, "empty result"),
            FetchFailure::Malformed => write!(f, "malformed response"),
            FetchFailure::Other => write!(f, "request error"),
        }
    }
}

#[cfg(feature = "http")]
impl From<&reqwest::Error> for FetchFailure {
    fn from(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchFailure::Timeout
        } else if e.is_connect() {
            FetchFailure::Connection
        } else if let Some(status) = e.status() {
            FetchFailure::Http(status.as_u16())
        } else if e.is_decode() {
            FetchFailure::Malformed
        } else {
            FetchFailure::Other
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        AnalysisError::data_unavailable(FetchFailure::from(&e), e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_unavailable_message_names_kind() {
        let err = AnalysisError::data_unavailable(FetchFailure::Http(503), "upstream down");
        assert_eq!(err.to_string(), "Data unavailable (HTTP 503): upstream down");
    }

    #[test]
    fn test_language_model_message_names_kind() {
        let err = AnalysisError::language_model(ModelFailure::MissingApiKey, "no key");
        assert_eq!(err.to_string(), "Language model error (missing API key): no key");
        assert_eq!(
            serde_json::to_value(ModelFailure::RateLimited).unwrap(),
            serde_json::json!("rate_limited")
        );
    }

    #[test]
    fn test_fetch_failure_serializes_with_status() {
        let json = serde_json::to_value(FetchFailure::Http(404)).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "http", "status": 404 }));

        let json = serde_json::to_value(FetchFailure::Timeout).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "timeout" }));
    }
}
