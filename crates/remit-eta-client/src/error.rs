//! Error types for remit-eta-client

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to the quote service
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Client configuration is unusable (missing credentials, bad URL)
    #[error("Quote client misconfigured: {0}")]
    Config(String),

    /// Network-level failure before a response arrived
    #[error("Transport error: {0}")]
    Transport(String),

    /// No response within the configured timeout
    #[error("Request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    /// Credentials were rejected
    #[error("Credentials rejected (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Non-2xx response
    #[error("Quote service returned HTTP {status}")]
    Status { status: u16, body: Option<Value> },

    /// 2xx response whose body is not a JSON object
    #[error("Malformed response body: {message}")]
    MalformedBody { message: String, body: String },
}

impl QuoteError {
    /// Response payload captured with the failure, if any.
    pub fn payload(&self) -> Option<Value> {
        match self {
            QuoteError::Status { body, .. } => body.clone(),
            QuoteError::MalformedBody { body, .. } if !body.is_empty() => {
                Some(Value::String(body.clone()))
            }
            _ => None,
        }
    }

    /// Build a status error, keeping the body as JSON when it parses.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = if body.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(body)
                    .unwrap_or_else(|_| Value::String(body.to_string())),
            )
        };
        QuoteError::Status { status, body }
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        QuoteError::Transport(err.to_string())
    }
}
