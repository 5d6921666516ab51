//! HTTP quote client
//!
//! Thin wrapper over `reqwest` that speaks the quote service's two endpoints:
//! `POST /v3/quotes` and the credential probe `GET /v1/rates`.

use crate::config::QuoteConfig;
use crate::error::QuoteError;
use crate::request::QuoteRequest;
use crate::QuoteResult;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const QUOTES_PATH: &str = "/v3/quotes";
pub const RATES_PATH: &str = "/v1/rates";

/// Quote service client
pub struct QuoteClient {
    config: QuoteConfig,
    http_client: reqwest::Client,
}

impl QuoteClient {
    /// Create a new quote client
    pub fn new(config: QuoteConfig) -> QuoteResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| QuoteError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(QuoteClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> QuoteResult<Self> {
        Self::new(QuoteConfig::from_env())
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Request one quote. Any 2xx JSON object is returned untouched.
    pub async fn fetch_quote(&self, request: &QuoteRequest) -> QuoteResult<Value> {
        let url = self.config.url(QUOTES_PATH);
        debug!(
            url = %url,
            pair = %request.pair_key(),
            amount = request.source_amount,
            "Requesting quote"
        );

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), pair = %request.pair_key(), "Quote request rejected");
            return Err(QuoteError::from_status(status.as_u16(), &body));
        }

        parse_object(&body)
    }

    /// Probe the rates endpoint with the configured credentials.
    pub async fn validate_credentials(&self) -> QuoteResult<()> {
        self.config.validate()?;

        let url = self.config.url(RATES_PATH);
        let response = self
            .http_client
            .get(&url)
            .query(&[("source", "GBP"), ("target", "EUR")])
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(QuoteError::Unauthorized {
                    status: status.as_u16(),
                })
            }
            s if s.is_success() => {
                info!(base_url = %self.config.base_url, "Credentials accepted");
                Ok(())
            }
            s => {
                let body = response.text().await.unwrap_or_default();
                Err(QuoteError::from_status(s.as_u16(), &body))
            }
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> QuoteError {
        if err.is_timeout() {
            QuoteError::Timeout {
                secs: self.config.timeout_secs,
            }
        } else {
            QuoteError::from(err)
        }
    }
}

/// Parse a 2xx body; anything but a JSON object is malformed.
fn parse_object(body: &str) -> QuoteResult<Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(other) => Err(QuoteError::MalformedBody {
            message: format!("expected a JSON object, got {}", json_kind(&other)),
            body: body.to_string(),
        }),
        Err(e) => Err(QuoteError::MalformedBody {
            message: e.to_string(),
            body: body.to_string(),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
