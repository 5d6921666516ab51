//! Quote client configuration
//!
//! Built once at startup (from the environment or explicitly) and passed to
//! [`QuoteClient::new`](crate::QuoteClient::new).

use crate::error::QuoteError;
use crate::QuoteResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rate type requested when the caller does not override it.
pub const DEFAULT_RATE_TYPE: &str = "FIXED";

/// Per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "REMIT_ETA_BASE_URL";
pub const ENV_CLIENT_ID: &str = "REMIT_ETA_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "REMIT_ETA_CLIENT_SECRET";
pub const ENV_TIMEOUT_SECS: &str = "REMIT_ETA_TIMEOUT_SECS";

/// Which deployment of the quote service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeEnvironment {
    #[default]
    Sandbox,
    Live,
}

impl ProbeEnvironment {
    pub fn base_url(&self) -> &'static str {
        match self {
            ProbeEnvironment::Sandbox => "https://api.sandbox.transferwise.tech",
            ProbeEnvironment::Live => "https://api.transferwise.com",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProbeEnvironment::Sandbox => "sandbox",
            ProbeEnvironment::Live => "live",
        }
    }
}

impl FromStr for ProbeEnvironment {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(ProbeEnvironment::Sandbox),
            "live" | "production" => Ok(ProbeEnvironment::Live),
            other => Err(QuoteError::Config(format!("unknown environment '{}'", other))),
        }
    }
}

impl fmt::Display for ProbeEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Quote service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Service root, without trailing slash
    pub base_url: String,
    /// HTTP Basic user
    pub client_id: String,
    /// HTTP Basic password
    #[serde(skip_serializing)]
    pub client_secret: String,
    /// `rateType` sent with every quote request
    pub rate_type: String,
    /// Per-call timeout
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl fmt::Debug for QuoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("rate_type", &self.rate_type)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            base_url: std::env::var(ENV_BASE_URL)
                .unwrap_or_else(|_| ProbeEnvironment::default().base_url().to_string()),
            client_id: std::env::var(ENV_CLIENT_ID).unwrap_or_default(),
            client_secret: std::env::var(ENV_CLIENT_SECRET).unwrap_or_default(),
            rate_type: DEFAULT_RATE_TYPE.to_string(),
            timeout_secs: std::env::var(ENV_TIMEOUT_SECS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("remit-eta/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl QuoteConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific service root
    pub fn new(base_url: &str) -> Self {
        QuoteConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            rate_type: DEFAULT_RATE_TYPE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("remit-eta/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Create config for one of the known deployments
    pub fn for_environment(env: ProbeEnvironment) -> Self {
        Self::new(env.base_url())
    }

    /// Set HTTP Basic credentials
    pub fn with_credentials(mut self, client_id: &str, client_secret: &str) -> Self {
        self.client_id = client_id.to_string();
        self.client_secret = client_secret.to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_rate_type(mut self, rate_type: &str) -> Self {
        self.rate_type = rate_type.to_string();
        self
    }

    /// Reject configs that cannot possibly authenticate.
    pub fn validate(&self) -> QuoteResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(QuoteError::Config(format!(
                "base URL must be http(s): '{}'",
                self.base_url
            )));
        }
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(QuoteError::Config(format!(
                "client id and secret are required (set {} and {})",
                ENV_CLIENT_ID, ENV_CLIENT_SECRET
            )));
        }
        if self.timeout_secs == 0 {
            return Err(QuoteError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = QuoteConfig::new("http://localhost:8080/");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.url("/v3/quotes"), "http://localhost:8080/v3/quotes");
        assert_eq!(config.rate_type, "FIXED");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = QuoteConfig::new("https://example.test");
        assert!(matches!(config.validate(), Err(QuoteError::Config(_))));

        let config = config.with_credentials("id", "secret");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = QuoteConfig::new("ftp://example.test").with_credentials("id", "secret");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = QuoteConfig::new("https://example.test")
            .with_credentials("id", "secret")
            .with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = QuoteConfig::new("https://example.test").with_credentials("id", "hunter2");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            "sandbox".parse::<ProbeEnvironment>().unwrap(),
            ProbeEnvironment::Sandbox
        );
        assert_eq!("LIVE".parse::<ProbeEnvironment>().unwrap(), ProbeEnvironment::Live);
        assert!("staging".parse::<ProbeEnvironment>().is_err());
        assert_eq!(
            QuoteConfig::for_environment(ProbeEnvironment::Live).base_url,
            ProbeEnvironment::Live.base_url()
        );
    }
}
