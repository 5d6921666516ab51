//! The seam between the runner and the quote service.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::QuoteClient;
use crate::request::QuoteRequest;
use crate::QuoteResult;

/// Anything that can answer quote requests.
///
/// [`QuoteClient`] is the production implementation;
/// [`ScriptedQuoteSource`](crate::fakes::ScriptedQuoteSource) backs tests.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fails with `Unauthorized`/`Config` when a run must not start.
    async fn validate_credentials(&self) -> QuoteResult<()>;

    /// Returns the raw JSON object for one quote.
    async fn fetch_quote(&self, request: &QuoteRequest) -> QuoteResult<Value>;
}

#[async_trait]
impl QuoteSource for QuoteClient {
    async fn validate_credentials(&self) -> QuoteResult<()> {
        QuoteClient::validate_credentials(self).await
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> QuoteResult<Value> {
        QuoteClient::fetch_quote(self, request).await
    }
}
