//! In-memory quote source (testing only)
//!
//! `ScriptedQuoteSource` answers each request through a caller-supplied
//! closure and records what it was asked, so runner tests need no network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::QuoteError;
use crate::request::QuoteRequest;
use crate::source::QuoteSource;
use crate::QuoteResult;

type Responder = Box<dyn Fn(&QuoteRequest) -> QuoteResult<Value> + Send + Sync>;

pub struct ScriptedQuoteSource {
    responder: Responder,
    credentials_valid: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<QuoteRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedQuoteSource {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&QuoteRequest) -> QuoteResult<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            credentials_valid: true,
            delay: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every request gets the same body.
    pub fn fixed(response: Value) -> Self {
        Self::new(move |_| Ok(response.clone()))
    }

    /// `validate_credentials` fails with `Unauthorized`.
    pub fn with_invalid_credentials(mut self) -> Self {
        self.credentials_valid = false;
        self
    }

    /// Sleep before answering each quote.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<QuoteRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of concurrently outstanding `fetch_quote` calls seen.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSource for ScriptedQuoteSource {
    async fn validate_credentials(&self) -> QuoteResult<()> {
        if self.credentials_valid {
            Ok(())
        } else {
            Err(QuoteError::Unauthorized { status: 401 })
        }
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> QuoteResult<Value> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = (self.responder)(request);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
