//! remit-eta quote client
//!
//! - `QuoteConfig` / `ProbeEnvironment`: where and how to authenticate
//! - `QuoteClient`: `reqwest` client for the quote and rates endpoints
//! - `QuoteSource`: async trait the runner depends on
//! - `fakes`: scripted in-memory source for tests

pub mod client;
pub mod config;
pub mod error;
pub mod fakes;
pub mod request;
pub mod source;

pub use client::QuoteClient;
pub use config::{ProbeEnvironment, QuoteConfig};
pub use error::QuoteError;
pub use fakes::ScriptedQuoteSource;
pub use request::QuoteRequest;
pub use source::QuoteSource;

/// Result type for quote client operations
pub type QuoteResult<T> = std::result::Result<T, QuoteError>;
