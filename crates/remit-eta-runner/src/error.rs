//! Errors that stop a run before any quote is requested.

use remit_eta_client::QuoteError;
use remit_eta_core::RemitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Credential validation failed: {0}")]
    Credentials(#[source] QuoteError),

    #[error("Invalid battery: {0}")]
    Battery(#[source] RemitError),
}

pub type RunnerResult<T> = std::result::Result<T, RunnerError>;
