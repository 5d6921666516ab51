//! Domain-level error taxonomy for remit-eta.

/// remit-eta core errors.
///
/// Absence of data (no timestamp, no baseline entry) is never an error here;
/// those paths resolve to `Option::None` or a fallback estimate.
#[derive(Debug, thiserror::Error)]
pub enum RemitError {
    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("invalid baseline table: {0}")]
    InvalidBaseline(String),

    #[error("report error: {0}")]
    Report(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for remit-eta core operations.
pub type Result<T> = std::result::Result<T, RemitError>;
