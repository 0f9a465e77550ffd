//! Error types for the payex-core library.

use thiserror::Error;

/// Main error type for the payex library.
#[derive(Error, Debug)]
pub enum PayexError {
    /// The extraction request could not be understood.
    #[error("invalid request: {0}")]
    Request(String),

    /// Extraction failed with an internal fault.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Faults raised while running the strategy cascade.
///
/// A strategy that simply finds nothing is not an error; these cover inputs
/// the cascade refuses to look at and faults caught at the boundary.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// An email body exceeds the configured size limit.
    #[error("{field} is {len} bytes, limit is {limit}")]
    InputTooLarge {
        field: &'static str,
        len: usize,
        limit: usize,
    },

    /// A strategy panicked; the payload message is preserved.
    #[error("internal fault: {0}")]
    Internal(String),
}

/// Result type for the payex library.
pub type Result<T> = std::result::Result<T, PayexError>;
