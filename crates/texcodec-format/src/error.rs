//! Error types for format handling.

use thiserror::Error;

/// Errors that can occur when looking up texture formats.
#[derive(Debug, Error)]
pub enum Error {
    /// No canonical format has this name.
    #[error("unknown texture format: {0}")]
    UnknownFormat(String),
}

/// Result type for format operations.
pub type Result<T> = std::result::Result<T, Error>;
