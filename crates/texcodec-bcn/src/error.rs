//! Error types for block decoding.

use thiserror::Error;

/// Errors that can occur while decoding compressed blocks.
#[derive(Debug, Error)]
pub enum Error {
    /// The input slice is shorter than one block.
    #[error("block too short: need {needed} bytes, got {actual}")]
    ShortBlock { needed: usize, actual: usize },
}

/// Result type for block decoding.
pub type Result<T> = std::result::Result<T, Error>;
