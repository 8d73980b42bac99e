//! Error types for texcodec-common.

use thiserror::Error;

/// Common error type for texcodec readers.
#[derive(Debug, Error)]
pub enum Error {
    /// End of data reached while reading.
    #[error("unexpected end of data: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Seek target lies past the end of the data.
    #[error("seek to {position} is out of bounds for {len} bytes")]
    SeekOutOfBounds { position: usize, len: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
