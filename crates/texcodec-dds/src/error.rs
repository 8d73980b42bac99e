//! Error types for DDS handling.

use thiserror::Error;

/// Errors that can occur when decoding DDS files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(texcodec_common::Error),

    /// Block decoding error.
    #[error("{0}")]
    Block(#[from] texcodec_bcn::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Header violates the container format.
    #[error("invalid DDS header: {0}")]
    ContainerFormat(String),

    /// Recognized but unimplementable pixel format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The stream ends before the data the header describes.
    #[error("truncated data: needed {needed} bytes but only {available} available")]
    Truncated { needed: usize, available: usize },

    /// Block decompression needs dimensions that are multiples of 4.
    #[error("invalid block geometry: {width}x{height} is not a multiple of 4")]
    InvalidBlockGeometry { width: u32, height: u32 },

    /// The image sink refused or could not hold the decoded data.
    #[error("image sink error: {0}")]
    Sink(String),

    /// An error tagged with the name of the source it came from.
    #[error("{name}: {source}")]
    File {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

/// Broad error category, independent of the source tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    ContainerFormat,
    UnsupportedFormat,
    Truncated,
    InvalidBlockGeometry,
    Sink,
}

impl Error {
    /// Attach a source name unless one is already attached.
    pub fn in_file(self, name: impl Into<String>) -> Self {
        match self {
            tagged @ Self::File { .. } => tagged,
            other => Self::File {
                name: name.into(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, with source tags removed.
    pub fn root(&self) -> &Error {
        match self {
            Self::File { source, .. } => source.root(),
            other => other,
        }
    }

    /// Name of the source, if attached.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::File { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Category of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::File { source, .. } => source.kind(),
            Self::Io(_) | Self::Common(_) => ErrorKind::Io,
            Self::InvalidMagic(_) | Self::ContainerFormat(_) => ErrorKind::ContainerFormat,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::Truncated { .. } | Self::Block(_) => ErrorKind::Truncated,
            Self::InvalidBlockGeometry { .. } => ErrorKind::InvalidBlockGeometry,
            Self::Sink(_) => ErrorKind::Sink,
        }
    }
}

impl From<texcodec_common::Error> for Error {
    fn from(err: texcodec_common::Error) -> Self {
        match err {
            texcodec_common::Error::UnexpectedEof { needed, available } => {
                Self::Truncated { needed, available }
            }
            other => Self::Common(other),
        }
    }
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_eof_is_truncation() {
        let err: Error = texcodec_common::Error::UnexpectedEof {
            needed: 4,
            available: 1,
        }
        .into();
        assert!(matches!(
            err,
            Error::Truncated {
                needed: 4,
                available: 1
            }
        ));
    }

    #[test]
    fn test_source_tag() {
        let err = Error::ContainerFormat("bad".into()).in_file("a.dds");
        assert_eq!(err.file_name(), Some("a.dds"));
        assert_eq!(err.kind(), ErrorKind::ContainerFormat);
        assert_eq!(err.to_string(), "a.dds: invalid DDS header: bad");

        // Tagging twice keeps the first name.
        let err = err.in_file("b.dds");
        assert_eq!(err.file_name(), Some("a.dds"));
        assert!(matches!(err.root(), Error::ContainerFormat(_)));
    }
}
