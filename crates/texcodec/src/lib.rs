//! Texcodec - DDS texture codec engine.
//!
//! This crate provides a unified interface to the texcodec crates.
//!
//! # Crates
//!
//! - [`texcodec_common`] - Byte readers and bit cursors
//! - [`texcodec_format`] - Canonical formats, the native layout catalog and the negotiator
//! - [`texcodec_bcn`] - DXT1/3/5 and ATI1/2 block decompression
//! - [`texcodec_dds`] - DDS header parsing and image decoding
//!
//! # Example
//!
//! ```no_run
//! use texcodec::prelude::*;
//!
//! let data = std::fs::read("texture.dds")?;
//! let mut reader = BinaryReader::with_name("texture.dds", &data);
//!
//! let options = DecodeOptions {
//!     compressions: Compressions::S3TC,
//!     ..DecodeOptions::default()
//! };
//! let image = decode(&mut reader, &options)?;
//! println!("{}", image.desc().map(|d| d.format.name()).unwrap_or("?"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use texcodec_bcn as bcn;
pub use texcodec_common as common;
pub use texcodec_dds as dds;
pub use texcodec_format as format;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use texcodec_bcn::BlockFormat;
    pub use texcodec_common::{BinaryReader, ByteReader, StreamReader};
    pub use texcodec_dds::{
        decode, decode_into, image_information, parse_header, DecodeOptions, DecodePlan,
        DecodeSummary, Image, ImageDesc, ImageInfo, ImageSink,
    };
    pub use texcodec_format::{ColorMasks, Compressions, TextureFormat};
}

// Re-export commonly used types at the crate root
pub use texcodec_dds::{Error, ErrorKind, Result};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
