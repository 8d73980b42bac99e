//! DDS container parsing and image decoding for texcodec.
//!
//! - [`parse_header`] - validate and normalize a DDS header, collecting warnings
//! - [`resolve`], [`resolve_dxgi`] - map FOURCC, legacy D3D and DXGI codes to canonical formats
//! - [`decode`], [`decode_into`] - stream every face and mip level into an [`ImageSink`]
//! - [`image_information`] - describe an image from its header alone
//!
//! # Example
//!
//! ```no_run
//! use texcodec_common::BinaryReader;
//! use texcodec_dds::{decode, DecodeOptions};
//!
//! let data = std::fs::read("texture.dds")?;
//! let mut reader = BinaryReader::with_name("texture.dds", &data);
//! let image = decode(&mut reader, &DecodeOptions::default())?;
//! let rgba = image.to_rgba8(0, 0, 0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod decode;
mod error;
mod fourcc;
mod header;
mod image;

#[cfg(test)]
mod test_support;

pub use decode::{
    decode, decode_into, image_information, resolve_format, DecodeOptions, DecodePlan,
    DecodeSummary, ImageInfo,
};
pub use error::{Error, ErrorKind, Result};
pub use fourcc::{
    check_all_fourcc_support, dxgi, fixed_layout, get_standard_masks, resolve, resolve_dxgi,
    resolve_fourcc, FourCC, PixelLayout, ResolvedFormat, KNOWN_FOURCCS,
};
pub use header::{
    parse_header, Caps, Caps2, DdsHeader, Dx10Header, HeaderFlags, HeaderWarning, ParsedHeader,
    PixelFormat, PixelFormatFlags, RawDx10Header, RawHeader, RawPixelFormat, ResourceDimension,
};
pub use image::{pack_texel, Image, ImageDesc, ImageSink};

/// DDS file magic bytes ("DDS ").
pub const DDS_MAGIC: &[u8; 4] = b"DDS ";
