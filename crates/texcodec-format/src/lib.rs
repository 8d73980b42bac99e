//! Texture format data for texcodec.
//!
//! - [`TextureFormat`] - closed set of canonical formats with static descriptors
//! - [`ColorMasks`] - RGBA bit-mask quadruples of uncompressed layouts
//! - [`CATALOG`] - native GL layouts that upload without repacking
//! - [`PixelFormatNegotiator`] - build-once mask <-> layout lookup

mod catalog;
mod error;
mod gl;
mod masks;
mod negotiator;
mod texture_format;

pub use catalog::{CatalogEntry, ChannelNaming, Compressions, CATALOG, COMPRESSED_FAMILIES};
pub use error::{Error, Result};
pub use gl::{GlFormat, GlLayout, GlType};
pub use masks::ColorMasks;
pub use negotiator::{
    has_color_bit_mask, is_fast_load_supported, supports_compressed, PixelFormatNegotiator,
};
pub use texture_format::{FormatDescriptor, FormatVariants, TextureFormat};
