//! S3TC and RGTC block decompression.
//!
//! Each family decodes one 4x4 block into sixteen linear RGBA samples in
//! row-major order. Samples start as opaque black; a family only overwrites
//! the channels it stores.
//!
//! # Example
//!
//! ```
//! use texcodec_bcn::BlockFormat;
//!
//! // Solid red DXT1 block.
//! let block = [0x00, 0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
//! let samples = BlockFormat::Dxt1.decode(&block)?;
//! assert_eq!(samples[0], [1.0, 0.0, 0.0, 1.0]);
//! # Ok::<(), texcodec_bcn::Error>(())
//! ```

mod alpha;
mod block;
mod color;
mod error;
mod family;

pub use alpha::{alpha_ramp, decode_explicit_alpha, decode_interpolated_alpha};
pub use block::{BlockSamples, ColorBlock, ExplicitAlphaBlock, InterpolatedAlphaBlock, EMPTY_SAMPLES};
pub use color::{color_palette, decode_color_block, unpack_565};
pub use error::{Error, Result};
pub use family::{
    decode_ati1, decode_ati2, decode_dxt1, decode_dxt3, decode_dxt5, for_each_clipped, BlockFormat,
};
