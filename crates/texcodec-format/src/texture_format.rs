//! Canonical texture formats and their static descriptors.

use std::fmt;
use std::str::FromStr;

use crate::catalog::Compressions;
use crate::masks::ColorMasks;
use crate::{Error, Result};

/// Static description of a canonical texture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescriptor {
    pub name: &'static str,
    pub channels: u8,
    /// Bits per texel; for block formats, the average over a 4x4 block.
    pub bits_per_texel: u8,
    /// Bytes per 4x4 block, zero for uncompressed formats.
    pub block_bytes: u8,
    pub compressed: bool,
    pub srgb: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl FormatDescriptor {
    const fn plain(name: &'static str, channels: u8, bits_per_texel: u8) -> Self {
        Self {
            name,
            channels,
            bits_per_texel,
            block_bytes: 0,
            compressed: false,
            srgb: false,
            depth: false,
            stencil: false,
        }
    }

    const fn srgb(name: &'static str, channels: u8, bits_per_texel: u8) -> Self {
        Self {
            srgb: true,
            ..Self::plain(name, channels, bits_per_texel)
        }
    }

    const fn block(name: &'static str, channels: u8, block_bytes: u8, srgb: bool) -> Self {
        Self {
            name,
            channels,
            bits_per_texel: block_bytes / 2,
            block_bytes,
            compressed: true,
            srgb,
            depth: false,
            stencil: false,
        }
    }

    const fn depth(name: &'static str, channels: u8, bits_per_texel: u8, stencil: bool) -> Self {
        Self {
            depth: true,
            stencil,
            ..Self::plain(name, channels, bits_per_texel)
        }
    }
}

/// Closed set of texture formats the codec produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TextureFormat {
    Rgba4,
    R5G6B5,
    Rgb5A1,
    Rgb10A2,
    R3G3B2,
    Rgb8,
    Rgba8,
    Srgb8,
    Srgb8A8,
    A8,
    L8,
    La8,
    R8,
    Rg8,
    L16,
    R16,
    Rg16,
    Rgba16,
    Rgba16Snorm,
    R16f,
    Rg16f,
    Rgba16f,
    R32f,
    Rg32f,
    Rgba32f,
    RgbaDxt1,
    RgbaDxt3,
    RgbaDxt5,
    SrgbADxt1,
    SrgbADxt3,
    SrgbADxt5,
    RRgtc1,
    RgRgtc2,
    Depth24Stencil8,
    Depth32f,
}

const DESCRIPTORS: [FormatDescriptor; TextureFormat::ALL.len()] = [
    FormatDescriptor::plain("RGBA4", 4, 16),
    FormatDescriptor::plain("R5G6B5", 3, 16),
    FormatDescriptor::plain("RGB5_A1", 4, 16),
    FormatDescriptor::plain("RGB10_A2", 4, 32),
    FormatDescriptor::plain("R3G3B2", 3, 8),
    FormatDescriptor::plain("RGB8", 3, 24),
    FormatDescriptor::plain("RGBA8", 4, 32),
    FormatDescriptor::srgb("SRGB8", 3, 24),
    FormatDescriptor::srgb("SRGB8_A8", 4, 32),
    FormatDescriptor::plain("A8", 1, 8),
    FormatDescriptor::plain("L8", 1, 8),
    FormatDescriptor::plain("LA8", 2, 16),
    FormatDescriptor::plain("R8", 1, 8),
    FormatDescriptor::plain("RG8", 2, 16),
    FormatDescriptor::plain("L16", 1, 16),
    FormatDescriptor::plain("R16", 1, 16),
    FormatDescriptor::plain("RG16", 2, 32),
    FormatDescriptor::plain("RGBA16", 4, 64),
    FormatDescriptor::plain("RGBA16_SNORM", 4, 64),
    FormatDescriptor::plain("R16F", 1, 16),
    FormatDescriptor::plain("RG16F", 2, 32),
    FormatDescriptor::plain("RGBA16F", 4, 64),
    FormatDescriptor::plain("R32F", 1, 32),
    FormatDescriptor::plain("RG32F", 2, 64),
    FormatDescriptor::plain("RGBA32F", 4, 128),
    FormatDescriptor::block("RGBA_DXT1", 4, 8, false),
    FormatDescriptor::block("RGBA_DXT3", 4, 16, false),
    FormatDescriptor::block("RGBA_DXT5", 4, 16, false),
    FormatDescriptor::block("SRGB_A_DXT1", 4, 8, true),
    FormatDescriptor::block("SRGB_A_DXT3", 4, 16, true),
    FormatDescriptor::block("SRGB_A_DXT5", 4, 16, true),
    FormatDescriptor::block("R_RGTC1", 1, 8, false),
    FormatDescriptor::block("RG_RGTC2", 2, 16, false),
    FormatDescriptor::depth("DEPTH24_STENCIL8", 2, 32, true),
    FormatDescriptor::depth("DEPTH32F", 1, 32, false),
];

/// Options selecting between equivalent format variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FormatVariants {
    /// Prefer red/red-green formats over luminance/luminance-alpha.
    pub rg_formats: bool,
    /// Prefer sRGB formats where one exists.
    pub srgb: bool,
}

impl TextureFormat {
    /// Every format, in declaration order.
    pub const ALL: [TextureFormat; 35] = [
        Self::Rgba4,
        Self::R5G6B5,
        Self::Rgb5A1,
        Self::Rgb10A2,
        Self::R3G3B2,
        Self::Rgb8,
        Self::Rgba8,
        Self::Srgb8,
        Self::Srgb8A8,
        Self::A8,
        Self::L8,
        Self::La8,
        Self::R8,
        Self::Rg8,
        Self::L16,
        Self::R16,
        Self::Rg16,
        Self::Rgba16,
        Self::Rgba16Snorm,
        Self::R16f,
        Self::Rg16f,
        Self::Rgba16f,
        Self::R32f,
        Self::Rg32f,
        Self::Rgba32f,
        Self::RgbaDxt1,
        Self::RgbaDxt3,
        Self::RgbaDxt5,
        Self::SrgbADxt1,
        Self::SrgbADxt3,
        Self::SrgbADxt5,
        Self::RRgtc1,
        Self::RgRgtc2,
        Self::Depth24Stencil8,
        Self::Depth32f,
    ];

    /// Static descriptor of this format.
    #[inline]
    pub const fn descriptor(self) -> &'static FormatDescriptor {
        &DESCRIPTORS[self as usize]
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    #[inline]
    pub const fn is_compressed(self) -> bool {
        self.descriptor().compressed
    }

    #[inline]
    pub const fn is_srgb(self) -> bool {
        self.descriptor().srgb
    }

    /// Compression family of a block format.
    pub const fn compression(self) -> Option<Compressions> {
        match self {
            Self::RgbaDxt1
            | Self::RgbaDxt3
            | Self::RgbaDxt5
            | Self::SrgbADxt1
            | Self::SrgbADxt3
            | Self::SrgbADxt5 => Some(Compressions::S3TC),
            Self::RRgtc1 | Self::RgRgtc2 => Some(Compressions::RGTC),
            _ => None,
        }
    }

    /// Uncompressed format a block format decompresses into.
    ///
    /// The channel count is preserved: S3TC becomes RGBA8 (sRGB8_A8 for
    /// sRGB variants), RGTC1 becomes R8 or L8 and RGTC2 becomes RG8 or LA8.
    /// Uncompressed formats map to themselves.
    pub const fn decompressed(self, rg_formats: bool) -> TextureFormat {
        match self {
            Self::RgbaDxt1 | Self::RgbaDxt3 | Self::RgbaDxt5 => Self::Rgba8,
            Self::SrgbADxt1 | Self::SrgbADxt3 | Self::SrgbADxt5 => Self::Srgb8A8,
            Self::RRgtc1 if rg_formats => Self::R8,
            Self::RRgtc1 => Self::L8,
            Self::RgRgtc2 if rg_formats => Self::Rg8,
            Self::RgRgtc2 => Self::La8,
            other => other,
        }
    }

    /// Masks of the one and two channel byte formats, in the order their
    /// channels are stored.
    pub const fn byte_channel_masks(self) -> Option<ColorMasks> {
        match self {
            Self::L8 | Self::R8 => Some(ColorMasks::new(0xFF, 0, 0, 0)),
            Self::A8 => Some(ColorMasks::new(0, 0, 0, 0xFF)),
            Self::La8 => Some(ColorMasks::new(0xFF, 0, 0, 0xFF00)),
            Self::Rg8 => Some(ColorMasks::new(0xFF, 0xFF00, 0, 0)),
            _ => None,
        }
    }

    /// Number of bytes one 2D level of the given size occupies.
    pub const fn level_size(self, width: u32, height: u32) -> usize {
        let d = self.descriptor();
        if d.compressed {
            let bw = width.div_ceil(4) as usize;
            let bh = height.div_ceil(4) as usize;
            bw * bh * d.block_bytes as usize
        } else {
            (width as usize * height as usize * d.bits_per_texel as usize).div_ceil(8)
        }
    }

    /// Pick the canonical format closest to an uncompressed mask layout.
    ///
    /// Channel widths are compared against the candidate formats from the
    /// narrowest upwards; anything wider than 10-10-10-2 falls back to RGBA8.
    pub fn from_masks(masks: ColorMasks, variants: FormatVariants) -> TextureFormat {
        let luminance_mask = masks.red | masks.green | masks.blue;
        let red = masks.red.count_ones();
        let green = masks.green.count_ones();
        let blue = masks.blue.count_ones();
        let alpha = masks.alpha.count_ones();
        let luminance = luminance_mask.count_ones();

        let is_grey = (luminance_mask == masks.red || red == 0)
            && (luminance_mask == masks.green || green == 0)
            && (luminance_mask == masks.blue || blue == 0);
        let single = if variants.rg_formats { Self::R8 } else { Self::L8 };
        let dual = if variants.rg_formats { Self::Rg8 } else { Self::La8 };

        if is_grey {
            if luminance == 0 && alpha <= 8 {
                return if variants.rg_formats { Self::R8 } else { Self::A8 };
            }
            if luminance <= 8 && alpha == 0 {
                return single;
            }
            if luminance <= 8 && alpha <= 8 {
                return dual;
            }
        }

        match (red, green, blue, alpha) {
            (0..=8, 0, 0, 0) => single,
            (0..=8, 0..=8, 0, 0) => dual,
            (0..=3, 0..=3, 0..=2, 0) => Self::R3G3B2,
            (0..=4, 0..=4, 0..=4, 0..=4) => Self::Rgba4,
            (0..=5, 0..=6, 0..=5, 0) => Self::R5G6B5,
            (0..=5, 0..=5, 0..=5, 1) => Self::Rgb5A1,
            (0..=8, 0..=8, 0..=8, 0) if variants.srgb => Self::Srgb8,
            (0..=8, 0..=8, 0..=8, 0) => Self::Rgb8,
            (0..=8, 0..=8, 0..=8, 0..=8) if variants.srgb => Self::Srgb8A8,
            (0..=8, 0..=8, 0..=8, 0..=8) => Self::Rgba8,
            (0..=10, 0..=10, 0..=10, 0..=2) => Self::Rgb10A2,
            _ if variants.srgb => Self::Srgb8A8,
            _ => Self::Rgba8,
        }
    }
}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextureFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}
