//! FOURCC and DXGI format resolution.
//!
//! A DDS pixel format names its layout in one of three ways: a four
//! character code for compressed and float data, a legacy numeric D3D code
//! in the same field, or a DXGI format in the DX10 extension. Each resolves
//! to a canonical [`TextureFormat`] plus the [`PixelLayout`] its texels are
//! stored in.

use std::fmt;

use texcodec_bcn::BlockFormat;
use texcodec_format::{ColorMasks, FormatVariants, GlFormat, GlLayout, GlType, TextureFormat};

use crate::{Error, Result};

/// Four-character code (or legacy numeric D3D format) of a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FourCC(pub u32);

impl FourCC {
    pub const DXT1: Self = Self::from_bytes(*b"DXT1");
    pub const DXT2: Self = Self::from_bytes(*b"DXT2");
    pub const DXT3: Self = Self::from_bytes(*b"DXT3");
    pub const DXT4: Self = Self::from_bytes(*b"DXT4");
    pub const DXT5: Self = Self::from_bytes(*b"DXT5");
    pub const ATI1: Self = Self::from_bytes(*b"ATI1");
    pub const ATI2: Self = Self::from_bytes(*b"ATI2");
    /// DX10 extended header follows.
    pub const DX10: Self = Self::from_bytes(*b"DX10");

    pub const R8G8B8: Self = Self(20);
    pub const A8R8G8B8: Self = Self(21);
    pub const R5G6B5: Self = Self(23);
    pub const X1R5G5B5: Self = Self(24);
    pub const A1R5G5B5: Self = Self(25);
    pub const A4R4G4B4: Self = Self(26);
    pub const R3G3B2: Self = Self(27);
    pub const A8: Self = Self(28);
    pub const X4R4G4B4: Self = Self(30);
    pub const A2B10G10R10: Self = Self(31);
    pub const A8B8G8R8: Self = Self(32);
    pub const G16R16: Self = Self(34);
    pub const A2R10G10B10: Self = Self(35);
    pub const A16B16G16R16: Self = Self(36);
    pub const L8: Self = Self(50);
    pub const A8L8: Self = Self(51);
    pub const L16: Self = Self(81);
    /// Signed 16-bit RGBA (`Q16W16V16U16`).
    pub const A16B16G16R16_SIGNED: Self = Self(110);
    pub const R16F: Self = Self(111);
    pub const G16R16F: Self = Self(112);
    pub const A16B16G16R16F: Self = Self(113);
    pub const R32F: Self = Self(114);
    pub const G32R32F: Self = Self(115);
    pub const A32B32G32R32F: Self = Self(116);

    /// Build a code from its four characters.
    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    /// The four characters of the code.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        if bytes.iter().all(|b| b.is_ascii_alphanumeric()) {
            bytes.iter().try_for_each(|&b| write!(f, "{}", b as char))
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// How the texels of a resolved format are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 4x4 compressed blocks.
    Compressed(BlockFormat),
    /// Packed texels described by channel bit masks.
    Masks(ColorMasks),
    /// Component layout with a fixed GL upload description.
    Fixed(GlLayout),
}

impl PixelLayout {
    /// Bytes of one `width` x `height` slice in this layout, or `None` when
    /// the count does not fit in `usize`.
    pub fn slice_size(&self, width: u32, height: u32) -> Option<usize> {
        let (columns, rows, unit) = match self {
            Self::Compressed(family) => (width.div_ceil(4), height.div_ceil(4), family.block_bytes()),
            Self::Masks(masks) => (width, height, masks.bytes_per_texel().unwrap_or(0) as usize),
            Self::Fixed(layout) => (width, height, layout.bytes_per_texel as usize),
        };
        (columns as usize).checked_mul(rows as usize)?.checked_mul(unit)
    }

    /// Bits one texel occupies; block formats report the 4x4 average.
    pub fn bits_per_texel(&self) -> u32 {
        match self {
            Self::Compressed(family) => family.block_bytes() as u32 / 2,
            Self::Masks(masks) => masks.bit_count(),
            Self::Fixed(layout) => layout.bytes_per_texel * 8,
        }
    }
}

/// A canonical format together with its storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFormat {
    pub format: TextureFormat,
    pub layout: PixelLayout,
}

fn pick(variant: bool, preferred: TextureFormat, plain: TextureFormat) -> TextureFormat {
    if variant {
        preferred
    } else {
        plain
    }
}

/// Map a FOURCC or legacy code to its canonical format.
///
/// The flag reports whether the layout is described by the code's standard
/// mask quadruple (see [`get_standard_masks`]). Compressed codes and
/// 16/32-bit component layouts resolve without masks.
pub fn resolve(fourcc: FourCC, variants: FormatVariants) -> Result<(TextureFormat, bool)> {
    use TextureFormat as T;

    let FormatVariants { rg_formats, srgb } = variants;
    let resolved = match fourcc {
        FourCC::DXT1 => (pick(srgb, T::SrgbADxt1, T::RgbaDxt1), false),
        FourCC::DXT2 | FourCC::DXT3 => (pick(srgb, T::SrgbADxt3, T::RgbaDxt3), false),
        FourCC::DXT4 | FourCC::DXT5 => (pick(srgb, T::SrgbADxt5, T::RgbaDxt5), false),
        FourCC::ATI1 => (T::RRgtc1, false),
        FourCC::ATI2 => (T::RgRgtc2, false),
        FourCC::R16F => (T::R16f, false),
        FourCC::G16R16F => (T::Rg16f, false),
        FourCC::A16B16G16R16F => (T::Rgba16f, false),
        FourCC::R32F => (T::R32f, false),
        FourCC::G32R32F => (T::Rg32f, false),
        FourCC::A32B32G32R32F => (T::Rgba32f, false),
        FourCC::G16R16 => (T::Rg16, false),
        FourCC::A16B16G16R16 => (T::Rgba16, false),
        FourCC::A16B16G16R16_SIGNED => (T::Rgba16Snorm, false),
        FourCC::L16 => (pick(rg_formats, T::R16, T::L16), false),
        FourCC::R8G8B8 => (pick(srgb, T::Srgb8, T::Rgb8), true),
        FourCC::A8R8G8B8 | FourCC::A8B8G8R8 => (pick(srgb, T::Srgb8A8, T::Rgba8), true),
        FourCC::R5G6B5 => (T::R5G6B5, true),
        FourCC::X1R5G5B5 | FourCC::A1R5G5B5 => (T::Rgb5A1, true),
        FourCC::A4R4G4B4 | FourCC::X4R4G4B4 => (T::Rgba4, true),
        FourCC::R3G3B2 => (T::R3G3B2, true),
        FourCC::A8 => (pick(rg_formats, T::R8, T::A8), true),
        FourCC::A2B10G10R10 | FourCC::A2R10G10B10 => (T::Rgb10A2, true),
        FourCC::L8 => (pick(rg_formats, T::R8, T::L8), true),
        FourCC::A8L8 => (pick(rg_formats, T::Rg8, T::La8), true),
        other => {
            return Err(Error::UnsupportedFormat(format!("unknown FOURCC {other}")));
        }
    };
    Ok(resolved)
}

/// Standard channel masks of a legacy numeric code.
///
/// 16-bit component layouts are described where a `u32` quadruple can hold
/// them; 64-bit layouts have no mask form.
pub fn get_standard_masks(fourcc: FourCC) -> Option<ColorMasks> {
    let masks = match fourcc {
        FourCC::R8G8B8 => ColorMasks::new(0xFF_0000, 0xFF00, 0xFF, 0),
        FourCC::A8R8G8B8 => ColorMasks::new(0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000),
        FourCC::R5G6B5 => ColorMasks::new(0xF800, 0x07E0, 0x001F, 0),
        FourCC::X1R5G5B5 | FourCC::A1R5G5B5 => ColorMasks::new(0x7C00, 0x03E0, 0x001F, 0x8000),
        FourCC::A4R4G4B4 | FourCC::X4R4G4B4 => ColorMasks::new(0x0F00, 0x00F0, 0x000F, 0xF000),
        FourCC::R3G3B2 => ColorMasks::new(0xE0, 0x1C, 0x03, 0),
        FourCC::A8 => ColorMasks::new(0, 0, 0, 0xFF),
        FourCC::A2R10G10B10 => ColorMasks::new(0x0000_03FF, 0x000F_FC00, 0x3FF0_0000, 0xC000_0000),
        FourCC::A2B10G10R10 => ColorMasks::new(0x3FF0_0000, 0x000F_FC00, 0x0000_03FF, 0xC000_0000),
        FourCC::A8B8G8R8 => ColorMasks::new(0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000),
        FourCC::L8 => ColorMasks::new(0xFF, 0, 0, 0),
        FourCC::A8L8 => ColorMasks::new(0xFF, 0, 0, 0xFF00),
        FourCC::G16R16 => ColorMasks::new(0xFFFF, 0xFFFF_0000, 0, 0),
        FourCC::L16 => ColorMasks::new(0xFFFF, 0, 0, 0),
        _ => return None,
    };
    Some(masks)
}

const fn fixed(gl_type: GlType, gl_format: GlFormat, bytes_per_texel: u32, swap_unit: u32) -> GlLayout {
    GlLayout {
        gl_type,
        gl_format,
        bytes_per_texel,
        swap_unit,
    }
}

/// Upload layout of the float and 16-bit component codes.
pub fn fixed_layout(fourcc: FourCC) -> Option<GlLayout> {
    use GlFormat::{Red, Rg, Rgba};
    use GlType::{Float, HalfFloat, Short, UnsignedShort};

    let layout = match fourcc {
        FourCC::R32F => fixed(Float, Red, 4, 4),
        FourCC::G32R32F => fixed(Float, Rg, 8, 4),
        FourCC::A32B32G32R32F => fixed(Float, Rgba, 16, 4),
        FourCC::R16F => fixed(HalfFloat, Red, 2, 2),
        FourCC::G16R16F => fixed(HalfFloat, Rg, 4, 2),
        FourCC::A16B16G16R16F => fixed(HalfFloat, Rgba, 8, 2),
        FourCC::L16 => fixed(UnsignedShort, Red, 2, 2),
        FourCC::G16R16 => fixed(UnsignedShort, Rg, 4, 2),
        FourCC::A16B16G16R16 => fixed(UnsignedShort, Rgba, 8, 2),
        FourCC::A16B16G16R16_SIGNED => fixed(Short, Rgba, 8, 2),
        _ => return None,
    };
    Some(layout)
}

/// Resolve a FOURCC to its canonical format and storage layout.
pub fn resolve_fourcc(fourcc: FourCC, variants: FormatVariants) -> Result<ResolvedFormat> {
    let (format, needs_masks) = resolve(fourcc, variants)?;

    let layout = if let Some(family) = BlockFormat::from_texture_format(format) {
        PixelLayout::Compressed(family)
    } else if needs_masks {
        let masks = get_standard_masks(fourcc).ok_or_else(|| {
            Error::UnsupportedFormat(format!("no standard masks for FOURCC {fourcc}"))
        })?;
        PixelLayout::Masks(masks)
    } else {
        let layout = fixed_layout(fourcc).ok_or_else(|| {
            Error::UnsupportedFormat(format!("no fixed layout for FOURCC {fourcc}"))
        })?;
        PixelLayout::Fixed(layout)
    };

    Ok(ResolvedFormat { format, layout })
}

/// DXGI format codes understood by [`resolve_dxgi`].
pub mod dxgi {
    pub const R32G32B32A32_FLOAT: u32 = 2;
    pub const R16G16B16A16_FLOAT: u32 = 10;
    pub const R16G16B16A16_UNORM: u32 = 11;
    pub const R16G16B16A16_SNORM: u32 = 13;
    pub const R32G32_FLOAT: u32 = 16;
    pub const R10G10B10A2_UNORM: u32 = 24;
    pub const R8G8B8A8_UNORM: u32 = 28;
    pub const R8G8B8A8_UNORM_SRGB: u32 = 29;
    pub const R16G16_FLOAT: u32 = 34;
    pub const R16G16_UNORM: u32 = 35;
    pub const D32_FLOAT: u32 = 40;
    pub const R32_FLOAT: u32 = 41;
    pub const D24_UNORM_S8_UINT: u32 = 45;
    pub const R8G8_UNORM: u32 = 49;
    pub const R16_FLOAT: u32 = 54;
    pub const R16_UNORM: u32 = 56;
    pub const R8_UNORM: u32 = 61;
    pub const A8_UNORM: u32 = 65;
    pub const BC1_UNORM: u32 = 71;
    pub const BC1_UNORM_SRGB: u32 = 72;
    pub const BC2_UNORM: u32 = 74;
    pub const BC2_UNORM_SRGB: u32 = 75;
    pub const BC3_UNORM: u32 = 77;
    pub const BC3_UNORM_SRGB: u32 = 78;
    pub const BC4_UNORM: u32 = 80;
    pub const BC4_SNORM: u32 = 81;
    pub const BC5_UNORM: u32 = 83;
    pub const BC5_SNORM: u32 = 84;
    pub const B5G6R5_UNORM: u32 = 85;
    pub const B5G5R5A1_UNORM: u32 = 86;
    pub const B8G8R8A8_UNORM: u32 = 87;
    pub const B8G8R8X8_UNORM: u32 = 88;
    pub const B8G8R8A8_UNORM_SRGB: u32 = 91;
    pub const BC6H_UF16: u32 = 95;
    pub const BC6H_SF16: u32 = 96;
    pub const BC7_UNORM: u32 = 98;
    pub const BC7_UNORM_SRGB: u32 = 99;
    pub const B4G4R4A4_UNORM: u32 = 115;
}

/// Resolve the DXGI format of a DX10 extended header.
pub fn resolve_dxgi(format: u32, variants: FormatVariants) -> Result<ResolvedFormat> {
    use texcodec_bcn::BlockFormat::{Ati1, Ati2, Dxt1, Dxt3, Dxt5};
    use GlFormat::{DepthComponent, DepthStencil, Red, Rg, Rgba};
    use GlType::{Float, HalfFloat, Short, UnsignedInt248, UnsignedShort};
    use PixelLayout::{Compressed, Fixed, Masks};
    use TextureFormat as T;

    let rg = variants.rg_formats;
    let rgba8 = ColorMasks::new(0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000);
    let bgra8 = ColorMasks::new(0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000);

    let (format, layout) = match format {
        dxgi::R32G32B32A32_FLOAT => (T::Rgba32f, Fixed(fixed(Float, Rgba, 16, 4))),
        dxgi::R16G16B16A16_FLOAT => (T::Rgba16f, Fixed(fixed(HalfFloat, Rgba, 8, 2))),
        dxgi::R16G16B16A16_UNORM => (T::Rgba16, Fixed(fixed(UnsignedShort, Rgba, 8, 2))),
        dxgi::R16G16B16A16_SNORM => (T::Rgba16Snorm, Fixed(fixed(Short, Rgba, 8, 2))),
        dxgi::R32G32_FLOAT => (T::Rg32f, Fixed(fixed(Float, Rg, 8, 4))),
        dxgi::R10G10B10A2_UNORM => (
            T::Rgb10A2,
            Masks(ColorMasks::new(0x3FF, 0xF_FC00, 0x3FF0_0000, 0xC000_0000)),
        ),
        dxgi::R8G8B8A8_UNORM => (T::Rgba8, Masks(rgba8)),
        dxgi::R8G8B8A8_UNORM_SRGB => (T::Srgb8A8, Masks(rgba8)),
        dxgi::R16G16_FLOAT => (T::Rg16f, Fixed(fixed(HalfFloat, Rg, 4, 2))),
        dxgi::R16G16_UNORM => (T::Rg16, Fixed(fixed(UnsignedShort, Rg, 4, 2))),
        dxgi::D32_FLOAT => (T::Depth32f, Fixed(fixed(Float, DepthComponent, 4, 4))),
        dxgi::R32_FLOAT => (T::R32f, Fixed(fixed(Float, Red, 4, 4))),
        dxgi::D24_UNORM_S8_UINT => (
            T::Depth24Stencil8,
            Fixed(fixed(UnsignedInt248, DepthStencil, 4, 4)),
        ),
        dxgi::R8G8_UNORM => (pick(rg, T::Rg8, T::La8), Masks(ColorMasks::new(0xFF, 0xFF00, 0, 0))),
        dxgi::R16_FLOAT => (T::R16f, Fixed(fixed(HalfFloat, Red, 2, 2))),
        dxgi::R16_UNORM => (pick(rg, T::R16, T::L16), Fixed(fixed(UnsignedShort, Red, 2, 2))),
        dxgi::R8_UNORM => (pick(rg, T::R8, T::L8), Masks(ColorMasks::new(0xFF, 0, 0, 0))),
        dxgi::A8_UNORM => (T::A8, Masks(ColorMasks::new(0, 0, 0, 0xFF))),
        dxgi::BC1_UNORM => (T::RgbaDxt1, Compressed(Dxt1)),
        dxgi::BC1_UNORM_SRGB => (T::SrgbADxt1, Compressed(Dxt1)),
        dxgi::BC2_UNORM => (T::RgbaDxt3, Compressed(Dxt3)),
        dxgi::BC2_UNORM_SRGB => (T::SrgbADxt3, Compressed(Dxt3)),
        dxgi::BC3_UNORM => (T::RgbaDxt5, Compressed(Dxt5)),
        dxgi::BC3_UNORM_SRGB => (T::SrgbADxt5, Compressed(Dxt5)),
        dxgi::BC4_UNORM => (T::RRgtc1, Compressed(Ati1)),
        dxgi::BC5_UNORM => (T::RgRgtc2, Compressed(Ati2)),
        dxgi::B5G6R5_UNORM => (T::R5G6B5, Masks(ColorMasks::new(0xF800, 0x07E0, 0x001F, 0))),
        dxgi::B5G5R5A1_UNORM => (
            T::Rgb5A1,
            Masks(ColorMasks::new(0x7C00, 0x03E0, 0x001F, 0x8000)),
        ),
        dxgi::B8G8R8A8_UNORM => (T::Rgba8, Masks(bgra8)),
        dxgi::B8G8R8A8_UNORM_SRGB => (T::Srgb8A8, Masks(bgra8)),
        dxgi::B4G4R4A4_UNORM => (
            T::Rgba4,
            Masks(ColorMasks::new(0x0F00, 0x00F0, 0x000F, 0xF000)),
        ),
        dxgi::BC4_SNORM
        | dxgi::BC5_SNORM
        | dxgi::BC6H_UF16
        | dxgi::BC6H_SF16
        | dxgi::BC7_UNORM
        | dxgi::BC7_UNORM_SRGB
        | dxgi::B8G8R8X8_UNORM => {
            return Err(Error::UnsupportedFormat(format!(
                "DXGI format {format} is not supported"
            )));
        }
        other => {
            return Err(Error::UnsupportedFormat(format!("unknown DXGI format {other}")));
        }
    };

    Ok(ResolvedFormat { format, layout })
}

/// Every FOURCC the resolver knows, with the texel size in bits its data
/// is expected to have.
pub const KNOWN_FOURCCS: &[(FourCC, u32)] = &[
    (FourCC::DXT1, 4),
    (FourCC::DXT2, 8),
    (FourCC::DXT3, 8),
    (FourCC::DXT4, 8),
    (FourCC::DXT5, 8),
    (FourCC::ATI1, 4),
    (FourCC::ATI2, 8),
    (FourCC::R16F, 16),
    (FourCC::G16R16F, 32),
    (FourCC::A16B16G16R16F, 64),
    (FourCC::R32F, 32),
    (FourCC::G32R32F, 64),
    (FourCC::A32B32G32R32F, 128),
    (FourCC::R8G8B8, 24),
    (FourCC::A8R8G8B8, 32),
    (FourCC::R5G6B5, 16),
    (FourCC::X1R5G5B5, 16),
    (FourCC::A1R5G5B5, 16),
    (FourCC::A4R4G4B4, 16),
    (FourCC::R3G3B2, 8),
    (FourCC::A8, 8),
    (FourCC::X4R4G4B4, 16),
    (FourCC::A2B10G10R10, 32),
    (FourCC::A8B8G8R8, 32),
    (FourCC::G16R16, 32),
    (FourCC::A2R10G10B10, 32),
    (FourCC::A16B16G16R16, 64),
    (FourCC::A16B16G16R16_SIGNED, 64),
    (FourCC::L8, 8),
    (FourCC::A8L8, 16),
    (FourCC::L16, 16),
];

/// Check that every known FOURCC resolves to a layout of the expected size.
///
/// Returns the first code that does not, as an unsupported format error.
pub fn check_all_fourcc_support() -> Result<()> {
    for &(fourcc, expected_bits) in KNOWN_FOURCCS {
        for variants in [
            FormatVariants::default(),
            FormatVariants {
                rg_formats: true,
                srgb: true,
            },
        ] {
            let resolved = resolve_fourcc(fourcc, variants)?;
            let bits = resolved.layout.bits_per_texel();
            if bits != expected_bits {
                return Err(Error::UnsupportedFormat(format!(
                    "FOURCC {fourcc} resolves to {bits} bits per texel, expected {expected_bits}"
                )));
            }
            if resolved.format.descriptor().bits_per_texel as u32 > bits.max(8) {
                return Err(Error::UnsupportedFormat(format!(
                    "FOURCC {fourcc} maps to {} which is wider than its data",
                    resolved.format
                )));
            }
        }
    }
    Ok(())
}
