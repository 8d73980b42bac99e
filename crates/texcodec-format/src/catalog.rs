//! Native GPU pixel layouts that can be uploaded without repacking.

use bitflags::bitflags;

use crate::gl::GlFormat::{Alpha, Bgr, Bgra, Luminance, LuminanceAlpha, Red, Rg, Rgb, Rgba};
use crate::gl::GlType::{
    UnsignedByte, UnsignedByte233Rev, UnsignedByte332, UnsignedInt1010102, UnsignedInt2101010Rev,
    UnsignedInt8888, UnsignedShort1555Rev, UnsignedShort4444, UnsignedShort4444Rev,
    UnsignedShort5551, UnsignedShort565, UnsignedShort565Rev,
};
use crate::gl::{GlFormat, GlType};
use crate::masks::ColorMasks;

bitflags! {
    /// Block compression families a consumer can ingest directly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Compressions: u32 {
        /// DXT1/DXT3/DXT5 (BC1-BC3).
        const S3TC = 0x1;
        /// ATI1/ATI2 (BC4-BC5).
        const RGTC = 0x2;
    }
}

impl Default for Compressions {
    fn default() -> Self {
        Self::empty()
    }
}

/// Channel naming a catalog row is selected under.
///
/// Single and dual byte layouts upload either as luminance/alpha or as
/// red/red-green, depending on the caller's `rg_formats` preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelNaming {
    Any,
    Luminance,
    RedGreen,
}

impl ChannelNaming {
    /// Whether the row applies when `rg_formats` has the given value.
    #[inline]
    pub const fn matches(self, rg_formats: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Luminance => !rg_formats,
            Self::RedGreen => rg_formats,
        }
    }
}

/// One catalog row: a mask quadruple and the GL type/format pair that
/// uploads it as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub masks: ColorMasks,
    pub gl_type: GlType,
    pub gl_format: GlFormat,
    pub naming: ChannelNaming,
}

const fn entry(gl_type: GlType, gl_format: GlFormat, r: u32, g: u32, b: u32, a: u32) -> CatalogEntry {
    named(ChannelNaming::Any, gl_type, gl_format, r, g, b, a)
}

const fn named(
    naming: ChannelNaming,
    gl_type: GlType,
    gl_format: GlFormat,
    r: u32,
    g: u32,
    b: u32,
    a: u32,
) -> CatalogEntry {
    CatalogEntry {
        masks: ColorMasks::new(r, g, b, a),
        gl_type,
        gl_format,
        naming,
    }
}

/// Uncompressed layouts with a native fast-load path.
///
/// Every row has pairwise disjoint masks covering a whole number of bytes.
/// No two rows share a type/format pair, and two rows share masks only when
/// their channel namings never match the same preference.
pub const CATALOG: &[CatalogEntry] = &[
    entry(UnsignedInt1010102, Rgba, 0xFFC0_0000, 0x003F_F000, 0x0000_0FFC, 0x0000_0003),
    entry(UnsignedInt1010102, Bgra, 0x0000_0FFC, 0x003F_F000, 0xFFC0_0000, 0x0000_0003),
    entry(UnsignedInt2101010Rev, Rgba, 0x0000_03FF, 0x000F_FC00, 0x3FF0_0000, 0xC000_0000),
    entry(UnsignedInt2101010Rev, Bgra, 0x3FF0_0000, 0x000F_FC00, 0x0000_03FF, 0xC000_0000),
    entry(UnsignedInt8888, Rgba, 0xFF00_0000, 0x00FF_0000, 0x0000_FF00, 0x0000_00FF),
    entry(UnsignedInt8888, Bgra, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000, 0x0000_00FF),
    entry(UnsignedShort4444, Rgba, 0xF000, 0x0F00, 0x00F0, 0x000F),
    entry(UnsignedShort4444, Bgra, 0x00F0, 0x0F00, 0xF000, 0x000F),
    entry(UnsignedShort4444Rev, Rgba, 0x000F, 0x00F0, 0x0F00, 0xF000),
    entry(UnsignedShort4444Rev, Bgra, 0x0F00, 0x00F0, 0x000F, 0xF000),
    entry(UnsignedShort5551, Rgba, 0xF800, 0x07C0, 0x003E, 0x0001),
    entry(UnsignedShort5551, Bgra, 0x003E, 0x07C0, 0xF800, 0x0001),
    entry(UnsignedShort1555Rev, Rgba, 0x001F, 0x03E0, 0x7C00, 0x8000),
    entry(UnsignedShort1555Rev, Bgra, 0x7C00, 0x03E0, 0x001F, 0x8000),
    entry(UnsignedShort565, Rgb, 0xF800, 0x07E0, 0x001F, 0),
    entry(UnsignedShort565Rev, Rgb, 0x001F, 0x07E0, 0xF800, 0),
    entry(UnsignedByte332, Rgb, 0xE0, 0x1C, 0x03, 0),
    entry(UnsignedByte233Rev, Rgb, 0x07, 0x38, 0xC0, 0),
    named(ChannelNaming::RedGreen, UnsignedByte, Red, 0xFF, 0, 0, 0),
    named(ChannelNaming::Luminance, UnsignedByte, Luminance, 0xFF, 0, 0, 0),
    named(ChannelNaming::Luminance, UnsignedByte, Alpha, 0, 0, 0, 0xFF),
    named(ChannelNaming::Luminance, UnsignedByte, LuminanceAlpha, 0xFF, 0, 0, 0xFF00),
    named(ChannelNaming::RedGreen, UnsignedByte, Rg, 0xFF, 0xFF00, 0, 0),
    entry(UnsignedByte, Rgb, 0xFF, 0xFF00, 0xFF_0000, 0),
    entry(UnsignedByte, Bgr, 0xFF_0000, 0xFF00, 0xFF, 0),
    entry(UnsignedByte, Rgba, 0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000),
    entry(UnsignedByte, Bgra, 0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000),
];

/// Compressed families the target generation can sample natively.
pub const COMPRESSED_FAMILIES: Compressions = Compressions::S3TC.union(Compressions::RGTC);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_are_well_formed() {
        for entry in CATALOG {
            assert!(entry.masks.is_disjoint(), "{}", entry.masks);
            let bits = entry.masks.bit_count();
            assert!(bits > 0 && bits % 8 == 0, "{}", entry.masks);
        }
    }

    #[test]
    fn test_naming_matches() {
        assert!(ChannelNaming::Any.matches(false) && ChannelNaming::Any.matches(true));
        assert!(ChannelNaming::Luminance.matches(false));
        assert!(!ChannelNaming::Luminance.matches(true));
        assert!(ChannelNaming::RedGreen.matches(true));
        assert!(!ChannelNaming::RedGreen.matches(false));
    }

    #[test]
    fn test_entries_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert!((a.gl_type, a.gl_format) != (b.gl_type, b.gl_format));
                if a.masks == b.masks {
                    for rg_formats in [false, true] {
                        assert!(
                            !(a.naming.matches(rg_formats) && b.naming.matches(rg_formats)),
                            "{} is ambiguous",
                            a.masks
                        );
                    }
                }
            }
        }
    }
}
