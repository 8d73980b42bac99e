//! Mask layout negotiation against the native format catalog.
//!
//! The negotiator holds two read-only maps derived from [`CATALOG`]:
//! masks and channel naming to upload layout, and type/format pair back to
//! masks. The shared instance is built on first use and never mutated
//! afterwards.

use std::sync::OnceLock;

use rustc_hash::FxHashMap;

use crate::catalog::{CatalogEntry, CATALOG, COMPRESSED_FAMILIES};
use crate::gl::{GlFormat, GlLayout, GlType};
use crate::masks::ColorMasks;
use crate::texture_format::{FormatVariants, TextureFormat};

/// Bidirectional lookup between mask quadruples and GL upload layouts.
#[derive(Debug)]
pub struct PixelFormatNegotiator {
    forward: FxHashMap<(ColorMasks, bool), GlLayout>,
    reverse: FxHashMap<(GlType, GlFormat), ColorMasks>,
    rows: Vec<(ColorMasks, GlLayout)>,
}

impl PixelFormatNegotiator {
    /// Build both maps from a set of catalog rows.
    ///
    /// Rows whose masks overlap or do not cover whole bytes are skipped.
    pub fn from_entries(entries: &[CatalogEntry]) -> Self {
        let mut forward = FxHashMap::default();
        let mut reverse = FxHashMap::default();
        let mut rows = Vec::with_capacity(entries.len());

        for entry in entries {
            let Some(bytes_per_texel) = entry.masks.bytes_per_texel() else {
                log::warn!("skipping catalog row with partial bytes: {}", entry.masks);
                continue;
            };
            if !entry.masks.is_disjoint() {
                log::warn!("skipping catalog row with overlapping masks: {}", entry.masks);
                continue;
            }

            let swap_unit = if entry.gl_type.is_packed() {
                bytes_per_texel
            } else {
                1
            };
            let layout = GlLayout {
                gl_type: entry.gl_type,
                gl_format: entry.gl_format,
                bytes_per_texel,
                swap_unit,
            };
            for rg_formats in [false, true] {
                if entry.naming.matches(rg_formats) {
                    forward.insert((entry.masks, rg_formats), layout);
                }
            }
            reverse.insert((entry.gl_type, entry.gl_format), entry.masks);
            rows.push((entry.masks, layout));
        }

        log::debug!("negotiator built with {} layouts", rows.len());
        Self {
            forward,
            reverse,
            rows,
        }
    }

    /// Shared negotiator over the built-in catalog.
    pub fn global() -> &'static Self {
        static NEGOTIATOR: OnceLock<PixelFormatNegotiator> = OnceLock::new();
        NEGOTIATOR.get_or_init(|| Self::from_entries(CATALOG))
    }

    /// Upload layout for an exact mask quadruple, if one exists.
    ///
    /// Byte layouts with one or two channels resolve to luminance rows, or
    /// to red/red-green rows when `variants.rg_formats` is set.
    #[inline]
    pub fn is_fast_load_supported(
        &self,
        masks: ColorMasks,
        variants: FormatVariants,
    ) -> Option<GlLayout> {
        self.forward.get(&(masks, variants.rg_formats)).copied()
    }

    /// Masks described by a GL type/format pair.
    #[inline]
    pub fn has_color_bit_mask(&self, gl_type: GlType, gl_format: GlFormat) -> Option<ColorMasks> {
        self.reverse.get(&(gl_type, gl_format)).copied()
    }

    /// Upload layout for texels stored under `masks` and described as `format`.
    ///
    /// A luminance layout read with `rg_formats` set (or the reverse) has no
    /// exact row. Its bytes are then uploaded under the masks `format` keeps
    /// its channels in. Returns the masks the layout was found under.
    pub fn native_layout(
        &self,
        masks: ColorMasks,
        format: TextureFormat,
        variants: FormatVariants,
    ) -> Option<(ColorMasks, GlLayout)> {
        if let Some(layout) = self.is_fast_load_supported(masks, variants) {
            return Some((masks, layout));
        }

        let other = FormatVariants {
            rg_formats: !variants.rg_formats,
            ..variants
        };
        let stored = self.is_fast_load_supported(masks, other)?;
        let canonical = format.byte_channel_masks()?;
        let layout = self.is_fast_load_supported(canonical, variants)?;
        (layout.bytes_per_texel == stored.bytes_per_texel).then_some((canonical, layout))
    }

    /// Whether a block format can be uploaded without decompression.
    pub fn supports_compressed(&self, format: TextureFormat) -> bool {
        format
            .compression()
            .is_some_and(|family| COMPRESSED_FAMILIES.contains(family))
    }

    /// Number of catalog rows accepted.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over all `(masks, layout)` pairs.
    pub fn layouts(&self) -> impl Iterator<Item = (ColorMasks, GlLayout)> + '_ {
        self.rows.iter().copied()
    }
}

/// Upload layout for a mask quadruple in the built-in catalog.
pub fn is_fast_load_supported(masks: ColorMasks, variants: FormatVariants) -> Option<GlLayout> {
    PixelFormatNegotiator::global().is_fast_load_supported(masks, variants)
}

/// Masks of a GL type/format pair in the built-in catalog.
pub fn has_color_bit_mask(gl_type: GlType, gl_format: GlFormat) -> Option<ColorMasks> {
    PixelFormatNegotiator::global().has_color_bit_mask(gl_type, gl_format)
}

/// Whether the built-in catalog accepts a block format as-is.
pub fn supports_compressed(format: TextureFormat) -> bool {
    PixelFormatNegotiator::global().supports_compressed(format)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::catalog::ChannelNaming;

    const LUMINANCE: FormatVariants = FormatVariants {
        rg_formats: false,
        srgb: false,
    };
    const RED_GREEN: FormatVariants = FormatVariants {
        rg_formats: true,
        srgb: false,
    };

    #[test]
    fn test_bijection() {
        let negotiator = PixelFormatNegotiator::global();
        assert_eq!(negotiator.len(), CATALOG.len());

        for entry in CATALOG {
            let variants = FormatVariants {
                rg_formats: entry.naming == ChannelNaming::RedGreen,
                ..FormatVariants::default()
            };
            let layout = negotiator
                .is_fast_load_supported(entry.masks, variants)
                .unwrap_or_else(|| panic!("missing {}", entry.masks));
            assert_eq!(layout.gl_type, entry.gl_type);
            assert_eq!(layout.gl_format, entry.gl_format);

            let back = negotiator
                .has_color_bit_mask(layout.gl_type, layout.gl_format)
                .unwrap();
            assert_eq!(back, entry.masks);
        }
    }

    #[rstest]
    #[case(ColorMasks::new(0xFF0000, 0xFF00, 0xFF, 0xFF000000), GlType::UnsignedByte, GlFormat::Bgra, 4, 1)]
    #[case(ColorMasks::new(0xF800, 0x7E0, 0x1F, 0), GlType::UnsignedShort565, GlFormat::Rgb, 2, 2)]
    #[case(ColorMasks::new(0x7C00, 0x3E0, 0x1F, 0x8000), GlType::UnsignedShort1555Rev, GlFormat::Bgra, 2, 2)]
    #[case(ColorMasks::new(0x3FF, 0xFFC00, 0x3FF00000, 0xC0000000), GlType::UnsignedInt2101010Rev, GlFormat::Rgba, 4, 4)]
    #[case(ColorMasks::new(0xE0, 0x1C, 0x3, 0), GlType::UnsignedByte332, GlFormat::Rgb, 1, 1)]
    fn test_forward_lookup(
        #[case] masks: ColorMasks,
        #[case] gl_type: GlType,
        #[case] gl_format: GlFormat,
        #[case] bytes_per_texel: u32,
        #[case] swap_unit: u32,
    ) {
        let layout = is_fast_load_supported(masks, LUMINANCE).unwrap();
        assert_eq!(is_fast_load_supported(masks, RED_GREEN), Some(layout));
        assert_eq!(
            layout,
            GlLayout {
                gl_type,
                gl_format,
                bytes_per_texel,
                swap_unit
            }
        );
        assert_eq!(bytes_per_texel, masks.bit_count() / 8);
    }

    #[test]
    fn test_unknown_masks() {
        // 24-bit BGR in the low bytes is native, the same channels shifted up are not.
        assert!(is_fast_load_supported(ColorMasks::new(0xFF0000, 0xFF00, 0xFF, 0), LUMINANCE).is_some());
        assert!(
            is_fast_load_supported(ColorMasks::new(0xFF00, 0xFF0000, 0xFF000000, 0), LUMINANCE).is_none()
        );
        assert!(has_color_bit_mask(GlType::Float, GlFormat::Rgba).is_none());
    }

    #[test]
    fn test_invalid_rows_are_skipped() {
        let rows = [
            CatalogEntry {
                masks: ColorMasks::new(0xFF, 0xFF, 0xFF, 0),
                gl_type: GlType::UnsignedByte,
                gl_format: GlFormat::Luminance,
                naming: ChannelNaming::Luminance,
            },
            CatalogEntry {
                masks: ColorMasks::new(0x7, 0, 0, 0),
                gl_type: GlType::UnsignedByte,
                gl_format: GlFormat::Red,
                naming: ChannelNaming::RedGreen,
            },
        ];
        assert!(PixelFormatNegotiator::from_entries(&rows).is_empty());
    }

    #[rstest]
    #[case(ColorMasks::new(0xFF, 0, 0, 0), LUMINANCE, GlFormat::Luminance)]
    #[case(ColorMasks::new(0xFF, 0, 0, 0), RED_GREEN, GlFormat::Red)]
    #[case(ColorMasks::new(0, 0, 0, 0xFF), LUMINANCE, GlFormat::Alpha)]
    #[case(ColorMasks::new(0xFF, 0, 0, 0xFF00), LUMINANCE, GlFormat::LuminanceAlpha)]
    #[case(ColorMasks::new(0xFF, 0xFF00, 0, 0), RED_GREEN, GlFormat::Rg)]
    fn test_channel_naming(
        #[case] masks: ColorMasks,
        #[case] variants: FormatVariants,
        #[case] gl_format: GlFormat,
    ) {
        let layout = is_fast_load_supported(masks, variants).unwrap();
        assert_eq!(layout.gl_format, gl_format);
        assert_eq!(layout.gl_type, GlType::UnsignedByte);
    }

    #[test]
    fn test_channel_naming_is_exclusive() {
        assert!(is_fast_load_supported(ColorMasks::new(0, 0, 0, 0xFF), RED_GREEN).is_none());
        assert!(is_fast_load_supported(ColorMasks::new(0xFF, 0, 0, 0xFF00), RED_GREEN).is_none());
        assert!(is_fast_load_supported(ColorMasks::new(0xFF, 0xFF00, 0, 0), LUMINANCE).is_none());
    }

    #[rstest]
    #[case(ColorMasks::new(0xFF, 0, 0, 0xFF00), TextureFormat::Rg8, RED_GREEN, GlFormat::Rg)]
    #[case(ColorMasks::new(0xFF, 0xFF00, 0, 0), TextureFormat::La8, LUMINANCE, GlFormat::LuminanceAlpha)]
    #[case(ColorMasks::new(0, 0, 0, 0xFF), TextureFormat::R8, RED_GREEN, GlFormat::Red)]
    #[case(ColorMasks::new(0xFF, 0, 0, 0), TextureFormat::L8, LUMINANCE, GlFormat::Luminance)]
    fn test_native_layout(
        #[case] masks: ColorMasks,
        #[case] format: TextureFormat,
        #[case] variants: FormatVariants,
        #[case] gl_format: GlFormat,
    ) {
        let (upload_masks, layout) = PixelFormatNegotiator::global()
            .native_layout(masks, format, variants)
            .unwrap();
        assert_eq!(layout.gl_format, gl_format);
        assert_eq!(Some(upload_masks), format.byte_channel_masks());
    }

    #[test]
    fn test_native_layout_keeps_texel_size() {
        // 16-bit luminance in the high byte has no byte-sized equivalent.
        let masks = ColorMasks::new(0xFF00, 0, 0, 0);
        let negotiator = PixelFormatNegotiator::global();
        assert!(negotiator.native_layout(masks, TextureFormat::L8, LUMINANCE).is_none());
        assert!(negotiator.native_layout(masks, TextureFormat::R8, RED_GREEN).is_none());
    }

    #[rstest]
    #[case(TextureFormat::RgbaDxt1, true)]
    #[case(TextureFormat::SrgbADxt5, true)]
    #[case(TextureFormat::RRgtc1, true)]
    #[case(TextureFormat::RgRgtc2, true)]
    #[case(TextureFormat::Rgba8, false)]
    fn test_supports_compressed(#[case] format: TextureFormat, #[case] expected: bool) {
        assert_eq!(supports_compressed(format), expected);
    }
}
