//! RGBA bit-mask quadruples.

use std::fmt;

/// Red, green, blue and alpha bit masks of an uncompressed texel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
}

impl ColorMasks {
    /// Create a mask quadruple.
    #[inline]
    pub const fn new(red: u32, green: u32, blue: u32, alpha: u32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Masks as an `[r, g, b, a]` array.
    #[inline]
    pub const fn to_array(self) -> [u32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Union of all four masks.
    #[inline]
    pub const fn combined(self) -> u32 {
        self.red | self.green | self.blue | self.alpha
    }

    /// Total number of bits covered by the masks.
    #[inline]
    pub const fn bit_count(self) -> u32 {
        self.combined().count_ones()
    }

    /// Whether no two masks share a bit.
    pub const fn is_disjoint(self) -> bool {
        let m = self.to_array();
        let mut i = 0;
        while i < 4 {
            let mut j = i + 1;
            while j < 4 {
                if m[i] & m[j] != 0 {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }

    /// Whether all masks are zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.combined() == 0
    }

    /// Texel size in bytes, if the masks cover a whole number of bytes.
    pub const fn bytes_per_texel(self) -> Option<u32> {
        let bits = self.bit_count();
        if bits == 0 || bits % 8 != 0 {
            None
        } else {
            Some(bits / 8)
        }
    }

    /// Expand one packed texel into 8-bit RGBA.
    ///
    /// Channels without a mask read as 0, except alpha which reads as 255.
    pub fn expand_rgba8(self, texel: u32) -> [u8; 4] {
        [
            expand_channel(texel, self.red).unwrap_or(0),
            expand_channel(texel, self.green).unwrap_or(0),
            expand_channel(texel, self.blue).unwrap_or(0),
            expand_channel(texel, self.alpha).unwrap_or(u8::MAX),
        ]
    }
}

impl fmt::Display for ColorMasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r={:#010x} g={:#010x} b={:#010x} a={:#010x}",
            self.red, self.green, self.blue, self.alpha
        )
    }
}

/// Extract the bits under `mask` and rescale them to 0..=255.
fn expand_channel(texel: u32, mask: u32) -> Option<u8> {
    if mask == 0 {
        return None;
    }
    let bits = mask.count_ones();
    let value = (texel & mask) >> mask.trailing_zeros();
    let scaled = if bits >= 8 {
        value >> (bits - 8)
    } else {
        let max = (1u32 << bits) - 1;
        (value * 255 + max / 2) / max
    };
    Some(scaled as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_count_and_bytes() {
        let argb = ColorMasks::new(0xFF0000, 0xFF00, 0xFF, 0xFF000000);
        assert_eq!(argb.bit_count(), 32);
        assert_eq!(argb.bytes_per_texel(), Some(4));
        assert!(argb.is_disjoint());

        let odd = ColorMasks::new(0x7, 0, 0, 0);
        assert_eq!(odd.bytes_per_texel(), None);
        assert_eq!(ColorMasks::default().bytes_per_texel(), None);
    }

    #[test]
    fn test_overlap_detected() {
        let luminance = ColorMasks::new(0xFF, 0xFF, 0xFF, 0);
        assert!(!luminance.is_disjoint());
    }

    #[test]
    fn test_expand_565() {
        let masks = ColorMasks::new(0xF800, 0x7E0, 0x1F, 0);
        assert_eq!(masks.expand_rgba8(0xFFFF), [255, 255, 255, 255]);
        assert_eq!(masks.expand_rgba8(0xF800), [255, 0, 0, 255]);
        assert_eq!(masks.expand_rgba8(0x0000), [0, 0, 0, 255]);
    }

    #[test]
    fn test_expand_wide_channels_truncate() {
        let masks = ColorMasks::new(0x3FF, 0xFFC00, 0x3FF00000, 0xC0000000);
        let rgba = masks.expand_rgba8(0xFFFF_FFFF);
        assert_eq!(rgba, [255, 255, 255, 255]);
        // 2-bit alpha of 1 rescales to 85.
        assert_eq!(masks.expand_rgba8(0x4000_0000)[3], 85);
    }
}
