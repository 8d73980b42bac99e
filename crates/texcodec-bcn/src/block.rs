//! On-disk layouts of the compressed block parts.

use texcodec_common::BitCursor;
use zerocopy::little_endian::U16;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::{Error, Result};

/// Decoded texels of one 4x4 block, row-major, as linear RGBA.
pub type BlockSamples = [[f32; 4]; 16];

/// Samples every block starts from before a family writes its channels.
pub const EMPTY_SAMPLES: BlockSamples = [[0.0, 0.0, 0.0, 1.0]; 16];

fn view<T: FromBytes + KnownLayout + Immutable>(bytes: &[u8]) -> Result<&T> {
    let needed = std::mem::size_of::<T>();
    let head = bytes.get(..needed).ok_or(Error::ShortBlock {
        needed,
        actual: bytes.len(),
    })?;
    T::ref_from_bytes(head).map_err(|_| Error::ShortBlock {
        needed,
        actual: bytes.len(),
    })
}

/// Two 5:6:5 endpoints followed by sixteen 2-bit indices.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ColorBlock {
    pub color0: U16,
    pub color1: U16,
    pub indices: [u8; 4],
}

impl ColorBlock {
    pub const SIZE: usize = 8;

    /// View the first 8 bytes of `bytes` as a color block.
    #[inline]
    pub fn parse(bytes: &[u8]) -> Result<&Self> {
        view(bytes)
    }

    /// Whether the endpoints select the 3-color, 1-bit alpha mode when
    /// decoded as DXT1.
    #[inline]
    pub fn is_punch_through(&self) -> bool {
        self.color0.get() <= self.color1.get()
    }

    /// Per-texel 2-bit indices in row-major order.
    pub fn texel_indices(&self) -> [u8; 16] {
        let mut bits = BitCursor::from_le_bytes(&self.indices);
        std::array::from_fn(|_| bits.read(2) as u8)
    }
}

/// Sixteen explicit 4-bit values, two per byte, low nibble first.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ExplicitAlphaBlock {
    pub alphas: [u8; 8],
}

impl ExplicitAlphaBlock {
    pub const SIZE: usize = 8;

    #[inline]
    pub fn parse(bytes: &[u8]) -> Result<&Self> {
        view(bytes)
    }

    /// Per-texel 4-bit values in row-major order.
    pub fn texel_values(&self) -> [u8; 16] {
        let mut bits = BitCursor::from_le_bytes(&self.alphas);
        std::array::from_fn(|_| bits.read(4) as u8)
    }
}

/// Two 8-bit endpoints followed by sixteen 3-bit ramp indices.
#[derive(Debug, Clone, Copy, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct InterpolatedAlphaBlock {
    pub alpha0: u8,
    pub alpha1: u8,
    pub indices: [u8; 6],
}

impl InterpolatedAlphaBlock {
    pub const SIZE: usize = 8;

    #[inline]
    pub fn parse(bytes: &[u8]) -> Result<&Self> {
        view(bytes)
    }

    /// Per-texel 3-bit indices in row-major order.
    ///
    /// The 48 index bits form one little-endian stream, so indices 2, 5,
    /// 10 and 13 span two bytes.
    pub fn texel_indices(&self) -> [u8; 16] {
        let mut bits = BitCursor::from_le_bytes(&self.indices);
        std::array::from_fn(|_| bits.read(3) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_block_layout() {
        let bytes = [0x00, 0xF8, 0x1F, 0x00, 0b11_10_01_00, 0, 0, 0xFF];
        let block = ColorBlock::parse(&bytes).unwrap();
        assert_eq!(block.color0.get(), 0xF800);
        assert_eq!(block.color1.get(), 0x001F);
        assert!(!block.is_punch_through());

        let indices = block.texel_indices();
        assert_eq!(&indices[..4], &[0, 1, 2, 3]);
        assert_eq!(&indices[4..12], &[0; 8]);
        assert_eq!(&indices[12..], &[3; 4]);
    }

    #[test]
    fn test_equal_endpoints_are_punch_through() {
        let bytes = [0x34, 0x12, 0x34, 0x12, 0, 0, 0, 0];
        assert!(ColorBlock::parse(&bytes).unwrap().is_punch_through());
    }

    #[test]
    fn test_explicit_alpha_nibbles() {
        let bytes = [0x10, 0x32, 0x54, 0x76, 0x98, 0xBA, 0xDC, 0xFE];
        let block = ExplicitAlphaBlock::parse(&bytes).unwrap();
        let expected: Vec<u8> = (0..16).collect();
        assert_eq!(block.texel_values().to_vec(), expected);
    }

    #[test]
    fn test_interpolated_indices_straddle() {
        // Index 2 occupies bits 6..9: two bits in byte 0, one in byte 1.
        let bytes = [0, 0, 0b1100_0000, 0b0000_0001, 0, 0, 0, 0];
        let block = InterpolatedAlphaBlock::parse(&bytes).unwrap();
        let indices = block.texel_indices();
        assert_eq!(indices[2], 7);
        assert_eq!(indices.iter().filter(|&&i| i != 0).count(), 1);
    }

    #[test]
    fn test_short_input() {
        assert!(matches!(
            ColorBlock::parse(&[0; 5]),
            Err(Error::ShortBlock {
                needed: 8,
                actual: 5
            })
        ));
    }
}
