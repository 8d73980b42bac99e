//! Per-family block entry points.

use std::fmt;

use texcodec_format::TextureFormat;

use crate::alpha::{decode_explicit_alpha, decode_interpolated_alpha};
use crate::block::{BlockSamples, EMPTY_SAMPLES};
use crate::color::decode_color_block;
use crate::{Error, Result};

/// Decode a DXT1 block: color with optional 1-bit alpha.
pub fn decode_dxt1(bytes: &[u8]) -> Result<BlockSamples> {
    decode_color_block(bytes, true)
}

/// Decode a DXT3 block: explicit 4-bit alpha, then color.
pub fn decode_dxt3(bytes: &[u8]) -> Result<BlockSamples> {
    let (alpha, color) = split_half(bytes)?;
    let mut samples = decode_color_block(color, false)?;
    decode_explicit_alpha(alpha, 3, &mut samples)?;
    Ok(samples)
}

/// Decode a DXT5 block: interpolated alpha, then color.
pub fn decode_dxt5(bytes: &[u8]) -> Result<BlockSamples> {
    let (alpha, color) = split_half(bytes)?;
    let mut samples = decode_color_block(color, false)?;
    decode_interpolated_alpha(alpha, 3, &mut samples)?;
    Ok(samples)
}

/// Decode an ATI1 block into the red channel.
pub fn decode_ati1(bytes: &[u8]) -> Result<BlockSamples> {
    let mut samples = EMPTY_SAMPLES;
    decode_interpolated_alpha(bytes, 0, &mut samples)?;
    Ok(samples)
}

/// Decode an ATI2 block into the red and green channels.
pub fn decode_ati2(bytes: &[u8]) -> Result<BlockSamples> {
    let (red, green) = split_half(bytes)?;
    let mut samples = EMPTY_SAMPLES;
    decode_interpolated_alpha(red, 0, &mut samples)?;
    decode_interpolated_alpha(green, 1, &mut samples)?;
    Ok(samples)
}

fn split_half(bytes: &[u8]) -> Result<(&[u8], &[u8])> {
    if bytes.len() < 16 {
        return Err(Error::ShortBlock {
            needed: 16,
            actual: bytes.len(),
        });
    }
    Ok(bytes[..16].split_at(8))
}

/// Block compression family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFormat {
    Dxt1,
    Dxt3,
    Dxt5,
    Ati1,
    Ati2,
}

impl BlockFormat {
    /// Family of a canonical block format.
    pub const fn from_texture_format(format: TextureFormat) -> Option<Self> {
        match format {
            TextureFormat::RgbaDxt1 | TextureFormat::SrgbADxt1 => Some(Self::Dxt1),
            TextureFormat::RgbaDxt3 | TextureFormat::SrgbADxt3 => Some(Self::Dxt3),
            TextureFormat::RgbaDxt5 | TextureFormat::SrgbADxt5 => Some(Self::Dxt5),
            TextureFormat::RRgtc1 => Some(Self::Ati1),
            TextureFormat::RgRgtc2 => Some(Self::Ati2),
            _ => None,
        }
    }

    /// Bytes per 4x4 block.
    pub const fn block_bytes(self) -> usize {
        match self {
            Self::Dxt1 | Self::Ati1 => 8,
            Self::Dxt3 | Self::Dxt5 | Self::Ati2 => 16,
        }
    }

    /// Decode one block of this family.
    pub fn decode(self, bytes: &[u8]) -> Result<BlockSamples> {
        match self {
            Self::Dxt1 => decode_dxt1(bytes),
            Self::Dxt3 => decode_dxt3(bytes),
            Self::Dxt5 => decode_dxt5(bytes),
            Self::Ati1 => decode_ati1(bytes),
            Self::Ati2 => decode_ati2(bytes),
        }
    }
}

impl fmt::Display for BlockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dxt1 => "DXT1",
            Self::Dxt3 => "DXT3",
            Self::Dxt5 => "DXT5",
            Self::Ati1 => "ATI1",
            Self::Ati2 => "ATI2",
        };
        f.write_str(name)
    }
}

/// Visit the texels of the block at `(x, y)` that fall inside a
/// `width` x `height` image.
///
/// `f` receives the image coordinates and the row-major index into the
/// block's samples. Blocks on the right and bottom edge of an image whose
/// size is not a multiple of 4 only visit their in-bounds sub-rectangle.
pub fn for_each_clipped(x: u32, y: u32, width: u32, height: u32, mut f: impl FnMut(u32, u32, usize)) {
    let sx = width.saturating_sub(x).min(4);
    let sy = height.saturating_sub(y).min(4);
    for by in 0..sy {
        for bx in 0..sx {
            f(x + bx, y + by, (by * 4 + bx) as usize);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_dxt3_combines_alpha_and_color() {
        let mut bytes = [0u8; 16];
        bytes[..8].fill(0xFF); // alpha 15 everywhere
        bytes[8..10].copy_from_slice(&0xF800u16.to_le_bytes());
        bytes[10..12].copy_from_slice(&0x0000u16.to_le_bytes());

        let samples = decode_dxt3(&bytes).unwrap();
        assert!(samples.iter().all(|s| *s == [1.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_dxt5_alpha_overrides_color_alpha() {
        let mut bytes = [0u8; 16];
        bytes[0] = 0; // e0
        bytes[1] = 255; // e1, index 0 selects e0 = 0
        bytes[8..10].copy_from_slice(&0x07E0u16.to_le_bytes());

        let samples = decode_dxt5(&bytes).unwrap();
        assert!(samples.iter().all(|s| *s == [0.0, 1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_ati2_writes_red_and_green() {
        let mut bytes = [0u8; 16];
        bytes[0] = 255;
        bytes[8] = 0;
        bytes[9] = 255;
        // Every 3-bit index is 1, selecting e1.
        bytes[10..16].copy_from_slice(&[0x49, 0x92, 0x24, 0x49, 0x92, 0x24]);
        let samples = decode_ati2(&bytes).unwrap();
        for sample in samples {
            assert_eq!(sample[0], 1.0);
            assert_eq!(sample[1], 1.0);
            assert_eq!(sample[2], 0.0);
            assert_eq!(sample[3], 1.0);
        }
    }

    #[rstest]
    #[case(BlockFormat::Dxt1, 8)]
    #[case(BlockFormat::Dxt3, 16)]
    #[case(BlockFormat::Dxt5, 16)]
    #[case(BlockFormat::Ati1, 8)]
    #[case(BlockFormat::Ati2, 16)]
    fn test_block_bytes_match_descriptors(#[case] family: BlockFormat, #[case] bytes: usize) {
        assert_eq!(family.block_bytes(), bytes);
        let format = TextureFormat::ALL
            .into_iter()
            .find(|f| BlockFormat::from_texture_format(*f) == Some(family))
            .unwrap();
        assert_eq!(format.descriptor().block_bytes as usize, bytes);
        assert!(family.decode(&[0u8; 16][..bytes - 1]).is_err());
    }

    #[test]
    fn test_clipped_edge_block() {
        let mut visited = Vec::new();
        for_each_clipped(4, 4, 6, 5, |x, y, i| visited.push((x, y, i)));
        assert_eq!(visited, vec![(4, 4, 0), (5, 4, 1)]);
    }

    #[test]
    fn test_interior_block_is_complete() {
        let mut count = 0;
        for_each_clipped(0, 0, 8, 8, |_, _, _| count += 1);
        assert_eq!(count, 16);
    }

    #[test]
    fn test_tiny_mip_block() {
        let mut visited = Vec::new();
        for_each_clipped(0, 0, 1, 2, |x, y, i| visited.push((x, y, i)));
        assert_eq!(visited, vec![(0, 0, 0), (0, 1, 4)]);
    }
}
