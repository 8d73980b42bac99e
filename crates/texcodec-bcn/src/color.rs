//! S3TC color block decoding.

use crate::block::{BlockSamples, ColorBlock, EMPTY_SAMPLES};
use crate::Result;

/// Expand a 5:6:5 color to normalized RGB with alpha 1.
#[inline]
pub fn unpack_565(color: u16) -> [f32; 4] {
    [
        f32::from((color >> 11) & 0x1F) / 31.0,
        f32::from((color >> 5) & 0x3F) / 63.0,
        f32::from(color & 0x1F) / 31.0,
        1.0,
    ]
}

fn lerp(a: [f32; 4], b: [f32; 4], wa: f32, wb: f32, div: f32) -> [f32; 4] {
    std::array::from_fn(|i| (wa * a[i] + wb * b[i]) / div)
}

/// Build the four-entry palette of a color block.
///
/// In DXT1 mode a block whose raw endpoints satisfy `color0 <= color1`
/// uses three colors plus transparent black; every other block uses the
/// two endpoints and their 1/3 and 2/3 blends.
pub fn color_palette(block: &ColorBlock, dxt1_mode: bool) -> [[f32; 4]; 4] {
    let c0 = unpack_565(block.color0.get());
    let c1 = unpack_565(block.color1.get());

    if dxt1_mode && block.is_punch_through() {
        [c0, c1, lerp(c0, c1, 1.0, 1.0, 2.0), [0.0; 4]]
    } else {
        [
            c0,
            c1,
            lerp(c0, c1, 2.0, 1.0, 3.0),
            lerp(c0, c1, 1.0, 2.0, 3.0),
        ]
    }
}

/// Decode the 8-byte color part of an S3TC block.
pub fn decode_color_block(bytes: &[u8], dxt1_mode: bool) -> Result<BlockSamples> {
    let block = ColorBlock::parse(bytes)?;
    let palette = color_palette(block, dxt1_mode);

    let mut samples = EMPTY_SAMPLES;
    for (sample, index) in samples.iter_mut().zip(block.texel_indices()) {
        *sample = palette[usize::from(index)];
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn assert_close(a: [f32; 4], b: [f32; 4]) {
        for i in 0..4 {
            assert!((a[i] - b[i]).abs() < EPSILON, "{a:?} != {b:?}");
        }
    }

    fn block(color0: u16, color1: u16, indices: [u8; 4]) -> [u8; 8] {
        let [a, b] = color0.to_le_bytes();
        let [c, d] = color1.to_le_bytes();
        [a, b, c, d, indices[0], indices[1], indices[2], indices[3]]
    }

    #[test]
    fn test_unpack_565_extremes() {
        assert_eq!(unpack_565(0xFFFF), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(unpack_565(0x0000), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(unpack_565(0xF800), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_four_color_mode() {
        // Rows select palette entries 0, 1, 2, 3.
        let bytes = block(0xFFFF, 0x0000, [0x00, 0x55, 0xAA, 0xFF]);
        let samples = decode_color_block(&bytes, true).unwrap();

        let white = [1.0, 1.0, 1.0, 1.0];
        let black = [0.0, 0.0, 0.0, 1.0];
        let third = 2.0 / 3.0;
        let expected = [
            white,
            black,
            [third, third, third, 1.0],
            [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0, 1.0],
        ];
        for (i, sample) in samples.iter().enumerate() {
            assert_close(*sample, expected[i / 4]);
            assert_eq!(sample[3], 1.0);
        }
    }

    #[test]
    fn test_punch_through_mode() {
        let bytes = block(0x0000, 0xFFFF, [0xAA, 0xFF, 0xAA, 0xFF]);
        let samples = decode_color_block(&bytes, true).unwrap();

        for (i, sample) in samples.iter().enumerate() {
            if (i / 4) % 2 == 0 {
                assert_close(*sample, [0.5, 0.5, 0.5, 1.0]);
            } else {
                assert_eq!(*sample, [0.0, 0.0, 0.0, 0.0]);
            }
        }
    }

    #[test]
    fn test_equal_endpoints_select_punch_through() {
        let bytes = block(0x07E0, 0x07E0, [0xFF; 4]);
        let samples = decode_color_block(&bytes, true).unwrap();
        assert!(samples.iter().all(|s| *s == [0.0; 4]));
    }

    #[test]
    fn test_dxt3_mode_never_transparent() {
        let bytes = block(0x0000, 0xFFFF, [0xFF; 4]);
        let samples = decode_color_block(&bytes, false).unwrap();
        for sample in samples {
            assert_close(sample, [2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 1.0]);
        }
    }
}
