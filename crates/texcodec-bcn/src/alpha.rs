//! Explicit and interpolated single-channel block decoding.
//!
//! The same interpolated ramp serves DXT5 alpha and both ATI families; only
//! the destination channel differs.

use crate::block::{BlockSamples, ExplicitAlphaBlock, InterpolatedAlphaBlock};
use crate::Result;

/// Eight ramp values on a 0..=255 scale.
///
/// `e0 > e1` selects six interpolated steps between the endpoints;
/// otherwise four steps are interpolated and entries 6 and 7 are fixed at
/// 0 and 255.
pub fn alpha_ramp(e0: u8, e1: u8) -> [f32; 8] {
    let (a, b) = (f32::from(e0), f32::from(e1));
    let mut ramp = [0.0f32; 8];
    ramp[0] = a;
    ramp[1] = b;

    if e0 > e1 {
        for i in 0..6u8 {
            let (wa, wb) = (f32::from(6 - i), f32::from(i + 1));
            ramp[usize::from(i) + 2] = (wa * a + wb * b) / 7.0;
        }
    } else {
        for i in 0..4u8 {
            let (wa, wb) = (f32::from(4 - i), f32::from(i + 1));
            ramp[usize::from(i) + 2] = (wa * a + wb * b) / 5.0;
        }
        ramp[6] = 0.0;
        ramp[7] = 255.0;
    }
    ramp
}

/// Write sixteen explicit 4-bit values into `channel`, scaled to 0..=1.
pub fn decode_explicit_alpha(
    bytes: &[u8],
    channel: usize,
    samples: &mut BlockSamples,
) -> Result<()> {
    let block = ExplicitAlphaBlock::parse(bytes)?;
    for (sample, value) in samples.iter_mut().zip(block.texel_values()) {
        sample[channel] = f32::from(value) / 15.0;
    }
    Ok(())
}

/// Write sixteen ramp-interpolated values into `channel`, scaled to 0..=1.
pub fn decode_interpolated_alpha(
    bytes: &[u8],
    channel: usize,
    samples: &mut BlockSamples,
) -> Result<()> {
    let block = InterpolatedAlphaBlock::parse(bytes)?;
    let ramp = alpha_ramp(block.alpha0, block.alpha1);
    for (sample, index) in samples.iter_mut().zip(block.texel_indices()) {
        sample[channel] = ramp[usize::from(index)] / 255.0;
    }
    Ok(())
}
