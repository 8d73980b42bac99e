//! LSB-first bit extraction.

/// Cursor over up to 64 bits, consumed least-significant bit first.
///
/// Block formats pack their per-texel indices as a little-endian bit stream;
/// loading the index bytes into a `BitCursor` lets indices that straddle a
/// byte boundary be read without special cases.
///
/// ```
/// use texcodec_common::BitCursor;
///
/// // 3-bit values 5, 3, 7 packed LSB-first.
/// let mut bits = BitCursor::from_le_bytes(&[0b11_011_101, 0b1]);
/// assert_eq!(bits.read(3), 5);
/// assert_eq!(bits.read(3), 3);
/// assert_eq!(bits.read(3), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor {
    bits: u64,
    consumed: u32,
}

impl BitCursor {
    /// Wrap a raw 64-bit value.
    #[inline]
    pub const fn new(bits: u64) -> Self {
        Self { bits, consumed: 0 }
    }

    /// Assemble the cursor from up to 8 little-endian bytes.
    ///
    /// Bytes beyond the eighth are ignored.
    #[inline]
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        let bits = bytes
            .iter()
            .take(8)
            .enumerate()
            .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (i * 8)));
        Self::new(bits)
    }

    /// Read the next `count` bits (1..=32) as an integer.
    ///
    /// Reading past bit 64 yields zero bits.
    #[inline]
    pub fn read(&mut self, count: u32) -> u32 {
        debug_assert!((1..=32).contains(&count));
        let value = if self.consumed >= 64 {
            0
        } else {
            (self.bits >> self.consumed) & ((1u64 << count) - 1)
        };
        self.consumed += count;
        value as u32
    }

    /// Number of bits consumed so far.
    #[inline]
    pub const fn consumed(&self) -> u32 {
        self.consumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_bit_indices() {
        let mut bits = BitCursor::from_le_bytes(&[0b11_10_01_00]);
        let values: Vec<u32> = (0..4).map(|_| bits.read(2)).collect();
        assert_eq!(values, vec![0, 1, 2, 3]);
        assert_eq!(bits.consumed(), 8);
    }

    #[test]
    fn test_three_bit_indices_straddle_bytes() {
        // Sixteen 3-bit indices 0..8 repeated, packed into 48 bits.
        let mut packed = 0u64;
        for i in 0..16u64 {
            packed |= (i % 8) << (i * 3);
        }
        let bytes = packed.to_le_bytes();

        let mut bits = BitCursor::from_le_bytes(&bytes[..6]);
        for i in 0..16u32 {
            assert_eq!(bits.read(3), i % 8, "index {i}");
        }
        assert_eq!(bits.consumed(), 48);
    }

    #[test]
    fn test_nibbles() {
        let mut bits = BitCursor::from_le_bytes(&[0x21, 0x43]);
        assert_eq!(bits.read(4), 1);
        assert_eq!(bits.read(4), 2);
        assert_eq!(bits.read(4), 3);
        assert_eq!(bits.read(4), 4);
    }

    #[test]
    fn test_read_past_end() {
        let mut bits = BitCursor::new(u64::MAX);
        bits.read(32);
        bits.read(32);
        assert_eq!(bits.read(4), 0);
    }
}
