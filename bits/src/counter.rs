use crate::{check_count, Result, WriteBits, MAX_BITS_PER_CALL};

/// A writer that stores nothing, it only counts how many bits would have been written.
///
/// Useful to size the output of encodings whose width depends on the value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BitCounter {
    bits: usize,
}

impl BitCounter {
    pub fn new() -> BitCounter {
        BitCounter::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bits
    }

    pub fn byte_len(&self) -> usize {
        (self.bits + 7) / 8
    }
}

impl WriteBits for BitCounter {
    fn write(&mut self, _bits: u32, count: u32) -> Result<()> {
        check_count(count, MAX_BITS_PER_CALL)?;
        self.bits += count as usize;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitWriter;

    #[test]
    fn counts_like_a_writer() {
        let mut counter = BitCounter::new();
        let mut writer = BitWriter::with_capacity(16);

        for &(bits, count) in &[(1, 1), (0x3ff, 10), (0, 0), (0xffff_ffff, 32), (7, 3)] {
            counter.write(bits, count).unwrap();
            writer.write(bits, count).unwrap();
        }
        counter.write_u64(u64::max_value(), 40).unwrap();
        writer.write_u64(u64::max_value(), 40).unwrap();

        assert_eq!(counter.bit_len(), writer.bit_len());
        assert_eq!(counter.byte_len(), writer.byte_len());
    }

    #[test]
    fn rejects_wide_writes() {
        assert!(BitCounter::new().write(0, 33).is_err());
    }
}
