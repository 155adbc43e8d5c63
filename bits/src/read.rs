use crate::{check_count, mask, words_for, Error, Result, MAX_BITS_PER_CALL, WORD_BITS};

pub trait ReadBits {
    /// Read `count` bits, the first bit read becomes the least significant bit (LSB).
    fn read(&mut self, count: u32) -> Result<u32>;

    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read(1)? != 0)
    }

    /// Read up to 64 bits written by [`WriteBits::write_u64`](crate::WriteBits::write_u64).
    fn read_u64(&mut self, count: u32) -> Result<u64> {
        check_count(count, 2 * MAX_BITS_PER_CALL)?;
        let low = u32::min(count, MAX_BITS_PER_CALL);
        let low_bits = u64::from(self.read(low)?);
        let high_bits = u64::from(self.read(count - low)?);
        Ok(low_bits | high_bits << 32)
    }
}

/// Reads bits from a copy of a byte buffer produced by a [`BitWriter`](crate::BitWriter).
#[derive(Debug)]
pub struct BitReader {
    words: Option<Box<[u64]>>,
    limit: usize,
    cursor: usize,
}

impl BitReader {
    /// Every bit of `bytes` is readable.
    pub fn new(bytes: &[u8]) -> BitReader {
        BitReader {
            words: Some(load_words(bytes)),
            limit: 8 * bytes.len(),
            cursor: 0,
        }
    }

    /// Only the first `bit_len` bits of `bytes` are readable, for when the exact number of bits
    /// written is known.
    pub fn with_bit_len(bytes: &[u8], bit_len: usize) -> Result<BitReader> {
        if bit_len > 8 * bytes.len() {
            return Err(Error::InvalidArgument {
                name: "bit_len",
                reason: format!(
                    "{} bits requested but the buffer only holds {}",
                    bit_len,
                    8 * bytes.len()
                ),
            });
        }

        let mut reader = BitReader::new(bytes);
        reader.limit = bit_len;
        Ok(reader)
    }

    /// Number of bits read so far.
    pub fn bit_position(&self) -> usize {
        self.cursor
    }

    /// Number of bytes that have been fully consumed.
    pub fn byte_position(&self) -> usize {
        self.cursor / 8
    }

    pub fn remaining_bits(&self) -> usize {
        self.limit - self.cursor
    }

    pub fn is_closed(&self) -> bool {
        self.words.is_none()
    }

    /// Release the storage. Closing an already closed reader fails.
    pub fn close(&mut self) -> Result<()> {
        self.words.take().ok_or(Error::Disposed)?;
        self.limit = 0;
        self.cursor = 0;
        Ok(())
    }
}

fn load_words(bytes: &[u8]) -> Box<[u64]> {
    let mut words = Vec::with_capacity(words_for(bytes.len()));
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        words.push(u64::from_le_bytes(word));
    }
    words.into_boxed_slice()
}

impl ReadBits for BitReader {
    fn read(&mut self, count: u32) -> Result<u32> {
        let words = self.words.as_ref().ok_or(Error::Disposed)?;
        check_count(count, MAX_BITS_PER_CALL)?;

        if count == 0 {
            return Ok(0);
        }

        let remaining = self.limit - self.cursor;
        if count as usize > remaining {
            return Err(Error::Underflow {
                requested: count as usize,
                remaining,
            });
        }

        let index = self.cursor / WORD_BITS;
        let offset = (self.cursor % WORD_BITS) as u32;

        let mut value = words[index] >> offset;

        // Same split as the writer: `offset > 32`, so the shift is within 33..=63.
        if offset + count > WORD_BITS as u32 {
            value |= words[index + 1] << (WORD_BITS as u32 - offset);
        }

        self.cursor += count as usize;
        Ok(value as u32 & mask(count))
    }
}
