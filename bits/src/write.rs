use crate::{check_count, mask, words_for, Error, Result, MAX_BITS_PER_CALL, WORD_BITS};

/// Default capacity of a writer, in bytes. Roughly what fits in a single datagram.
pub const DEFAULT_CAPACITY: usize = 1200;

pub trait WriteBits {
    /// Write `count` bits, starting with the least significant bit (LSB). Bits of `bits` above
    /// `count` are ignored.
    fn write(&mut self, bits: u32, count: u32) -> Result<()>;

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write(value as u32, 1)
    }

    /// Write up to 64 bits as two chunks, the low 32 bits first.
    fn write_u64(&mut self, bits: u64, count: u32) -> Result<()> {
        check_count(count, 2 * MAX_BITS_PER_CALL)?;
        let low = u32::min(count, MAX_BITS_PER_CALL);
        self.write(bits as u32, low)?;
        self.write((bits >> 32) as u32, count - low)
    }
}

/// Writes bits into a buffer with a capacity fixed at construction.
///
/// The buffer never grows: a write that does not fit fails with [`Error::Overflow`]. Once
/// [`close`](BitWriter::close)d, the storage is released and every further call fails with
/// [`Error::Disposed`].
#[derive(Debug)]
pub struct BitWriter {
    words: Option<Box<[u64]>>,
    capacity: usize,
    cursor: usize,
}

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a writer that holds at least `bytes` bytes. The capacity is rounded up to a
    /// multiple of 8 bytes.
    pub fn with_capacity(bytes: usize) -> BitWriter {
        let words = words_for(bytes);
        BitWriter {
            words: Some(vec![0; words].into_boxed_slice()),
            capacity: words * WORD_BITS,
            cursor: 0,
        }
    }

    /// Total number of bits this writer can hold.
    pub fn capacity_bits(&self) -> usize {
        self.capacity
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.cursor
    }

    /// Number of bytes needed to hold everything written so far.
    pub fn byte_len(&self) -> usize {
        (self.cursor + 7) / 8
    }

    pub fn remaining_bits(&self) -> usize {
        self.capacity - self.cursor
    }

    pub fn is_closed(&self) -> bool {
        self.words.is_none()
    }

    /// Rewind to the start of the buffer, zeroing every word written to.
    pub fn reset(&mut self) -> Result<()> {
        let words = self.words.as_mut().ok_or(Error::Disposed)?;
        let touched = (self.cursor + WORD_BITS - 1) / WORD_BITS;
        for word in &mut words[..touched] {
            *word = 0;
        }

        log::trace!("reset writer after {} bits", self.cursor);
        self.cursor = 0;
        Ok(())
    }

    /// Copy the written bytes into `target`, returning the number of bytes copied.
    pub fn copy_to(&self, target: &mut [u8]) -> Result<usize> {
        let words = self.words.as_ref().ok_or(Error::Disposed)?;
        let len = self.byte_len();

        if target.len() < len {
            return Err(Error::Overflow {
                requested: 8 * len,
                remaining: 8 * target.len(),
            });
        }

        for (chunk, word) in target[..len].chunks_mut(8).zip(words.iter()) {
            let bytes = word.to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }

        Ok(len)
    }

    /// The written bytes. Exactly [`byte_len`](BitWriter::byte_len) bytes long.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![0; self.byte_len()];
        self.copy_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn finish(mut self) -> Result<Vec<u8>> {
        let bytes = self.to_vec()?;
        self.close()?;
        Ok(bytes)
    }

    /// Release the storage. Closing an already closed writer fails.
    pub fn close(&mut self) -> Result<()> {
        self.words.take().ok_or(Error::Disposed)?;
        self.capacity = 0;
        self.cursor = 0;
        Ok(())
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        BitWriter::new()
    }
}

impl WriteBits for BitWriter {
    fn write(&mut self, bits: u32, count: u32) -> Result<()> {
        let words = self.words.as_mut().ok_or(Error::Disposed)?;
        check_count(count, MAX_BITS_PER_CALL)?;

        if count == 0 {
            return Ok(());
        }

        let remaining = self.capacity - self.cursor;
        if count as usize > remaining {
            return Err(Error::Overflow {
                requested: count as usize,
                remaining,
            });
        }

        let value = u64::from(bits & mask(count));
        let index = self.cursor / WORD_BITS;
        let offset = (self.cursor % WORD_BITS) as u32;

        words[index] |= value << offset;

        // The value straddles two words. Here `offset > 32`, so the shift is within 33..=63.
        if offset + count > WORD_BITS as u32 {
            words[index + 1] |= value >> (WORD_BITS as u32 - offset);
        }

        self.cursor += count as usize;
        Ok(())
    }
}
