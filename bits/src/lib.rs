//! Encoding raw bits into fixed-capacity buffers.
//!
//! Bits are stored in 64-bit words. Bit 0 of the stream is the least significant bit of the first
//! byte, so the exported bytes are the little-endian representation of the words.

mod counter;

pub mod read;
pub mod write;

use thiserror::Error;

pub use counter::BitCounter;
pub use read::{BitReader, ReadBits};
pub use write::{BitWriter, WriteBits};

/// Number of bits in a storage word.
pub(crate) const WORD_BITS: usize = 64;

/// Largest number of bits that may be transferred by a single `write` or `read`.
pub const MAX_BITS_PER_CALL: u32 = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("buffer overflow: tried to write {requested} bits but only {remaining} remain")]
    Overflow { requested: usize, remaining: usize },

    #[error("buffer underflow: tried to read {requested} bits but only {remaining} remain")]
    Underflow { requested: usize, remaining: usize },

    #[error("the buffer has already been released")]
    Disposed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Mask selecting the `count` least significant bits.
pub(crate) fn mask(count: u32) -> u32 {
    u32::max_value().checked_shr(32 - count).unwrap_or(0)
}

pub(crate) fn check_count(count: u32, limit: u32) -> Result<()> {
    if count > limit {
        Err(Error::InvalidArgument {
            name: "count",
            reason: format!(
                "can't transfer {} bits in one call, the limit is {}",
                count, limit
            ),
        })
    } else {
        Ok(())
    }
}

/// Number of words required to hold `bytes` bytes.
pub(crate) fn words_for(bytes: usize) -> usize {
    (bytes + 7) / 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_edges() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(1), 1);
        assert_eq!(mask(31), 0x7fff_ffff);
        assert_eq!(mask(32), u32::max_value());
    }

    #[test]
    fn count_limit() {
        assert!(check_count(32, MAX_BITS_PER_CALL).is_ok());
        assert!(matches!(
            check_count(33, MAX_BITS_PER_CALL),
            Err(Error::InvalidArgument { name: "count", .. })
        ));
    }
}
