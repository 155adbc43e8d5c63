//! Variable width unsigned integers.
//!
//! Abuses the fact that most integers sent over the network are small (health, ammo, counters).
//! A value is written with the narrowest of three fixed widths that fits it, behind a selector:
//!
//! ```text
//! selector  payload
//! 0         small bits
//! 1 0       medium bits
//! 1 1       large bits
//! ```
//!
//! There is no escape after the large width: anything that does not fit is an error.

use bits::BitCounter;

use crate::error::{Error, Result, Scalar};
use crate::{Packer, ReadBits, WriteBits};

/// Widest supported bin.
const MAX_WIDTH: u32 = 64;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UIntVariablePacker {
    small_bits: u32,
    medium_bits: u32,
    large_bits: u32,
    // Exclusive upper bounds, `2^bits`. Wider than u64 so that a 64-bit bin fits.
    small_max: u128,
    medium_max: u128,
    large_max: u128,
}

impl UIntVariablePacker {
    /// Create a packer from three strictly ascending widths, the largest at most 64 bits.
    pub fn new(small_bits: u32, medium_bits: u32, large_bits: u32) -> Result<UIntVariablePacker> {
        if small_bits == 0 {
            return Err(Error::invalid("small_bits", "must be at least 1"));
        }
        if medium_bits <= small_bits {
            return Err(Error::invalid(
                "medium_bits",
                format!("must be greater than small_bits ({} <= {})", medium_bits, small_bits),
            ));
        }
        if large_bits <= medium_bits {
            return Err(Error::invalid(
                "large_bits",
                format!("must be greater than medium_bits ({} <= {})", large_bits, medium_bits),
            ));
        }
        if large_bits > MAX_WIDTH {
            return Err(Error::invalid(
                "large_bits",
                format!("at most {} bits are supported, found {}", MAX_WIDTH, large_bits),
            ));
        }

        log::debug!(
            "variable uint packer: bins of {}/{}/{} bits",
            small_bits,
            medium_bits,
            large_bits
        );

        Ok(UIntVariablePacker {
            small_bits,
            medium_bits,
            large_bits,
            small_max: 1 << small_bits,
            medium_max: 1 << medium_bits,
            large_max: 1 << large_bits,
        })
    }

    pub fn bit_widths(&self) -> (u32, u32, u32) {
        (self.small_bits, self.medium_bits, self.large_bits)
    }

    /// The largest value that can be packed.
    pub fn max_value(&self) -> u64 {
        (self.large_max - 1) as u64
    }

    /// The exact number of bits `value` occupies once packed.
    pub fn bit_count_for(&self, value: u64) -> Result<u32> {
        let mut counter = BitCounter::new();
        self.pack(&mut counter, value)?;
        Ok(counter.bit_len() as u32)
    }

    /// Pack a value that may be absent, behind a presence bit.
    pub fn pack_nullable<W>(&self, writer: &mut W, value: Option<u64>) -> Result<()>
    where
        W: WriteBits,
    {
        match value {
            None => writer.write_bool(false)?,
            Some(value) => {
                writer.write_bool(true)?;
                self.pack(writer, value)?;
            }
        }
        Ok(())
    }

    pub fn unpack_nullable<R>(&self, reader: &mut R) -> Result<Option<u64>>
    where
        R: ReadBits,
    {
        if reader.read_bool()? {
            self.unpack(reader).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl Packer for UIntVariablePacker {
    type Value = u64;

    fn max_bit_count(&self) -> u32 {
        2 + self.large_bits
    }

    fn pack<W>(&self, writer: &mut W, value: u64) -> Result<()>
    where
        W: WriteBits,
    {
        let wide = u128::from(value);

        if wide < self.small_max {
            writer.write_bool(false)?;
            writer.write_u64(value, self.small_bits)?;
        } else if wide < self.medium_max {
            writer.write_bool(true)?;
            writer.write_bool(false)?;
            writer.write_u64(value, self.medium_bits)?;
        } else if wide < self.large_max {
            writer.write_bool(true)?;
            writer.write_bool(true)?;
            writer.write_u64(value, self.large_bits)?;
        } else {
            return Err(Error::OutOfRange {
                value: Scalar::UInt(value),
                max: Scalar::UInt(self.max_value()),
            });
        }

        Ok(())
    }

    fn unpack<R>(&self, reader: &mut R) -> Result<u64>
    where
        R: ReadBits,
    {
        let value = if !reader.read_bool()? {
            reader.read_u64(self.small_bits)?
        } else if !reader.read_bool()? {
            reader.read_u64(self.medium_bits)?
        } else {
            reader.read_u64(self.large_bits)?
        };
        Ok(value)
    }
}
