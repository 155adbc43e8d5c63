//! Author(s):
//! - Christofer Nolander (cnol@kth.se)
//!
//! Packers that quantize game state into the fewest bits that still meet a given precision.
//!
//! A packer is configured once (ranges and precision decide its bit widths) and then reused for
//! every value. Packing appends bits to any [`WriteBits`], unpacking consumes exactly the same
//! number of bits from a [`ReadBits`]. Writer and reader must agree on the configuration, nothing
//! about it is written to the stream.

mod error;
mod float;
mod math;
mod position;
mod quaternion;
mod uint;
mod vector;

pub use bits::{BitCounter, BitReader, BitWriter, ReadBits, WriteBits};

pub use error::{Error, Result, Scalar};
pub use float::FloatPacker;
pub use math::{bit_count_from_range, scale_from_uint, scale_to_uint};
pub use position::PositionPacker;
pub use quaternion::QuaternionPacker;
pub use uint::UIntVariablePacker;
pub use vector::{Vector2Packer, Vector3Packer};

pub trait Packer {
    type Value;

    /// The largest number of bits a single value may occupy.
    fn max_bit_count(&self) -> u32;

    fn pack<W>(&self, writer: &mut W, value: Self::Value) -> Result<()>
    where
        W: WriteBits;

    fn unpack<R>(&self, reader: &mut R) -> Result<Self::Value>
    where
        R: ReadBits;
}

/// Pack a single value into a buffer just large enough to hold it.
pub fn to_bytes<P: Packer>(packer: &P, value: P::Value) -> Result<Vec<u8>> {
    let bytes = (packer.max_bit_count() as usize + 7) / 8;
    let mut writer = BitWriter::with_capacity(bytes);
    packer.pack(&mut writer, value)?;
    Ok(writer.finish()?)
}

pub fn from_bytes<P: Packer>(packer: &P, bytes: &[u8]) -> Result<P::Value> {
    let mut reader = BitReader::new(bytes);
    packer.unpack(&mut reader)
}
