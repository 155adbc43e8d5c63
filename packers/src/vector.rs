use cgmath::{Vector2, Vector3};

use crate::error::Result;
use crate::float::FloatPacker;
use crate::{Packer, ReadBits, WriteBits};

/// Packs each axis of a 2D vector with its own [`FloatPacker`], in the order x, y.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector2Packer {
    x: FloatPacker,
    y: FloatPacker,
}

/// Packs each axis of a 3D vector with its own [`FloatPacker`], in the order x, y, z.
///
/// Axes are independent, so a tighter range on one axis (eg. height) saves bits on that axis
/// only.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vector3Packer {
    x: FloatPacker,
    y: FloatPacker,
    z: FloatPacker,
}

impl Vector2Packer {
    pub fn new(max: Vector2<f32>, precision: Vector2<f32>) -> Result<Vector2Packer> {
        Ok(Vector2Packer {
            x: FloatPacker::named("max.x", "precision.x", max.x, precision.x)?,
            y: FloatPacker::named("max.y", "precision.y", max.y, precision.y)?,
        })
    }

    pub fn with_uniform_precision(max: Vector2<f32>, precision: f32) -> Result<Vector2Packer> {
        Vector2Packer::new(max, Vector2::new(precision, precision))
    }

    pub fn x(&self) -> &FloatPacker {
        &self.x
    }

    pub fn y(&self) -> &FloatPacker {
        &self.y
    }

    pub fn bit_count(&self) -> u32 {
        self.x.bit_count() + self.y.bit_count()
    }

    pub fn byte_count(&self) -> usize {
        (self.bit_count() as usize + 7) / 8
    }
}

impl Vector3Packer {
    pub fn new(max: Vector3<f32>, precision: Vector3<f32>) -> Result<Vector3Packer> {
        Ok(Vector3Packer {
            x: FloatPacker::named("max.x", "precision.x", max.x, precision.x)?,
            y: FloatPacker::named("max.y", "precision.y", max.y, precision.y)?,
            z: FloatPacker::named("max.z", "precision.z", max.z, precision.z)?,
        })
    }

    pub fn with_uniform_precision(max: Vector3<f32>, precision: f32) -> Result<Vector3Packer> {
        Vector3Packer::new(max, Vector3::new(precision, precision, precision))
    }

    pub fn x(&self) -> &FloatPacker {
        &self.x
    }

    pub fn y(&self) -> &FloatPacker {
        &self.y
    }

    pub fn z(&self) -> &FloatPacker {
        &self.z
    }

    pub fn bit_count(&self) -> u32 {
        self.x.bit_count() + self.y.bit_count() + self.z.bit_count()
    }

    pub fn byte_count(&self) -> usize {
        (self.bit_count() as usize + 7) / 8
    }
}

impl Packer for Vector2Packer {
    type Value = Vector2<f32>;

    fn max_bit_count(&self) -> u32 {
        self.bit_count()
    }

    fn pack<W>(&self, writer: &mut W, value: Vector2<f32>) -> Result<()>
    where
        W: WriteBits,
    {
        self.x.pack(writer, value.x)?;
        self.y.pack(writer, value.y)?;
        Ok(())
    }

    fn unpack<R>(&self, reader: &mut R) -> Result<Vector2<f32>>
    where
        R: ReadBits,
    {
        let x = self.x.unpack(reader)?;
        let y = self.y.unpack(reader)?;
        Ok(Vector2 { x, y })
    }
}

impl Packer for Vector3Packer {
    type Value = Vector3<f32>;

    fn max_bit_count(&self) -> u32 {
        self.bit_count()
    }

    fn pack<W>(&self, writer: &mut W, value: Vector3<f32>) -> Result<()>
    where
        W: WriteBits,
    {
        self.x.pack(writer, value.x)?;
        self.y.pack(writer, value.y)?;
        self.z.pack(writer, value.z)?;
        Ok(())
    }

    fn unpack<R>(&self, reader: &mut R) -> Result<Vector3<f32>>
    where
        R: ReadBits,
    {
        let x = self.x.unpack(reader)?;
        let y = self.y.unpack(reader)?;
        let z = self.z.unpack(reader)?;
        Ok(Vector3 { x, y, z })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitReader, BitWriter, Error};

    #[test]
    fn vector2_round_trip() {
        let packer = Vector2Packer::new(Vector2::new(10.0, 1.0), Vector2::new(0.01, 0.001)).unwrap();
        assert_eq!(packer.bit_count(), 11 + 11);

        let mut writer = BitWriter::with_capacity(8);
        packer.pack(&mut writer, Vector2::new(-7.125, 0.5)).unwrap();
        packer.pack(&mut writer, Vector2::new(0.0, 0.0)).unwrap();
        assert_eq!(writer.bit_len(), 44);

        let bytes = writer.finish().unwrap();
        let mut reader = BitReader::new(&bytes);

        let first = packer.unpack(&mut reader).unwrap();
        assert!((first.x + 7.125).abs() <= 0.01);
        assert!((first.y - 0.5).abs() <= 0.001);

        assert_eq!(packer.unpack(&mut reader).unwrap(), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn axes_are_written_in_order() {
        let packer = Vector3Packer::with_uniform_precision(Vector3::new(1.0, 1.0, 1.0), 1.0).unwrap();
        assert_eq!(packer.bit_count(), 6);

        let mut writer = BitWriter::with_capacity(8);
        packer.pack(&mut writer, Vector3::new(1.0, -1.0, 0.0)).unwrap();

        // x: sign 0, magnitude 1; y: sign 1, magnitude 1; z: sign 0, magnitude 0
        assert_eq!(writer.to_vec().unwrap(), vec![0b00_11_10]);
    }

    #[test]
    fn error_names_the_axis() {
        let error = Vector3Packer::with_uniform_precision(Vector3::new(1.0, 0.0, 1.0), 0.1).unwrap_err();
        match error {
            Error::InvalidArgument { name, .. } => assert_eq!(name, "max.y"),
            other => panic!("unexpected {:?}", other),
        }

        let error = Vector2Packer::new(Vector2::new(1.0, 1.0), Vector2::new(0.1, -0.1)).unwrap_err();
        match error {
            Error::InvalidArgument { name, .. } => assert_eq!(name, "precision.y"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
