use cgmath::{Point3, Vector3};

use crate::error::{Error, Result};
use crate::float::check_positive;
use crate::math::{bit_count_from_range, max_uint, scale_from_uint, scale_to_uint};
use crate::{Packer, ReadBits, WriteBits};

/// Packs a point inside an axis-aligned box as unsigned offsets from the box's minimum corner.
///
/// Every axis gets just enough bits to cover `(max - min) / precision` steps. Points outside the
/// box are clamped onto it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionPacker {
    precision: f32,
    axes: [Axis; 3],
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Axis {
    min: f32,
    max: f32,
    bit_count: u32,
    max_uint: u32,
}

impl Axis {
    fn new(name: &str, min: f32, max: f32, precision: f32) -> Result<Axis> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::invalid(
                format!("bounds.{}", name),
                format!("[{}, {}] is not finite", min, max),
            ));
        }
        if min >= max {
            return Err(Error::invalid(
                format!("min.{}", name),
                format!("must be less than max.{} ({} >= {})", name, min, max),
            ));
        }

        let steps = ((f64::from(max) - f64::from(min)) / f64::from(precision)).round();
        let bit_count = bit_count_from_range(0, f64::max(steps, 1.0) as i64)?;

        if bit_count > 32 {
            return Err(Error::invalid(
                "precision",
                format!(
                    "axis {} needs {} bits at precision {}, at most 32 are supported",
                    name, bit_count, precision
                ),
            ));
        }

        Ok(Axis {
            min,
            max,
            bit_count,
            max_uint: max_uint(bit_count),
        })
    }

    fn pack<W: WriteBits>(&self, writer: &mut W, value: f32) -> Result<()> {
        if value < self.min || value > self.max {
            log::trace!("clamping {} into [{}, {}]", value, self.min, self.max);
        }

        let quantized = scale_to_uint(value, self.min, self.max, 0, self.max_uint)?;
        writer.write(quantized, self.bit_count)?;
        Ok(())
    }

    fn unpack<R: ReadBits>(&self, reader: &mut R) -> Result<f32> {
        let quantized = reader.read(self.bit_count)?;
        scale_from_uint(quantized, 0, self.max_uint, self.min, self.max)
    }
}

impl PositionPacker {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>, precision: f32) -> Result<PositionPacker> {
        check_positive("precision", precision)?;

        let axes = [
            Axis::new("x", min.x, max.x, precision)?,
            Axis::new("y", min.y, max.y, precision)?,
            Axis::new("z", min.z, max.z, precision)?,
        ];

        let packer = PositionPacker { precision, axes };
        log::debug!(
            "position packer: {:?} bits per axis, {} in total",
            packer.axis_bit_counts(),
            packer.bit_count()
        );

        Ok(packer)
    }

    pub fn min(&self) -> Vector3<f32> {
        let [x, y, z] = self.axes;
        Vector3::new(x.min, y.min, z.min)
    }

    pub fn max(&self) -> Vector3<f32> {
        let [x, y, z] = self.axes;
        Vector3::new(x.max, y.max, z.max)
    }

    pub fn precision(&self) -> f32 {
        self.precision
    }

    pub fn axis_bit_counts(&self) -> [u32; 3] {
        let [x, y, z] = self.axes;
        [x.bit_count, y.bit_count, z.bit_count]
    }

    /// Total number of bits written per point.
    pub fn bit_count(&self) -> u32 {
        self.axes.iter().map(|axis| axis.bit_count).sum()
    }

    /// Number of bytes a writer reports after packing a single point.
    pub fn byte_count(&self) -> usize {
        (self.bit_count() as usize + 7) / 8
    }
}

impl Packer for PositionPacker {
    type Value = Point3<f32>;

    fn max_bit_count(&self) -> u32 {
        self.bit_count()
    }

    fn pack<W>(&self, writer: &mut W, value: Point3<f32>) -> Result<()>
    where
        W: WriteBits,
    {
        let [x, y, z] = &self.axes;
        x.pack(writer, value.x)?;
        y.pack(writer, value.y)?;
        z.pack(writer, value.z)?;
        Ok(())
    }

    fn unpack<R>(&self, reader: &mut R) -> Result<Point3<f32>>
    where
        R: ReadBits,
    {
        let [x, y, z] = &self.axes;
        let x = x.unpack(reader)?;
        let y = y.unpack(reader)?;
        let z = z.unpack(reader)?;
        Ok(Point3 { x, y, z })
    }
}
