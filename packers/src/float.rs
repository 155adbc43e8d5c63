use crate::error::{Error, Result, Scalar};
use crate::math::{bit_count_from_range, max_uint, scale_from_uint, scale_to_uint};
use crate::{Packer, ReadBits, WriteBits};

/// Packs a float in `[-max, max]` as a sign bit followed by a quantized magnitude.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FloatPacker {
    max: f32,
    precision: f32,
    bit_count: u32,
    max_magnitude: u32,
}

impl FloatPacker {
    pub fn new(max: f32, precision: f32) -> Result<FloatPacker> {
        FloatPacker::named("max", "precision", max, precision)
    }

    /// Like `new`, but errors name the parameters as given (eg. `max.y`).
    pub(crate) fn named(
        max_name: &str,
        precision_name: &str,
        max: f32,
        precision: f32,
    ) -> Result<FloatPacker> {
        check_positive(max_name, max)?;
        check_positive(precision_name, precision)?;

        let steps = (f64::from(max) / f64::from(precision)).ceil();
        let magnitude_bits = bit_count_from_range(0, steps as i64)?;

        if magnitude_bits > 31 {
            return Err(Error::invalid(
                precision_name,
                format!(
                    "{} / {} needs {} magnitude bits, at most 31 fit next to the sign",
                    max, precision, magnitude_bits
                ),
            ));
        }

        let bit_count = 1 + magnitude_bits;
        log::debug!(
            "float packer: max {} precision {} uses {} bits",
            max,
            precision,
            bit_count
        );

        Ok(FloatPacker {
            max,
            precision,
            bit_count,
            max_magnitude: max_uint(magnitude_bits),
        })
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn precision(&self) -> f32 {
        self.precision
    }

    /// Number of bits written per value, sign included.
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    pub fn byte_count(&self) -> usize {
        (self.bit_count as usize + 7) / 8
    }
}

pub(crate) fn check_positive(name: &str, value: f32) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(
            name,
            format!("must be a positive finite number, found {}", value),
        ))
    }
}

impl Packer for FloatPacker {
    type Value = f32;

    fn max_bit_count(&self) -> u32 {
        self.bit_count
    }

    fn pack<W>(&self, writer: &mut W, value: f32) -> Result<()>
    where
        W: WriteBits,
    {
        if value.is_nan() || value.abs() > self.max {
            return Err(Error::OutOfRange {
                value: Scalar::Float(value),
                max: Scalar::Float(self.max),
            });
        }

        let magnitude = scale_to_uint(value.abs(), 0.0, self.max, 0, self.max_magnitude)?;

        writer.write_bool(value < 0.0)?;
        writer.write(magnitude, self.bit_count - 1)?;
        Ok(())
    }

    fn unpack<R>(&self, reader: &mut R) -> Result<f32>
    where
        R: ReadBits,
    {
        let negative = reader.read_bool()?;
        let magnitude = reader.read(self.bit_count - 1)?;

        // Never produce -0.0
        if magnitude == 0 {
            return Ok(0.0);
        }

        let value = scale_from_uint(magnitude, 0, self.max_magnitude, 0.0, self.max)?;
        Ok(if negative { -value } else { value })
    }
}
