use cgmath::{Quaternion, Vector3};
use std::f32::consts::FRAC_1_SQRT_2;

use crate::error::{Error, Result};
use crate::math::{max_uint, scale_from_uint, scale_to_uint};
use crate::{Packer, ReadBits, WriteBits};

/// Packs a rotation using the "smallest three" scheme.
///
/// The largest component of a unit quaternion can be recomputed from the other three, and those
/// never exceed `1/sqrt(2)` in magnitude. Only the index of the largest component (2 bits) and the
/// three remaining components are written. Since `q` and `-q` describe the same rotation, the
/// quaternion is flipped so that the dropped component is positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct QuaternionPacker {
    bits_per_element: u32,
    max_uint: u32,
}

impl QuaternionPacker {
    pub fn new(bits_per_element: u32) -> Result<QuaternionPacker> {
        if bits_per_element == 0 || bits_per_element > 31 {
            return Err(Error::invalid(
                "bits_per_element",
                format!("must be within 1..=31, found {}", bits_per_element),
            ));
        }

        Ok(QuaternionPacker {
            bits_per_element,
            max_uint: max_uint(bits_per_element),
        })
    }

    pub fn bits_per_element(&self) -> u32 {
        self.bits_per_element
    }

    pub fn bit_count(&self) -> u32 {
        2 + 3 * self.bits_per_element
    }

    /// Distance between two neighbouring encodable component values.
    pub fn resolution(&self) -> f32 {
        2.0 * FRAC_1_SQRT_2 / self.max_uint as f32
    }
}

impl Packer for QuaternionPacker {
    type Value = Quaternion<f32>;

    fn max_bit_count(&self) -> u32 {
        self.bit_count()
    }

    fn pack<W>(&self, writer: &mut W, value: Quaternion<f32>) -> Result<()>
    where
        W: WriteBits,
    {
        let mut components = [value.v.x, value.v.y, value.v.z, value.s];

        let length = components.iter().map(|c| c * c).sum::<f32>().sqrt();
        if !(length > 0.0) || !length.is_finite() {
            return Err(Error::invalid(
                "value",
                format!("can't pack the quaternion {:?}", components),
            ));
        }

        let mut largest = 0;
        for i in 1..4 {
            if components[i].abs() > components[largest].abs() {
                largest = i;
            }
        }

        let sign = if components[largest] < 0.0 { -1.0 } else { 1.0 };
        for component in &mut components {
            *component *= sign / length;
        }

        writer.write(largest as u32, 2)?;
        for (i, &component) in components.iter().enumerate() {
            if i == largest {
                continue;
            }
            let quantized = scale_to_uint(component, -FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0, self.max_uint)?;
            writer.write(quantized, self.bits_per_element)?;
        }

        Ok(())
    }

    fn unpack<R>(&self, reader: &mut R) -> Result<Quaternion<f32>>
    where
        R: ReadBits,
    {
        let largest = reader.read(2)? as usize;

        let mut components = [0.0f32; 4];
        let mut sum = 0.0;
        for (i, component) in components.iter_mut().enumerate() {
            if i == largest {
                continue;
            }
            let quantized = reader.read(self.bits_per_element)?;
            *component = scale_from_uint(quantized, 0, self.max_uint, -FRAC_1_SQRT_2, FRAC_1_SQRT_2)?;
            sum += *component * *component;
        }

        components[largest] = f32::max(1.0 - sum, 0.0).sqrt();

        let [x, y, z, w] = components;
        Ok(Quaternion::from_sv(w, Vector3::new(x, y, z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BitReader, BitWriter};

    fn round_trip(packer: &QuaternionPacker, value: Quaternion<f32>) -> Quaternion<f32> {
        let mut writer = BitWriter::with_capacity(8);
        packer.pack(&mut writer, value).unwrap();
        assert_eq!(writer.bit_len() as u32, packer.bit_count());
        let bytes = writer.finish().unwrap();
        packer.unpack(&mut BitReader::new(&bytes)).unwrap()
    }

    #[test]
    fn identity() {
        let packer = QuaternionPacker::new(10).unwrap();
        let result = round_trip(&packer, Quaternion::new(1.0, 0.0, 0.0, 0.0));

        assert!((result.s - 1.0).abs() < 1e-5);
        assert!(result.v.x.abs() <= packer.resolution());
        assert!(result.v.y.abs() <= packer.resolution());
        assert!(result.v.z.abs() <= packer.resolution());
    }

    #[test]
    fn negative_largest_component_is_flipped() {
        let packer = QuaternionPacker::new(12).unwrap();
        let result = round_trip(&packer, Quaternion::new(0.0, 0.0, -1.0, 0.0));

        assert!((result.v.y - 1.0).abs() < 1e-5);
        assert!(result.s.abs() <= packer.resolution());
    }

    #[test]
    fn unnormalized_input() {
        let packer = QuaternionPacker::new(12).unwrap();
        let result = round_trip(&packer, Quaternion::new(0.0, 0.0, 0.0, 4.0));
        assert!((result.v.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_quaternion_fails() {
        let packer = QuaternionPacker::new(12).unwrap();
        let mut writer = BitWriter::with_capacity(8);
        assert!(packer
            .pack(&mut writer, Quaternion::new(0.0, 0.0, 0.0, 0.0))
            .is_err());
    }

    #[test]
    fn element_width_limits() {
        assert!(QuaternionPacker::new(0).is_err());
        assert!(QuaternionPacker::new(32).is_err());
        assert_eq!(QuaternionPacker::new(9).unwrap().bit_count(), 29);
    }
}
