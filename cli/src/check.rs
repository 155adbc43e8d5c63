//! Round-trip random samples through a configured packer and measure the reconstruction error.

use cgmath::{Point3, Quaternion, Vector2, Vector3};
use packers::{FloatPacker, Packer};
use rand::{rngs::StdRng, Rng};

use crate::schema::FieldPacker;
use crate::Result;

/// The outcome of checking one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub samples: usize,
    pub failures: usize,
    pub worst_error: f32,
}

/// The error of a single sample.
#[derive(Debug, Copy, Clone)]
struct Sample {
    error: f32,
    within: bool,
}

impl Sample {
    /// Combine the `(expected, actual, tolerance)` of every axis.
    fn axes(axes: &[(f32, f32, f32)]) -> Sample {
        let mut sample = Sample {
            error: 0.0,
            within: true,
        };
        for &(expected, actual, tolerance) in axes {
            let error = (expected - actual).abs();
            sample.error = f32::max(sample.error, error);
            sample.within &= error <= tolerance;
        }
        sample
    }
}

/// Pack zero (or its closest equivalent) and `samples` random values, then unpack them again.
pub fn check_field(packer: &FieldPacker, rng: &mut StdRng, samples: usize) -> Result<Report> {
    let mut report = Report {
        samples: 0,
        failures: 0,
        worst_error: 0.0,
    };

    for i in 0..=samples {
        let sample = check_sample(packer, rng, i == 0)?;

        report.samples += 1;
        report.worst_error = f32::max(report.worst_error, sample.error);
        if !sample.within {
            report.failures += 1;
        }
    }

    Ok(report)
}

fn round_trip<P: Packer>(packer: &P, value: P::Value) -> Result<P::Value> {
    let bytes = packers::to_bytes(packer, value)?;
    Ok(packers::from_bytes(packer, &bytes)?)
}

fn uniform(rng: &mut StdRng, packer: &FloatPacker) -> f32 {
    rng.gen_range(-packer.max(), packer.max())
}

fn check_sample(packer: &FieldPacker, rng: &mut StdRng, zero: bool) -> Result<Sample> {
    let sample = match packer {
        FieldPacker::Float(packer) => {
            let value = if zero { 0.0 } else { uniform(rng, packer) };
            let result = round_trip(packer, value)?;
            Sample::axes(&[(value, result, packer.precision())])
        }

        FieldPacker::Vector2(packer) => {
            let value = if zero {
                Vector2::new(0.0, 0.0)
            } else {
                Vector2::new(uniform(rng, packer.x()), uniform(rng, packer.y()))
            };
            let result = round_trip(packer, value)?;
            Sample::axes(&[
                (value.x, result.x, packer.x().precision()),
                (value.y, result.y, packer.y().precision()),
            ])
        }

        FieldPacker::Vector3(packer) => {
            let value = if zero {
                Vector3::new(0.0, 0.0, 0.0)
            } else {
                Vector3::new(
                    uniform(rng, packer.x()),
                    uniform(rng, packer.y()),
                    uniform(rng, packer.z()),
                )
            };
            let result = round_trip(packer, value)?;
            Sample::axes(&[
                (value.x, result.x, packer.x().precision()),
                (value.y, result.y, packer.y().precision()),
                (value.z, result.z, packer.z().precision()),
            ])
        }

        FieldPacker::Position(packer) => {
            let (min, max) = (packer.min(), packer.max());
            let mut axis = |min: f32, max: f32| {
                if zero {
                    f32::min(f32::max(0.0, min), max)
                } else {
                    rng.gen_range(min, max)
                }
            };
            let value = Point3::new(axis(min.x, max.x), axis(min.y, max.y), axis(min.z, max.z));
            let result = round_trip(packer, value)?;
            let precision = packer.precision();
            Sample::axes(&[
                (value.x, result.x, precision),
                (value.y, result.y, precision),
                (value.z, result.z, precision),
            ])
        }

        FieldPacker::Quaternion(packer) => {
            let value = if zero {
                Quaternion::new(1.0, 0.0, 0.0, 0.0)
            } else {
                random_rotation(rng)
            };
            let result = round_trip(packer, value)?;

            // q and -q are the same rotation
            let dot = value.s * result.s
                + value.v.x * result.v.x
                + value.v.y * result.v.y
                + value.v.z * result.v.z;
            let result = result * dot.signum();

            let tolerance = 2.0 * packer.resolution();
            Sample::axes(&[
                (value.s, result.s, tolerance),
                (value.v.x, result.v.x, tolerance),
                (value.v.y, result.v.y, tolerance),
                (value.v.z, result.v.z, tolerance),
            ])
        }

        FieldPacker::UIntVariable(packer) => {
            let value = if zero {
                0
            } else {
                rng.gen::<u64>() & packer.max_value()
            };
            let result = round_trip(packer, value)?;
            Sample {
                error: (value as f64 - result as f64).abs() as f32,
                within: value == result,
            }
        }
    };

    Ok(sample)
}

fn random_rotation(rng: &mut StdRng) -> Quaternion<f32> {
    loop {
        let components: [f32; 4] = [
            rng.gen_range(-1.0, 1.0),
            rng.gen_range(-1.0, 1.0),
            rng.gen_range(-1.0, 1.0),
            rng.gen_range(-1.0, 1.0),
        ];
        let length = components.iter().map(|c| c * c).sum::<f32>().sqrt();
        if length > 1e-3 {
            let [x, y, z, w] = components;
            return Quaternion::new(w / length, x / length, y / length, z / length);
        }
    }
}
