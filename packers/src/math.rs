//! Bit counts and the linear mapping between float ranges and integer ranges.

use crate::error::{Error, Result};

/// Number of bits needed to distinguish every integer in `[min, max]` (inclusive).
pub fn bit_count_from_range(min: i64, max: i64) -> Result<u32> {
    if min >= max {
        return Err(Error::invalid(
            "range",
            format!("min ({}) must be less than max ({})", min, max),
        ));
    }

    let span = (i128::from(max) - i128::from(min)) as u128;
    Ok(128 - span.leading_zeros())
}

/// Largest value representable with `bits` bits (1..=32).
pub(crate) fn max_uint(bits: u32) -> u32 {
    u32::max_value() >> (32 - bits)
}

/// Map `value` from `[src_min, src_max]` onto `[dst_min, dst_max]`, rounding to the nearest
/// integer. Values outside the source range are clamped to its bounds.
pub fn scale_to_uint(value: f32, src_min: f32, src_max: f32, dst_min: u32, dst_max: u32) -> Result<u32> {
    check_ranges(src_min, src_max, dst_min, dst_max)?;

    if value.is_nan() {
        return Err(Error::invalid("value", "can't quantize NaN"));
    }
    if value <= src_min {
        return Ok(dst_min);
    }
    if value >= src_max {
        return Ok(dst_max);
    }

    let relative = (f64::from(value) - f64::from(src_min)) / (f64::from(src_max) - f64::from(src_min));
    let scaled = relative * f64::from(dst_max - dst_min) + f64::from(dst_min);

    Ok((scaled + 0.5) as u32)
}

/// Inverse of [`scale_to_uint`]: map `value` from `[src_min, src_max]` back onto
/// `[dst_min, dst_max]`.
pub fn scale_from_uint(value: u32, src_min: u32, src_max: u32, dst_min: f32, dst_max: f32) -> Result<f32> {
    check_ranges(dst_min, dst_max, src_min, src_max)?;

    let value = u32::min(u32::max(value, src_min), src_max);
    let relative = f64::from(value - src_min) / f64::from(src_max - src_min);
    let scaled = relative * (f64::from(dst_max) - f64::from(dst_min)) + f64::from(dst_min);

    Ok(scaled as f32)
}

fn check_ranges(float_min: f32, float_max: f32, uint_min: u32, uint_max: u32) -> Result<()> {
    if !(float_min < float_max) || !float_min.is_finite() || !float_max.is_finite() {
        return Err(Error::invalid(
            "float range",
            format!("[{}, {}] is empty or not finite", float_min, float_max),
        ));
    }
    if uint_min >= uint_max {
        return Err(Error::invalid(
            "integer range",
            format!("[{}, {}] is empty", uint_min, uint_max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_counts() {
        assert_eq!(bit_count_from_range(0, 1).unwrap(), 1);
        assert_eq!(bit_count_from_range(0, 2).unwrap(), 2);
        assert_eq!(bit_count_from_range(0, 1000).unwrap(), 10);
        assert_eq!(bit_count_from_range(0, 1023).unwrap(), 10);
        assert_eq!(bit_count_from_range(0, 1024).unwrap(), 11);
        assert_eq!(bit_count_from_range(1000, 2000).unwrap(), 10);
        assert_eq!(bit_count_from_range(-8, 7).unwrap(), 4);
        assert_eq!(bit_count_from_range(0, i64::from(i32::max_value())).unwrap(), 31);
        assert_eq!(bit_count_from_range(i64::min_value(), i64::max_value()).unwrap(), 64);
    }

    #[test]
    fn empty_range_is_invalid() {
        assert!(matches!(
            bit_count_from_range(0, 0),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(matches!(
            bit_count_from_range(10, 0),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn max_uint_edges() {
        assert_eq!(max_uint(1), 1);
        assert_eq!(max_uint(10), 1023);
        assert_eq!(max_uint(32), u32::max_value());
    }

    #[test]
    fn scale_endpoints_are_exact() {
        assert_eq!(scale_to_uint(-10.0, -10.0, 10.0, 0, 1000).unwrap(), 0);
        assert_eq!(scale_to_uint(10.0, -10.0, 10.0, 0, 1000).unwrap(), 1000);
        assert_eq!(scale_to_uint(0.0, -10.0, 10.0, 0, 1000).unwrap(), 500);

        assert_eq!(scale_from_uint(0, 0, 1000, -10.0, 10.0).unwrap(), -10.0);
        assert_eq!(scale_from_uint(1000, 0, 1000, -10.0, 10.0).unwrap(), 10.0);
        assert_eq!(scale_from_uint(500, 0, 1000, -10.0, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn scale_clamps_to_range() {
        assert_eq!(scale_to_uint(-11.0, -10.0, 10.0, 5, 10).unwrap(), 5);
        assert_eq!(scale_to_uint(1e9, -10.0, 10.0, 5, 10).unwrap(), 10);
        assert_eq!(scale_from_uint(20, 5, 10, 0.0, 1.0).unwrap(), 1.0);
    }

    #[test]
    fn scale_round_trip_within_one_step() {
        let step = 100.0 / 1023.0;
        let mut value = 0.0f32;
        while value <= 100.0 {
            let quantized = scale_to_uint(value, 0.0, 100.0, 0, 1023).unwrap();
            let restored = scale_from_uint(quantized, 0, 1023, 0.0, 100.0).unwrap();
            assert!((restored - value).abs() <= step / 2.0 + 1e-4, "{} -> {}", value, restored);
            value += 0.37;
        }
    }

    #[test]
    fn scale_is_monotonic() {
        let mut previous = 0;
        for i in 0..=1000 {
            let value = i as f32 / 100.0;
            let quantized = scale_to_uint(value, 0.0, 10.0, 0, 255).unwrap();
            assert!(quantized >= previous);
            previous = quantized;
        }
    }

    #[test]
    fn degenerate_ranges_fail() {
        assert!(scale_to_uint(1.0, 1.0, 1.0, 0, 10).is_err());
        assert!(scale_to_uint(1.0, 0.0, 1.0, 10, 10).is_err());
        assert!(scale_to_uint(1.0, 2.0, 1.0, 0, 10).is_err());
        assert!(scale_from_uint(1, 3, 3, 0.0, 1.0).is_err());
        assert!(scale_from_uint(1, 0, 3, 1.0, 1.0).is_err());
        assert!(scale_to_uint(std::f32::NAN, 0.0, 1.0, 0, 10).is_err());
    }
}
