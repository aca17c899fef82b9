//! Float helpers that do not need `std`

/// Absolute value
#[inline]
pub fn abs(x: f32) -> f32 {
    if x < 0.0 {
        -x
    } else {
        x
    }
}

/// Clamp to zero or above; NaN maps to zero
#[inline]
pub fn non_negative(x: f32) -> f32 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

/// Seconds to whole microseconds, rounded to nearest; negative and NaN map to zero
#[inline]
pub fn micros(seconds: f32) -> u64 {
    (non_negative(seconds) as f64 * 1_000_000.0 + 0.5) as u64
}

/// Microseconds to seconds
#[inline]
pub fn seconds(micros: u64) -> f32 {
    (micros as f64 / 1_000_000.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(2.5), 2.5);
        assert_eq!(non_negative(-1.0), 0.0);
        assert_eq!(non_negative(f32::NAN), 0.0);
    }

    #[test]
    fn test_abs() {
        assert_eq!(abs(-3.0), 3.0);
        assert_eq!(abs(3.0), 3.0);
    }

    #[test]
    fn test_micros_round_trip() {
        assert_eq!(micros(0.1), 100_000);
        assert_eq!(micros(58.0), 58_000_000);
        assert_eq!(micros(-1.0), 0);
        assert_eq!(micros(f32::NAN), 0);
        assert_eq!(seconds(5_000_000), 5.0);
    }
}
