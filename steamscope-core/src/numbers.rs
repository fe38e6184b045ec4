//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 onto a grid index, returning `None` outside `[0, len)` or
/// for non-finite inputs.
#[must_use]
pub fn round_to_index(value: f64, len: usize) -> Option<usize> {
    if !value.is_finite() || len == 0 {
        return None;
    }
    let rounded = value.round();
    if rounded < 0.0 {
        return None;
    }
    let idx = cast::<f64, usize>(rounded)?;
    (idx < len).then_some(idx)
}

/// Floor a non-negative f64 onto a grid index, clamping to `len - 1`.
/// Returns `None` for empty grids or non-finite inputs.
#[must_use]
pub fn floor_to_index(value: f64, len: usize) -> Option<usize> {
    if !value.is_finite() || len == 0 {
        return None;
    }
    let floored = value.max(0.0).floor();
    let idx = cast::<f64, usize>(floored)?;
    Some(idx.min(len - 1))
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast(value).unwrap_or(0.0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast(value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_index_bounds_the_grid() {
        assert_eq!(round_to_index(2.4, 5), Some(2));
        assert_eq!(round_to_index(2.6, 5), Some(3));
        assert_eq!(round_to_index(-0.4, 5), Some(0));
        assert_eq!(round_to_index(-0.6, 5), None);
        assert_eq!(round_to_index(4.6, 5), None);
        assert_eq!(round_to_index(f64::NAN, 5), None);
        assert_eq!(round_to_index(1.0, 0), None);
    }

    #[test]
    fn floor_to_index_clamps() {
        assert_eq!(floor_to_index(3.9, 4), Some(3));
        assert_eq!(floor_to_index(9.0, 4), Some(3));
        assert_eq!(floor_to_index(-1.0, 4), Some(0));
        assert_eq!(floor_to_index(1.0, 0), None);
    }

    #[test]
    fn widening_casts_cover_zero() {
        assert!((usize_to_f64(3) - 3.0).abs() < f64::EPSILON);
        assert!((i64_to_f64(-2) + 2.0).abs() < f64::EPSILON);
    }
}
