use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

/// Scalar float type the recurrence runs in
pub trait Real:
    Copy
    + Debug
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
{
    const ZERO: Self;

    /// Narrowing conversion used once per compute call for the mapping origin
    fn from_f64(value: f64) -> Self;

    /// Pixel index to coordinate offset
    fn from_index(index: usize) -> Self;

    fn abs(self) -> Self;

    fn is_finite(self) -> bool;
}

impl Real for f32 {
    const ZERO: Self = 0.0;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        index as f32
    }

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Real for f64 {
    const ZERO: Self = 0.0;

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }

    #[inline]
    fn from_index(index: usize) -> Self {
        index as f64
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_narrows_to_nearest() {
        assert_eq!(<f32 as Real>::from_f64(0.1), 0.1f32);
        assert_eq!(<f64 as Real>::from_f64(0.1), 0.1f64);
    }

    #[test]
    fn test_abs() {
        assert_eq!(Real::abs(-2.5f32), 2.5);
        assert_eq!(Real::abs(-0.0f64), 0.0);
    }

    #[test]
    fn test_narrowing_can_overflow() {
        assert!(!<f32 as Real>::from_f64(1e39).is_finite());
        assert!(<f64 as Real>::from_f64(1e39).is_finite());
    }
}
