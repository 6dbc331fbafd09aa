use std::ops::{Add, BitAnd, BitOr, Mul, Sub};

use wide::{f32x4, f32x8, f64x2, f64x4, i32x4, i32x8, i64x2, i64x4, CmpLe};

use super::Real;

/// One hardware vector register of independent pixels
///
/// Masks are vectors of the same type with every bit of an active lane set,
/// so they combine with `&`/`|` and reinterpret as signed integer lanes of
/// value `-1`. Per-lane escape counters live in the matching integer vector.
pub trait Lanes:
    Copy
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
{
    type Scalar: Real;
    type Counter: Copy;

    const LANES: usize;

    fn splat(value: Self::Scalar) -> Self;

    fn from_fn<F: FnMut(usize) -> Self::Scalar>(f: F) -> Self;

    fn abs(self) -> Self;

    /// Lane-wise `self <= rhs` as a mask
    fn le_mask(self, rhs: Self) -> Self;

    /// Mask with every lane set
    fn all_active() -> Self;

    /// One bit per lane, lane 0 in bit 0
    fn bitmask(self) -> u32;

    fn zero_counter() -> Self::Counter;

    /// Add 1 to the counter of every lane set in `mask`
    fn count_active(counter: Self::Counter, mask: Self) -> Self::Counter;

    /// Write the first `out.len()` lane counters (at most `LANES`)
    fn store_counts(counter: Self::Counter, out: &mut [u32]);
}

macro_rules! impl_lanes {
    ($vector:ty, $scalar:ty, $counter:ty, $int:ty, $lanes:expr) => {
        impl Lanes for $vector {
            type Scalar = $scalar;
            type Counter = $counter;

            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                <$vector>::splat(value)
            }

            #[inline(always)]
            fn from_fn<F: FnMut(usize) -> $scalar>(mut f: F) -> Self {
                let mut lanes = [0.0 as $scalar; $lanes];
                for (i, lane) in lanes.iter_mut().enumerate() {
                    *lane = f(i);
                }
                bytemuck::cast(lanes)
            }

            #[inline(always)]
            fn abs(self) -> Self {
                <$vector>::abs(self)
            }

            #[inline(always)]
            fn le_mask(self, rhs: Self) -> Self {
                self.cmp_le(rhs)
            }

            #[inline(always)]
            fn all_active() -> Self {
                bytemuck::cast(<$counter>::splat(-1))
            }

            #[inline(always)]
            fn bitmask(self) -> u32 {
                self.move_mask() as u32
            }

            #[inline(always)]
            fn zero_counter() -> $counter {
                <$counter>::splat(0)
            }

            #[inline(always)]
            fn count_active(counter: $counter, mask: Self) -> $counter {
                // active lanes reinterpret as -1
                counter - bytemuck::cast::<$vector, $counter>(mask)
            }

            #[inline]
            fn store_counts(counter: $counter, out: &mut [u32]) {
                let counts: [$int; $lanes] = bytemuck::cast(counter);
                for (dst, count) in out.iter_mut().zip(counts) {
                    *dst = count as u32;
                }
            }
        }
    };
}

impl_lanes!(f32x4, f32, i32x4, i32, 4);
impl_lanes!(f32x8, f32, i32x8, i32, 8);
impl_lanes!(f64x2, f64, i64x2, i64, 2);
impl_lanes!(f64x4, f64, i64x4, i64, 4);
