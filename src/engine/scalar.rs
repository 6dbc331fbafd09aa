use super::RowBand;
use crate::math::{PlaneMapping, Real, ESCAPE_RADIUS_SQ};

/// Completed iterations of `z ← z² + c` from `z = c` before `|z|² > R²`,
/// at most `cap`. `MIRROR` takes `|2xy|` (burning ship).
#[allow(clippy::neg_cmp_op_on_partial_ord)]
#[inline]
pub fn escape_count<S: Real, const MIRROR: bool>(x0: S, y0: S, cap: u32) -> u32 {
    let r2 = S::from_f64(ESCAPE_RADIUS_SQ);
    let (mut x, mut y) = (x0, y0);

    let mut n = 0;
    while n < cap {
        let x2 = x * x;
        let y2 = y * y;
        let xy = x * y;

        // same predicate as the lane masks, so NaN escapes everywhere
        if !(x2 + y2 <= r2) {
            break;
        }

        let cross = xy + xy;
        let cross = if MIRROR { cross.abs() } else { cross };

        x = x2 - y2 + x0;
        y = cross + y0;
        n += 1;
    }
    n
}

pub fn fill_band<S: Real, const MIRROR: bool>(mapping: &PlaneMapping<S>, cap: u32, mut band: RowBand<'_>) {
    for (iy, row) in band.rows_mut() {
        let y0 = mapping.y0(iy);
        for (ix, count) in row.iter_mut().enumerate() {
            *count = escape_count::<S, MIRROR>(mapping.x0(ix), y0, cap);
        }
    }
}
