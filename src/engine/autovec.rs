use super::RowBand;
use crate::math::{PlaneMapping, Real, ESCAPE_RADIUS_SQ};

/// Pixels per block; each per-lane step below is its own fixed-length loop
/// over this many independent lanes
pub const AUTOVEC_BLOCK: usize = 32;

pub fn fill_band<S: Real, const MIRROR: bool>(mapping: &PlaneMapping<S>, cap: u32, mut band: RowBand<'_>) {
    for (iy, row) in band.rows_mut() {
        let y0 = mapping.y0(iy);
        for (block, out) in row.chunks_mut(AUTOVEC_BLOCK).enumerate() {
            let first = block * AUTOVEC_BLOCK;
            let mut x0 = [S::ZERO; AUTOVEC_BLOCK];
            for (lane, x) in x0.iter_mut().enumerate() {
                *x = mapping.x0(first + lane);
            }

            let counts = iterate_block::<S, MIRROR>(&x0, y0, cap);
            // tail columns past the row end are discarded
            out.copy_from_slice(&counts[..out.len()]);
        }
    }
}

#[allow(clippy::needless_range_loop)]
#[inline]
fn iterate_block<S: Real, const MIRROR: bool>(x0: &[S; AUTOVEC_BLOCK], y0: S, cap: u32) -> [u32; AUTOVEC_BLOCK] {
    const N: usize = AUTOVEC_BLOCK;
    let r2 = S::from_f64(ESCAPE_RADIUS_SQ);

    let mut x = *x0;
    let mut y = [y0; N];
    let mut x2 = [S::ZERO; N];
    let mut y2 = [S::ZERO; N];
    let mut xy = [S::ZERO; N];
    let mut active = [true; N];
    let mut n = [0u32; N];

    for _ in 0..cap {
        for i in 0..N {
            x2[i] = x[i] * x[i];
        }
        for i in 0..N {
            y2[i] = y[i] * y[i];
        }
        for i in 0..N {
            xy[i] = x[i] * y[i];
        }
        for i in 0..N {
            active[i] &= x2[i] + y2[i] <= r2;
        }

        let mut any_active = false;
        for i in 0..N {
            any_active |= active[i];
        }
        if !any_active {
            break;
        }

        for i in 0..N {
            n[i] += u32::from(active[i]);
        }
        for i in 0..N {
            let cross = xy[i] + xy[i];
            let cross = if MIRROR { cross.abs() } else { cross };
            y[i] = cross + y0;
        }
        for i in 0..N {
            x[i] = x2[i] - y2[i] + x0[i];
        }
    }

    n
}
