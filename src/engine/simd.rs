use std::array;

use super::RowBand;
use crate::math::{Lanes, PlaneMapping, Real, ESCAPE_RADIUS_SQ};

/// Register groups interleaved per loop body by the conveyor kernel
pub const CONVEYOR_PACKS: usize = 3;

/// Iterate one register of pixels until every lane escaped or `cap` steps
///
/// The active mask is sticky: a lane that escaped never counts again, and
/// its counter is bumped before `x`, `y` advance, so each lane ends with the
/// same count the scalar reference produces.
#[inline(always)]
fn iterate_group<V: Lanes, const MIRROR: bool>(x0: V, y0: V, r2: V, cap: u32) -> V::Counter {
    let (mut x, mut y) = (x0, y0);
    let mut active = V::all_active();
    let mut counts = V::zero_counter();

    for _ in 0..cap {
        let x2 = x * x;
        let y2 = y * y;
        let xy = x * y;

        active = active & (x2 + y2).le_mask(r2);
        if active.bitmask() == 0 {
            break;
        }
        counts = V::count_active(counts, active);

        let cross = xy + xy;
        let cross = if MIRROR { cross.abs() } else { cross };
        x = x2 - y2 + x0;
        y = cross + y0;
    }

    counts
}

pub fn fill_band<V: Lanes, const MIRROR: bool>(
    mapping: &PlaneMapping<V::Scalar>,
    cap: u32,
    mut band: RowBand<'_>,
) {
    let r2 = V::splat(V::Scalar::from_f64(ESCAPE_RADIUS_SQ));

    for (iy, row) in band.rows_mut() {
        let y0 = V::splat(mapping.y0(iy));
        for (group, out) in row.chunks_mut(V::LANES).enumerate() {
            let first = group * V::LANES;
            let x0 = V::from_fn(|lane| mapping.x0(first + lane));
            V::store_counts(iterate_group::<V, MIRROR>(x0, y0, r2, cap), out);
        }
    }
}

pub fn fill_band_conveyor<V: Lanes, const MIRROR: bool>(
    mapping: &PlaneMapping<V::Scalar>,
    cap: u32,
    mut band: RowBand<'_>,
) {
    let r2 = V::splat(V::Scalar::from_f64(ESCAPE_RADIUS_SQ));
    let stride = V::LANES * CONVEYOR_PACKS;

    for (iy, row) in band.rows_mut() {
        let y0 = V::splat(mapping.y0(iy));
        for (pack, out) in row.chunks_mut(stride).enumerate() {
            let first = pack * stride;
            let x0: [V; CONVEYOR_PACKS] =
                array::from_fn(|g| V::from_fn(|lane| mapping.x0(first + g * V::LANES + lane)));

            let counts = iterate_pack::<V, MIRROR>(&x0, y0, r2, cap);
            for (group, chunk) in out.chunks_mut(V::LANES).enumerate() {
                V::store_counts(counts[group], chunk);
            }
        }
    }
}

/// Same recurrence as [`iterate_group`] over `CONVEYOR_PACKS` independent
/// groups whose instruction streams interleave
#[allow(clippy::needless_range_loop)]
#[inline(always)]
fn iterate_pack<V: Lanes, const MIRROR: bool>(
    x0: &[V; CONVEYOR_PACKS],
    y0: V,
    r2: V,
    cap: u32,
) -> [V::Counter; CONVEYOR_PACKS] {
    let mut x = *x0;
    let mut y = [y0; CONVEYOR_PACKS];
    let mut active = [V::all_active(); CONVEYOR_PACKS];
    let mut counts = [V::zero_counter(); CONVEYOR_PACKS];

    for _ in 0..cap {
        let x2: [V; CONVEYOR_PACKS] = array::from_fn(|g| x[g] * x[g]);
        let y2: [V; CONVEYOR_PACKS] = array::from_fn(|g| y[g] * y[g]);
        let xy: [V; CONVEYOR_PACKS] = array::from_fn(|g| x[g] * y[g]);

        let mut alive = 0;
        for g in 0..CONVEYOR_PACKS {
            active[g] = active[g] & (x2[g] + y2[g]).le_mask(r2);
            alive |= active[g].bitmask();
        }
        if alive == 0 {
            break;
        }

        for g in 0..CONVEYOR_PACKS {
            counts[g] = V::count_active(counts[g], active[g]);
            let cross = xy[g] + xy[g];
            let cross = if MIRROR { cross.abs() } else { cross };
            x[g] = x2[g] - y2[g] + x0[g];
            y[g] = cross + y0;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scalar;
    use wide::{f32x4, f32x8, f64x2, f64x4};

    fn check_against_reference<V: Lanes, const MIRROR: bool>(width: u32, height: u32, cap: u32) {
        let mapping = PlaneMapping::<V::Scalar>::new(width, height, -0.6, 0.05, 3.0 / width as f64);
        let pixels = (width * height) as usize;

        let mut expected = vec![0u32; pixels];
        scalar::fill_band::<V::Scalar, MIRROR>(&mapping, cap, RowBand::new(0, width as usize, &mut expected));

        let mut single = vec![0u32; pixels];
        fill_band::<V, MIRROR>(&mapping, cap, RowBand::new(0, width as usize, &mut single));
        assert_eq!(single, expected, "single group, {} lanes", V::LANES);

        let mut conveyor = vec![0u32; pixels];
        fill_band_conveyor::<V, MIRROR>(&mapping, cap, RowBand::new(0, width as usize, &mut conveyor));
        assert_eq!(conveyor, expected, "conveyor, {} lanes", V::LANES);
    }

    #[test]
    fn test_f32x8_matches_scalar() {
        check_against_reference::<f32x8, false>(48, 20, 120);
    }

    #[test]
    fn test_f32x4_matches_scalar_with_ragged_rows() {
        check_against_reference::<f32x4, false>(37, 11, 90);
    }

    #[test]
    fn test_f64_widths_match_scalar() {
        check_against_reference::<f64x2, false>(23, 9, 150);
        check_against_reference::<f64x4, false>(29, 9, 150);
    }

    #[test]
    fn test_burning_ship_matches_scalar() {
        check_against_reference::<f32x8, true>(40, 16, 100);
        check_against_reference::<f64x4, true>(17, 7, 100);
    }

    #[test]
    fn test_group_stops_when_all_lanes_escape() {
        let x0 = <f32x8 as Lanes>::splat(50.0);
        let y0 = <f32x8 as Lanes>::splat(0.0);
        let r2 = <f32x8 as Lanes>::splat(100.0);
        let mut out = [u32::MAX; 8];
        <f32x8 as Lanes>::store_counts(iterate_group::<f32x8, false>(x0, y0, r2, 1000), &mut out);
        assert_eq!(out, [0; 8]);
    }
}
