use std::ops::Range;
use std::thread;

use log::{debug, trace};

use super::{run_kernel, Kernel, Recurrence, RowBand};
use crate::error::EngineError;
use crate::math::{Lanes, PlaneMapping};

/// Split `height` rows into `threads` contiguous bands of `height / threads`
/// rows; the last band also takes the `height % threads` leftover rows.
pub fn partition_rows(height: usize, threads: usize) -> Result<Vec<Range<usize>>, EngineError> {
    if threads == 0 || threads > height {
        return Err(EngineError::InvalidThreadCount {
            threads,
            rows: u32::try_from(height).unwrap_or(u32::MAX),
        });
    }

    let rows_per_band = height / threads;
    let bands = (0..threads)
        .map(|band| {
            let start = band * rows_per_band;
            let end = if band + 1 == threads { height } else { start + rows_per_band };
            start..end
        })
        .collect();

    Ok(bands)
}

/// Run `kernel` on one scoped OS thread per band and join them all
///
/// Each worker gets a disjoint slice of `counts`; nothing is shared between
/// workers besides the read-only mapping.
pub(crate) fn compute_bands<V: Lanes>(
    kernel: Kernel,
    mapping: PlaneMapping<V::Scalar>,
    recurrence: Recurrence,
    counts: &mut [u32],
    threads: usize,
) -> Result<(), EngineError> {
    let bands = partition_rows(mapping.height, threads)?;
    let width = mapping.width;

    debug!(
        "splitting {} rows into {} bands of {}+ rows ({kernel})",
        mapping.height,
        bands.len(),
        mapping.height / threads
    );

    thread::scope(|scope| {
        let mut rest = counts;
        let mut workers = Vec::with_capacity(bands.len());
        let mut spawn_error = None;

        for (index, rows) in bands.into_iter().enumerate() {
            let (slice, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * width);
            rest = tail;
            let band = RowBand::new(rows.start, width, slice);

            let spawned = thread::Builder::new()
                .name(format!("mandelbrot-band-{index}"))
                .spawn_scoped(scope, move || {
                    trace!("band {index}: rows {}..{}", band.first_row(), band.first_row() + band.rows());
                    run_kernel::<V>(kernel, &mapping, recurrence, band);
                });

            match spawned {
                Ok(handle) => workers.push((rows, handle)),
                Err(err) => {
                    spawn_error = Some(err);
                    break;
                }
            }
        }

        // join everything already running before reporting any failure
        let mut result = Ok(());
        for (rows, handle) in workers {
            if handle.join().is_err() && result.is_ok() {
                result = Err(EngineError::WorkerPanicked {
                    first_row: rows.start,
                    end_row: rows.end,
                });
            }
        }

        match spawn_error {
            Some(err) => Err(EngineError::Spawn(err)),
            None => result,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Fractal;
    use crate::engine::scalar;
    use wide::f32x8;

    #[test]
    fn test_even_partition() {
        let bands = partition_rows(100, 4).unwrap();
        assert_eq!(bands, vec![0..25, 25..50, 50..75, 75..100]);
    }

    #[test]
    fn test_last_band_absorbs_remainder() {
        let bands = partition_rows(10, 3).unwrap();
        assert_eq!(bands, vec![0..3, 3..6, 6..10]);
        assert_eq!(bands.iter().map(|b| b.len()).sum::<usize>(), 10);
    }

    #[test]
    fn test_single_band_covers_everything() {
        assert_eq!(partition_rows(7, 1).unwrap(), vec![0..7]);
    }

    #[test]
    fn test_rejects_zero_threads() {
        assert!(matches!(
            partition_rows(10, 0),
            Err(EngineError::InvalidThreadCount { threads: 0, rows: 10 })
        ));
    }

    #[test]
    fn test_rejects_more_threads_than_rows() {
        assert!(partition_rows(3, 4).is_err());
    }

    #[test]
    fn test_bands_match_single_thread() {
        let mapping = PlaneMapping::<f32>::new(30, 13, -0.5, 0.0, 0.1);
        let recurrence = Recurrence {
            iteration_cap: 80,
            fractal: Fractal::Mandelbrot,
        };

        let mut expected = vec![0u32; 30 * 13];
        scalar::fill_band::<f32, false>(&mapping, 80, RowBand::new(0, 30, &mut expected));

        for threads in [1, 2, 3, 5, 13] {
            let mut counts = vec![0u32; 30 * 13];
            compute_bands::<f32x8>(Kernel::Simd, mapping, recurrence, &mut counts, threads).unwrap();
            assert_eq!(counts, expected, "{threads} threads");
        }
    }
}
