//! Escape-count engines
//!
//! Every engine evaluates the same recurrence with the same operation order
//! over the same [`PlaneMapping`], so all of them produce identical buffers
//! for a given frame. They differ only in how pixels are scheduled: one at a
//! time, in 32-lane blocks the compiler can vectorize, in explicit vector
//! registers, in interleaved register packs, or in row bands across threads.

pub mod autovec;
pub mod scalar;
pub mod simd;
pub mod threaded;

use std::fmt;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use wide::{f32x4, f32x8, f64x2, f64x4};

use crate::config::{EngineConfig, Fractal, Precision, VectorWidth};
use crate::context::Viewport;
use crate::error::EngineError;
use crate::math::{Lanes, PlaneMapping, Real};

pub use threaded::partition_rows;

/// Per-pixel strategy, also the unit of work of a threaded band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Kernel {
    /// One pixel at a time, the reference
    Scalar,
    /// Flat 32-lane blocks shaped for compiler auto-vectorization
    #[value(name = "autovec")]
    AutoVectorized,
    /// One vector register per group with early-exit masking
    Simd,
    /// Several register groups interleaved per loop body
    #[default]
    #[value(name = "conveyor")]
    SimdConveyor,
}

/// Engine selected by the caller for one compute pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineVariant {
    Scalar,
    AutoVectorized,
    Simd,
    SimdConveyor,
    /// Row bands on `threads` OS threads, each running `kernel`
    Threaded { threads: usize, kernel: Kernel },
}

impl Kernel {
    pub const ALL: [Kernel; 4] = [
        Kernel::Scalar,
        Kernel::AutoVectorized,
        Kernel::Simd,
        Kernel::SimdConveyor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kernel::Scalar => "scalar",
            Kernel::AutoVectorized => "autovec",
            Kernel::Simd => "simd",
            Kernel::SimdConveyor => "simd-conveyor",
        }
    }
}

impl EngineVariant {
    /// Every single-threaded variant followed by the threaded conveyor
    pub fn all(threads: usize) -> Vec<EngineVariant> {
        let mut variants: Vec<_> = Kernel::ALL.iter().map(|&k| EngineVariant::from(k)).collect();
        variants.push(EngineVariant::Threaded {
            threads,
            kernel: Kernel::SimdConveyor,
        });
        variants
    }

    /// Per-pixel kernel this variant runs
    pub fn kernel(self) -> Kernel {
        match self {
            EngineVariant::Scalar => Kernel::Scalar,
            EngineVariant::AutoVectorized => Kernel::AutoVectorized,
            EngineVariant::Simd => Kernel::Simd,
            EngineVariant::SimdConveyor => Kernel::SimdConveyor,
            EngineVariant::Threaded { kernel, .. } => kernel,
        }
    }

    pub fn threads(self) -> usize {
        match self {
            EngineVariant::Threaded { threads, .. } => threads,
            _ => 1,
        }
    }
}

impl From<Kernel> for EngineVariant {
    fn from(kernel: Kernel) -> Self {
        match kernel {
            Kernel::Scalar => EngineVariant::Scalar,
            Kernel::AutoVectorized => EngineVariant::AutoVectorized,
            Kernel::Simd => EngineVariant::Simd,
            Kernel::SimdConveyor => EngineVariant::SimdConveyor,
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for EngineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineVariant::Threaded { threads, kernel } => {
                write!(f, "threaded({threads}, {kernel})")
            }
            other => f.write_str(other.kernel().name()),
        }
    }
}

/// Iteration parameters shared by all pixels of a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub iteration_cap: u32,
    pub fractal: Fractal,
}

/// Snapshot of everything a compute pass reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub viewport: Viewport,
    pub config: EngineConfig,
}

impl Frame {
    pub fn recurrence(&self) -> Recurrence {
        Recurrence {
            iteration_cap: self.viewport.iteration_cap,
            fractal: self.config.fractal,
        }
    }

    /// Mapping in precision `S`, rejected if any pixel coordinate would
    /// overflow to infinity or NaN there
    pub fn checked_mapping<S: Real>(&self) -> Result<PlaneMapping<S>, EngineError> {
        let mapping = self.mapping::<S>();
        if !mapping.extent_is_finite() {
            return Err(EngineError::InvalidScale(self.viewport.scale));
        }
        if !mapping.edges_are_finite() {
            return Err(EngineError::InvalidCenter {
                x: self.viewport.center_x,
                y: self.viewport.center_y,
            });
        }
        Ok(mapping)
    }

    /// Everything `compute` checks before touching the buffer
    pub fn validate(&self) -> Result<(), EngineError> {
        self.viewport.validate()?;
        match self.config.precision {
            Precision::Single => self.checked_mapping::<f32>().map(drop),
            Precision::Double => self.checked_mapping::<f64>().map(drop),
        }
    }

    pub fn mapping<S: Real>(&self) -> PlaneMapping<S> {
        PlaneMapping::new(
            self.width,
            self.height,
            self.viewport.center_x,
            self.viewport.center_y,
            self.viewport.scale,
        )
    }
}

/// Contiguous rows of the escape-count buffer, addressed by global row index
#[derive(Debug)]
pub struct RowBand<'a> {
    first_row: usize,
    width: usize,
    counts: &'a mut [u32],
}

impl<'a> RowBand<'a> {
    pub fn new(first_row: usize, width: usize, counts: &'a mut [u32]) -> Self {
        debug_assert!(width > 0 && counts.len() % width == 0);
        Self {
            first_row,
            width,
            counts,
        }
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn rows(&self) -> usize {
        self.counts.len() / self.width
    }

    /// Rows paired with their global row index
    pub fn rows_mut(&mut self) -> impl Iterator<Item = (usize, &mut [u32])> + '_ {
        let first_row = self.first_row;
        self.counts
            .chunks_exact_mut(self.width)
            .enumerate()
            .map(move |(i, row)| (first_row + i, row))
    }
}

/// Fill `counts` (row-major, `width * height`) for `frame` with `variant`
pub fn compute(frame: &Frame, variant: EngineVariant, counts: &mut [u32]) -> Result<(), EngineError> {
    debug_assert_eq!(counts.len(), frame.width as usize * frame.height as usize);

    match (frame.config.precision, frame.config.vector_width) {
        (Precision::Single, VectorWidth::Bits128) => compute_with::<f32x4>(frame, variant, counts),
        (Precision::Single, VectorWidth::Bits256) => compute_with::<f32x8>(frame, variant, counts),
        (Precision::Double, VectorWidth::Bits128) => compute_with::<f64x2>(frame, variant, counts),
        (Precision::Double, VectorWidth::Bits256) => compute_with::<f64x4>(frame, variant, counts),
    }
}

fn compute_with<V: Lanes>(
    frame: &Frame,
    variant: EngineVariant,
    counts: &mut [u32],
) -> Result<(), EngineError> {
    frame.viewport.validate()?;
    let mapping = frame.checked_mapping::<V::Scalar>()?;
    let recurrence = frame.recurrence();

    debug!(
        "computing {}x{} with {} ({}, {} lanes)",
        frame.width,
        frame.height,
        variant,
        frame.config,
        V::LANES
    );

    match variant {
        EngineVariant::Threaded { threads, kernel } => {
            threaded::compute_bands::<V>(kernel, mapping, recurrence, counts, threads)
        }
        single => {
            let band = RowBand::new(0, mapping.width, counts);
            run_kernel::<V>(single.kernel(), &mapping, recurrence, band);
            Ok(())
        }
    }
}

/// Run one per-pixel kernel over a band, resolving the fractal once
pub(crate) fn run_kernel<V: Lanes>(
    kernel: Kernel,
    mapping: &PlaneMapping<V::Scalar>,
    recurrence: Recurrence,
    band: RowBand<'_>,
) {
    let cap = recurrence.iteration_cap;
    match (kernel, recurrence.fractal) {
        (Kernel::Scalar, Fractal::Mandelbrot) => scalar::fill_band::<V::Scalar, false>(mapping, cap, band),
        (Kernel::Scalar, Fractal::BurningShip) => scalar::fill_band::<V::Scalar, true>(mapping, cap, band),
        (Kernel::AutoVectorized, Fractal::Mandelbrot) => autovec::fill_band::<V::Scalar, false>(mapping, cap, band),
        (Kernel::AutoVectorized, Fractal::BurningShip) => autovec::fill_band::<V::Scalar, true>(mapping, cap, band),
        (Kernel::Simd, Fractal::Mandelbrot) => simd::fill_band::<V, false>(mapping, cap, band),
        (Kernel::Simd, Fractal::BurningShip) => simd::fill_band::<V, true>(mapping, cap, band),
        (Kernel::SimdConveyor, Fractal::Mandelbrot) => simd::fill_band_conveyor::<V, false>(mapping, cap, band),
        (Kernel::SimdConveyor, Fractal::BurningShip) => simd::fill_band_conveyor::<V, true>(mapping, cap, band),
    }
}
