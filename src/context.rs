// context.rs - Viewport and the buffers every engine writes into
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::{self, EngineVariant, Frame};
use crate::error::EngineError;
use crate::palette::ColorTable;
use crate::position::Position;

// === Defaults ===

pub const DEFAULT_PLOT_WIDTH: f64 = 2.0;
pub const DEFAULT_CENTER_X: f64 = -0.5;
pub const DEFAULT_CENTER_Y: f64 = 0.0;
pub const DEFAULT_ITERATION_CAP: u32 = 256;

/// Largest cap whose counts fit every vector lane counter
pub const MAX_ITERATION_CAP: u32 = i32::MAX as u32;

/// World-space view: center, world units per pixel, iteration cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
    pub iteration_cap: u32,
}

impl Viewport {
    /// Default view for a screen `width` pixels wide
    pub fn default_for_width(width: u32) -> Self {
        Self {
            center_x: DEFAULT_CENTER_X,
            center_y: DEFAULT_CENTER_Y,
            scale: DEFAULT_PLOT_WIDTH / f64::from(width.max(1)),
            iteration_cap: DEFAULT_ITERATION_CAP,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(EngineError::InvalidScale(self.scale));
        }
        if !(self.center_x.is_finite() && self.center_y.is_finite()) {
            return Err(EngineError::InvalidCenter {
                x: self.center_x,
                y: self.center_y,
            });
        }
        validate_iteration_cap(self.iteration_cap)
    }

    /// Width of the visible plane in world units
    pub fn plot_width(&self, screen_width: u32) -> f64 {
        self.scale * f64::from(screen_width)
    }
}

fn validate_iteration_cap(cap: u32) -> Result<(), EngineError> {
    if cap == 0 || cap > MAX_ITERATION_CAP {
        return Err(EngineError::InvalidIterationCap {
            cap,
            max: MAX_ITERATION_CAP,
        });
    }
    Ok(())
}

/// Screen, viewport, engine configuration and the owned output buffers
///
/// Buffers are allocated once and overwritten in place by every
/// [`compute`](Self::compute) / [`colorize`](Self::colorize) call.
#[derive(Debug)]
pub struct MandelbrotContext {
    width: u32,
    height: u32,
    viewport: Viewport,
    config: EngineConfig,
    escape_counts: Vec<u32>,
    color_pixels: Vec<u32>,
    color_table: ColorTable,
}

impl MandelbrotContext {
    /// Allocate buffers for a `width` x `height` screen with the default view
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        Self::with_config(width, height, EngineConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: EngineConfig) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or(EngineError::BufferTooLarge { width, height })?;

        let viewport = Viewport::default_for_width(width);
        debug!("creating {width}x{height} context ({config})");

        Ok(Self {
            width,
            height,
            viewport,
            config,
            escape_counts: vec![0; pixels],
            color_pixels: vec![0; pixels],
            color_table: ColorTable::build(viewport.iteration_cap),
        })
    }

    // === Screen ===

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.escape_counts.len()
    }

    // === Viewport ===

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Replace the whole view; rejected views leave the context unchanged
    ///
    /// Besides the plain range checks the view must map to finite
    /// coordinates in the configured precision.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), EngineError> {
        Frame {
            viewport,
            ..self.frame()
        }
        .validate()?;
        self.viewport = viewport;
        Ok(())
    }

    pub fn set_center(&mut self, center_x: f64, center_y: f64) -> Result<(), EngineError> {
        self.set_viewport(Viewport {
            center_x,
            center_y,
            ..self.viewport
        })
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<(), EngineError> {
        self.set_viewport(Viewport { scale, ..self.viewport })
    }

    pub fn set_iteration_cap(&mut self, iteration_cap: u32) -> Result<(), EngineError> {
        self.set_viewport(Viewport {
            iteration_cap,
            ..self.viewport
        })
    }

    /// Adopt a saved position; `plot_width` spans the screen width
    pub fn apply_position(&mut self, position: &Position) -> Result<(), EngineError> {
        self.set_viewport(Viewport {
            center_x: position.center_x,
            center_y: position.center_y,
            scale: position.plot_width / f64::from(self.width),
            iteration_cap: position.iter_num,
        })
    }

    /// Current view as a saveable position
    pub fn position(&self) -> Position {
        Position {
            center_x: self.viewport.center_x,
            center_y: self.viewport.center_y,
            iter_num: self.viewport.iteration_cap,
            plot_width: self.viewport.plot_width(self.width),
        }
    }

    // === Engine configuration ===

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Switch precision, vector width or fractal; rejected when the current
    /// view does not fit the new precision
    pub fn set_config(&mut self, config: EngineConfig) -> Result<(), EngineError> {
        Frame { config, ..self.frame() }.validate()?;
        self.config = config;
        Ok(())
    }

    /// Snapshot of what the next compute pass reads
    pub fn frame(&self) -> Frame {
        Frame {
            width: self.width,
            height: self.height,
            viewport: self.viewport,
            config: self.config,
        }
    }

    // === Compute & color ===

    /// Fill the escape-count buffer with the selected engine
    pub fn compute(&mut self, variant: EngineVariant) -> Result<(), EngineError> {
        let frame = self.frame();
        engine::compute(&frame, variant, &mut self.escape_counts)
    }

    /// Map escape counts to packed RGBA, rebuilding the table on cap change
    pub fn colorize(&mut self) {
        let cap = self.viewport.iteration_cap;
        if self.color_table.cap() != cap {
            debug!("rebuilding color table for cap {} (was {})", cap, self.color_table.cap());
            self.color_table = ColorTable::build(cap);
        }
        self.color_table.apply(&self.escape_counts, &mut self.color_pixels);
    }

    // === Buffers ===

    pub fn escape_counts(&self) -> &[u32] {
        &self.escape_counts
    }

    pub fn color_pixels(&self) -> &[u32] {
        &self.color_pixels
    }

    pub fn color_table(&self) -> &ColorTable {
        &self.color_table
    }

    /// Escape count of the pixel at column `ix`, row `iy`
    pub fn escape_count_at(&self, ix: u32, iy: u32) -> Option<u32> {
        if ix >= self.width || iy >= self.height {
            return None;
        }
        self.escape_counts
            .get(iy as usize * self.width as usize + ix as usize)
            .copied()
    }
}
