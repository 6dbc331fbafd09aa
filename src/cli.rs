// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};

use crate::config::{EngineConfig, Fractal, Precision, VectorWidth};
use crate::engine::{EngineVariant, Kernel};
use crate::position::DEFAULT_POSITION_FILE;

pub const DEFAULT_SCREEN_WIDTH: u32 = 2560;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1440;
pub const DEFAULT_THREADS: usize = 8;

#[derive(Parser, Debug, Clone)]
#[command(name = "mandelbrot")]
#[command(about = "Escape-time fractal renderer and engine benchmark", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compute one frame and write it as a PNG
    Render(RenderArgs),
    /// Time every engine on the same frame
    Bench(BenchArgs),
    /// Check every engine against the scalar reference
    Verify(VerifyArgs),
}

/// Screen, viewport and numeric settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    #[arg(long, default_value_t = DEFAULT_SCREEN_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_SCREEN_HEIGHT)]
    pub height: u32,

    #[arg(long, value_enum, default_value_t = Precision::Single)]
    pub precision: Precision,

    #[arg(long = "vector-width", value_enum, default_value_t = VectorWidth::Bits256)]
    pub vector_width: VectorWidth,

    #[arg(long, value_enum, default_value_t = Fractal::Mandelbrot)]
    pub fractal: Fractal,

    /// Load the viewport from a position file; explicit flags override it
    #[arg(long)]
    pub position: Option<PathBuf>,

    #[arg(long = "center-x", allow_hyphen_values = true)]
    pub center_x: Option<f64>,

    #[arg(long = "center-y", allow_hyphen_values = true)]
    pub center_y: Option<f64>,

    /// Visible plane width in world units
    #[arg(long = "plot-width")]
    pub plot_width: Option<f64>,

    /// Iteration cap
    #[arg(long)]
    pub iterations: Option<u32>,
}

impl ViewArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(self.precision, self.vector_width, self.fractal)
    }
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    #[arg(long, value_enum, default_value_t = Kernel::SimdConveyor)]
    pub engine: Kernel,

    /// Worker threads; 1 runs the engine on the calling thread, 0 is rejected
    /// by the engine
    #[arg(long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    #[arg(short, long, default_value = "mandelbrot.png")]
    pub output: PathBuf,

    /// Frames to compute before writing; more than one reports the average
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub frames: usize,

    /// Write the rendered viewport to this position file
    #[arg(long = "save-position", num_args = 0..=1, default_missing_value = DEFAULT_POSITION_FILE)]
    pub save_position: Option<PathBuf>,
}

impl RenderArgs {
    pub fn variant(&self) -> EngineVariant {
        if self.threads == 1 {
            EngineVariant::from(self.engine)
        } else {
            EngineVariant::Threaded {
                threads: self.threads,
                kernel: self.engine,
            }
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Threads for the threaded engine
    #[arg(long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Measured frames per engine
    #[arg(long, default_value_t = 10, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub cycles: usize,

    /// Unmeasured frames per engine before timing
    #[arg(long, default_value_t = 2)]
    pub warmup: usize,

    /// Also write the results as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub view: ViewArgs,

    #[arg(long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,
}
