pub mod cli;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod math;
pub mod palette;
pub mod position;
pub mod render;
pub mod timing;

pub use config::{EngineConfig, Fractal, Precision, VectorWidth};
pub use context::{MandelbrotContext, Viewport, MAX_ITERATION_CAP};
pub use engine::{EngineVariant, Kernel};
pub use error::{ConfigError, EngineError, PositionError};
pub use palette::ColorTable;
pub use position::Position;
