use thiserror::Error;

/// Precondition violations and worker failures of the compute core
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("screen dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("screen of {width}x{height} pixels does not fit in memory")]
    BufferTooLarge { width: u32, height: u32 },

    #[error("iteration cap must be in 1..={max}, got {cap}")]
    InvalidIterationCap { cap: u32, max: u32 },

    #[error("scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("viewport center must be finite, got ({x}, {y})")]
    InvalidCenter { x: f64, y: f64 },

    #[error("cannot split {rows} rows between {threads} threads")]
    InvalidThreadCount { threads: usize, rows: u32 },

    #[error("failed to spawn worker thread")]
    Spawn(#[from] std::io::Error),

    #[error("worker for rows {first_row}..{end_row} panicked")]
    WorkerPanicked { first_row: usize, end_row: usize },
}

/// Failures reading or writing the viewport position file
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("position file i/o failed")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected `key = value`, got {text:?}")]
    Malformed { line: usize, text: String },

    #[error("line {line}: unknown key {key:?}")]
    UnknownKey { line: usize, key: String },

    #[error("line {line}: key {key:?} given twice")]
    DuplicateKey { line: usize, key: &'static str },

    #[error("line {line}: invalid value {value:?} for {key}")]
    InvalidValue {
        line: usize,
        key: &'static str,
        value: String,
    },

    #[error("missing key {0:?}")]
    MissingKey(&'static str),
}

/// Unrecognized engine configuration value
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized {field} {value:?}, expected one of: {expected}")]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}
