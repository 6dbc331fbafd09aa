// config.rs - Runtime numeric configuration shared by every engine
use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Floating point type used for world coordinates and the recurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 32-bit float, the reference precision
    #[default]
    Single,
    /// 64-bit float
    Double,
}

/// Vector register width for the SIMD engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum VectorWidth {
    #[serde(rename = "128")]
    #[value(name = "128")]
    Bits128,
    #[default]
    #[serde(rename = "256")]
    #[value(name = "256")]
    Bits256,
}

/// Quadratic fractal family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Fractal {
    #[default]
    Mandelbrot,
    /// Absolute value of the cross term before adding `y0`
    BurningShip,
}

impl VectorWidth {
    pub fn bits(self) -> u32 {
        match self {
            VectorWidth::Bits128 => 128,
            VectorWidth::Bits256 => 256,
        }
    }

    /// Number of lanes one register holds at the given precision
    pub fn lanes(self, precision: Precision) -> usize {
        let element_bits = match precision {
            Precision::Single => 32,
            Precision::Double => 64,
        };
        (self.bits() / element_bits) as usize
    }
}

/// Engine configuration, formerly compile-time switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub precision: Precision,
    pub vector_width: VectorWidth,
    pub fractal: Fractal,
}

impl EngineConfig {
    pub fn new(precision: Precision, vector_width: VectorWidth, fractal: Fractal) -> Self {
        Self {
            precision,
            vector_width,
            fractal,
        }
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_vector_width(mut self, vector_width: VectorWidth) -> Self {
        self.vector_width = vector_width;
        self
    }

    pub fn with_fractal(mut self, fractal: Fractal) -> Self {
        self.fractal = fractal;
        self
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} precision, {}-bit vectors, {}",
            self.precision, self.vector_width, self.fractal
        )
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::Single => "single",
            Precision::Double => "double",
        })
    }
}

impl fmt::Display for VectorWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl fmt::Display for Fractal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Fractal::Mandelbrot => "mandelbrot",
            Fractal::BurningShip => "burning-ship",
        })
    }
}

impl FromStr for Precision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "float" | "f32" => Ok(Precision::Single),
            "double" | "f64" => Ok(Precision::Double),
            _ => Err(ConfigError {
                field: "precision",
                value: s.to_string(),
                expected: "single, double",
            }),
        }
    }
}

impl FromStr for VectorWidth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "128" => Ok(VectorWidth::Bits128),
            "256" => Ok(VectorWidth::Bits256),
            _ => Err(ConfigError {
                field: "vector width",
                value: s.to_string(),
                expected: "128, 256",
            }),
        }
    }
}

impl FromStr for Fractal {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "mandelbrot" => Ok(Fractal::Mandelbrot),
            "burning-ship" | "burningship" => Ok(Fractal::BurningShip),
            _ => Err(ConfigError {
                field: "fractal",
                value: s.to_string(),
                expected: "mandelbrot, burning-ship",
            }),
        }
    }
}
