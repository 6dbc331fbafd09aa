// position.rs - Saved viewport position, four `key = value` lines
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::context::{DEFAULT_CENTER_X, DEFAULT_CENTER_Y, DEFAULT_ITERATION_CAP, DEFAULT_PLOT_WIDTH};
use crate::error::PositionError;

pub const DEFAULT_POSITION_FILE: &str = "position.txt";

const KEYS: [&str; 4] = ["center_x", "center_y", "iter_num", "plot_width"];

/// Viewport as persisted between sessions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub center_x: f64,
    pub center_y: f64,
    pub iter_num: u32,
    /// Visible plane width in world units
    pub plot_width: f64,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            center_x: DEFAULT_CENTER_X,
            center_y: DEFAULT_CENTER_Y,
            iter_num: DEFAULT_ITERATION_CAP,
            plot_width: DEFAULT_PLOT_WIDTH,
        }
    }
}

impl Position {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PositionError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let position = text.parse()?;
        debug!("loaded position from {}: {:?}", path.display(), position);
        Ok(position)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PositionError> {
        let path = path.as_ref();
        fs::write(path, self.to_string())?;
        debug!("saved position to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "center_x = {}", self.center_x)?;
        writeln!(f, "center_y = {}", self.center_y)?;
        writeln!(f, "iter_num = {}", self.iter_num)?;
        writeln!(f, "plot_width = {}", self.plot_width)
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut values: [Option<(usize, &str)>; 4] = [None; 4];

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (key, value) = trimmed.split_once('=').ok_or_else(|| PositionError::Malformed {
                line,
                text: raw.to_string(),
            })?;
            let key = key.trim();

            let slot = KEYS
                .iter()
                .position(|&known| known == key)
                .ok_or_else(|| PositionError::UnknownKey {
                    line,
                    key: key.to_string(),
                })?;

            if values[slot].is_some() {
                return Err(PositionError::DuplicateKey { line, key: KEYS[slot] });
            }
            values[slot] = Some((line, value.trim()));
        }

        Ok(Self {
            center_x: parse_value(&values, 0)?,
            center_y: parse_value(&values, 1)?,
            iter_num: parse_value(&values, 2)?,
            plot_width: parse_value(&values, 3)?,
        })
    }
}

fn parse_value<T: FromStr>(values: &[Option<(usize, &str)>; 4], slot: usize) -> Result<T, PositionError> {
    let key = KEYS[slot];
    let (line, value) = values[slot].ok_or(PositionError::MissingKey(key))?;
    value.parse().map_err(|_| PositionError::InvalidValue {
        line,
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_file() {
        let text = "center_x = -0.75\ncenter_y = 0.1\niter_num = 512\nplot_width = 0.25\n";
        let position: Position = text.parse().unwrap();
        assert_eq!(
            position,
            Position {
                center_x: -0.75,
                center_y: 0.1,
                iter_num: 512,
                plot_width: 0.25,
            }
        );
    }

    #[test]
    fn test_display_round_trips() {
        let position = Position {
            center_x: -1.7497591451303665,
            center_y: -1e-7,
            iter_num: 3000,
            plot_width: 3.5e-9,
        };
        assert_eq!(position.to_string().parse::<Position>().unwrap(), position);
    }

    #[test]
    fn test_any_order_and_spacing() {
        let text = "\n  plot_width=2\niter_num   =  256\n center_y= 0 \ncenter_x =-0.5\n\n";
        assert_eq!(text.parse::<Position>().unwrap(), Position::default());
    }

    #[test]
    fn test_missing_key() {
        let err = "center_x = 0\ncenter_y = 0\niter_num = 10\n".parse::<Position>().unwrap_err();
        assert!(matches!(err, PositionError::MissingKey("plot_width")));
    }

    #[test]
    fn test_unknown_and_duplicate_keys() {
        let err = "zoom = 3\n".parse::<Position>().unwrap_err();
        assert!(matches!(err, PositionError::UnknownKey { line: 1, .. }));

        let err = "center_x = 0\ncenter_x = 1\n".parse::<Position>().unwrap_err();
        assert!(matches!(err, PositionError::DuplicateKey { line: 2, key: "center_x" }));
    }

    #[test]
    fn test_bad_values() {
        let err = "center_x = 0\ncenter_y = 0\niter_num = -5\nplot_width = 1\n"
            .parse::<Position>()
            .unwrap_err();
        assert!(matches!(err, PositionError::InvalidValue { line: 3, key: "iter_num", .. }));

        let err = "center_x 0\n".parse::<Position>().unwrap_err();
        assert!(matches!(err, PositionError::Malformed { line: 1, .. }));
    }
}
