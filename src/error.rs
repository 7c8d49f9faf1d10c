//! Error types for configuration, layouts and input scripts.
//!
//! The simulation itself is total: ticks and actions report what happened
//! through return values rather than errors. Everything here comes from
//! loading data at the edges.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Problems found while parsing a map layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout has no rows or an empty first row.
    #[error("layout is empty")]
    Empty,
    /// The layout does not fit in a `u16` grid.
    #[error("layout exceeds 65535 rows or columns")]
    TooLarge,
    /// A row differs in length from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    Ragged {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A glyph outside the tile alphabet.
    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
        /// The offending character.
        glyph: char,
    },
    /// The spawn tile is outside the grid or not walkable.
    #[error("spawn ({x}, {y}) is not a walkable tile")]
    SpawnBlocked {
        /// Spawn column.
        x: u16,
        /// Spawn row.
        y: u16,
    },
}

/// Problems loading or validating a [`crate::config::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The config file is not valid JSON for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value outside its accepted range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted field path, e.g. `tuning.tile_size`.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// The layout could not be turned into a map.
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Problems loading or replaying an input script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The script is not valid JSON for the schema.
    #[error("failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    /// A `walk` step hit a wall or the map edge.
    #[error("step {step}: walk blocked")]
    Blocked {
        /// Zero-based step index.
        step: usize,
    },
    /// A `choose` step ran while no dialogue was open.
    #[error("step {step}: no dialogue is open")]
    NoDialogue {
        /// Zero-based step index.
        step: usize,
    },
    /// A `choose` step named a choice the dialogue does not have.
    #[error("step {step}: dialogue has no choice {index}")]
    NoSuchChoice {
        /// Zero-based step index.
        step: usize,
        /// Requested choice index.
        index: usize,
    },
    /// A `walk` step did not reach the next tile within its tick budget.
    #[error("step {step}: walk stalled")]
    Stalled {
        /// Zero-based step index.
        step: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_error_is_plain_data() {
        let err = LayoutError::SpawnBlocked { x: 3, y: 4 };
        let wrapped = ConfigError::from(err);
        assert_eq!(err.to_string(), "spawn (3, 4) is not a walkable tile");
        assert!(matches!(wrapped, ConfigError::Layout(inner) if inner == err));
    }

    #[test]
    fn test_layout_error_messages() {
        let err = LayoutError::Ragged {
            row: 2,
            expected: 15,
            found: 14,
        };
        assert_eq!(err.to_string(), "row 2 has 14 tiles, expected 15");

        let err = LayoutError::UnknownGlyph {
            row: 0,
            column: 3,
            glyph: 'x',
        };
        assert_eq!(err.to_string(), "unknown glyph 'x' at row 0, column 3");
    }

    #[test]
    fn test_config_error_wraps_layout() {
        let err: ConfigError = LayoutError::Empty.into();
        assert_eq!(err.to_string(), "invalid layout: layout is empty");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("missing.json"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().starts_with("failed to read missing.json: "));
    }

    #[test]
    fn test_script_error_messages() {
        let err = ScriptError::NoSuchChoice { step: 4, index: 7 };
        assert_eq!(err.to_string(), "step 4: dialogue has no choice 7");
    }
}
