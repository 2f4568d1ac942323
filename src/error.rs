//! Error type shared by the generator, the text board parser and the level
//! configuration loader.
//!
//! "No path between two tiles" is not an error: the path finder reports it
//! as `None`.
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised when a board or level cannot be built from its inputs.
#[derive(Debug, Error)]
pub enum Error {
    /// Rows and columns must both be at least one.
    #[error("invalid board dimensions {rows}x{cols}: rows and cols must be positive")]
    InvalidDimensions { rows: usize, cols: usize },

    /// A value override must cover every playable cell.
    #[error("value override has {found} entries, expected {expected}")]
    OverrideLength { expected: usize, found: usize },

    /// `0` marks a placeholder and cannot be used as a tile value.
    #[error("value override contains the reserved value 0 at index {index}")]
    ReservedValue { index: usize },

    #[error("unknown reflow mode '{0}'")]
    UnknownReflowMode(String),

    /// A text board row could not be parsed.
    #[error("row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error("failed to read level file {path}")]
    LevelIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed level configuration")]
    LevelFormat(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
