//! Level configuration.
//!
//! A level is described by a small JSON document:
//!
//! ```json
//! { "rows": 3, "cols": 4, "mode": "left" }
//! ```
//!
//! `mode` is optional and defaults to `normal`. Level `n` is stored in a file
//! named `level{n}.json`.
use crate::error::{Error, Result};
use crate::reflow::ReflowMode;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Board size used when no level file is given.
pub const DEFAULT_ROWS: usize = 6;
pub const DEFAULT_COLS: usize = 6;

/// Dimensions and reflow mode of one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub mode: ReflowMode,
}

impl Default for LevelConfig {
    fn default() -> Self {
        LevelConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            mode: ReflowMode::Normal,
        }
    }
}

impl LevelConfig {
    /// Creates a validated configuration.
    pub fn new(rows: usize, cols: usize, mode: ReflowMode) -> Result<Self> {
        let config = LevelConfig { rows, cols, mode };
        config.validate()?;
        Ok(config)
    }

    /// Rejects boards with no rows or no columns.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Parses and validates a level from JSON.
    ///
    /// # Examples
    /// ```
    /// use tile_connect::level::LevelConfig;
    /// use tile_connect::reflow::ReflowMode;
    ///
    /// let config = LevelConfig::from_json_str(r#"{"rows": 3, "cols": 4, "mode": "inside"}"#).unwrap();
    /// assert_eq!(config.mode, ReflowMode::Inside);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::LevelIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        debug!("loaded level config {:?} from {}", config, path.display());
        Ok(config)
    }
}

/// Path of level `number` inside `dir`.
pub fn level_path(dir: &Path, number: u32) -> PathBuf {
    dir.join(format!("level{}.json", number))
}

/// Loads level `number` from `dir`.
pub fn load_level(dir: &Path, number: u32) -> Result<LevelConfig> {
    LevelConfig::load(level_path(dir, number))
}
