//! Configuration for the leveling pipeline.
//!
//! Loaded from TOML so the word list location and the target level can be
//! changed without code changes.
//!
//! ```
//! use hsk_leveler::config::LevelerConfig;
//!
//! let config = LevelerConfig::from_toml_str(r#"
//!     vocabulary_path = "resources/hsk"
//!     target_level = 3
//! "#).unwrap();
//!
//! assert_eq!(config.target_level().get(), 3);
//! ```

use crate::core::types::HskLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LevelerConfig {
    /// Directory of `L<n>.txt` level lists, or a single JSON/TSV word list.
    pub vocabulary_path: PathBuf,

    /// Optional `Hanzi,Level` table used instead of deriving the index.
    pub char_table_path: Option<PathBuf>,

    /// Optional bincode snapshot of the built index.
    pub index_cache_path: Option<PathBuf>,

    /// Highest level kept by filtering.
    pub target_level: u8,

    /// Batches at least this long are classified in parallel.
    pub parallel_threshold: usize,
}

impl Default for LevelerConfig {
    fn default() -> Self {
        Self {
            vocabulary_path: PathBuf::from("resources/hsk"),
            char_table_path: None,
            index_cache_path: None,
            target_level: 4,
            parallel_threshold: 1024,
        }
    }
}

impl LevelerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, is not valid TOML, or names a
    /// level outside 1..=6.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if HskLevel::new(self.target_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "target_level {} is outside {}..={}",
                self.target_level,
                HskLevel::MIN,
                HskLevel::MAX
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(ConfigError::Invalid("parallel_threshold must be positive".into()));
        }
        Ok(())
    }

    /// The target level, clamped into range for configs built by hand.
    pub fn target_level(&self) -> HskLevel {
        HskLevel::new(self.target_level).unwrap_or(if self.target_level == 0 {
            HskLevel::MIN
        } else {
            HskLevel::MAX
        })
    }

    pub fn with_target_level(mut self, level: HskLevel) -> Self {
        self.target_level = level.get();
        self
    }

    pub fn with_vocabulary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.vocabulary_path = path.into();
        self
    }
}
