//! TOML configuration file support.
//!
//! Instead of repeating flags on every invocation, the default output path
//! and default object path can be set in a `rootpack2csv.toml` next to where
//! the tool runs:
//!
//! ```toml
//! # rootpack2csv.toml
//! [convert]
//! output = "run42.csv"
//! tree = "data/evt"
//! ```
//!
//! Command-line flags always override the file; hard-coded fallbacks apply
//! when neither is given.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name probed in the working directory.
pub const CONFIG_FILE_NAME: &str = "rootpack2csv.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or shape error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Defaults for convert mode.
    #[serde(default)]
    pub convert: ConvertDefaults,
}

/// Configurable defaults for the conversion pipeline.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertDefaults {
    /// Default destination CSV path.
    pub output: Option<PathBuf>,

    /// Default slash-delimited object path inside the container.
    pub tree: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&std::fs::read_to_string(path)?)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load [`CONFIG_FILE_NAME`] from the working directory, falling back
    /// to defaults when the file does not exist.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
