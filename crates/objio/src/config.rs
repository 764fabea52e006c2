//! Configuration module

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Highest gzip compression level
pub const MAX_GZIP_LEVEL: u32 = 9;

/// Settings shared by every object a store resolves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// gzip compression level used by writers (0-9)
    pub gzip_level: u32,
    /// Sync local files to disk when a writer closes
    pub sync_on_close: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gzip_level: 6,
            sync_on_close: true,
        }
    }
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Reject out-of-range values
    pub fn validate(&self) -> Result<()> {
        if self.gzip_level > MAX_GZIP_LEVEL {
            return Err(Error::Config(format!(
                "gzip_level must be between 0 and {}, got {}",
                MAX_GZIP_LEVEL, self.gzip_level
            )));
        }
        Ok(())
    }

    pub(crate) fn compression(&self) -> flate2::Compression {
        flate2::Compression::new(self.gzip_level.min(MAX_GZIP_LEVEL))
    }
}
