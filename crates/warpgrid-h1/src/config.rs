//! Parser configuration, optionally loaded from TOML.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::body::{SpillFactory, TempFileSpill};
use crate::error::ConfigError;

pub const DEFAULT_MAX_HEADER_LINE_LENGTH: usize = 10 * 1024;
pub const DEFAULT_MAX_HEADER_COUNT: usize = 100;
pub const DEFAULT_MIN_SPILL_TO_DISK_SIZE: u64 = 1024 * 1024;

/// Limits and body storage settings for a [`RequestParser`](crate::RequestParser).
///
/// Every field has a default, so a TOML file only needs to name the
/// settings it changes:
///
/// ```toml
/// max_header_count = 50
/// min_spill_to_disk_size = 65536
/// spill_dir = "/var/tmp/h1"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Longest accepted request or header line, excluding the line terminator.
    pub max_header_line_length: usize,
    /// Most header lines (including continuation lines) accepted per request.
    pub max_header_count: usize,
    /// Declared bodies at least this large are stored on disk.
    pub min_spill_to_disk_size: u64,
    /// Directory for spilled bodies. Defaults to the system temp directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spill_dir: Option<PathBuf>,
    /// Overrides how spill files are created. Takes precedence over `spill_dir`.
    #[serde(skip)]
    pub spill_factory: Option<Arc<dyn SpillFactory>>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_header_line_length: DEFAULT_MAX_HEADER_LINE_LENGTH,
            max_header_count: DEFAULT_MAX_HEADER_COUNT,
            min_spill_to_disk_size: DEFAULT_MIN_SPILL_TO_DISK_SIZE,
            spill_dir: None,
            spill_factory: None,
        }
    }
}

impl ParserConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject limits that would make every request fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_header_line_length == 0 {
            return Err(ConfigError::Invalid(
                "max_header_line_length must be greater than zero".to_string(),
            ));
        }
        if self.max_header_count == 0 {
            return Err(ConfigError::Invalid(
                "max_header_count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_max_header_line_length(mut self, len: usize) -> Self {
        self.max_header_line_length = len;
        self
    }

    pub fn with_max_header_count(mut self, count: usize) -> Self {
        self.max_header_count = count;
        self
    }

    pub fn with_min_spill_to_disk_size(mut self, size: u64) -> Self {
        self.min_spill_to_disk_size = size;
        self
    }

    pub fn with_spill_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spill_dir = Some(dir.into());
        self
    }

    pub fn with_spill_factory(mut self, factory: Arc<dyn SpillFactory>) -> Self {
        self.spill_factory = Some(factory);
        self
    }

    /// Create the backing file for a disk-spilled body.
    pub fn spill(&self) -> io::Result<File> {
        match &self.spill_factory {
            Some(factory) => factory.create(),
            None => match &self.spill_dir {
                Some(dir) => TempFileSpill::in_dir(dir).create(),
                None => TempFileSpill::new().create(),
            },
        }
    }
}
