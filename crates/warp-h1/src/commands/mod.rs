pub mod config;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result};
use warpgrid_h1::ParserConfig;

/// Load the parser configuration from `path`, or the defaults if none was given.
pub fn load_config(path: Option<&str>) -> Result<ParserConfig> {
    match path {
        Some(path) => ParserConfig::from_file(Path::new(path))
            .with_context(|| format!("loading parser config from {path}")),
        None => Ok(ParserConfig::default()),
    }
}
