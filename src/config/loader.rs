// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Load the raw config, falling back to built-in defaults when `path` is the
/// default location and nothing exists there.
///
/// An explicitly requested file that does not exist is an error.
pub fn load_or_default(path: impl AsRef<Path>, explicit: bool) -> Result<RawConfigFile> {
    let path = path.as_ref();
    if !explicit && !path.exists() {
        debug!(path = ?path, "no config file; using defaults");
        return Ok(RawConfigFile::default());
    }
    load_from_path(path)
}

/// Default config location: `Genomedag.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Genomedag.toml")
}
