// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{GenomeDagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::GenomeDagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.workflow, raw.driver))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_workflow(cfg)?;
    validate_driver(cfg)?;
    Ok(())
}

fn validate_workflow(cfg: &RawConfigFile) -> Result<()> {
    let wf = &cfg.workflow;

    if wf.name.trim().is_empty() {
        return Err(GenomeDagError::ConfigError(
            "[workflow].name must not be empty".to_string(),
        ));
    }
    if wf.columns.trim().is_empty() {
        return Err(GenomeDagError::ConfigError(
            "[workflow].columns must name the column reference file".to_string(),
        ));
    }
    if wf.shards_per_chromosome == 0 {
        return Err(GenomeDagError::ConfigError(
            "[workflow].shards_per_chromosome must be >= 1 (got 0)".to_string(),
        ));
    }
    if wf.exec_site.trim().is_empty() {
        return Err(GenomeDagError::ConfigError(
            "[workflow].exec_site must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_driver(cfg: &RawConfigFile) -> Result<()> {
    if cfg.driver.wait_timeout_secs == 0 {
        return Err(GenomeDagError::ConfigError(
            "[driver].wait_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.driver.max_parallel == 0 {
        return Err(GenomeDagError::ConfigError(
            "[driver].max_parallel must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
