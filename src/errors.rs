// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenomeDagError {
    #[error(
        "Partition error: for file {file}: required individuals jobs {shards} does not divide the number of rows {rows}"
    )]
    Partition {
        file: String,
        shards: u64,
        rows: u64,
    },

    #[error("Row count {rows} of file {file} is too large to address")]
    RowCount { file: String, rows: u64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Dataset error: {0}")]
    DatasetError(String),

    #[error("Artifact '{artifact}' is produced by both '{existing}' and '{job}'")]
    DuplicateProducer {
        artifact: String,
        existing: String,
        job: String,
    },

    #[error("Job '{job}' consumes '{artifact}' but no job produces it")]
    MissingProducer { artifact: String, job: String },

    #[error("Invalid job: {0}")]
    InvalidJob(String),

    #[error("Cycle detected in job graph: {0}")]
    DagCycle(String),

    #[error("Dispatch engine error: {0}")]
    EngineError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GenomeDagError>;
