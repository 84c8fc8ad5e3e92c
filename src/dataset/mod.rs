// src/dataset/mod.rs

//! Run inputs: per-chromosome dataset rows and population files.
//!
//! - [`loader`] reads the dataset description (CSV) and discovers the
//!   population directory through the [`FileSystem`](crate::fs::FileSystem)
//!   abstraction.

pub mod loader;

use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{GenomeDagError, Result};

pub use loader::{discover_populations, load_datasets, parse_datasets};

/// One row of the dataset description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromosomeDataset {
    pub base_file: String,
    /// Number of rows in the base file.
    pub threshold: u64,
    pub sifting_file: String,
    /// Chromosome id extracted from `base_file`.
    pub chromosome: String,
}

impl ChromosomeDataset {
    pub fn new(
        base_file: impl Into<String>,
        threshold: u64,
        sifting_file: impl Into<String>,
    ) -> Result<Self> {
        let base_file = base_file.into();
        let sifting_file = sifting_file.into();

        if threshold == 0 {
            return Err(GenomeDagError::DatasetError(format!(
                "row count for '{base_file}' must be positive"
            )));
        }
        if sifting_file.trim().is_empty() {
            return Err(GenomeDagError::DatasetError(format!(
                "no sifting file given for '{base_file}'"
            )));
        }
        let chromosome = chromosome_id(&base_file)?;

        Ok(Self {
            base_file,
            threshold,
            sifting_file,
            chromosome,
        })
    }
}

/// A population listing, named after its file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Population {
    pub name: String,
}

impl Population {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

fn chromosome_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = PATTERN.get() {
        return Ok(re);
    }
    let re = Regex::new(r"chr([^.]*)").map_err(anyhow::Error::from)?;
    Ok(PATTERN.get_or_init(|| re))
}

/// Extract the chromosome id from a base filename.
///
/// The id is whatever follows the first `chr` up to the next `.`, e.g.
/// `ALL.chr1.250000.vcf` -> `1`, `ALL.chrX.vcf` -> `X`.
pub fn chromosome_id(base_file: &str) -> Result<String> {
    let id = chromosome_pattern()?
        .captures(base_file)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");

    if id.is_empty() {
        return Err(GenomeDagError::DatasetError(format!(
            "cannot extract a chromosome id from '{base_file}' (expected '...chr<ID>.<...>')"
        )));
    }
    Ok(id.to_string())
}
