// src/dataset/loader.rs

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, info, warn};

use crate::dataset::{ChromosomeDataset, Population};
use crate::errors::{GenomeDagError, Result};
use crate::fs::FileSystem;

/// Load the dataset description from `path`.
///
/// Each row is `base_filename,row_count,sifting_filename`; there is no
/// header row.
pub fn load_datasets(fs: &dyn FileSystem, path: &Path) -> Result<Vec<ChromosomeDataset>> {
    if !fs.is_file(path) {
        return Err(GenomeDagError::DatasetError(format!(
            "dataset description {:?} does not exist",
            path
        )));
    }
    let reader = fs.open_read(path)?;
    let datasets = parse_datasets(reader)?;
    info!(path = ?path, rows = datasets.len(), "loaded dataset description");
    Ok(datasets)
}

/// Parse dataset rows from any reader.
pub fn parse_datasets(reader: impl Read) -> Result<Vec<ChromosomeDataset>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut datasets = Vec::new();
    for (line_num, record) in csv.records().enumerate() {
        let record = record?;
        let line = line_num + 1;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() < 3 {
            return Err(GenomeDagError::DatasetError(format!(
                "line {line}: expected 3 columns (base file, row count, sifting file), got {}",
                record.len()
            )));
        }

        let base_file = &record[0];
        let threshold: u64 = record[1].parse().map_err(|_| {
            GenomeDagError::DatasetError(format!(
                "line {line}: invalid row count '{}' for '{base_file}'",
                &record[1]
            ))
        })?;
        let dataset = ChromosomeDataset::new(base_file, threshold, &record[2])?;
        debug!(
            line,
            base_file = %dataset.base_file,
            chromosome = %dataset.chromosome,
            threshold,
            "parsed dataset row"
        );
        datasets.push(dataset);
    }

    Ok(datasets)
}

/// Enumerate the population directory once.
///
/// Every non-hidden file becomes one [`Population`]; the result is sorted by
/// name so that graphs built from the same directory are identical.
pub fn discover_populations(fs: &dyn FileSystem, dir: &Path) -> Result<Vec<Population>> {
    if !fs.is_dir(dir) {
        return Err(GenomeDagError::DatasetError(format!(
            "population directory {:?} does not exist",
            dir
        )));
    }

    let mut populations: Vec<Population> = fs
        .read_dir(dir)?
        .into_iter()
        .filter(|p| fs.is_file(p))
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .filter(|name| !name.starts_with('.'))
        .map(Population::new)
        .collect();
    populations.sort();

    if populations.is_empty() {
        warn!(dir = ?dir, "no population files found; no analysis jobs will be generated");
    } else {
        info!(dir = ?dir, count = populations.len(), "discovered populations");
    }

    Ok(populations)
}
