#![allow(dead_code)]

use genomedag::dataset::{ChromosomeDataset, Population};

/// Builder for the dataset rows of a run.
pub struct DatasetBuilder {
    rows: Vec<ChromosomeDataset>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add chromosome `c` with the conventional file names
    /// `ALL.chr{c}.{rows}.vcf` and `SIFT.chr{c}.txt`.
    pub fn chromosome(mut self, c: &str, rows: u64) -> Self {
        let ds = ChromosomeDataset::new(
            format!("ALL.chr{c}.{rows}.vcf"),
            rows,
            format!("SIFT.chr{c}.txt"),
        )
        .expect("builder rows are well formed");
        self.rows.push(ds);
        self
    }

    pub fn row(mut self, base_file: &str, rows: u64, sifting_file: &str) -> Self {
        let ds = ChromosomeDataset::new(base_file, rows, sifting_file)
            .expect("builder rows are well formed");
        self.rows.push(ds);
        self
    }

    pub fn build(self) -> Vec<ChromosomeDataset> {
        self.rows
    }
}

impl Default for DatasetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Populations from names, e.g. `populations(&["AFR", "EUR"])`.
pub fn populations(names: &[&str]) -> Vec<Population> {
    names.iter().map(|n| Population::new(*n)).collect()
}
