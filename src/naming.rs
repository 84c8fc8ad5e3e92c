// src/naming.rs

//! Deterministic artifact and job names.
//!
//! Every intermediate and final file of a run is named from its chromosome
//! id, shard bounds and population only, so rebuilding the graph from the same
//! inputs yields the same names.

use crate::plan::ShardRange;

pub fn shard_output(chromosome: &str, range: ShardRange) -> String {
    format!("chr{chromosome}n-{}-{}.tar.gz", range.start, range.stop)
}

pub fn merged_chromosome(chromosome: &str) -> String {
    format!("chr{chromosome}n.tar.gz")
}

pub fn sifted_chromosome(chromosome: &str) -> String {
    format!("sifted.SIFT.chr{chromosome}.txt")
}

pub fn mutation_overlap_output(chromosome: &str, population: &str) -> String {
    format!("chr{chromosome}-{population}.tar.gz")
}

pub fn frequency_output(chromosome: &str, population: &str) -> String {
    format!("chr{chromosome}-{population}-freq.tar.gz")
}

/// Job names are derived from the job's single output, prefixed with the
/// transformation so that e.g. `chr1-AFR.tar.gz` and `chr1-AFR-freq.tar.gz`
/// never collide with each other or with their producing jobs.
pub fn job_name(transformation: &str, output: &str) -> String {
    format!("{transformation}:{output}")
}
