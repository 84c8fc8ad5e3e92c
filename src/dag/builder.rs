// src/dag/builder.rs

//! Assemble the full job graph for a run.

use tracing::{debug, info, warn};

use crate::dag::artifact::{ArtifactId, ExternalKind};
use crate::dag::graph::JobGraph;
use crate::dag::job::{JobKind, JobSpec};
use crate::dataset::{ChromosomeDataset, Population};
use crate::errors::Result;
use crate::naming;
use crate::plan::{self, ShardRange};
use crate::types::ClusteringMode;

/// Default name of the shared column reference file.
pub const DEFAULT_COLUMNS_FILE: &str = "columns.txt";

/// Builds one [`JobGraph`] per run.
///
/// For each chromosome the graph holds one shard job per planned range, one
/// merge job, one sift job, and a mutation-overlap plus a frequency job per
/// population, i.e. `D*(S + 2) + D*P*2` jobs overall.
#[derive(Debug, Clone)]
pub struct JobGraphBuilder {
    shards_per_chromosome: u64,
    columns: String,
    clustering: ClusteringMode,
}

impl JobGraphBuilder {
    pub fn new(shards_per_chromosome: u64) -> Self {
        Self {
            shards_per_chromosome,
            columns: DEFAULT_COLUMNS_FILE.to_string(),
            clustering: ClusteringMode::None,
        }
    }

    pub fn with_columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn with_clustering(mut self, clustering: ClusteringMode) -> Self {
        self.clustering = clustering;
        self
    }

    /// Build and validate the graph.
    ///
    /// Every chromosome is planned before any job is created, so a single
    /// row count that does not divide evenly aborts the whole build.
    pub fn build(
        &self,
        datasets: &[ChromosomeDataset],
        populations: &[Population],
    ) -> Result<JobGraph> {
        let plans = datasets
            .iter()
            .map(|ds| plan::plan(&ds.base_file, ds.threshold, self.shards_per_chromosome))
            .collect::<Result<Vec<_>>>()?;

        if populations.is_empty() {
            warn!("population set is empty; building graph without analysis jobs");
        }

        let mut graph = JobGraph::new();
        let columns = graph.declare_external(&self.columns, ExternalKind::Columns)?;
        let population_files = populations
            .iter()
            .map(|p| graph.declare_external(&p.name, ExternalKind::Population))
            .collect::<Result<Vec<_>>>()?;

        for (ds, ranges) in datasets.iter().zip(&plans) {
            self.add_chromosome(&mut graph, ds, ranges, columns, populations, &population_files)?;
        }

        graph.validate()?;

        info!(
            chromosomes = datasets.len(),
            populations = populations.len(),
            jobs = graph.len(),
            fingerprint = %graph.fingerprint(),
            "job graph built"
        );

        Ok(graph)
    }

    fn add_chromosome(
        &self,
        graph: &mut JobGraph,
        ds: &ChromosomeDataset,
        ranges: &[ShardRange],
        columns: ArtifactId,
        populations: &[Population],
        population_files: &[ArtifactId],
    ) -> Result<()> {
        let c = ds.chromosome.as_str();
        let label = self.clustering.cluster_label();
        let threshold = ds.threshold.to_string();

        let base = graph.declare_external(&ds.base_file, ExternalKind::BaseFile)?;

        let mut shard_outputs = Vec::with_capacity(ranges.len());
        for range in ranges {
            let out_name = naming::shard_output(c, *range);
            let out = graph.intern(&out_name);
            graph.add_job(
                JobSpec::new(JobKind::Shard, c)
                    .args([
                        ds.base_file.clone(),
                        c.to_string(),
                        range.start.to_string(),
                        range.stop.to_string(),
                        threshold.clone(),
                    ])
                    .inputs([base, columns])
                    .output(out)
                    .cluster_label(label),
            )?;
            shard_outputs.push((out, out_name));
        }

        let merged = graph.intern(&naming::merged_chromosome(c));
        graph.add_job(
            JobSpec::new(JobKind::Merge, c)
                .arg(c)
                .args(shard_outputs.iter().map(|(_, name)| name.clone()))
                .inputs(shard_outputs.iter().map(|(id, _)| *id))
                .output(merged)
                .cluster_label(label),
        )?;

        let sifting = graph.declare_external(&ds.sifting_file, ExternalKind::SiftingFile)?;
        let sifted = graph.intern(&naming::sifted_chromosome(c));
        graph.add_job(
            JobSpec::new(JobKind::Sift, c)
                .args([ds.sifting_file.clone(), c.to_string()])
                .input(sifting)
                .output(sifted),
        )?;

        for (pop, pop_file) in populations.iter().zip(population_files) {
            let analyses = [
                (
                    JobKind::MutationOverlap,
                    naming::mutation_overlap_output(c, &pop.name),
                ),
                (JobKind::Frequency, naming::frequency_output(c, &pop.name)),
            ];
            for (kind, out_name) in analyses {
                let out = graph.intern(&out_name);
                graph.add_job(
                    JobSpec::new(kind, c)
                        .args(["-c", c, "-pop", pop.name.as_str()])
                        .inputs([merged, sifted, *pop_file, columns])
                        .output(out)
                        .stage_out(true),
                )?;
            }
        }

        debug!(
            chromosome = %c,
            shards = ranges.len(),
            populations = populations.len(),
            "added chromosome jobs"
        );

        Ok(())
    }
}
