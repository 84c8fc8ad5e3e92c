// src/dag/graph.rs

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::artifact::{ArtifactId, ArtifactRegistry, ExternalKind, Producer};
use crate::dag::job::{Job, JobId, JobKind, JobSpec};
use crate::errors::{GenomeDagError, Result};
use crate::naming;

/// Jobs plus the artifacts they exchange.
///
/// There are no stored edges: job `A` precedes job `B` iff some output of `A`
/// is an input of `B`. The registry guarantees each artifact has at most one
/// producer, so the inferred edges are unambiguous. [`JobGraph::validate`]
/// checks that every input is bound and that the inferred graph is acyclic.
#[derive(Debug, Clone, Default)]
pub struct JobGraph {
    artifacts: ArtifactRegistry,
    jobs: Vec<Job>,
    by_name: HashMap<String, JobId>,
    /// artifact -> jobs that list it as an input.
    consumers: HashMap<ArtifactId, Vec<JobId>>,
}

impl JobGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> ArtifactId {
        self.artifacts.intern(name)
    }

    pub fn declare_external(&mut self, name: &str, kind: ExternalKind) -> Result<ArtifactId> {
        self.artifacts.declare_external(name, kind)
    }

    /// Add a job, binding it as the producer of its outputs.
    ///
    /// Rejects jobs with no outputs, with the same output listed twice, or
    /// whose outputs already have a producer. A rejected job leaves the graph
    /// unchanged.
    pub fn add_job(&mut self, spec: JobSpec) -> Result<JobId> {
        let Some(first) = spec.outputs.first() else {
            return Err(GenomeDagError::InvalidJob(format!(
                "{} job for chromosome {} declares no outputs",
                spec.kind, spec.chromosome
            )));
        };

        let name = naming::job_name(spec.kind.transformation(), self.artifacts.name(*first));

        let mut seen = HashSet::new();
        for out in &spec.outputs {
            if !seen.insert(*out) {
                return Err(GenomeDagError::InvalidJob(format!(
                    "job '{name}' lists output '{}' more than once",
                    self.artifacts.name(*out)
                )));
            }
        }
        for out in &spec.outputs {
            self.artifacts.check_unbound(*out, &name)?;
        }
        if self.by_name.contains_key(&name) {
            return Err(GenomeDagError::InvalidJob(format!(
                "job name '{name}' is already taken"
            )));
        }

        let id = JobId(self.jobs.len());
        for out in &spec.outputs {
            self.artifacts.bind_producer(*out, id, &name)?;
        }
        for input in &spec.inputs {
            let entry = self.consumers.entry(*input).or_default();
            if !entry.contains(&id) {
                entry.push(id);
            }
        }

        debug!(job = %name, kind = %spec.kind, inputs = spec.inputs.len(), "added job");

        self.by_name.insert(name.clone(), id);
        self.jobs.push(Job {
            id,
            name,
            kind: spec.kind,
            chromosome: spec.chromosome,
            args: spec.args,
            inputs: spec.inputs,
            outputs: spec.outputs,
            stage_out: spec.stage_out,
            cluster_label: spec.cluster_label,
        });

        Ok(id)
    }

    pub fn artifacts(&self) -> &ArtifactRegistry {
        &self.artifacts
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, id: JobId) -> &Job {
        &self.jobs[id.0]
    }

    pub fn job_by_name(&self, name: &str) -> Option<&Job> {
        self.by_name.get(name).map(|id| &self.jobs[id.0])
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn count_of(&self, kind: JobKind) -> usize {
        self.jobs.iter().filter(|j| j.kind == kind).count()
    }

    /// Job counts per kind, e.g. `8 jobs (shard=2, merge=1, sift=1, ...)`.
    pub fn summary(&self) -> String {
        let counts: Vec<String> = JobKind::ALL
            .iter()
            .map(|kind| format!("{kind}={}", self.count_of(*kind)))
            .collect();
        format!("{} jobs ({})", self.len(), counts.join(", "))
    }

    /// Jobs that consume `artifact`.
    pub fn consumers_of(&self, artifact: ArtifactId) -> &[JobId] {
        self.consumers
            .get(&artifact)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Jobs producing at least one input of `id`.
    pub fn dependencies_of(&self, id: JobId) -> Vec<JobId> {
        let mut deps = BTreeSet::new();
        for input in &self.jobs[id.0].inputs {
            if let Producer::Job(p) = self.artifacts.producer(*input) {
                deps.insert(p);
            }
        }
        deps.into_iter().collect()
    }

    /// Jobs consuming at least one output of `id`.
    pub fn dependents_of(&self, id: JobId) -> Vec<JobId> {
        let mut deps = BTreeSet::new();
        for out in &self.jobs[id.0].outputs {
            deps.extend(self.consumers_of(*out).iter().copied());
        }
        deps.into_iter().collect()
    }

    /// The inferred dependency graph, edge direction producer -> consumer.
    pub fn dependency_graph(&self) -> DiGraphMap<JobId, ArtifactId> {
        let mut graph = DiGraphMap::new();
        for job in &self.jobs {
            graph.add_node(job.id);
        }
        for job in &self.jobs {
            for input in &job.inputs {
                if let Producer::Job(p) = self.artifacts.producer(*input) {
                    graph.add_edge(p, job.id, *input);
                }
            }
        }
        graph
    }

    /// Check that every input is externally supplied or produced by a job,
    /// and that the inferred graph has no cycle.
    pub fn validate(&self) -> Result<()> {
        for job in &self.jobs {
            for input in &job.inputs {
                if self.artifacts.producer(*input) == Producer::Unbound {
                    return Err(GenomeDagError::MissingProducer {
                        artifact: self.artifacts.name(*input).to_string(),
                        job: job.name.clone(),
                    });
                }
            }
        }
        self.topological_order().map(|_| ())
    }

    /// Jobs ordered so that every producer precedes its consumers.
    pub fn topological_order(&self) -> Result<Vec<JobId>> {
        let graph = self.dependency_graph();
        toposort(&graph, None).map_err(|cycle| {
            GenomeDagError::DagCycle(format!(
                "cycle detected in job graph involving job '{}'",
                self.jobs[cycle.node_id().0].name
            ))
        })
    }

    /// Render the inferred graph in Graphviz DOT format.
    ///
    /// Nodes are job names, edges are labelled with the artifact that
    /// induces them.
    pub fn to_dot(&self) -> String {
        let mut graph: DiGraph<String, String> = DiGraph::new();
        let nodes: Vec<NodeIndex> = self
            .jobs
            .iter()
            .map(|j| graph.add_node(j.name.clone()))
            .collect();
        for job in &self.jobs {
            for input in &job.inputs {
                if let Producer::Job(p) = self.artifacts.producer(*input) {
                    graph.add_edge(
                        nodes[p.0],
                        nodes[job.id.0],
                        self.artifacts.name(*input).to_string(),
                    );
                }
            }
        }
        format!("{}", Dot::new(&graph))
    }

    /// Stable digest of the graph's jobs.
    ///
    /// Jobs are hashed by name, kind, arguments and input/output names in
    /// sorted job-name order, so two graphs built from the same inputs share
    /// a fingerprint regardless of construction order.
    pub fn fingerprint(&self) -> String {
        let mut lines: Vec<String> = self
            .jobs
            .iter()
            .map(|job| {
                let inputs: Vec<&str> = job.inputs.iter().map(|a| self.artifacts.name(*a)).collect();
                let outputs: Vec<&str> =
                    job.outputs.iter().map(|a| self.artifacts.name(*a)).collect();
                format!(
                    "{}|{}|{}|{}|{}|{}",
                    job.name,
                    job.kind,
                    job.args.join(" "),
                    inputs.join(","),
                    outputs.join(","),
                    job.stage_out
                )
            })
            .collect();
        lines.sort();

        let mut hasher = blake3::Hasher::new();
        for line in &lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }
}
