// src/dag/mod.rs

//! Job graph representation and construction.
//!
//! - [`artifact`] interns artifact names and tracks their producers.
//! - [`job`] describes jobs and their kinds.
//! - [`graph`] holds the jobs, infers edges from shared artifacts and
//!   validates the result.
//! - [`builder`] wires shard, merge, sift and per-population analysis jobs
//!   into one graph.

pub mod artifact;
pub mod builder;
pub mod graph;
pub mod job;

pub use artifact::{Artifact, ArtifactId, ArtifactRegistry, ExternalKind, Producer};
pub use builder::JobGraphBuilder;
pub use graph::JobGraph;
pub use job::{Job, JobId, JobKind, JobSpec};
