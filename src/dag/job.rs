// src/dag/job.rs

//! Job description types.

use std::fmt;

use crate::dag::artifact::ArtifactId;

/// Index of a job inside its [`JobGraph`](crate::dag::JobGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub(crate) usize);

impl JobId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobKind {
    /// Extract the individuals of one row range.
    Shard,
    /// Combine all shard archives of a chromosome.
    Merge,
    /// Filter the chromosome's SIFT annotations.
    Sift,
    MutationOverlap,
    Frequency,
}

impl JobKind {
    pub const ALL: [JobKind; 5] = [
        JobKind::Shard,
        JobKind::Merge,
        JobKind::Sift,
        JobKind::MutationOverlap,
        JobKind::Frequency,
    ];

    /// Name of the executable that implements this kind of job.
    pub fn transformation(self) -> &'static str {
        match self {
            JobKind::Shard => "individuals",
            JobKind::Merge => "individuals_merge",
            JobKind::Sift => "sifting",
            JobKind::MutationOverlap => "mutation_overlap",
            JobKind::Frequency => "frequency",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobKind::Shard => "shard",
            JobKind::Merge => "merge",
            JobKind::Sift => "sift",
            JobKind::MutationOverlap => "mutation_overlap",
            JobKind::Frequency => "frequency",
        };
        f.write_str(s)
    }
}

/// A fully described unit of work.
///
/// Jobs never declare dependencies on each other; edges are inferred from
/// matching input and output artifacts.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    /// Unique, deterministic name (see [`crate::naming::job_name`]).
    pub name: String,
    pub kind: JobKind,
    pub chromosome: String,
    /// Ordered command-line arguments.
    pub args: Vec<String>,
    pub inputs: Vec<ArtifactId>,
    pub outputs: Vec<ArtifactId>,
    /// Whether outputs are copied to final storage once produced.
    pub stage_out: bool,
    pub cluster_label: Option<String>,
}

/// Job under construction, before it receives its [`JobId`].
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub kind: JobKind,
    pub chromosome: String,
    pub args: Vec<String>,
    pub inputs: Vec<ArtifactId>,
    pub outputs: Vec<ArtifactId>,
    pub stage_out: bool,
    pub cluster_label: Option<String>,
}

impl JobSpec {
    pub fn new(kind: JobKind, chromosome: impl Into<String>) -> Self {
        Self {
            kind,
            chromosome: chromosome.into(),
            args: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            stage_out: false,
            cluster_label: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn input(mut self, artifact: ArtifactId) -> Self {
        self.inputs.push(artifact);
        self
    }

    pub fn inputs(mut self, artifacts: impl IntoIterator<Item = ArtifactId>) -> Self {
        self.inputs.extend(artifacts);
        self
    }

    pub fn output(mut self, artifact: ArtifactId) -> Self {
        self.outputs.push(artifact);
        self
    }

    pub fn stage_out(mut self, stage_out: bool) -> Self {
        self.stage_out = stage_out;
        self
    }

    pub fn cluster_label(mut self, label: Option<&str>) -> Self {
        self.cluster_label = label.map(str::to_string);
        self
    }
}
