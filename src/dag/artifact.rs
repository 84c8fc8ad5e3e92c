// src/dag/artifact.rs

//! Interned artifact registry.
//!
//! Artifacts are identified by name. The registry hands out one
//! [`ArtifactId`] per distinct name, so two jobs that mention the same file
//! always share the same handle, and it records who produces each artifact.

use std::collections::HashMap;
use std::fmt;

use crate::dag::job::JobId;
use crate::errors::{GenomeDagError, Result};

/// Handle to an interned artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactId(pub(crate) usize);

impl ArtifactId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of file supplied from outside the graph.
///
/// The kind decides where the driver finds the physical replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalKind {
    /// Per-chromosome variant file consumed by shard jobs.
    BaseFile,
    /// Per-chromosome SIFT annotation file consumed by the sift job.
    SiftingFile,
    /// Shared column reference consumed by shard and analysis jobs.
    Columns,
    /// One population listing.
    Population,
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExternalKind::BaseFile => "base",
            ExternalKind::SiftingFile => "sifting",
            ExternalKind::Columns => "columns",
            ExternalKind::Population => "population",
        };
        f.write_str(s)
    }
}

/// Where an artifact comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Producer {
    /// Mentioned by some job but not (yet) declared or produced.
    Unbound,
    External(ExternalKind),
    Job(JobId),
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub producer: Producer,
}

#[derive(Debug, Clone, Default)]
pub struct ArtifactRegistry {
    artifacts: Vec<Artifact>,
    by_name: HashMap<String, ArtifactId>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `name`, creating an unbound artifact if needed.
    pub fn intern(&mut self, name: &str) -> ArtifactId {
        if let Some(id) = self.by_name.get(name) {
            return *id;
        }
        let id = ArtifactId(self.artifacts.len());
        self.artifacts.push(Artifact {
            name: name.to_string(),
            producer: Producer::Unbound,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Intern `name` as an externally supplied file.
    ///
    /// Declaring the same external file twice is a no-op; declaring a file
    /// that a job already produces is an error.
    pub fn declare_external(&mut self, name: &str, kind: ExternalKind) -> Result<ArtifactId> {
        let id = self.intern(name);
        let artifact = &mut self.artifacts[id.0];
        match artifact.producer {
            Producer::Unbound => artifact.producer = Producer::External(kind),
            Producer::External(existing) if existing == kind => {}
            Producer::External(existing) => {
                return Err(GenomeDagError::DuplicateProducer {
                    artifact: name.to_string(),
                    existing: format!("external {existing} file"),
                    job: format!("external {kind} file"),
                });
            }
            Producer::Job(job) => {
                return Err(GenomeDagError::DuplicateProducer {
                    artifact: name.to_string(),
                    existing: job.to_string(),
                    job: format!("external {kind} file"),
                });
            }
        }
        Ok(id)
    }

    /// Fail if `id` already has a producer.
    pub(crate) fn check_unbound(&self, id: ArtifactId, job_name: &str) -> Result<()> {
        let artifact = &self.artifacts[id.0];
        match artifact.producer {
            Producer::Unbound => Ok(()),
            Producer::External(kind) => Err(GenomeDagError::DuplicateProducer {
                artifact: artifact.name.clone(),
                existing: format!("external {kind} file"),
                job: job_name.to_string(),
            }),
            Producer::Job(existing) => Err(GenomeDagError::DuplicateProducer {
                artifact: artifact.name.clone(),
                existing: existing.to_string(),
                job: job_name.to_string(),
            }),
        }
    }

    /// Record `job` as the single producer of `id`.
    pub(crate) fn bind_producer(&mut self, id: ArtifactId, job: JobId, job_name: &str) -> Result<()> {
        self.check_unbound(id, job_name)?;
        self.artifacts[id.0].producer = Producer::Job(job);
        Ok(())
    }

    pub fn get(&self, id: ArtifactId) -> &Artifact {
        &self.artifacts[id.0]
    }

    pub fn name(&self, id: ArtifactId) -> &str {
        &self.artifacts[id.0].name
    }

    pub fn lookup(&self, name: &str) -> Option<ArtifactId> {
        self.by_name.get(name).copied()
    }

    pub fn producer(&self, id: ArtifactId) -> Producer {
        self.artifacts[id.0].producer
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArtifactId, &Artifact)> {
        self.artifacts
            .iter()
            .enumerate()
            .map(|(i, a)| (ArtifactId(i), a))
    }

    /// Externally supplied artifacts, in declaration order.
    pub fn externals(&self) -> impl Iterator<Item = (ArtifactId, &Artifact, ExternalKind)> {
        self.iter().filter_map(|(id, a)| match a.producer {
            Producer::External(kind) => Some((id, a, kind)),
            _ => None,
        })
    }
}
