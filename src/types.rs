// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How long the dispatch engine may keep a declared external file around.
///
/// - `Always`: reuse the file across the whole run, never re-stage it
///   (what the driver uses for every external input).
/// - `Workflow`: keep it for this workflow only.
/// - `Task`: stage it anew for every task that consumes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachingPolicy {
    #[default]
    Always,
    Workflow,
    Task,
}

impl FromStr for CachingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always" => Ok(CachingPolicy::Always),
            "workflow" => Ok(CachingPolicy::Workflow),
            "task" => Ok(CachingPolicy::Task),
            other => Err(format!(
                "invalid caching policy: {other} (expected \"always\", \"workflow\" or \"task\")"
            )),
        }
    }
}

/// Job clustering mode requested for the shard and merge stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusteringMode {
    #[default]
    None,
    /// Stage shard data through memory with Decaf.
    Decaf,
    /// MPI cluster mode; compute nodes must have MPI available.
    Pmc,
}

impl ClusteringMode {
    /// Label attached to clustered jobs, if clustering is enabled.
    pub fn cluster_label(self) -> Option<&'static str> {
        match self {
            ClusteringMode::None => None,
            ClusteringMode::Decaf | ClusteringMode::Pmc => Some("cluster1"),
        }
    }
}

impl fmt::Display for ClusteringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClusteringMode::None => "none",
            ClusteringMode::Decaf => "decaf",
            ClusteringMode::Pmc => "pmc",
        };
        f.write_str(s)
    }
}
