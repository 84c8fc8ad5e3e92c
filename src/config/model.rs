// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{CachingPolicy, ClusteringMode};

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [workflow]
/// dataset = "20130502"
/// datafile = "data.csv"
/// shards_per_chromosome = 250
///
/// [driver]
/// wait_timeout_secs = 5
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub workflow: WorkflowSection,

    #[serde(default)]
    pub driver: DriverSection,
}

/// Validated configuration. Construct through `ConfigFile::try_from`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub workflow: WorkflowSection,
    pub driver: DriverSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(workflow: WorkflowSection, driver: DriverSection) -> Self {
        Self { workflow, driver }
    }

    /// Directory whose files are the populations of this run.
    pub fn populations_dir(&self) -> PathBuf {
        match &self.workflow.populations_dir {
            Some(dir) => self.workflow.src_path.join(dir),
            None => self.workflow.src_path.join("data").join("populations"),
        }
    }
}

/// `[workflow]` section: what graph to build.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowSection {
    #[serde(default = "default_name")]
    pub name: String,

    /// Folder under `<src_path>/data/` holding the chromosome files.
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// CSV describing one chromosome per row.
    #[serde(default = "default_datafile")]
    pub datafile: PathBuf,

    /// Requested number of shard jobs per chromosome (clamped to its rows).
    #[serde(default = "default_shards")]
    pub shards_per_chromosome: u64,

    /// Shared column reference file.
    #[serde(default = "default_columns")]
    pub columns: String,

    /// Root holding `bin/` and `data/`.
    #[serde(default = "default_src_path")]
    pub src_path: PathBuf,

    #[serde(default = "default_exec_site")]
    pub exec_site: String,

    /// Run the extensionless shell variants of the transformations.
    #[serde(default)]
    pub use_bash: bool,

    #[serde(default)]
    pub clustering: ClusteringMode,

    /// Population directory relative to `src_path`; defaults to
    /// `data/populations`.
    #[serde(default)]
    pub populations_dir: Option<PathBuf>,
}

/// `[driver]` section: how the graph is submitted and monitored.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverSection {
    /// Upper bound on a single wait for the next completed task.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,

    /// Concurrent processes for the local engine.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Caching directive for declared external files.
    #[serde(default)]
    pub caching: CachingPolicy,
}

fn default_name() -> String {
    "1000-genome".to_string()
}

fn default_dataset() -> String {
    "20130502".to_string()
}

fn default_datafile() -> PathBuf {
    PathBuf::from("data.csv")
}

fn default_shards() -> u64 {
    1
}

fn default_columns() -> String {
    "columns.txt".to_string()
}

fn default_src_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_exec_site() -> String {
    "local".to_string()
}

fn default_wait_timeout_secs() -> u64 {
    5
}

fn default_max_parallel() -> usize {
    4
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            dataset: default_dataset(),
            datafile: default_datafile(),
            shards_per_chromosome: default_shards(),
            columns: default_columns(),
            src_path: default_src_path(),
            exec_site: default_exec_site(),
            use_bash: false,
            clustering: ClusteringMode::default(),
            populations_dir: None,
        }
    }
}

impl Default for DriverSection {
    fn default() -> Self {
        Self {
            wait_timeout_secs: default_wait_timeout_secs(),
            max_parallel: default_max_parallel(),
            caching: CachingPolicy::default(),
        }
    }
}
