// src/driver/layout.rs

//! Physical locations of external files and transformation executables.

use std::path::PathBuf;

use crate::config::ConfigFile;
use crate::dag::{ExternalKind, JobKind};

/// Maps logical names to paths under the source tree:
///
/// - base files and columns: `<src>/data/<dataset>/<name>`
/// - sifting files: `<src>/data/<dataset>/sifting/<name>`
/// - populations: `<populations_dir>/<name>`
/// - transformations: `<src>/bin/<transformation><suffix>`
#[derive(Debug, Clone)]
pub struct ReplicaLayout {
    pub src_path: PathBuf,
    pub dataset: String,
    pub populations_dir: PathBuf,
    pub use_bash: bool,
}

impl ReplicaLayout {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            src_path: cfg.workflow.src_path.clone(),
            dataset: cfg.workflow.dataset.clone(),
            populations_dir: cfg.populations_dir(),
            use_bash: cfg.workflow.use_bash,
        }
    }

    fn dataset_dir(&self) -> PathBuf {
        self.src_path.join("data").join(&self.dataset)
    }

    pub fn external_path(&self, kind: ExternalKind, name: &str) -> PathBuf {
        match kind {
            ExternalKind::BaseFile | ExternalKind::Columns => self.dataset_dir().join(name),
            ExternalKind::SiftingFile => self.dataset_dir().join("sifting").join(name),
            ExternalKind::Population => self.populations_dir.join(name),
        }
    }

    pub fn transformation_path(&self, kind: JobKind) -> PathBuf {
        // frequency only ships as a Python script.
        let suffix = if self.use_bash && kind != JobKind::Frequency {
            ""
        } else {
            ".py"
        };
        self.src_path
            .join("bin")
            .join(format!("{}{suffix}", kind.transformation()))
    }
}
