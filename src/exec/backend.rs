// src/exec/backend.rs

//! Pluggable dispatch engine abstraction.
//!
//! The driver talks to a [`DispatchEngine`] instead of a concrete job queue.
//! Any engine that can accept declared files and tasks and report completed
//! tasks one at a time can be substituted without touching graph
//! construction.
//!
//! - [`LocalEngine`](super::LocalEngine) is the implementation used by
//!   `genomedag --submit`. It runs transformations as local processes.
//! - Tests provide their own engine that records submissions and replays
//!   scripted completions.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use crate::errors::Result;
use crate::types::CachingPolicy;

/// Engine-assigned task identifier.
pub type TaskId = u64;

/// Handle returned for a declared external file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    /// Logical name the file is known by inside tasks.
    pub name: String,
    /// Physical location of the replica.
    pub source: PathBuf,
    pub caching: CachingPolicy,
}

/// Everything an engine needs to run one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSubmission {
    /// Unique job name from the graph; engines may use it for logging.
    pub job_name: String,
    /// Executable implementing the job's transformation.
    pub command: PathBuf,
    pub args: Vec<String>,
    /// Logical names of the files the task reads.
    pub inputs: Vec<String>,
    /// Logical names of the files the task writes.
    pub outputs: Vec<String>,
    /// Copy outputs to final storage after success.
    pub stage_out: bool,
    pub cluster_label: Option<String>,
}

/// A completion event as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub id: TaskId,
    /// The task ran and exited cleanly.
    pub successful: bool,
    /// The task ran to completion (whatever its exit status).
    pub completed: bool,
    pub result_code: i32,
    pub std_output: String,
}

/// Capability offered by an external job-dispatch engine.
pub trait DispatchEngine: Send {
    /// Make an externally supplied file available to tasks under `name`.
    fn declare_file(
        &mut self,
        name: &str,
        source: &Path,
        caching: CachingPolicy,
    ) -> Result<FileHandle>;

    /// Queue a task. The engine is responsible for starting it only after
    /// the tasks producing its inputs have finished.
    fn submit(&mut self, task: TaskSubmission) -> Result<TaskId>;

    /// Wait up to `timeout` for the next finished task.
    ///
    /// Returns `Ok(None)` if nothing finished in time.
    fn wait(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TaskReport>>> + Send + '_>>;

    /// Number of submitted tasks that have not been reported yet.
    fn outstanding(&self) -> usize;

    /// `true` once every submitted task has been reported.
    fn is_empty(&self) -> bool {
        self.outstanding() == 0
    }
}
