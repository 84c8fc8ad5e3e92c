// src/exec/local.rs

//! Dispatch engine running tasks as local processes.

use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::backend::{DispatchEngine, FileHandle, TaskId, TaskReport, TaskSubmission};
use super::task_runner::{run_task, FinishedTask};
use crate::errors::{GenomeDagError, Result};
use crate::types::CachingPolicy;

#[derive(Debug, Clone)]
pub struct LocalEngineOptions {
    /// Working directory of every task; inputs are staged here.
    pub scratch_dir: PathBuf,
    /// Final storage for staged-out outputs.
    pub output_dir: PathBuf,
    /// Maximum number of concurrently running processes.
    pub max_parallel: usize,
}

/// Whether a queued task can start.
enum Readiness {
    Ready,
    Blocked,
    /// Some input will never exist; the reason is reported to the caller.
    Unrunnable(String),
}

/// Runs submitted tasks on this machine.
///
/// A task starts once each of its inputs is either a declared file or the
/// output of a task that has finished, whether or not that task succeeded.
/// If an input is then missing from the scratch directory the task is not
/// executed and is reported as a dispatch failure.
#[derive(Debug)]
pub struct LocalEngine {
    opts: LocalEngineOptions,
    declared: HashMap<String, FileHandle>,
    /// Declared files already copied into the scratch dir.
    staged: HashSet<String>,
    /// Output name -> task that will write it.
    producers: HashMap<String, TaskId>,
    /// Outputs of tasks that have finished.
    settled: HashSet<String>,
    pending: VecDeque<(TaskId, TaskSubmission)>,
    running: JoinSet<FinishedTask>,
    /// Reports produced without running a process.
    synthesized: VecDeque<TaskReport>,
    next_id: TaskId,
}

impl LocalEngine {
    pub fn new(opts: LocalEngineOptions) -> Self {
        Self {
            opts: LocalEngineOptions {
                max_parallel: opts.max_parallel.max(1),
                ..opts
            },
            declared: HashMap::new(),
            staged: HashSet::new(),
            producers: HashMap::new(),
            settled: HashSet::new(),
            pending: VecDeque::new(),
            running: JoinSet::new(),
            synthesized: VecDeque::new(),
            next_id: 1,
        }
    }

    pub fn options(&self) -> &LocalEngineOptions {
        &self.opts
    }

    fn readiness(&self, task: &TaskSubmission) -> Readiness {
        for input in &task.inputs {
            if self.declared.contains_key(input) || self.settled.contains(input) {
                continue;
            }
            if self.producers.contains_key(input) {
                return Readiness::Blocked;
            }
            return Readiness::Unrunnable(format!(
                "input '{input}' is neither declared nor produced by any submitted task"
            ));
        }
        Readiness::Ready
    }

    /// Move every runnable queued task into the running set, up to
    /// `max_parallel`, and fail the ones that can never run.
    ///
    /// Staging problems fail only the task concerned; the queue is never
    /// dropped.
    async fn dispatch_ready(&mut self) {
        let mut still_pending = VecDeque::with_capacity(self.pending.len());

        while let Some((id, task)) = self.pending.pop_front() {
            match self.readiness(&task) {
                Readiness::Blocked => still_pending.push_back((id, task)),
                Readiness::Unrunnable(reason) => self.fail_unrunnable(id, &task, reason),
                Readiness::Ready if self.running.len() >= self.opts.max_parallel => {
                    still_pending.push_back((id, task));
                }
                Readiness::Ready => {
                    if let Err(reason) = self.stage_inputs(id, &task).await {
                        self.fail_unrunnable(id, &task, reason);
                        continue;
                    }
                    debug!(task_id = id, job = %task.job_name, "dispatching task");
                    self.running.spawn(run_task(
                        id,
                        task,
                        self.opts.scratch_dir.clone(),
                        self.opts.output_dir.clone(),
                    ));
                }
            }
        }

        self.pending = still_pending;

        // Nothing running and nothing ready: the remaining tasks wait on each
        // other and can never start.
        if self.running.is_empty() && self.synthesized.is_empty() && !self.pending.is_empty() {
            while let Some((id, task)) = self.pending.pop_front() {
                self.fail_unrunnable(id, &task, "inputs can never become available".to_string());
            }
        }
    }

    fn fail_unrunnable(&mut self, id: TaskId, task: &TaskSubmission, reason: String) {
        warn!(task_id = id, job = %task.job_name, reason = %reason, "task cannot be dispatched");
        // Downstream tasks are still attempted; they will find the outputs missing.
        self.settled.extend(task.outputs.iter().cloned());
        self.synthesized.push_back(TaskReport {
            id,
            successful: false,
            completed: false,
            result_code: -1,
            std_output: reason,
        });
    }

    /// Copy declared inputs into the scratch dir and check produced ones.
    ///
    /// On failure returns the reason the task cannot be dispatched: a copy
    /// that failed or a produced input that does not exist.
    async fn stage_inputs(&mut self, id: TaskId, task: &TaskSubmission) -> std::result::Result<(), String> {
        tokio::fs::create_dir_all(&self.opts.scratch_dir)
            .await
            .map_err(|e| format!("creating scratch dir {:?}: {e}", self.opts.scratch_dir))?;

        for input in &task.inputs {
            let target = self.opts.scratch_dir.join(input);
            match self.declared.get(input) {
                Some(handle) => {
                    let per_task = handle.caching == CachingPolicy::Task;
                    if !per_task && self.staged.contains(input) {
                        continue;
                    }
                    // Per-task copies replace the file by rename so a task
                    // still reading the previous copy keeps its own inode.
                    let dest = if per_task {
                        self.opts.scratch_dir.join(format!(".{input}.{id}.staging"))
                    } else {
                        target.clone()
                    };
                    tokio::fs::copy(&handle.source, &dest)
                        .await
                        .map_err(|e| format!("staging {:?} to {:?}: {e}", handle.source, target))?;
                    if per_task {
                        tokio::fs::rename(&dest, &target)
                            .await
                            .map_err(|e| format!("replacing {:?}: {e}", target))?;
                    }
                    debug!(file = %input, source = ?handle.source, per_task, "staged input");
                    self.staged.insert(input.clone());
                }
                None => {
                    if !tokio::fs::try_exists(&target).await.unwrap_or(false) {
                        return Err(format!("input '{input}' was never produced"));
                    }
                }
            }
        }
        Ok(())
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)
        .with_context(|| format!("resolving {:?}", path))?)
}

impl DispatchEngine for LocalEngine {
    fn declare_file(
        &mut self,
        name: &str,
        source: &Path,
        caching: CachingPolicy,
    ) -> Result<FileHandle> {
        if let Some(existing) = self.declared.get(name) {
            if existing.source != absolute(source)? {
                return Err(GenomeDagError::EngineError(format!(
                    "file '{name}' already declared from {:?}",
                    existing.source
                )));
            }
            return Ok(existing.clone());
        }

        let handle = FileHandle {
            name: name.to_string(),
            source: absolute(source)?,
            caching,
        };
        debug!(file = %name, source = ?handle.source, ?caching, "declared file");
        self.declared.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    fn submit(&mut self, mut task: TaskSubmission) -> Result<TaskId> {
        for out in &task.outputs {
            if self.declared.contains_key(out) {
                return Err(GenomeDagError::EngineError(format!(
                    "job '{}' writes declared input file '{out}'",
                    task.job_name
                )));
            }
            if let Some(other) = self.producers.get(out) {
                return Err(GenomeDagError::EngineError(format!(
                    "job '{}' writes '{out}', already written by task {other}",
                    task.job_name
                )));
            }
        }

        task.command = absolute(&task.command)?;
        let id = self.next_id;
        self.next_id += 1;

        for out in &task.outputs {
            self.producers.insert(out.clone(), id);
        }
        if let Some(label) = &task.cluster_label {
            debug!(task_id = id, job = %task.job_name, label = %label, "cluster label ignored by local engine");
        }
        self.pending.push_back((id, task));
        Ok(id)
    }

    fn wait(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TaskReport>>> + Send + '_>> {
        Box::pin(async move {
            self.dispatch_ready().await;

            if let Some(report) = self.synthesized.pop_front() {
                return Ok(Some(report));
            }
            if self.running.is_empty() {
                return Ok(None);
            }

            match tokio::time::timeout(timeout, self.running.join_next()).await {
                Err(_elapsed) => Ok(None),
                Ok(None) => Ok(None),
                Ok(Some(Err(join_err))) => Err(GenomeDagError::EngineError(format!(
                    "task runner aborted: {join_err}"
                ))),
                Ok(Some(Ok(finished))) => {
                    self.settled.extend(finished.outputs);
                    info!(
                        task_id = finished.report.id,
                        successful = finished.report.successful,
                        "task finished"
                    );
                    Ok(Some(finished.report))
                }
            }
        })
    }

    fn outstanding(&self) -> usize {
        self.pending.len() + self.running.len() + self.synthesized.len()
    }
}
