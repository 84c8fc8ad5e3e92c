// src/driver/runtime.rs

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::DriverSection;
use crate::dag::JobGraph;
use crate::errors::Result;
use crate::exec::{DispatchEngine, TaskSubmission};
use crate::types::CachingPolicy;

use super::core::{MonitorCore, MonitorEvent};
use super::layout::ReplicaLayout;
use super::outcome::OutcomeReport;

#[derive(Debug, Clone, Copy)]
pub struct DriverOptions {
    pub wait_timeout: Duration,
    pub caching: CachingPolicy,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(5),
            caching: CachingPolicy::Always,
        }
    }
}

impl From<&DriverSection> for DriverOptions {
    fn from(section: &DriverSection) -> Self {
        Self {
            wait_timeout: Duration::from_secs(section.wait_timeout_secs),
            caching: section.caching,
        }
    }
}

/// Hands a [`JobGraph`] to a [`DispatchEngine`] and monitors it to the end.
///
/// This is the IO shell around [`MonitorCore`], which owns the
/// classification semantics. The driver neither retries failed jobs nor
/// holds back dependents of failed jobs; the engine attempts them and they
/// are reported like any other task.
pub struct ExecutionDriver<E: DispatchEngine> {
    engine: E,
    layout: ReplicaLayout,
    options: DriverOptions,
    core: MonitorCore,
}

impl<E: DispatchEngine> fmt::Debug for ExecutionDriver<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionDriver")
            .field("layout", &self.layout)
            .field("options", &self.options)
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: DispatchEngine> ExecutionDriver<E> {
    pub fn new(engine: E, layout: ReplicaLayout, options: DriverOptions) -> Self {
        Self {
            engine,
            layout,
            options,
            core: MonitorCore::new(),
        }
    }

    /// Declare external files, submit every job, then wait until the engine
    /// has nothing left.
    pub async fn run(mut self, graph: &JobGraph) -> Result<OutcomeReport> {
        self.declare_externals(graph)?;
        self.submit_all(graph)?;
        self.monitor().await?;
        Ok(self.core.into_report())
    }

    fn declare_externals(&mut self, graph: &JobGraph) -> Result<()> {
        let mut declared = 0usize;
        for (_, artifact, kind) in graph.artifacts().externals() {
            let source = self.layout.external_path(kind, &artifact.name);
            self.engine
                .declare_file(&artifact.name, &source, self.options.caching)?;
            declared += 1;
        }
        info!(files = declared, caching = ?self.options.caching, "declared external files");
        Ok(())
    }

    fn submit_all(&mut self, graph: &JobGraph) -> Result<()> {
        let names = |ids: &[crate::dag::ArtifactId]| -> Vec<String> {
            ids.iter()
                .map(|id| graph.artifacts().name(*id).to_string())
                .collect()
        };

        for job in graph.jobs() {
            let submission = TaskSubmission {
                job_name: job.name.clone(),
                command: self.layout.transformation_path(job.kind),
                args: job.args.clone(),
                inputs: names(&job.inputs),
                outputs: names(&job.outputs),
                stage_out: job.stage_out,
                cluster_label: job.cluster_label.clone(),
            };
            let task_id = self.engine.submit(submission)?;
            debug!(task_id, job = %job.name, "submitted task");
            self.core.record_submission(task_id, job);
        }

        info!(tasks = graph.len(), "submitted all jobs; waiting for tasks to complete");
        Ok(())
    }

    async fn monitor(&mut self) -> Result<()> {
        while !self.engine.is_empty() {
            let event = match self.engine.wait(self.options.wait_timeout).await? {
                Some(report) => MonitorEvent::Completed(report),
                None => MonitorEvent::WaitTimedOut,
            };
            self.core.step(event);
        }

        let report = self.core.report();
        info!(
            succeeded = report.succeeded(),
            application_errors = report.application_errors(),
            dispatch_failures = report.dispatch_failures(),
            unreported = self.core.outstanding(),
            "all tasks complete"
        );
        Ok(())
    }
}
