// src/driver/core.rs

//! Pure monitoring state machine.
//!
//! The core knows which task id belongs to which job and turns completion
//! events into [`JobOutcome`]s. It has no channels, no Tokio types, and
//! performs no IO, so it can be tested without an engine.

use std::collections::HashMap;

use tracing::{error, info, warn};

use crate::dag::{Job, JobKind};
use crate::driver::outcome::{JobOutcome, OutcomeReport, TaskOutcome};
use crate::exec::{TaskId, TaskReport};

/// Events fed into the core by the driver shell.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// The engine returned a finished task.
    Completed(TaskReport),
    /// A bounded wait elapsed without a finished task.
    WaitTimedOut,
}

#[derive(Debug, Default)]
pub struct MonitorCore {
    submitted: HashMap<TaskId, (String, JobKind)>,
    report: OutcomeReport,
}

impl MonitorCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_submission(&mut self, task_id: TaskId, job: &Job) {
        self.submitted.insert(task_id, (job.name.clone(), job.kind));
    }

    /// Submitted tasks that have not been classified yet.
    pub fn outstanding(&self) -> usize {
        self.submitted.len()
    }

    /// Handle one event, returning the classified outcome if it was a
    /// completion of a known task.
    pub fn step(&mut self, event: MonitorEvent) -> Option<JobOutcome> {
        let report = match event {
            MonitorEvent::Completed(report) => report,
            MonitorEvent::WaitTimedOut => {
                self.report.idle_waits += 1;
                return None;
            }
        };

        let Some((job_name, kind)) = self.submitted.remove(&report.id) else {
            warn!(task_id = report.id, "completion for unknown or already reported task; ignoring");
            return None;
        };

        let outcome = TaskOutcome::classify(&report);
        match &outcome {
            TaskOutcome::Succeeded => {
                info!(task_id = report.id, job = %job_name, "task succeeded");
            }
            TaskOutcome::ApplicationError { result_code, std_output } => {
                warn!(
                    task_id = report.id,
                    job = %job_name,
                    result_code,
                    output = %std_output.trim(),
                    "task completed with an execution error"
                );
            }
            TaskOutcome::DispatchFailure { result_code, reason } => {
                error!(
                    task_id = report.id,
                    job = %job_name,
                    result_code,
                    reason = %reason.trim(),
                    "task failed to execute"
                );
            }
        }

        let job_outcome = JobOutcome {
            job_name,
            kind,
            task_id: report.id,
            outcome,
        };
        self.report.outcomes.push(job_outcome.clone());
        Some(job_outcome)
    }

    pub fn report(&self) -> &OutcomeReport {
        &self.report
    }

    pub fn into_report(self) -> OutcomeReport {
        self.report
    }
}
