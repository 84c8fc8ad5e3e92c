// src/driver/outcome.rs

//! Classification of completion events and the final report.

use std::fmt;

use crate::dag::JobKind;
use crate::exec::{TaskId, TaskReport};

/// What happened to one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Ran and exited cleanly.
    Succeeded,
    /// Ran to completion but reported an error.
    ApplicationError { result_code: i32, std_output: String },
    /// Could not be executed at all.
    DispatchFailure { result_code: i32, reason: String },
}

impl TaskOutcome {
    pub fn classify(report: &TaskReport) -> Self {
        if report.successful {
            TaskOutcome::Succeeded
        } else if report.completed {
            TaskOutcome::ApplicationError {
                result_code: report.result_code,
                std_output: report.std_output.clone(),
            }
        } else {
            TaskOutcome::DispatchFailure {
                result_code: report.result_code,
                reason: report.std_output.clone(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub job_name: String,
    pub kind: JobKind,
    pub task_id: TaskId,
    pub outcome: TaskOutcome,
}

/// Per-job outcomes of one driver run, in completion order.
#[derive(Debug, Clone, Default)]
pub struct OutcomeReport {
    pub outcomes: Vec<JobOutcome>,
    /// Waits that returned without a completed task.
    pub idle_waits: u64,
}

impl OutcomeReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_success()).count()
    }

    pub fn application_errors(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, TaskOutcome::ApplicationError { .. }))
            .count()
    }

    pub fn dispatch_failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, TaskOutcome::DispatchFailure { .. }))
            .count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.outcome.is_success())
    }

    pub fn outcome_of(&self, job_name: &str) -> Option<&TaskOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.job_name == job_name)
            .map(|o| &o.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.outcome.is_success())
    }
}

impl fmt::Display for OutcomeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} tasks: {} succeeded, {} application errors, {} dispatch failures",
            self.outcomes.len(),
            self.succeeded(),
            self.application_errors(),
            self.dispatch_failures()
        )?;
        for o in self.failures() {
            match &o.outcome {
                TaskOutcome::ApplicationError { result_code, .. } => writeln!(
                    f,
                    "  task {} ({}) completed with an execution error, result {}",
                    o.task_id, o.job_name, result_code
                )?,
                TaskOutcome::DispatchFailure { reason, .. } => writeln!(
                    f,
                    "  task {} ({}) failed: {}",
                    o.task_id,
                    o.job_name,
                    reason.trim()
                )?,
                TaskOutcome::Succeeded => {}
            }
        }
        Ok(())
    }
}
