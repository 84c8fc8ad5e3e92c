// src/exec/task_runner.rs

//! Individual task process runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::backend::{TaskId, TaskReport, TaskSubmission};

/// Result of one process run, with what the engine needs to settle outputs.
#[derive(Debug)]
pub struct FinishedTask {
    pub report: TaskReport,
    pub outputs: Vec<String>,
}

/// Run `task` inside `scratch_dir` and report how it went.
///
/// - If the process cannot be spawned, the report is a dispatch failure
///   (`completed = false`).
/// - A clean exit whose declared outputs are missing is reported as an
///   application error.
/// - On success, staged-out outputs are copied to `output_dir`; if that copy
///   fails the task is reported as an application error.
pub async fn run_task(
    id: TaskId,
    task: TaskSubmission,
    scratch_dir: PathBuf,
    output_dir: PathBuf,
) -> FinishedTask {
    let report = match run_task_inner(id, &task, &scratch_dir).await {
        Ok(mut report) => {
            if report.successful {
                check_outputs(&task, &scratch_dir, &mut report).await;
            }
            if report.successful && task.stage_out {
                if let Err(err) = stage_out(&task, &scratch_dir, &output_dir).await {
                    warn!(
                        task_id = id,
                        job = %task.job_name,
                        error = %err,
                        "staging out outputs failed"
                    );
                    report.successful = false;
                    report
                        .std_output
                        .push_str(&format!("staging out failed: {err:#}\n"));
                }
            }
            report
        }
        Err(err) => {
            warn!(task_id = id, job = %task.job_name, error = %err, "task could not be executed");
            TaskReport {
                id,
                successful: false,
                completed: false,
                result_code: -1,
                std_output: format!("{err:#}"),
            }
        }
    };

    FinishedTask {
        report,
        outputs: task.outputs,
    }
}

async fn run_task_inner(id: TaskId, task: &TaskSubmission, scratch_dir: &Path) -> Result<TaskReport> {
    info!(
        task_id = id,
        job = %task.job_name,
        cmd = %task.command.display(),
        args = ?task.args,
        "starting task process"
    );

    let mut cmd = Command::new(&task.command);
    cmd.args(&task.args)
        .current_dir(scratch_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = cmd
        .output()
        .await
        .with_context(|| format!("spawning process for job '{}'", task.job_name))?;

    for line in String::from_utf8_lossy(&output.stderr).lines() {
        debug!(task_id = id, job = %task.job_name, "stderr: {}", line);
    }

    let code = output.status.code().unwrap_or(-1);
    info!(
        task_id = id,
        job = %task.job_name,
        exit_code = code,
        success = output.status.success(),
        "task process exited"
    );

    Ok(TaskReport {
        id,
        successful: output.status.success(),
        completed: true,
        result_code: code,
        std_output: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

async fn check_outputs(task: &TaskSubmission, scratch_dir: &Path, report: &mut TaskReport) {
    for name in &task.outputs {
        if !tokio::fs::try_exists(scratch_dir.join(name)).await.unwrap_or(false) {
            report.successful = false;
            report.std_output.push_str(&format!("missing declared output '{name}'\n"));
        }
    }
}

async fn stage_out(task: &TaskSubmission, scratch_dir: &Path, output_dir: &Path) -> Result<()> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("creating output dir {:?}", output_dir))?;
    for name in &task.outputs {
        let from = scratch_dir.join(name);
        let to = output_dir.join(name);
        tokio::fs::copy(&from, &to)
            .await
            .with_context(|| format!("copying {:?} to {:?}", from, to))?;
        debug!(job = %task.job_name, output = %name, "staged out");
    }
    Ok(())
}
