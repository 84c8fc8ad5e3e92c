use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use genomedag::errors::Result;
use genomedag::exec::{DispatchEngine, FileHandle, TaskId, TaskReport, TaskSubmission};
use genomedag::types::CachingPolicy;

/// Scripted result for a job, keyed by job name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    Success,
    /// Ran but exited with this code.
    AppError(i32),
    /// Never ran.
    DispatchFailure,
}

/// Everything the fake engine was asked to do.
#[derive(Debug, Default)]
pub struct FakeLog {
    pub declared: Vec<(String, PathBuf, CachingPolicy)>,
    pub submitted: Vec<(TaskId, TaskSubmission)>,
    /// Task ids in the order their reports were handed out.
    pub reported: Vec<TaskId>,
    pub waits: usize,
}

/// A fake dispatch engine that:
/// - records declared files and submitted tasks
/// - reports tasks in submission order, with scripted outcomes
///   (default: success)
/// - optionally returns `None` for the first `idle_waits` waits.
pub struct FakeEngine {
    log: Arc<Mutex<FakeLog>>,
    script: HashMap<String, Scripted>,
    queue: VecDeque<(TaskId, String)>,
    idle_waits: usize,
    next_id: TaskId,
}

impl FakeEngine {
    pub fn new(log: Arc<Mutex<FakeLog>>) -> Self {
        Self {
            log,
            script: HashMap::new(),
            queue: VecDeque::new(),
            idle_waits: 0,
            next_id: 100,
        }
    }

    pub fn script(mut self, job_name: &str, outcome: Scripted) -> Self {
        self.script.insert(job_name.to_string(), outcome);
        self
    }

    pub fn idle_waits(mut self, n: usize) -> Self {
        self.idle_waits = n;
        self
    }

    fn report_for(&self, id: TaskId, job_name: &str) -> TaskReport {
        match self.script.get(job_name).unwrap_or(&Scripted::Success) {
            Scripted::Success => TaskReport {
                id,
                successful: true,
                completed: true,
                result_code: 0,
                std_output: format!("{job_name} ok"),
            },
            Scripted::AppError(code) => TaskReport {
                id,
                successful: false,
                completed: true,
                result_code: *code,
                std_output: format!("{job_name} exited with {code}"),
            },
            Scripted::DispatchFailure => TaskReport {
                id,
                successful: false,
                completed: false,
                result_code: -1,
                std_output: format!("{job_name} could not be dispatched"),
            },
        }
    }
}

impl DispatchEngine for FakeEngine {
    fn declare_file(
        &mut self,
        name: &str,
        source: &Path,
        caching: CachingPolicy,
    ) -> Result<FileHandle> {
        self.log
            .lock()
            .unwrap()
            .declared
            .push((name.to_string(), source.to_path_buf(), caching));
        Ok(FileHandle {
            name: name.to_string(),
            source: source.to_path_buf(),
            caching,
        })
    }

    fn submit(&mut self, task: TaskSubmission) -> Result<TaskId> {
        let id = self.next_id;
        self.next_id += 1;
        self.queue.push_back((id, task.job_name.clone()));
        self.log.lock().unwrap().submitted.push((id, task));
        Ok(id)
    }

    fn wait(
        &mut self,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Option<TaskReport>>> + Send + '_>> {
        Box::pin(async move {
            self.log.lock().unwrap().waits += 1;

            if self.idle_waits > 0 {
                self.idle_waits -= 1;
                return Ok(None);
            }

            let Some((id, job_name)) = self.queue.pop_front() else {
                return Ok(None);
            };
            let report = self.report_for(id, &job_name);
            self.log.lock().unwrap().reported.push(id);
            Ok(Some(report))
        })
    }

    fn outstanding(&self) -> usize {
        self.queue.len()
    }
}
