// src/exec/mod.rs

//! Job dispatch layer.
//!
//! - [`backend`] defines the [`DispatchEngine`] capability the driver
//!   submits to, plus the submission and report types.
//! - [`local`] provides [`LocalEngine`], which stages files into a scratch
//!   directory and runs transformations with `tokio::process::Command`.
//! - [`task_runner`] runs a single task process.

pub mod backend;
pub mod local;
pub mod task_runner;

pub use backend::{DispatchEngine, FileHandle, TaskId, TaskReport, TaskSubmission};
pub use local::{LocalEngine, LocalEngineOptions};
