// src/driver/mod.rs

//! Submission and monitoring of a built job graph.
//!
//! The pure classification state machine lives in [`core`]; the async shell
//! talking to the dispatch engine is implemented in [`runtime`].

pub mod core;
pub mod layout;
pub mod outcome;
pub mod runtime;

pub use self::core::{MonitorCore, MonitorEvent};
pub use layout::ReplicaLayout;
pub use outcome::{JobOutcome, OutcomeReport, TaskOutcome};
pub use runtime::{DriverOptions, ExecutionDriver};
