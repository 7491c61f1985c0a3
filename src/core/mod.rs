//! Core types and traits for the worker system

pub mod cancellation;
pub mod error;
pub mod task;

pub use cancellation::{CancellationReason, CancellationToken};
pub use error::{Result, TaskError, TaskResult, WorkerError};
pub use task::{BoxedTask, ClosureTask, Task};
