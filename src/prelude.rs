//! Convenient re-exports for common types and traits

pub use crate::core::{
    BoxedTask, CancellationToken, ClosureTask, Result, Task, TaskError, TaskResult, WorkerError,
};
pub use crate::message::MessageWorker;
pub use crate::pool::{PoolConfig, WorkerPool, WorkerStats};
