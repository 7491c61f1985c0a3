//! Worker pool primitive: fixed worker threads over a shared bounded queue

mod thread_pool;
mod worker;

pub use thread_pool::{PoolConfig, WorkerPool};
pub use worker::{Worker, WorkerStats};
