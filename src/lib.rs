//! # Message Worker
//!
//! A typed message worker pool: a bounded set of worker threads consuming
//! messages of one parametric type from a queue and applying a single
//! registered processing function to each, with explicit start/stop
//! lifecycle and per-message failure isolation.
//!
//! ## Features
//!
//! - **Typed wrapper**: [`MessageWorker<M>`] binds a pool to exactly one
//!   processor for messages of type `M`
//! - **Bounded queue**: pending work is capped; senders block when full
//! - **Sensible defaults**: worker count from the CPU count, queue depth
//!   from the worker count
//! - **Failure isolation**: a processor error is logged and swallowed,
//!   never stopping the worker or the pool
//! - **Fail-loud wiring**: registering a processor twice panics; starting
//!   without one is a recoverable configuration error
//! - **Graceful shutdown**: stop drains queued work and joins all worker
//!   threads
//!
//! ## Quick Start
//!
//! ```rust
//! use message_worker::prelude::*;
//!
//! # fn main() -> Result<()> {
//! // Two workers, queue depth 16
//! let worker = MessageWorker::<String>::new(2, 16);
//!
//! worker.set_processor(|_ctx, msg| {
//!     println!("processing: {}", msg);
//!     Ok(())
//! });
//!
//! worker.start()?;
//!
//! worker.queue("first".to_string());
//! worker.queue("second".to_string());
//!
//! worker.stop()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using the pool directly
//!
//! The underlying [`WorkerPool`] can also execute arbitrary closures:
//!
//! ```rust
//! use message_worker::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let pool = WorkerPool::new(4, 100)?;
//! pool.start()?;
//!
//! for i in 0..10 {
//!     pool.execute(move |_ctx| {
//!         println!("task {} executing", i);
//!         Ok(())
//!     })?;
//! }
//!
//! pool.shutdown()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Shutdown-aware processors
//!
//! Every invocation receives a [`CancellationToken`] cancelled when the
//! pool stops; long-running processors can bail out early:
//!
//! ```rust
//! use message_worker::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let worker = MessageWorker::<Vec<u64>>::new(1, 8);
//! worker.set_processor(|ctx, batch| {
//!     for item in batch {
//!         ctx.check()?;
//!         // Handle one item...
//!         let _ = item;
//!     }
//!     Ok(())
//! });
//! worker.start()?;
//! worker.queue(vec![1, 2, 3]);
//! worker.stop()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod message;
pub mod pool;
pub mod prelude;
pub mod queue;

pub use crate::core::{
    BoxedTask, CancellationReason, CancellationToken, ClosureTask, Result, Task, TaskError,
    TaskResult, WorkerError,
};
pub use crate::message::MessageWorker;
pub use crate::pool::{PoolConfig, WorkerPool, WorkerStats};
