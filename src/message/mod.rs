//! Typed message worker: one processor, many worker threads.
//!
//! [`MessageWorker`] binds a [`WorkerPool`] to a single processing
//! function for messages of one type. Callers construct it with worker
//! and queue sizing, register the processor exactly once, start it, and
//! then hand messages to [`queue`](MessageWorker::queue) fire-and-forget
//! style; each message is bundled with the processor into a task and
//! executed on whichever worker thread becomes free.
//!
//! Processing failures are isolated per message: a processor error is
//! logged and swallowed, and never affects the caller, other messages,
//! or the pool.
//!
//! # Example
//!
//! ```rust
//! use message_worker::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let worker = MessageWorker::<u64>::new(2, 16);
//!
//! worker.set_processor(|_ctx, value| {
//!     if value == 0 {
//!         return Err("zero is not a valid id".into());
//!     }
//!     // Handle the message...
//!     Ok(())
//! });
//!
//! worker.start()?;
//! worker.queue(42);
//! worker.queue(7);
//! worker.stop()?;
//! # Ok(())
//! # }
//! ```

use crate::core::{CancellationToken, ClosureTask, Result, TaskResult, WorkerError};
use crate::pool::{PoolConfig, WorkerPool};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// The processing function registered for a message type.
type Processor<M> = Arc<dyn Fn(&CancellationToken, M) -> TaskResult + Send + Sync>;

/// A typed worker pool: processes messages of type `M` with one
/// registered processor across a fixed set of worker threads.
///
/// # Lifecycle
///
/// Constructed once, processor registered once, then
/// [`start`](Self::start) / [`queue`](Self::queue) / [`stop`](Self::stop).
/// Registering the processor twice is a wiring bug and panics. Start
/// refuses to run without a processor. Start/stop cycles are supported
/// by the underlying pool.
///
/// The message type needs `Send` to cross into worker threads and
/// `Debug` for the enqueue trace diagnostic; nothing else.
pub struct MessageWorker<M> {
    pool: WorkerPool,
    processor: Arc<OnceLock<Processor<M>>>,
    label: &'static str,
}

impl<M> fmt::Debug for MessageWorker<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageWorker")
            .field("label", &self.label)
            .field("num_workers", &self.pool.num_threads())
            .field("queue_capacity", &self.pool.queue_capacity())
            .field("processor_set", &self.processor.get().is_some())
            .field("running", &self.pool.is_running())
            .finish()
    }
}

impl<M> MessageWorker<M>
where
    M: Send + fmt::Debug + 'static,
{
    /// Create a new message worker with the given number of worker
    /// threads and queue capacity.
    ///
    /// An argument of 0 selects a sensible default: `workers` falls back
    /// to the detected number of logical CPUs, `queue` to
    /// `workers * 100`. The deep default queue assumes bursty,
    /// short-lived work where the queue absorbs spikes without unbounded
    /// growth. Resolved values are always at least 1.
    ///
    /// Construction never fails and spawns no threads.
    pub fn new(workers: usize, queue: usize) -> Self {
        let workers = if workers == 0 {
            num_cpus::get().max(1)
        } else {
            workers
        };
        let queue = if queue == 0 { workers * 100 } else { queue };

        let label = std::any::type_name::<M>();

        let config = PoolConfig::new(workers)
            .with_queue_capacity(queue)
            .with_thread_name_prefix("message-worker");

        // Resolved sizing is positive by construction, so validation
        // cannot reject it.
        let pool = WorkerPool::with_config(config)
            .expect("normalized worker configuration is always valid");

        log::info!(
            "message worker for {} created with workers={} queue={}",
            label,
            workers,
            queue
        );

        Self {
            pool,
            processor: Arc::new(OnceLock::new()),
            label,
        }
    }

    /// Register the processing function invoked for every queued message.
    ///
    /// The processor receives a shutdown-aware context and the message,
    /// and returns a result whose error is logged and swallowed by the
    /// executing worker.
    ///
    /// # Panics
    ///
    /// Panics if a processor has already been registered, from any
    /// thread. Re-registration indicates a construction bug, not a
    /// runtime condition, so it fails loudly instead of returning an
    /// error.
    pub fn set_processor<F>(&self, process: F)
    where
        F: Fn(&CancellationToken, M) -> TaskResult + Send + Sync + 'static,
    {
        if self.processor.set(Arc::new(process)).is_err() {
            panic!("{} processor is already set", self.label);
        }
    }

    /// Start the underlying worker pool.
    ///
    /// # Errors
    ///
    /// - [`WorkerError::ProcessorNotSet`] if no processor has been
    ///   registered; the underlying pool is left untouched.
    /// - Any error from [`WorkerPool::start`], e.g. `AlreadyRunning` or
    ///   a thread spawn failure.
    pub fn start(&self) -> Result<()> {
        log::info!("{} starting", self.label);

        if self.processor.get().is_none() {
            return Err(WorkerError::processor_not_set(self.label));
        }

        self.pool.start()
    }

    /// Stop the underlying worker pool.
    ///
    /// Messages already picked up by workers finish; messages still
    /// queued are drained under a cancelled context and may be skipped
    /// by processors that honor it. Stopping an already stopped worker
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns any error from [`WorkerPool::shutdown`].
    pub fn stop(&self) -> Result<()> {
        log::info!("{} stopping", self.label);

        self.pool.shutdown()
    }

    /// Queue a message to be processed when a worker thread is free.
    ///
    /// Fire-and-forget: there is no return value. The call blocks while
    /// the queue is at capacity. Queueing before `start` (or after
    /// `stop`) cannot be delivered; the refusal is logged at error level
    /// and the message is dropped. Sequencing registration, start and
    /// queueing correctly is the caller's responsibility; nothing is
    /// re-validated per message.
    pub fn queue(&self, message: M) {
        log::trace!("{} queueing message: {:?}", self.label, message);

        let shared = Arc::clone(&self.processor);
        let task = ClosureTask::with_name(
            move |ctx: &CancellationToken| match shared.get() {
                Some(process) => process(ctx, message),
                // Unreachable once start has validated registration
                None => Err(WorkerError::processor_not_set(std::any::type_name::<M>()).into()),
            },
            self.label,
        );

        if let Err(e) = self.pool.submit(task) {
            log::error!("{} failed to queue message: {}", self.label, e);
        }
    }

    /// Returns the resolved number of worker threads
    pub fn num_workers(&self) -> usize {
        self.pool.num_threads()
    }

    /// Returns the resolved queue capacity
    pub fn queue_capacity(&self) -> usize {
        self.pool.queue_capacity()
    }

    /// Returns the type label used in diagnostics
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Returns whether the underlying pool is running
    pub fn is_running(&self) -> bool {
        self.pool.is_running()
    }
}
