//! Worker pool implementation
//!
//! [`WorkerPool`] is the concurrency primitive underneath
//! [`MessageWorker`](crate::message::MessageWorker): a fixed set of
//! worker threads pulling tasks from one shared bounded queue, with
//! explicit start/shutdown lifecycle.

use crate::core::{CancellationReason, CancellationToken, ClosureTask, Result, Task, TaskResult, WorkerError};
use crate::pool::worker::{Worker, WorkerStats};
use crate::queue::{BoundedQueue, QueueError, TaskQueue};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for a worker pool
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Number of worker threads (0 = number of CPUs)
    pub num_threads: usize,
    /// Maximum number of pending tasks. Always bounded; must be >= 1.
    pub queue_capacity: usize,
    /// Thread name prefix
    pub thread_name_prefix: String,
    /// Worker poll interval for checking new tasks and shutdown state.
    /// Default: 100ms
    ///
    /// Shorter intervals improve shutdown latency but increase CPU usage.
    pub poll_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let num_threads = num_cpus::get();
        Self {
            num_threads,
            queue_capacity: num_threads * 100,
            thread_name_prefix: "worker".to_string(),
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl PoolConfig {
    /// Create a new configuration with specified number of threads
    #[must_use]
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: if num_threads == 0 {
                num_cpus::get()
            } else {
                num_threads
            },
            ..Default::default()
        }
    }

    /// Set the pending-task capacity
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set thread name prefix
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the worker poll interval.
    ///
    /// # Panics
    ///
    /// Panics if interval is zero.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "poll interval must be non-zero");
        self.poll_interval = interval;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.num_threads == 0 {
            return Err(WorkerError::invalid_config(
                "num_threads",
                "number of threads must be greater than 0",
            ));
        }
        if self.queue_capacity == 0 {
            return Err(WorkerError::invalid_config(
                "queue_capacity",
                "queue capacity must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// A pool of worker threads executing tasks from a shared bounded queue.
///
/// # Lifecycle
///
/// Construction spawns nothing. [`start`](Self::start) creates the queue
/// and worker threads; it either fully succeeds or leaves the pool
/// stopped. [`shutdown`](Self::shutdown) closes the queue, cancels the
/// shutdown token handed to running tasks, and joins all workers after
/// they drain the remaining queued tasks. The pool can be started again
/// after shutdown.
///
/// # Thread Safety
///
/// All lifecycle methods take `&self`; concurrent `start` calls are
/// resolved atomically so only one succeeds.
pub struct WorkerPool {
    config: PoolConfig,
    workers: RwLock<Vec<Worker>>,
    queue: RwLock<Option<Arc<dyn TaskQueue>>>,
    shutdown_token: RwLock<CancellationToken>,
    running: Arc<AtomicBool>,
    total_tasks_submitted: AtomicU64,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("config", &self.config)
            .field("running", &self.running.load(Ordering::Relaxed))
            .field(
                "total_tasks_submitted",
                &self.total_tasks_submitted.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl WorkerPool {
    /// Create a worker pool with the given thread count and queue capacity
    pub fn new(num_threads: usize, queue_capacity: usize) -> Result<Self> {
        Self::with_config(PoolConfig::new(num_threads).with_queue_capacity(queue_capacity))
    }

    /// Create a worker pool with custom configuration
    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            workers: RwLock::new(Vec::new()),
            queue: RwLock::new(None),
            shutdown_token: RwLock::new(CancellationToken::new()),
            running: Arc::new(AtomicBool::new(false)),
            total_tasks_submitted: AtomicU64::new(0),
        })
    }

    /// Start the worker pool.
    ///
    /// Creates a fresh bounded queue and shutdown token, then spawns the
    /// configured number of worker threads. If any thread fails to spawn
    /// the pool rolls back completely and returns the spawn error, so
    /// the pool is either fully started or not started at all.
    ///
    /// Multiple concurrent calls are safe; only the first succeeds,
    /// others receive `AlreadyRunning`. The pool can be restarted after
    /// a successful `shutdown`.
    pub fn start(&self) -> Result<()> {
        // Atomically check and set running flag to prevent race condition
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WorkerError::already_running(
                &self.config.thread_name_prefix,
                self.config.num_threads,
            ));
        }

        let shutdown = CancellationToken::new();
        let queue: Arc<dyn TaskQueue> = Arc::new(BoundedQueue::new(self.config.queue_capacity));

        let mut workers = Vec::with_capacity(self.config.num_threads);
        for id in 0..self.config.num_threads {
            match Worker::new(
                id,
                Arc::clone(&queue),
                shutdown.clone(),
                self.config.poll_interval,
                &self.config.thread_name_prefix,
            ) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    // Roll back: no partially started pool
                    shutdown.cancel_with_reason(CancellationReason::Shutdown);
                    queue.close();
                    for worker in workers {
                        let _ = worker.join();
                    }
                    self.running.store(false, Ordering::Release);
                    return Err(e);
                }
            }
        }

        *self.workers.write() = workers;
        *self.queue.write() = Some(queue);
        *self.shutdown_token.write() = shutdown;

        Ok(())
    }

    /// Submit a task to the pool, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// - `WorkerError::NotRunning` - pool has not been started
    /// - `WorkerError::ShuttingDown` - queue already closed
    pub fn submit<T: Task + 'static>(&self, task: T) -> Result<()> {
        self.submit_boxed(Box::new(task))
    }

    fn submit_boxed(&self, task: crate::core::BoxedTask) -> Result<()> {
        if !self.running.load(Ordering::Acquire) {
            return Err(WorkerError::not_running(&self.config.thread_name_prefix));
        }

        let queue_guard = self.queue.read();
        let queue = queue_guard
            .as_ref()
            .ok_or_else(|| WorkerError::not_running(&self.config.thread_name_prefix))?;

        queue.send(task).map_err(|e| match e {
            QueueError::Closed(_) => WorkerError::shutting_down(queue.len()),
            QueueError::Full(_) => {
                WorkerError::queue_full(queue.len(), self.config.queue_capacity)
            }
            _ => WorkerError::QueueSendError,
        })?;

        self.total_tasks_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Submit a closure as a task
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&CancellationToken) -> TaskResult + Send + 'static,
    {
        self.submit(ClosureTask::new(f))
    }

    /// Attempts to submit a task without blocking.
    ///
    /// Returns immediately with `QueueFull` if the queue is at capacity.
    pub fn try_submit<T: Task + 'static>(&self, task: T) -> Result<()> {
        if !self.running.load(Ordering::Acquire) {
            return Err(WorkerError::not_running(&self.config.thread_name_prefix));
        }

        let queue_guard = self.queue.read();
        let queue = queue_guard
            .as_ref()
            .ok_or_else(|| WorkerError::not_running(&self.config.thread_name_prefix))?;

        queue.try_send(Box::new(task)).map_err(|e| match e {
            QueueError::Closed(_) => WorkerError::shutting_down(queue.len()),
            QueueError::Full(_) => {
                WorkerError::queue_full(queue.len(), self.config.queue_capacity)
            }
            _ => WorkerError::QueueSendError,
        })?;

        self.total_tasks_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Attempts to execute a closure without blocking.
    pub fn try_execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&CancellationToken) -> TaskResult + Send + 'static,
    {
        self.try_submit(ClosureTask::new(f))
    }

    /// Get the number of worker threads
    pub fn num_threads(&self) -> usize {
        self.config.num_threads
    }

    /// Get the pending-task capacity
    pub fn queue_capacity(&self) -> usize {
        self.config.queue_capacity
    }

    /// Check if the pool is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Get total number of tasks submitted
    pub fn total_tasks_submitted(&self) -> u64 {
        self.total_tasks_submitted.load(Ordering::Relaxed)
    }

    /// Get current queue size (approximate)
    pub fn queue_len(&self) -> usize {
        self.queue.read().as_ref().map(|q| q.len()).unwrap_or(0)
    }

    /// Get statistics for all workers
    pub fn stats(&self) -> Vec<Arc<WorkerStats>> {
        self.workers.read().iter().map(|w| w.stats()).collect()
    }

    /// Get total tasks processed across all workers
    pub fn total_tasks_processed(&self) -> u64 {
        let workers = self.workers.read();
        workers
            .iter()
            .map(|w| w.stats().get_tasks_processed())
            .sum()
    }

    /// Get total tasks failed across all workers
    pub fn total_tasks_failed(&self) -> u64 {
        let workers = self.workers.read();
        workers.iter().map(|w| w.stats().get_tasks_failed()).sum()
    }

    /// Get total tasks panicked across all workers
    pub fn total_tasks_panicked(&self) -> u64 {
        let workers = self.workers.read();
        workers.iter().map(|w| w.stats().get_tasks_panicked()).sum()
    }

    /// Shutdown the worker pool and wait for all workers to finish.
    ///
    /// 1. Stops accepting new tasks
    /// 2. Cancels the shutdown token observed by running tasks
    /// 3. Closes the queue
    /// 4. Waits for all workers to drain queued tasks and exit
    ///
    /// Calling `shutdown` on a stopped pool is a no-op returning `Ok`.
    pub fn shutdown(&self) -> Result<()> {
        if !self.running.load(Ordering::Acquire) {
            return Ok(());
        }

        // Mark as not running first to prevent new task submissions
        self.running.store(false, Ordering::Release);

        self.shutdown_token
            .read()
            .cancel_with_reason(CancellationReason::Shutdown);

        if let Some(queue) = self.queue.read().as_ref() {
            queue.close();
        }

        // Wait for all workers to finish draining the queue
        let workers = std::mem::take(&mut *self.workers.write());
        for worker in workers {
            worker.join()?;
        }

        *self.queue.write() = None;

        Ok(())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Only attempt shutdown if still running to avoid redundant work
        if self.running.load(Ordering::Acquire) {
            if let Err(e) = self.shutdown() {
                log::error!(
                    "failed to shutdown worker pool '{}' during drop: {}",
                    self.config.thread_name_prefix,
                    e
                );
            }
        }
    }
}
