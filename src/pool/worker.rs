//! Worker thread implementation

use crate::core::{BoxedTask, CancellationToken, Result, WorkerError};
use crate::queue::{QueueError, TaskQueue};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Statistics for a worker thread
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Total number of tasks processed successfully
    pub tasks_processed: AtomicU64,
    /// Total number of tasks that failed
    pub tasks_failed: AtomicU64,
    /// Total number of tasks that panicked
    pub tasks_panicked: AtomicU64,
    /// Total time spent processing tasks (microseconds)
    pub total_processing_time_us: AtomicU64,
}

impl WorkerStats {
    /// Create new worker statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment tasks processed counter
    pub fn increment_processed(&self) {
        self.tasks_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment tasks failed counter
    pub fn increment_failed(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment tasks panicked counter
    pub fn increment_panicked(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    /// Add processing time
    pub fn add_processing_time(&self, microseconds: u64) {
        self.total_processing_time_us
            .fetch_add(microseconds, Ordering::Relaxed);
    }

    /// Get total tasks processed
    pub fn get_tasks_processed(&self) -> u64 {
        self.tasks_processed.load(Ordering::Relaxed)
    }

    /// Get total tasks failed
    pub fn get_tasks_failed(&self) -> u64 {
        self.tasks_failed.load(Ordering::Relaxed)
    }

    /// Get total tasks panicked
    pub fn get_tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    /// Get average processing time per task in microseconds
    pub fn get_average_processing_time_us(&self) -> f64 {
        let total = self.total_processing_time_us.load(Ordering::Relaxed);
        let count = self.tasks_processed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }
}

/// A worker thread that processes tasks from a queue
#[derive(Debug)]
pub struct Worker {
    id: usize,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Create and start a new worker.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier for this worker
    /// * `queue` - Shared task queue
    /// * `shutdown` - Token cancelled when the pool stops; passed to every task
    /// * `poll_interval` - Duration between poll attempts for new tasks
    /// * `name_prefix` - Thread name prefix
    ///
    /// # Shutdown Behavior
    ///
    /// Workers exit when the queue is closed and empty, so queued tasks
    /// are drained before shutdown completes. Tasks executed during the
    /// drain observe a cancelled context.
    pub fn new(
        id: usize,
        queue: Arc<dyn TaskQueue>,
        shutdown: CancellationToken,
        poll_interval: Duration,
        name_prefix: &str,
    ) -> Result<Self> {
        let stats = Arc::new(WorkerStats::new());
        let stats_clone = Arc::clone(&stats);

        let thread = thread::Builder::new()
            .name(format!("{}-{}", name_prefix, id))
            .spawn(move || {
                Self::run(id, queue, shutdown, stats_clone, poll_interval);
            })
            .map_err(|e| WorkerError::spawn_with_source(id, "thread spawn failed", e))?;

        Ok(Self {
            id,
            thread: Some(thread),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Join the worker thread
    pub fn join(mut self) -> Result<()> {
        if let Some(thread) = self.thread.take() {
            thread
                .join()
                .map_err(|_| WorkerError::join(self.id, "worker panicked"))?;
        }
        Ok(())
    }

    /// Main worker loop
    fn run(
        id: usize,
        queue: Arc<dyn TaskQueue>,
        shutdown: CancellationToken,
        stats: Arc<WorkerStats>,
        poll_interval: Duration,
    ) {
        loop {
            match queue.recv_timeout(poll_interval) {
                Ok(mut task) => {
                    Self::execute_task(id, &mut task, &shutdown, &stats);
                }
                Err(QueueError::Empty) => {
                    // No task available within timeout, continue polling
                    continue;
                }
                Err(QueueError::Disconnected) => {
                    // Queue closed and drained, shutdown
                    break;
                }
                Err(_) => {
                    break;
                }
            }
        }
    }

    /// Execute a single task with panic protection
    fn execute_task(
        id: usize,
        task: &mut BoxedTask,
        ctx: &CancellationToken,
        stats: &WorkerStats,
    ) {
        let start = std::time::Instant::now();

        let panic_result = catch_unwind(AssertUnwindSafe(|| task.run(ctx)));

        let elapsed_us = start.elapsed().as_micros() as u64;

        match panic_result {
            Ok(Ok(())) => {
                stats.increment_processed();
            }
            Ok(Err(e)) => {
                // Task errors are isolated: logged and swallowed, never
                // terminating the worker or the pool.
                log::error!("worker {}: task failed: {}", id, e);
                stats.increment_failed();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                log::error!("worker {}: task panicked: {}", id, panic_msg);
                stats.increment_panicked();
            }
        }

        stats.add_processing_time(elapsed_us);
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            // Bounded wait so Drop cannot hang indefinitely
            const JOIN_TIMEOUT: Duration = Duration::from_secs(5);

            let start = std::time::Instant::now();
            loop {
                if thread.is_finished() {
                    if thread.join().is_err() {
                        log::error!("worker {}: panicked during shutdown", self.id);
                    }
                    break;
                }

                if start.elapsed() >= JOIN_TIMEOUT {
                    log::warn!(
                        "worker {}: did not finish within {}s during drop, thread may be leaked",
                        self.id,
                        JOIN_TIMEOUT.as_secs()
                    );
                    break;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureTask;
    use crate::queue::BoundedQueue;

    fn test_worker(queue: &Arc<BoundedQueue>) -> Worker {
        Worker::new(
            0,
            Arc::clone(queue) as Arc<dyn TaskQueue>,
            CancellationToken::new(),
            Duration::from_millis(20),
            "test-worker",
        )
        .expect("failed to create worker")
    }

    #[test]
    fn test_worker_creation() {
        let queue = Arc::new(BoundedQueue::new(8));
        let worker = test_worker(&queue);
        assert_eq!(worker.id(), 0);

        // Close queue to trigger worker shutdown
        queue.close();
        worker.join().expect("failed to join worker");
    }

    #[test]
    fn test_worker_task_execution() {
        let queue = Arc::new(BoundedQueue::new(8));
        let worker = test_worker(&queue);
        let stats = worker.stats();

        queue
            .send(Box::new(ClosureTask::new(|_| Ok(()))))
            .expect("failed to send task");

        thread::sleep(Duration::from_millis(100));

        assert_eq!(stats.get_tasks_processed(), 1);
        assert_eq!(stats.get_tasks_failed(), 0);

        queue.close();
        worker.join().expect("failed to join worker");
    }

    #[test]
    fn test_worker_panic_handling() {
        let queue = Arc::new(BoundedQueue::new(8));
        let worker = test_worker(&queue);
        let stats = worker.stats();

        queue
            .send(Box::new(ClosureTask::new(|_| -> crate::core::TaskResult {
                panic!("intentional panic for testing");
            })))
            .expect("failed to send panicking task");

        thread::sleep(Duration::from_millis(100));

        assert_eq!(stats.get_tasks_panicked(), 1);
        assert_eq!(stats.get_tasks_processed(), 0);

        // Send another task to verify worker is still alive
        queue
            .send(Box::new(ClosureTask::new(|_| Ok(()))))
            .expect("failed to send task");

        thread::sleep(Duration::from_millis(100));

        assert_eq!(stats.get_tasks_processed(), 1);
        assert_eq!(stats.get_tasks_panicked(), 1);

        queue.close();
        worker.join().expect("failed to join worker");
    }

    #[test]
    fn test_worker_isolates_task_errors() {
        let queue = Arc::new(BoundedQueue::new(8));
        let worker = test_worker(&queue);
        let stats = worker.stats();

        queue
            .send(Box::new(ClosureTask::new(|_| Err("bad message".into()))))
            .expect("failed to send failing task");
        queue
            .send(Box::new(ClosureTask::new(|_| Ok(()))))
            .expect("failed to send task");

        thread::sleep(Duration::from_millis(100));

        assert_eq!(stats.get_tasks_failed(), 1);
        assert_eq!(stats.get_tasks_processed(), 1);

        queue.close();
        worker.join().expect("failed to join worker");
    }
}
