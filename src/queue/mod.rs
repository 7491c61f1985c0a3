//! Task queue abstraction backing the worker pool.
//!
//! The [`TaskQueue`] trait is the seam between the pool and its queue:
//! the pool only needs send/receive/close semantics, so tests can
//! substitute their own implementation. [`BoundedQueue`] is the
//! implementation the pool builds for itself, a FIFO over a crossbeam
//! bounded channel.
//!
//! Backpressure policy: [`TaskQueue::send`] blocks the caller while the
//! queue is full; [`TaskQueue::try_send`] refuses with
//! [`QueueError::Full`] instead.

mod bounded;

pub use bounded::BoundedQueue;

use crate::core::BoxedTask;
use std::time::Duration;

/// Errors that can occur during queue operations.
#[derive(Debug)]
pub enum QueueError {
    /// Queue is full (non-blocking send on a full queue)
    Full(TaskHolder),
    /// Queue is closed and not accepting new tasks
    Closed(TaskHolder),
    /// Queue is empty (for try_recv)
    Empty,
    /// Queue is closed and drained
    Disconnected,
}

impl std::fmt::Display for QueueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueError::Full(_) => write!(f, "queue is full"),
            QueueError::Closed(_) => write!(f, "queue is closed"),
            QueueError::Empty => write!(f, "queue is empty"),
            QueueError::Disconnected => write!(f, "queue is disconnected"),
        }
    }
}

impl std::error::Error for QueueError {}

/// A holder for refused tasks, allowing the caller to recover them.
///
/// Returned inside [`QueueError::Full`] and [`QueueError::Closed`] so a
/// refused task can be retried or handled differently.
#[derive(Debug)]
pub struct TaskHolder {
    task: Option<BoxedTask>,
}

impl TaskHolder {
    /// Creates a new holder with the given task.
    pub fn new(task: BoxedTask) -> Self {
        Self { task: Some(task) }
    }

    /// Takes the task out of the holder.
    pub fn take(mut self) -> Option<BoxedTask> {
        self.task.take()
    }

    /// Returns a reference to the task if present.
    pub fn as_ref(&self) -> Option<&BoxedTask> {
        self.task.as_ref()
    }
}

/// Result type for queue operations.
pub type QueueResult<T> = std::result::Result<T, QueueError>;

/// Trait for task queue implementations.
///
/// All implementations must be `Send + Sync` to allow sharing across
/// worker threads.
pub trait TaskQueue: Send + Sync {
    /// Sends a task to the queue, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the queue has been closed.
    fn send(&self, task: BoxedTask) -> QueueResult<()>;

    /// Attempts to send a task without blocking.
    ///
    /// # Errors
    ///
    /// - [`QueueError::Full`] if the queue is at capacity
    /// - [`QueueError::Closed`] if the queue has been closed
    fn try_send(&self, task: BoxedTask) -> QueueResult<()>;

    /// Receives a task, blocking until one is available.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Disconnected`] if the queue has been closed
    /// and drained.
    fn recv(&self) -> QueueResult<BoxedTask>;

    /// Attempts to receive a task without blocking.
    fn try_recv(&self) -> QueueResult<BoxedTask>;

    /// Receives a task with a timeout.
    ///
    /// # Returns
    ///
    /// - `Ok(task)` if a task was received within the timeout
    /// - `Err(QueueError::Empty)` if no task was available within the timeout
    /// - `Err(QueueError::Disconnected)` if the queue is closed and drained
    fn recv_timeout(&self, timeout: Duration) -> QueueResult<BoxedTask>;

    /// Closes the queue, preventing new tasks from being sent.
    ///
    /// Tasks already in the queue can still be received.
    fn close(&self);

    /// Returns `true` if the queue has been closed.
    fn is_closed(&self) -> bool;

    /// Returns the current number of tasks in the queue.
    fn len(&self) -> usize;

    /// Returns `true` if the queue is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureTask;

    #[test]
    fn test_queue_error_display() {
        let holder = TaskHolder::new(Box::new(ClosureTask::new(|_| Ok(()))));
        assert_eq!(QueueError::Full(holder).to_string(), "queue is full");
        assert_eq!(QueueError::Empty.to_string(), "queue is empty");
        assert_eq!(
            QueueError::Disconnected.to_string(),
            "queue is disconnected"
        );
    }

    #[test]
    fn test_task_holder_roundtrip() {
        let holder = TaskHolder::new(Box::new(ClosureTask::new(|_| Ok(()))));
        assert!(holder.as_ref().is_some());
        assert!(holder.take().is_some());
    }
}
