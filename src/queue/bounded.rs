//! Bounded FIFO task queue with capacity limit.

use super::{QueueError, QueueResult, TaskHolder, TaskQueue};
use crate::core::BoxedTask;
use crossbeam_channel::{self as channel, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A bounded FIFO queue with configurable capacity.
///
/// Provides backpressure by blocking senders (or refusing, for
/// `try_send`) when the queue is full, preventing memory exhaustion
/// under load.
///
/// # Example
///
/// ```rust
/// use message_worker::queue::{BoundedQueue, TaskQueue, QueueError};
/// use message_worker::ClosureTask;
///
/// let queue = BoundedQueue::new(2);
///
/// queue.send(Box::new(ClosureTask::new(|_| Ok(())))).unwrap();
/// queue.send(Box::new(ClosureTask::new(|_| Ok(())))).unwrap();
///
/// // Queue is now full - try_send will refuse
/// match queue.try_send(Box::new(ClosureTask::new(|_| Ok(())))) {
///     Err(QueueError::Full(_)) => {}
///     _ => panic!("expected Full error"),
/// }
/// ```
pub struct BoundedQueue {
    sender: Sender<BoxedTask>,
    receiver: Receiver<BoxedTask>,
    capacity: usize,
    closed: AtomicBool,
}

impl BoundedQueue {
    /// Creates a new bounded queue with the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        let (sender, receiver) = channel::bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns the maximum capacity of this queue.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl TaskQueue for BoundedQueue {
    fn send(&self, task: BoxedTask) -> QueueResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Closed(TaskHolder::new(task)));
        }
        self.sender
            .send(task)
            .map_err(|e| QueueError::Closed(TaskHolder::new(e.0)))
    }

    fn try_send(&self, task: BoxedTask) -> QueueResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Closed(TaskHolder::new(task)));
        }
        self.sender.try_send(task).map_err(|e| match e {
            TrySendError::Full(task) => QueueError::Full(TaskHolder::new(task)),
            TrySendError::Disconnected(task) => QueueError::Closed(TaskHolder::new(task)),
        })
    }

    fn recv(&self) -> QueueResult<BoxedTask> {
        // Both halves live in this struct, so the channel itself never
        // disconnects; the closed flag is the shutdown signal.
        if self.closed.load(Ordering::SeqCst) && self.receiver.is_empty() {
            return Err(QueueError::Disconnected);
        }
        self.receiver.recv().map_err(|_| QueueError::Disconnected)
    }

    fn try_recv(&self) -> QueueResult<BoxedTask> {
        self.receiver.try_recv().map_err(|e| match e {
            TryRecvError::Empty => {
                if self.closed.load(Ordering::SeqCst) {
                    QueueError::Disconnected
                } else {
                    QueueError::Empty
                }
            }
            TryRecvError::Disconnected => QueueError::Disconnected,
        })
    }

    fn recv_timeout(&self, timeout: Duration) -> QueueResult<BoxedTask> {
        // Check if closed first
        if self.closed.load(Ordering::SeqCst) && self.receiver.is_empty() {
            return Err(QueueError::Disconnected);
        }

        match self.receiver.recv_timeout(timeout) {
            Ok(task) => Ok(task),
            Err(RecvTimeoutError::Timeout) => {
                // On timeout, check if closed
                if self.closed.load(Ordering::SeqCst) && self.receiver.is_empty() {
                    Err(QueueError::Disconnected)
                } else {
                    Err(QueueError::Empty)
                }
            }
            Err(RecvTimeoutError::Disconnected) => Err(QueueError::Disconnected),
        }
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn len(&self) -> usize {
        self.receiver.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClosureTask;
    use std::sync::Arc;
    use std::thread;

    fn create_test_task() -> BoxedTask {
        Box::new(ClosureTask::new(|_| Ok(())))
    }

    #[test]
    fn test_bounded_send_recv() {
        let queue = BoundedQueue::new(10);
        queue.send(create_test_task()).unwrap();
        let task = queue.recv().unwrap();
        assert_eq!(task.task_type(), "ClosureTask");
    }

    #[test]
    fn test_capacity() {
        let queue = BoundedQueue::new(5);
        assert_eq!(queue.capacity(), 5);
    }

    #[test]
    #[should_panic(expected = "capacity must be greater than 0")]
    fn test_zero_capacity_panics() {
        let _ = BoundedQueue::new(0);
    }

    #[test]
    fn test_try_send_full() {
        let queue = BoundedQueue::new(2);
        queue.try_send(create_test_task()).unwrap();
        queue.try_send(create_test_task()).unwrap();

        // Queue is now full
        match queue.try_send(create_test_task()) {
            Err(QueueError::Full(holder)) => {
                // Task should be recoverable
                assert!(holder.take().is_some());
            }
            _ => panic!("expected Full error"),
        }
    }

    #[test]
    fn test_send_blocks_when_full() {
        let queue = Arc::new(BoundedQueue::new(1));
        queue.send(create_test_task()).unwrap();

        let q = Arc::clone(&queue);
        let handle = thread::spawn(move || {
            // This should block until the queue has space
            q.send(create_test_task()).unwrap();
        });

        // Give the sender a chance to block
        thread::sleep(Duration::from_millis(10));

        // Receive to make space
        queue.recv().unwrap();

        // Now the sender should unblock
        handle.join().unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_try_recv_empty() {
        let queue = BoundedQueue::new(10);
        match queue.try_recv() {
            Err(QueueError::Empty) => {}
            _ => panic!("expected Empty error"),
        }
    }

    #[test]
    fn test_recv_timeout() {
        let queue = BoundedQueue::new(10);
        let result = queue.recv_timeout(Duration::from_millis(10));
        match result {
            Err(QueueError::Empty) => {}
            _ => panic!("expected Empty error on timeout"),
        }
    }

    #[test]
    fn test_close() {
        let queue = BoundedQueue::new(10);
        assert!(!queue.is_closed());
        queue.close();
        assert!(queue.is_closed());

        match queue.send(create_test_task()) {
            Err(QueueError::Closed(_)) => {}
            _ => panic!("expected Closed error"),
        }
    }

    #[test]
    fn test_close_drains_queued_tasks() {
        let queue = BoundedQueue::new(10);
        queue.send(create_test_task()).unwrap();
        queue.send(create_test_task()).unwrap();
        queue.close();

        // Queued tasks remain receivable after close
        assert!(queue.recv().is_ok());
        assert!(queue.recv_timeout(Duration::from_millis(10)).is_ok());

        // Then the queue reports disconnection
        match queue.recv_timeout(Duration::from_millis(10)) {
            Err(QueueError::Disconnected) => {}
            _ => panic!("expected Disconnected after drain"),
        }
    }

    #[test]
    fn test_len_and_is_empty() {
        let queue = BoundedQueue::new(10);
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);

        queue.send(create_test_task()).unwrap();
        assert!(!queue.is_empty());
        assert_eq!(queue.len(), 1);

        queue.recv().unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_concurrent_bounded() {
        let queue = Arc::new(BoundedQueue::new(10));
        let num_tasks = 100;

        // Spawn sender thread
        let q_send = Arc::clone(&queue);
        let sender = thread::spawn(move || {
            for _ in 0..num_tasks {
                q_send.send(create_test_task()).unwrap();
            }
        });

        // Spawn receiver thread
        let q_recv = Arc::clone(&queue);
        let receiver = thread::spawn(move || {
            let mut received = 0;
            for _ in 0..num_tasks {
                q_recv.recv().unwrap();
                received += 1;
            }
            received
        });

        sender.join().unwrap();
        let received = receiver.join().unwrap();
        assert_eq!(received, num_tasks);
    }
}
