//! Task trait and related types

use crate::core::cancellation::CancellationToken;
use crate::core::error::TaskResult;
use std::fmt;

/// A trait representing a unit of work to be executed by the worker pool
pub trait Task: Send {
    /// Execute the task.
    ///
    /// The context is cancelled when the pool begins shutting down;
    /// long-running tasks should check it periodically.
    ///
    /// # Errors
    ///
    /// Returns an error if the task execution fails
    fn run(&mut self, ctx: &CancellationToken) -> TaskResult;

    /// Get the task's type name for diagnostics and statistics
    fn task_type(&self) -> &str {
        "Task"
    }
}

impl fmt::Debug for dyn Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task({})", self.task_type())
    }
}

/// A boxed task that can be sent across threads
pub type BoxedTask = Box<dyn Task>;

/// Helper to create a task from a closure
pub struct ClosureTask<F>
where
    F: FnOnce(&CancellationToken) -> TaskResult + Send,
{
    closure: Option<F>,
    name: String,
}

impl<F> ClosureTask<F>
where
    F: FnOnce(&CancellationToken) -> TaskResult + Send,
{
    /// Create a new closure task
    pub fn new(closure: F) -> Self {
        Self {
            closure: Some(closure),
            name: "ClosureTask".to_string(),
        }
    }

    /// Create a new closure task with a custom name
    pub fn with_name<S: Into<String>>(closure: F, name: S) -> Self {
        Self {
            closure: Some(closure),
            name: name.into(),
        }
    }
}

impl<F> Task for ClosureTask<F>
where
    F: FnOnce(&CancellationToken) -> TaskResult + Send,
{
    fn run(&mut self, ctx: &CancellationToken) -> TaskResult {
        if let Some(closure) = self.closure.take() {
            closure(ctx)
        } else {
            // Closure already executed, return error instead of silently succeeding
            Err("ClosureTask already executed - cannot run twice".into())
        }
    }

    fn task_type(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_task() {
        let ctx = CancellationToken::new();
        let mut task = ClosureTask::new(|_ctx| Ok(()));

        assert_eq!(task.task_type(), "ClosureTask");
        assert!(task.run(&ctx).is_ok());
    }

    #[test]
    fn test_closure_task_with_name() {
        let task = ClosureTask::with_name(|_ctx| Ok(()), "TestTask");
        assert_eq!(task.task_type(), "TestTask");
    }

    #[test]
    fn test_closure_task_cannot_run_twice() {
        let ctx = CancellationToken::new();
        let mut task = ClosureTask::new(|_ctx| Ok(()));

        assert!(task.run(&ctx).is_ok());
        assert!(task.run(&ctx).is_err());
    }

    #[test]
    fn test_closure_task_sees_cancellation() {
        let ctx = CancellationToken::new();
        ctx.cancel();

        let mut task = ClosureTask::new(|ctx: &CancellationToken| {
            ctx.check()?;
            Ok(())
        });
        assert!(task.run(&ctx).is_err());
    }
}
