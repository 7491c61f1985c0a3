//! Error types for the message worker system

/// Result type for worker pool operations
pub type Result<T> = std::result::Result<T, WorkerError>;

/// Error type produced by task bodies and message processors.
///
/// Boxed so caller-supplied processors can return their own domain
/// errors with `?`; any [`std::error::Error`] converts into it,
/// including [`WorkerError`].
pub type TaskError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for task bodies and message processors
pub type TaskResult = std::result::Result<(), TaskError>;

/// Errors that can occur in the worker system
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WorkerError {
    /// Worker pool is already running with details
    #[error("worker pool '{pool_name}' is already running with {worker_count} workers")]
    AlreadyRunning {
        /// Name of the worker pool
        pool_name: String,
        /// Number of worker threads
        worker_count: usize,
    },

    /// Worker pool is not running
    #[error("worker pool '{pool_name}' is not running")]
    NotRunning {
        /// Name of the worker pool
        pool_name: String,
    },

    /// Worker pool is shutting down with task count
    #[error("worker pool is shutting down ({pending_tasks} tasks pending)")]
    ShuttingDown {
        /// Number of pending tasks
        pending_tasks: usize,
    },

    /// No processor has been registered before start
    #[error("no processor registered for '{label}'")]
    ProcessorNotSet {
        /// Type label of the message worker
        label: String,
    },

    /// Failed to spawn a worker thread with details
    #[error("failed to spawn worker thread #{thread_id}: {message}")]
    SpawnError {
        /// ID of the thread that failed to spawn
        thread_id: usize,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Failed to join a worker thread
    #[error("failed to join worker thread #{thread_id}: {message}")]
    JoinError {
        /// ID of the thread that failed to join
        thread_id: usize,
        /// Error message
        message: String,
    },

    /// Queue is full with capacity details
    #[error("task queue is full: {current}/{max} tasks queued")]
    QueueFull {
        /// Current queue size
        current: usize,
        /// Maximum queue size
        max: usize,
    },

    /// Queue send error
    #[error("failed to send task to queue")]
    QueueSendError,

    /// Execution context was cancelled
    #[error("cancelled: {reason}")]
    Cancelled {
        /// Reason for cancellation
        reason: String,
    },

    /// Invalid configuration with parameter
    #[error("invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// General error
    #[error("{0}")]
    Other(String),
}

impl WorkerError {
    /// Create an already running error
    pub fn already_running(pool_name: impl Into<String>, worker_count: usize) -> Self {
        WorkerError::AlreadyRunning {
            pool_name: pool_name.into(),
            worker_count,
        }
    }

    /// Create a not running error
    pub fn not_running(pool_name: impl Into<String>) -> Self {
        WorkerError::NotRunning {
            pool_name: pool_name.into(),
        }
    }

    /// Create a shutting down error
    pub fn shutting_down(pending_tasks: usize) -> Self {
        WorkerError::ShuttingDown { pending_tasks }
    }

    /// Create a processor-not-set error
    pub fn processor_not_set(label: impl Into<String>) -> Self {
        WorkerError::ProcessorNotSet {
            label: label.into(),
        }
    }

    /// Create a spawn error
    pub fn spawn(thread_id: usize, message: impl Into<String>) -> Self {
        WorkerError::SpawnError {
            thread_id,
            message: message.into(),
            source: None,
        }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(
        thread_id: usize,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        WorkerError::SpawnError {
            thread_id,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a join error
    pub fn join(thread_id: usize, message: impl Into<String>) -> Self {
        WorkerError::JoinError {
            thread_id,
            message: message.into(),
        }
    }

    /// Create a queue full error
    pub fn queue_full(current: usize, max: usize) -> Self {
        WorkerError::QueueFull { current, max }
    }

    /// Create a cancelled error
    pub fn cancelled(reason: impl Into<String>) -> Self {
        WorkerError::Cancelled {
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        WorkerError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        WorkerError::Other(msg.into())
    }
}
