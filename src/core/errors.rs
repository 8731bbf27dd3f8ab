/*!
 * Error Types
 * Centralized error handling with thiserror and miette diagnostics
 */

use miette::Diagnostic;
use thiserror::Error;

/// Result type for lock handle operations
pub type LockResult<T> = Result<T, LockError>;

/// Result type for benchmark operations
pub type BenchResult<T> = Result<T, BenchError>;

/// Reader-writer lock errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LockError {
    #[error("Invalid lock handle")]
    #[diagnostic(
        code(lock::invalid_handle),
        help("The handle was never initialized or has already been destroyed.")
    )]
    InvalidHandle,

    #[error("Lock handle is already initialized")]
    #[diagnostic(
        code(lock::already_initialized),
        help("Destroy the existing lock before initializing the handle again.")
    )]
    AlreadyInitialized,

    #[error("Lock is busy: {0}")]
    #[diagnostic(
        code(lock::busy),
        help("A lock can only be destroyed while no thread holds or waits for it.")
    )]
    Busy(String),

    #[error("Lock is not held by anyone")]
    #[diagnostic(
        code(lock::not_held),
        help("Release must be paired with a successful acquire.")
    )]
    NotHeld,
}

/// Benchmark driver and command-line errors
#[derive(Error, Debug, Diagnostic)]
pub enum BenchError {
    #[error("Usage: {program} <thread_count>")]
    #[diagnostic(
        code(bench::usage),
        help("Pass the number of worker threads as the only argument.")
    )]
    Usage { program: String },

    #[error("Invalid argument {name}: {reason}")]
    #[diagnostic(code(bench::invalid_argument))]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Invalid input for {field}: {reason}")]
    #[diagnostic(
        code(bench::invalid_input),
        help("Answer each prompt with a single number.")
    )]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(bench::invalid_config))]
    InvalidConfig(String),

    #[error("Failed to spawn worker {rank}: {source}")]
    #[diagnostic(
        code(bench::spawn_failed),
        help("The system may be out of threads. Try a smaller thread count.")
    )]
    Spawn {
        rank: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker {0} panicked")]
    #[diagnostic(code(bench::worker_panicked))]
    WorkerPanicked(usize),

    #[error("Ordered set invariant violated: {0}")]
    #[diagnostic(code(bench::invariant_violated))]
    InvariantViolated(String),

    #[error("Lock error: {0}")]
    #[diagnostic(transparent)]
    Lock(#[from] LockError),

    #[error("I/O error: {0}")]
    #[diagnostic(code(bench::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(bench::serialization))]
    Serialization(#[from] serde_json::Error),
}

impl BenchError {
    /// Convenience constructor for prompt parsing failures
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
