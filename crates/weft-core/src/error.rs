use thiserror::Error;

/// Failure reported by a leaf action call
///
/// Only the `Fatal` variant aborts a task run; the engine resolves the other
/// variants locally into an `_error` transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The action call failed but the task may continue on the error edge
    #[error("action call failed: {0}")]
    Recoverable(String),

    /// The action call did not complete in time
    #[error("action call timed out: {0}")]
    Timeout(String),

    /// Unrecoverable system failure, aborts the whole task run
    #[error("fatal processing failure: {0}")]
    Fatal(String),
}

/// Failure reported by a cache store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Cache lookup error
    #[error("cache lookup failed: {0}")]
    Lookup(String),

    /// Cache store error
    #[error("cache store failed: {0}")]
    Store(String),
}

/// Error surfaced by the task engine to its caller
///
/// All non-fatal failures are resolved into transitions before leaving the
/// node executor, so the engine itself only ever fails fatally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A node raised a fatal failure and the task run was aborted
    #[error("task '{task}' aborted by fatal failure in node '{node}': {cause}")]
    FatalTask {
        /// Name of the aborted task
        task: String,
        /// Id of the node that raised the fatal failure
        node: String,
        /// Failure description
        cause: String,
    },
}

impl From<CacheError> for ActionError {
    fn from(err: CacheError) -> Self {
        ActionError::Recoverable(err.to_string())
    }
}
