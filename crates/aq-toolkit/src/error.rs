//! Toolkit errors.

use thiserror::Error;

/// Result type for toolkit operations.
pub type ToolkitResult<T> = Result<T, ToolkitError>;

/// Failures that happen outside the status-code protocol.
///
/// Stage calls report problems through status codes; only acquiring the
/// project context itself can fail outright.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolkitError {
    #[error("Failed to create {toolkit} project (code {code})")]
    CreateFailed { toolkit: String, code: i32 },

    #[error("Toolkit not available: {message}")]
    Unavailable { message: String },
}
