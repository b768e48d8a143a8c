//! Domain error types.
//!
//! Answer evaluation itself never fails; these cover the stateful pieces
//! around it where callers need to branch on the failure kind.

use thiserror::Error;

/// Errors raised by a quiz session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// All allowed attempts have been used.
    #[error("no attempts left: {max} of {max} used")]
    AttemptsExhausted { max: u32 },

    /// An attempt is already open and must be submitted first.
    #[error("attempt {0} is still in progress")]
    AttemptInProgress(u32),

    /// Submit was called without an open attempt.
    #[error("no attempt in progress")]
    NoActiveAttempt,
}

/// Errors raised when reordering an answer list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("index {index} out of bounds for list of length {len}")]
    OutOfBounds { index: usize, len: usize },
}
