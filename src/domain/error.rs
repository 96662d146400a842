//! Domain error types for the review engine.
//!
//! These errors represent domain-level failures that can occur during
//! review operations. They are more specific than infrastructure errors
//! and can be handled appropriately at the application layer. None of
//! them is fatal to a hosting application: each is recovered at the call
//! site and surfaced as an inline, dismissible message.

use thiserror::Error;

/// Domain errors related to review lifecycle and comment operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(String),

    #[error("Invalid comment anchor: file={file}, line={line}")]
    InvalidAnchor { file: String, line: u32 },

    #[error("Invalid status transition from {current} to {requested}")]
    InvalidTransition { current: String, requested: String },

    #[error("Conflicting operation while review is {current}: {operation}")]
    ConflictingOperation { current: String, operation: String },

    #[error("External call failed: {0}")]
    ExternalCallFailure(String),

    #[error("Review operation failed: {0}")]
    OperationFailed(#[from] anyhow::Error),
}

/// Domain errors related to diff parsing and hunk bookkeeping.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("Invalid diff format: {0}")]
    InvalidFormat(String),

    #[error(
        "Hunk counter mismatch in {file}: old advanced {old_seen}/{old_count}, new advanced {new_seen}/{new_count}"
    )]
    CounterMismatch {
        file: String,
        old_seen: u32,
        old_count: u32,
        new_seen: u32,
        new_count: u32,
    },

    #[error("Diff operation failed: {0}")]
    OperationFailed(#[from] anyhow::Error),
}

/// Unified domain error type for application-level error handling.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),

    #[error("Unknown domain error: {0}")]
    Unknown(String),
}

impl From<String> for DomainError {
    fn from(s: String) -> Self {
        DomainError::Unknown(s)
    }
}
