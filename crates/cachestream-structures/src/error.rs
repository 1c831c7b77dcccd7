// Copyright 2025 Coopstools
// SPDX-License-Identifier: Apache-2.0

//! Error types for pipeline operations

/// Result type for pipeline operations
pub type SequenceResult<T> = Result<T, SequenceError>;

/// Failures raised by sequences and optionals.
///
/// All of them propagate synchronously to the caller of the operation that
/// forced evaluation; nothing is retried or suppressed.
///
/// # Examples
/// ```
/// use cachestream_structures::SequenceError;
///
/// let err = SequenceError::NotOrderable { type_name: "Widget" };
/// assert_eq!(err.to_string(), "Type does not define an ordering: Widget");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    /// Value access on an optional holding nothing
    #[error("No value present")]
    AbsentElement,

    /// A natural sort met two working values with no defined ordering.
    /// Raised when the sort executes, never when it is declared.
    #[error("Type does not define an ordering: {type_name}")]
    NotOrderable { type_name: &'static str },

    /// A dedicated worker pool could not be built
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
