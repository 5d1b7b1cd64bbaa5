// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the lull debouncer
//!
//! A single root [`DebounceError`] covers everything that can go wrong while a
//! debounced action is scheduled, executed, or awaited during disposal.
//!
//! The error is [`Clone`] because the outcome of an execution is shared between
//! the task driving it and a disposer awaiting it.
//!
//! # Examples
//!
//! ```
//! use lull_core::{DebounceError, Result};
//!
//! fn flush() -> Result<()> {
//!     Err(DebounceError::execution_error("sink not ready"))
//! }
//!
//! assert!(flush().is_err());
//! ```

use std::sync::Arc;

/// Root error type for all debouncer operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum DebounceError {
    /// The action observed cancellation of its own token
    ///
    /// When the submission's token is cancelled this outcome is expected and
    /// swallowed by the debouncer.
    #[error("Debounced action was cancelled")]
    Cancelled,

    /// Work was submitted to a debouncer that has already been disposed
    #[error("Debouncer has already been disposed")]
    Disposed,

    /// Error returned by a user-provided action
    #[error("Action error: {0}")]
    ActionFailed(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// A user-provided action panicked
    ///
    /// The panic is caught at the execution boundary so it never takes down
    /// the task driving the action.
    #[error("Action panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text, when it was a string
        message: String,
    },

    /// Execution failed with a description rather than a source error
    #[error("Execution error: {context}")]
    ExecutionError {
        /// Description of what went wrong
        context: String,
    },

    /// The background timer task terminated abnormally
    #[error("Timer error: {context}")]
    TimerError {
        /// Description of the timer failure
        context: String,
    },
}

impl DebounceError {
    /// Error returned by an action that gave up because its token was cancelled
    #[must_use]
    pub const fn cancelled() -> Self {
        Self::Cancelled
    }

    /// Wrap an error produced by a user action
    pub fn action_failed(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ActionFailed(Arc::new(error))
    }

    /// Create an execution error with the given context
    pub fn execution_error(context: impl Into<String>) -> Self {
        Self::ExecutionError {
            context: context.into(),
        }
    }

    /// Create a timer error with the given context
    pub fn timer_error(context: impl Into<String>) -> Self {
        Self::TimerError {
            context: context.into(),
        }
    }

    /// Build a `Panicked` error from a caught panic payload
    pub fn from_panic(payload: &(dyn core::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());

        Self::Panicked { message }
    }

    /// Check if this error is a cancellation outcome
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Specialized Result type for debouncer operations
///
/// ```
/// use lull_core::Result;
///
/// fn settle() -> Result<u32> {
///     Ok(7)
/// }
/// ```
pub type Result<T> = std::result::Result<T, DebounceError>;

/// Extension trait for converting any error into a `DebounceError`
pub trait IntoDebounceError {
    /// Convert this error into a `DebounceError::ActionFailed`
    fn into_debounce_error(self) -> DebounceError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoDebounceError for E {
    fn into_debounce_error(self) -> DebounceError {
        DebounceError::action_failed(self)
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(DebounceError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(DebounceError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        let context = context.into();
        self.with_context(|| context)
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| DebounceError::ExecutionError {
            context: format!("{}: {e}", f()),
        })
    }
}
