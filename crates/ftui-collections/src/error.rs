#![forbid(unsafe_code)]

//! Error types for observable collections.
//!
//! Two families exist and they never mix:
//!
//! - [`CollectionError`]: returned synchronously to the caller of a mutating
//!   method or a change accessor. When a mutation returns one, the backing
//!   store is untouched and no listener ran.
//! - [`ListenerError`]: produced when a listener fails during delivery. It is
//!   handed to the configured [`ErrorReporter`](crate::ErrorReporter) and
//!   never reaches the code that performed the mutation.

use std::fmt;

use thiserror::Error;

use crate::change::CursorState;

/// Result alias for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Usage and backing-store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// An index was outside the valid range.
    #[error("index {index} out of bounds (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A range was reversed or extended past the end.
    #[error("range {from}..{to} out of bounds (length {len})")]
    RangeOutOfBounds { from: usize, to: usize, len: usize },

    /// A cursor-dependent accessor was called while the cursor was not
    /// positioned on a sub-change.
    #[error("no current sub-change (cursor is {state})")]
    NoCurrentSubChange { state: CursorState },

    /// A permutation was requested from a sub-change that is not a
    /// permutation.
    #[error("current sub-change is not a permutation")]
    NotPermutation,

    /// A sub-change could not be undone against the given contents.
    #[error("change does not apply to the given contents: {reason}")]
    ReplayMismatch { reason: &'static str },

    /// A mutating method was called on an unmodifiable view.
    #[error("`{operation}` is not supported on an unmodifiable collection")]
    Unsupported { operation: &'static str },
}

impl CollectionError {
    #[must_use]
    pub(crate) fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::IndexOutOfBounds { index, len })
        }
    }

    /// Insertion points may equal `len`.
    pub(crate) fn check_position(index: usize, len: usize) -> Result<()> {
        if index <= len {
            Ok(())
        } else {
            Err(Self::IndexOutOfBounds { index, len })
        }
    }

    pub(crate) fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
        if from <= to && to <= len {
            Ok(())
        } else {
            Err(Self::RangeOutOfBounds { from, to, len })
        }
    }
}

/// Return type of listener callbacks.
pub type ListenerResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Failure raised by a single listener invocation.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The listener returned an error.
    #[error("listener returned an error: {0}")]
    Failed(#[source] Box<dyn std::error::Error>),

    /// The listener panicked and the panic was contained.
    #[error("listener panicked: {0}")]
    Panicked(String),
}

impl ListenerError {
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked(message)
    }
}

/// Which listener list a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerKind {
    /// Payload-free "contents changed" listeners.
    Invalidation,
    /// Listeners receiving the atomic change.
    Change,
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalidation => f.write_str("invalidation"),
            Self::Change => f.write_str("change"),
        }
    }
}

/// A listener failure as seen by the error reporter.
#[derive(Debug)]
pub struct ListenerFailure {
    /// Listener list the failing listener belongs to.
    pub kind: ListenerKind,
    /// Registration position within that list at the time of delivery.
    pub position: usize,
    /// What went wrong.
    pub error: ListenerError,
}

impl fmt::Display for ListenerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} listener #{} failed: {}",
            self.kind, self.position, self.error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_checks() {
        assert!(CollectionError::check_range(0, 0, 0).is_ok());
        assert!(CollectionError::check_range(1, 3, 3).is_ok());
        assert_eq!(
            CollectionError::check_range(2, 1, 3),
            Err(CollectionError::RangeOutOfBounds {
                from: 2,
                to: 1,
                len: 3
            })
        );
        assert!(CollectionError::check_range(0, 4, 3).is_err());
    }

    #[test]
    fn index_vs_position() {
        assert!(CollectionError::check_index(3, 3).is_err());
        assert!(CollectionError::check_position(3, 3).is_ok());
        assert!(CollectionError::check_position(4, 3).is_err());
    }

    #[test]
    fn panic_payloads_become_messages() {
        let err = ListenerError::from_panic(Box::new("boom"));
        assert_eq!(err.to_string(), "listener panicked: boom");
        let err = ListenerError::from_panic(Box::new(String::from("bang")));
        assert_eq!(err.to_string(), "listener panicked: bang");
        let err = ListenerError::from_panic(Box::new(42u8));
        assert!(err.to_string().contains("non-string"));
    }

    #[test]
    fn failure_display() {
        let failure = ListenerFailure {
            kind: ListenerKind::Change,
            position: 1,
            error: ListenerError::Panicked("oops".into()),
        };
        assert_eq!(
            failure.to_string(),
            "change listener #1 failed: listener panicked: oops"
        );
    }
}
