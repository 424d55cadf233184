//! Error types for object model operations

use thiserror::Error;

/// Recoverable errors reported by object model operations.
///
/// Invariant violations ("object model and syntax tree out of sync") are
/// deliberately not represented here. They indicate a bug in the
/// synchronization engine itself and abort via panic; surfacing them as a
/// value would invite callers to continue with a corrupted document.
#[derive(Debug, Error)]
pub enum DomError {
    /// A caller-supplied value was rejected before any mutation took place
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A value was not one of the allowed alternatives for its attribute
    #[error("invalid argument: `{got}` must be one of {expected:?}")]
    MustBeOneOf {
        expected: &'static [&'static str],
        got: String,
    },

    /// An operation was attempted on a node in the wrong linkage state
    #[error("illegal state: {message}")]
    IllegalState { message: String },

    /// The node kind does not support the requested operation
    #[error("unsupported operation: {message}")]
    Unsupported { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    IllegalState,
    Unsupported,
}

impl DomError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            DomError::MustBeOneOf { .. } => ErrorKind::InvalidArgument,
            DomError::IllegalState { .. } => ErrorKind::IllegalState,
            DomError::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a must-be-one-of error listing the allowed alternatives
    pub fn must_be_one_of(expected: &'static [&'static str], got: impl Into<String>) -> Self {
        Self::MustBeOneOf {
            expected,
            got: got.into(),
        }
    }

    /// Create an illegal-state error
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// Create an unsupported-operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }
}
