//! Result type alias for object model operations

use crate::error::DomError;

/// Standard Result type for object model operations
pub type Result<T> = std::result::Result<T, DomError>;
