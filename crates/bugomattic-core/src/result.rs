//! Result type alias for triage operations

use crate::error::BugomatticError;

/// Standard Result type for Bugomattic operations
pub type Result<T> = std::result::Result<T, BugomatticError>;
