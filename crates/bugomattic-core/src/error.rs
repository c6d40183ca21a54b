//! Error types and handling for triage operations

use std::path::PathBuf;
use thiserror::Error;

use crate::reporting::NormalizeError;

/// Main error type for Bugomattic operations
#[derive(Debug, Error)]
pub enum BugomatticError {
    /// The raw reporting config does not match the documented shape
    #[error("Reporting config schema violation at '{path}': {message}")]
    ConfigSchema { path: String, message: String },

    /// The raw reporting config has the right shape but cannot be normalized
    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),

    /// An ID that names no product, feature group, or feature
    #[error("No product, feature group, or feature with ID '{id}'")]
    UnknownNode { id: String },

    /// A highlight pattern failed to compile
    #[error("Invalid highlight pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Tool configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    Normalize,
    NotFound,
    Pattern,
    Config,
    Io,
    Internal,
}

impl BugomatticError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BugomatticError::ConfigSchema { .. } => ErrorKind::Schema,
            BugomatticError::Normalize(_) => ErrorKind::Normalize,
            BugomatticError::UnknownNode { .. } => ErrorKind::NotFound,
            BugomatticError::InvalidPattern { .. } => ErrorKind::Pattern,
            BugomatticError::ConfigError { .. } => ErrorKind::Config,
            BugomatticError::IoError { .. } => ErrorKind::Io,
            BugomatticError::InternalError { .. } => ErrorKind::Internal,
        }
    }

    /// Create a schema violation error
    pub fn schema_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigSchema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unknown node error
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for BugomatticError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            BugomatticError::schema_error("$.Jetpack", "bad").kind(),
            ErrorKind::Schema
        );
        assert_eq!(
            BugomatticError::invalid_pattern("(", "unclosed").kind(),
            ErrorKind::Pattern
        );
        assert_eq!(
            BugomatticError::config_error("missing").kind(),
            ErrorKind::Config
        );
        assert_eq!(
            BugomatticError::unknown_node("Jetpack__Nope").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            BugomatticError::from(NormalizeError::DuplicateId {
                id: "Jetpack".to_string()
            })
            .kind(),
            ErrorKind::Normalize
        );
    }

    #[test]
    fn test_schema_error_message_names_path() {
        let err = BugomatticError::schema_error("$.Jetpack.features", "expected a map");
        assert_eq!(
            err.to_string(),
            "Reporting config schema violation at '$.Jetpack.features': expected a map"
        );
    }
}
