//! Error types for macrolens.
//!
//! The analysis pipeline itself never fails on bad log lines: malformed input is
//! dropped line by line. The variants here cover the few conditions that do cross
//! the library boundary (a log with no recognizable executions) and the I/O,
//! configuration, and export failures of the surrounding tooling.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for macrolens operations.
#[derive(Error, Debug)]
pub enum MacroLensError {
    /// The input contained no parseable macro executions.
    #[error("No macro executions found ({lines_processed} lines read)")]
    NoEntries {
        /// Number of non-empty lines that were examined.
        lines_processed: usize,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Permission denied when accessing a file.
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// Path where access was denied.
        path: PathBuf,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Export error.
    #[error("Export failed: {message}")]
    ExportError {
        /// Human-readable error message.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid configuration file contents.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// Unsupported operation or platform feature.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// Name of the unsupported feature.
        feature: String,
    },
}

impl MacroLensError {
    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new export error.
    #[must_use]
    pub fn export(message: impl Into<String>) -> Self {
        Self::ExportError {
            message: message.into(),
        }
    }

    /// Create a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NoEntries { .. } => exit_codes::EXIT_DATA_ERROR,
            Self::FileNotFound { .. } => exit_codes::EXIT_FILE_NOT_FOUND,
            Self::PermissionDenied { .. } => exit_codes::EXIT_PERMISSION_DENIED,
            Self::ConfigError { .. } | Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::ExportError { .. } => exit_codes::EXIT_EXPORT_ERROR,
            Self::InvalidArgument { .. } => exit_codes::EXIT_USAGE_ERROR,
            Self::IoError { .. } => exit_codes::EXIT_IO_ERROR,
            _ => exit_codes::EXIT_GENERAL_ERROR,
        }
    }

    /// Check if this error is recoverable.
    ///
    /// A log without executions is an empty state the caller can render, not a crash.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoEntries { .. } | Self::InvalidArgument { .. })
    }
}

/// Result type alias for macrolens operations.
pub type Result<T> = std::result::Result<T, MacroLensError>;

impl From<std::io::Error> for MacroLensError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for MacroLensError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// Specified file not found.
    pub const EXIT_FILE_NOT_FOUND: i32 = 3;
    /// Insufficient permissions.
    pub const EXIT_PERMISSION_DENIED: i32 = 4;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Export operation failed.
    pub const EXIT_EXPORT_ERROR: i32 = 6;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// Input data format error (BSD standard).
    pub const EXIT_DATA_ERROR: i32 = 65;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let no_entries = MacroLensError::NoEntries { lines_processed: 3 };
        assert_eq!(no_entries.exit_code(), 65);

        let not_found = MacroLensError::FileNotFound {
            path: PathBuf::from("/test"),
        };
        assert_eq!(not_found.exit_code(), 3);

        let bad_arg = MacroLensError::invalid_argument("window", "negative");
        assert_eq!(bad_arg.exit_code(), 64);
    }

    #[test]
    fn test_is_recoverable() {
        let no_entries = MacroLensError::NoEntries { lines_processed: 0 };
        assert!(no_entries.is_recoverable());

        let not_found = MacroLensError::FileNotFound {
            path: PathBuf::from("/test"),
        };
        assert!(!not_found.is_recoverable());
    }

    #[test]
    fn test_no_entries_message() {
        let err = MacroLensError::NoEntries { lines_processed: 12 };
        assert_eq!(err.to_string(), "No macro executions found (12 lines read)");
    }
}
