//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Pipeline error from the core library
    #[error("{0}")]
    Trazar(#[from] trazar::TrazarError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Create an invalid-argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_passes_through() {
        let err = CliError::from(trazar::TrazarError::extraction("no component"));
        assert!(err.to_string().contains("no component"));
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = CliError::invalid_argument("bad format");
        assert!(err.to_string().contains("bad format"));
    }
}
