//! Result and error types for Trazar.

use crate::machine::Fsm;
use thiserror::Error;

/// Result type for Trazar operations
pub type TrazarResult<T> = Result<T, TrazarError>;

/// Errors that can occur in Trazar
#[derive(Debug, Error)]
pub enum TrazarError {
    /// Source behavior not traceable to declared state variables.
    /// Fatal: no partial model is returned.
    #[error("Extraction failed: {message}")]
    Extraction {
        /// What could not be traced
        message: String,
        /// Source line where the untraceable construct appears, if known
        line: Option<usize>,
    },

    /// The extracted model failed structural validation
    #[error("Invalid model: {message}")]
    InvalidModel {
        /// Validation failure description
        message: String,
    },

    /// State exploration exceeded the safety bound without exhausting the
    /// frontier. Signals a likely missing terminal condition in the source
    /// model. Carries the partial FSM for diagnostics.
    #[error(
        "Exploration exceeded depth bound {depth_bound} after discovering \
         {states_discovered} states; likely missing terminal condition"
    )]
    UnboundedExploration {
        /// The computed depth bound that was exceeded
        depth_bound: usize,
        /// Number of states discovered before aborting
        states_discovered: usize,
        /// The partial FSM explored so far
        partial: Box<Fsm>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl TrazarError {
    /// Create an extraction error with a known source line
    #[must_use]
    pub fn extraction_at(message: impl Into<String>, line: usize) -> Self {
        Self::Extraction {
            message: message.into(),
            line: Some(line),
        }
    }

    /// Create an extraction error with no line information
    #[must_use]
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            line: None,
        }
    }

    /// Create a model validation error
    #[must_use]
    pub fn invalid_model(message: impl Into<String>) -> Self {
        Self::InvalidModel {
            message: message.into(),
        }
    }
}
