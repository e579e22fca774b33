//! Error types for the geotwin core.
//!
//! Collaborator computations return [`CollaboratorError`]; stage adapters are
//! the only place these are caught and converted into
//! [`crate::core::StageResult::Failed`] outcomes. Nothing in the orchestrator
//! path propagates an error past the adapter boundary.

use thiserror::Error;

/// Error raised by a wrapped scientific computation.
///
/// Messages carry enough context (record index, field name, offending value)
/// to be actionable once the adapter prefixes them with the stage name.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// A scalar input was missing, non-finite, or out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A tabular record could not be decoded or failed validation.
    #[error("record {index}: {message}")]
    InvalidRecord {
        /// Zero-based index of the offending row.
        index: usize,
        /// What was wrong with it.
        message: String,
    },

    /// The layering profile as a whole is inconsistent.
    #[error("soil profile: {0}")]
    InvalidProfile(String),

    /// An artifact could not be persisted.
    #[error("artifact write failed: {0}")]
    Io(#[from] std::io::Error),

    /// A result could not be serialized for storage.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CollaboratorError {
    /// Creates an invalid-input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates an invalid-record error for the given row index.
    #[must_use]
    pub fn invalid_record(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            index,
            message: message.into(),
        }
    }

    /// Creates an invalid-profile error.
    #[must_use]
    pub fn invalid_profile(message: impl Into<String>) -> Self {
        Self::InvalidProfile(message.into())
    }
}

/// Error raised while loading configuration from the environment.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {var}: {message}")]
    InvalidVar {
        /// The environment variable name.
        var: String,
        /// Why the value was rejected.
        message: String,
    },
}
