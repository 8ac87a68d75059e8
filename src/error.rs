//! Error types for the VOS estimator

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or dumping a layout estimate
#[derive(Error, Debug)]
pub enum Error {
    // =========================================================================
    // Validation Errors (raised at construction)
    // =========================================================================
    /// A parameter is missing, out of range, or not a recognized value
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    // =========================================================================
    // Structural Errors (raised at dump time)
    // =========================================================================
    /// A required child list is empty when the tree is finalized
    #[error("list of {0} must not be empty")]
    EmptyList(&'static str),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Object class name not present in the policy table
    #[error("Unknown object class: {0}")]
    UnknownObjectClass(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // =========================================================================
    // I/O and Serialization
    // =========================================================================
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for a validation error about a named parameter
    pub(crate) fn invalid(param: &str, reason: impl std::fmt::Display) -> Self {
        Error::InvalidValue(format!("{} parameter {}", param, reason))
    }

    /// Returns true for errors raised while validating constructor input
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidValue(_))
    }

    /// Returns true for errors raised when finalizing an incomplete tree
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::EmptyList(_))
    }
}
