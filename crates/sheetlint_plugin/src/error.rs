//! Checker error types.

use thiserror::Error;

/// Errors that can occur while running a checker.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The checker (or one of its plugins) failed.
    #[error("Checker call failed: {0}")]
    CallError(String),

    /// A plugin returned output that could not be understood.
    #[error("Invalid plugin output: {0}")]
    InvalidOutput(String),

    /// Checker or plugin not found.
    #[error("Checker not found: {0}")]
    NotFound(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PluginError {
    /// Creates a call error.
    pub fn call(message: impl Into<String>) -> Self {
        Self::CallError(message.into())
    }

    /// Creates an invalid output error.
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }
}
