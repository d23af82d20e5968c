// Error types for auth scheme provider generation

use thiserror::Error;

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, AuthGenError>;

/// Errors that can occur while registering schemes or generating a provider
#[derive(Debug, Error)]
pub enum AuthGenError {
    /// Missing or invalid state for a scheme descriptor, raised at registration time
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Scheme identifier is not of the form `namespace#Name`
    #[error("Invalid scheme id: {0}")]
    InvalidSchemeId(String),

    /// Malformed model snapshot
    #[error("Model error: {0}")]
    Model(String),

    /// Writing to the code sink failed
    #[error("Emit error: {0}")]
    Emit(#[from] std::fmt::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AuthGenError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AuthGenError::Configuration(msg.into())
    }

    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        AuthGenError::Model(msg.into())
    }

    /// Create an invalid scheme id error
    pub fn invalid_scheme_id(id: impl Into<String>) -> Self {
        AuthGenError::InvalidSchemeId(id.into())
    }
}
