// src/infra/errors.rs — Error types for Interpersonal

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterpersonalError {
    // Upstream errors
    #[error("Provider '{provider}' error: {message}")]
    Provider { provider: String, message: String },

    #[error("Rate limited by '{provider}'")]
    RateLimited { provider: String },

    #[error("Provider '{provider}' returned no message content")]
    EmptyResponse { provider: String },

    // Caller errors
    #[error("{0}")]
    Validation(String),

    #[error("No API key configured. Set {env_var} in the environment.")]
    NoApiKey { env_var: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InterpersonalError {
    /// Whether the failure originated upstream (the model API), as opposed
    /// to a bad request or local misconfiguration.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            InterpersonalError::Provider { .. } | InterpersonalError::RateLimited { .. }
        )
    }
}
