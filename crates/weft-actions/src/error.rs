use thiserror::Error;

/// Raised when an action is built from an invalid configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("action '{alias}' misconfigured: {message}")]
pub struct ConfigurationError {
    /// Alias of the misconfigured action
    pub alias: String,
    /// What is wrong with the configuration
    pub message: String,
}

impl ConfigurationError {
    /// Create a configuration error for the given action alias
    pub fn new(alias: &str, message: &str) -> Self {
        Self {
            alias: alias.to_string(),
            message: message.to_string(),
        }
    }
}
