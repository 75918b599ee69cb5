//! Policy specific errors for the Driftmail message viewer.

#[derive(thiserror::Error, Debug, Clone)]
pub enum PolicyError {
    #[error("Invalid policy configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for policy operations
pub type PolicyResult<T> = Result<T, PolicyError>;
