//! Sanitizer specific errors.
//!
//! The engine has exactly one operational failure mode: it could not produce
//! a guaranteed-filtered result. On that path the call returns an error and
//! no content at all; returning raw or partially filtered input would be a
//! security regression, not a degraded mode.

#[derive(thiserror::Error, Debug)]
pub enum SanitizerError {
    /// The rewrite stage could not be applied to the filtered fragment.
    #[error("sanitization unavailable: {0}")]
    SanitizationUnavailable(String),
}

impl SanitizerError {
    pub(crate) fn selector(selector: &str) -> Self {
        Self::SanitizationUnavailable(format!(
            "rewrite pass could not compile selector `{}`",
            selector
        ))
    }
}

impl From<std::io::Error> for SanitizerError {
    fn from(err: std::io::Error) -> Self {
        Self::SanitizationUnavailable(format!("fragment serialization failed: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for SanitizerError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::SanitizationUnavailable(format!("serialized fragment was not UTF-8: {}", err))
    }
}

/// Result type for sanitizer operations
pub type SanitizerResult<T> = Result<T, SanitizerError>;
