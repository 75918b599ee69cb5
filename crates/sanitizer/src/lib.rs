//! Driftmail's message HTML sanitizer
//!
//! Inbound email bodies are HTML written by an untrusted sender. This crate
//! turns such a body into a rendering-safe fragment for the message view:
//! allowlist tag/attribute filtering as the trust boundary, then a rewrite
//! pass that hardens links, enforces the remote-image privacy policy and
//! strips script-like protocol schemes.
//!
//! The engine is stateless across calls and all configuration is call-scoped,
//! so concurrent renders never contaminate each other.
//!
//! ```
//! use driftmail_sanitizer::{sanitize_message_html, SanitizeOptions};
//!
//! let options = SanitizeOptions::default();
//! let html = sanitize_message_html(
//!     "<p>Hello <script>alert(1)</script>world</p>",
//!     &options,
//! ).unwrap();
//! assert_eq!(html, "<p>Hello world</p>");
//! ```

mod engine;
pub mod error;
pub mod images;
pub mod metrics;
mod rewrite;

/// Re-export common types
pub use driftmail_policy::{AllowlistPolicy, SanitizeOptions, BLOCKED_SRC_ATTR};
pub use error::{SanitizerError, SanitizerResult};
pub use images::{
    resolve_image_policy, ImagePolicy, BLOCKED_IMAGE_ALT, BLOCKED_IMAGE_CLASS,
    BLOCKED_IMAGE_PLACEHOLDER,
};
pub use metrics::SanitizerMetrics;

/// Sanitizer for inbound message HTML.
///
/// Holds a reference to the process-wide policy tables plus observability
/// counters. Construction is cheap; sharing one instance across renders is
/// fine since a call mutates nothing but its own metrics counters.
pub struct MessageSanitizer {
    policy: &'static AllowlistPolicy,
    metrics: SanitizerMetrics,
}

impl MessageSanitizer {
    /// Create a sanitizer using the message-view policy.
    pub fn new() -> Self {
        Self::with_policy(&driftmail_policy::MESSAGE_VIEW_POLICY)
    }

    /// Create a sanitizer over a custom process-lifetime policy.
    pub fn with_policy(policy: &'static AllowlistPolicy) -> Self {
        Self {
            policy,
            metrics: SanitizerMetrics::new(),
        }
    }

    /// Sanitize a raw message body into a rendering-safe fragment.
    ///
    /// Empty input yields empty output without invoking the engine. Malformed
    /// markup is repaired by HTML5 error recovery and sanitized as recovered,
    /// never rejected: safety comes from the allow/forbid tables, not from
    /// conformance. The returned string contains no executable content and is
    /// safe to insert as markup without further escaping.
    ///
    /// # Errors
    ///
    /// [`SanitizerError::SanitizationUnavailable`] if the rewrite pass could
    /// not produce a guaranteed-filtered result. No content is returned on
    /// that path.
    pub fn sanitize(&self, raw_html: &str, options: &SanitizeOptions) -> SanitizerResult<String> {
        if raw_html.is_empty() {
            return Ok(String::new());
        }
        self.metrics.increment_calls();

        let filtered = engine::filter_fragment(raw_html, self.policy);
        rewrite::rewrite_fragment(&filtered, options, &self.metrics)
    }

    /// Get sanitizer metrics
    pub fn metrics(&self) -> &SanitizerMetrics {
        &self.metrics
    }
}

impl Default for MessageSanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Sanitize a message body with the message-view policy.
pub fn sanitize_message_html(
    raw_html: &str,
    options: &SanitizeOptions,
) -> SanitizerResult<String> {
    MessageSanitizer::new().sanitize(raw_html, options)
}
