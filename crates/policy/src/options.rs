//! Per-call sanitize options supplied by the rendering caller.

use serde::{Deserialize, Serialize};

/// Options for a single sanitize invocation.
///
/// Immutable for the duration of the call; nothing here carries state across
/// calls. The struct travels inside render request payloads, hence the serde
/// derives and the camelCase wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SanitizeOptions {
    /// When true, remote `http(s)` image sources are left untouched for this
    /// call only. Remote image loads are a known tracking vector (read
    /// receipts via pixel beacons), so enabling them is a deliberate per-render
    /// decision, never a default.
    pub allow_external_images: bool,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            allow_external_images: false,
        }
    }
}

impl SanitizeOptions {
    /// Create options with the privacy-preserving defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether remote images may load for this call.
    pub fn with_external_images(mut self, allow: bool) -> Self {
        self.allow_external_images = allow;
        self
    }
}
