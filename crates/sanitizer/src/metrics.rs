use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for tracking sanitizer behavior.
///
/// Monotonic and `Relaxed`: observability only, never part of a security
/// decision.
#[derive(Debug, Default)]
pub struct SanitizerMetrics {
    /// Number of sanitize calls served
    pub sanitize_calls: AtomicUsize,
    /// Number of anchors hardened with target/rel rewrites
    pub links_hardened: AtomicUsize,
    /// Number of remote images replaced with the placeholder
    pub images_blocked: AtomicUsize,
    /// Number of image sources stripped outright
    pub images_stripped: AtomicUsize,
}

impl SanitizerMetrics {
    /// Create new sanitizer metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the sanitize call counter
    pub fn increment_calls(&self) {
        self.sanitize_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the hardened link counter
    pub fn increment_links_hardened(&self) {
        self.links_hardened.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the blocked image counter
    pub fn increment_images_blocked(&self) {
        self.images_blocked.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the stripped image counter
    pub fn increment_images_stripped(&self) {
        self.images_stripped.fetch_add(1, Ordering::Relaxed);
    }
}
