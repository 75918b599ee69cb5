//! Driftmail Policy Crate
//!
//! This crate holds the declarative allowlist policy applied when rendering
//! untrusted inbound email HTML, plus the per-call sanitize options. It is
//! pure data and predicates: no parsing, no I/O, no mutable process state.

pub mod error;
pub mod options;
pub mod policy;

pub use error::{PolicyError, PolicyResult};
pub use options::SanitizeOptions;
pub use policy::{AllowlistPolicy, BLOCKED_SRC_ATTR, MESSAGE_VIEW_POLICY};
