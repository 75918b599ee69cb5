//! The allowlist policy applied to inbound message HTML.
//!
//! Four declarative tables drive the sanitizer: allowed tags, allowed
//! attributes, forbidden tags and forbidden attributes. The forbid tables win
//! over the allow tables unconditionally, so a misconfigured allowlist can
//! never re-admit a script-capable tag or an event-handler attribute. All
//! membership tests lowercase the candidate name first; attacker-controlled
//! names are never compared using a parser's own normalization.

use std::collections::HashSet;

use crate::error::{PolicyError, PolicyResult};

/// Attribute carrying the pre-block remote URL on a placeholder image.
///
/// Diagnostic only: renderers must never treat it as a live source. It is the
/// single `data-*` name the policy admits, so re-sanitizing engine output
/// preserves it.
pub const BLOCKED_SRC_ATTR: &str = "data-blocked-src";

lazy_static::lazy_static! {
    /// The process-wide policy used for the message view. Immutable for the
    /// process lifetime.
    pub static ref MESSAGE_VIEW_POLICY: AllowlistPolicy = AllowlistPolicy::message_view();
}

/// Allow/forbid tables for one sanitization profile.
#[derive(Debug, Clone)]
pub struct AllowlistPolicy {
    /// Tags that may survive sanitization
    allowed_tags: HashSet<&'static str>,
    /// Attributes that may survive on any allowed tag
    allowed_attributes: HashSet<&'static str>,
    /// Tags always removed with their whole subtree, even if allowed elsewhere
    forbidden_tags: HashSet<&'static str>,
    /// Attributes always stripped, even if allowed elsewhere
    forbidden_attributes: HashSet<&'static str>,
    /// URL schemes permitted on href/src values
    allowed_url_schemes: HashSet<&'static str>,
}

impl AllowlistPolicy {
    /// The policy for rendering inbound email bodies in the message view.
    pub fn message_view() -> Self {
        let allowed_tags = HashSet::from([
            // Structural elements
            "article", "aside", "blockquote", "br", "details", "div",
            "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5",
            "h6", "header", "hr", "main", "nav", "p", "pre", "section",
            "summary",
            // Text formatting
            "a", "abbr", "b", "code", "del", "em", "i", "img", "ins", "mark",
            "q", "s", "small", "span", "strong", "sub", "sup", "time", "u",
            // Lists
            "dd", "dl", "dt", "li", "ol", "ul",
            // Tables
            "caption", "col", "colgroup", "table", "tbody", "td", "tfoot",
            "th", "thead", "tr",
        ]);

        let allowed_attributes = HashSet::from([
            "alt", "class", "colspan", "height", "href", "id", "rel",
            "rowspan", "src", "style", "target", "title", "width",
            BLOCKED_SRC_ATTR,
        ]);

        // Script-execution-capable and form-interactive tags. Kept even
        // though none of them is in the allowlist: the forbid table must hold
        // on its own if the allowlist is ever misconfigured.
        let forbidden_tags = HashSet::from([
            "script", "style", "iframe", "object", "embed", "form", "input",
            "button", "select", "textarea", "meta", "link", "base",
        ]);

        let forbidden_attributes = HashSet::from([
            "onerror", "onload", "onclick", "onmouseover", "onfocus",
            "onblur", "onsubmit", "onchange", "onkeydown", "onkeyup",
            "onkeypress",
        ]);

        let allowed_url_schemes = HashSet::from(["http", "https", "mailto", "data"]);

        Self {
            allowed_tags,
            allowed_attributes,
            forbidden_tags,
            forbidden_attributes,
            allowed_url_schemes,
        }
    }

    /// Check whether a tag may be retained. Forbidden wins over allowed.
    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.allowed_tags.contains(tag.as_str()) && !self.forbidden_tags.contains(tag.as_str())
    }

    /// Check whether a tag is in the always-removed table.
    pub fn is_tag_forbidden(&self, tag: &str) -> bool {
        self.forbidden_tags.contains(tag.to_lowercase().as_str())
    }

    /// Check whether an attribute may be retained on an allowed tag.
    /// Forbidden wins over allowed.
    pub fn is_attribute_allowed(&self, attribute: &str) -> bool {
        let attribute = attribute.to_lowercase();
        self.allowed_attributes.contains(attribute.as_str())
            && !self.is_attribute_forbidden(&attribute)
    }

    /// Check whether an attribute is always stripped. Any name starting with
    /// `on` is treated as an event handler regardless of the explicit table.
    pub fn is_attribute_forbidden(&self, attribute: &str) -> bool {
        let attribute = attribute.to_lowercase();
        attribute.starts_with("on") || self.forbidden_attributes.contains(attribute.as_str())
    }

    /// Check whether a URL scheme is permitted on href/src values.
    pub fn is_scheme_allowed(&self, scheme: &str) -> bool {
        self.allowed_url_schemes
            .contains(scheme.to_lowercase().as_str())
    }

    /// Tags the sanitizer may keep: the allowlist minus the forbid table.
    pub fn retained_tags(&self) -> HashSet<&'static str> {
        self.allowed_tags
            .difference(&self.forbidden_tags)
            .copied()
            .collect()
    }

    /// Tags removed together with their entire subtree. An unknown tag such
    /// as `<script>` must never have its text content re-surface as literal
    /// markup, so these are deleted whole, not unwrapped.
    pub fn subtree_removal_tags(&self) -> HashSet<&'static str> {
        self.forbidden_tags.clone()
    }

    /// Attributes the sanitizer may keep on any retained tag.
    pub fn retained_attributes(&self) -> HashSet<&'static str> {
        self.allowed_attributes
            .iter()
            .copied()
            .filter(|attribute| !self.is_attribute_forbidden(attribute))
            .collect()
    }

    /// Permitted URL schemes for the engine's scheme filter.
    pub fn url_schemes(&self) -> HashSet<&'static str> {
        self.allowed_url_schemes.clone()
    }

    /// Validate the policy invariants.
    pub fn validate(&self) -> PolicyResult<()> {
        for tag in &self.forbidden_tags {
            if self.allowed_tags.contains(tag) {
                return Err(PolicyError::InvalidConfiguration(format!(
                    "tag `{}` is both allowed and forbidden",
                    tag
                )));
            }
        }
        for attribute in &self.allowed_attributes {
            if self.is_attribute_forbidden(attribute) {
                return Err(PolicyError::InvalidConfiguration(format!(
                    "attribute `{}` is both allowed and forbidden",
                    attribute
                )));
            }
        }
        Ok(())
    }
}

impl Default for AllowlistPolicy {
    fn default() -> Self {
        Self::message_view()
    }
}
