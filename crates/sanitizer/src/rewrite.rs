//! Post-filter rewrite pass.
//!
//! Runs after the trust-boundary filtering pass, over a tree the pass owns
//! outright: parse the filtered fragment, visit every surviving anchor and
//! image, apply the hardening and image-policy rewrites, serialize back to a
//! fragment string. No global hook registration is involved, so concurrent
//! sanitize calls are fully isolated.

use kuchiki::traits::TendrilSink;
use kuchiki::{Attributes, ElementData, NodeDataRef, NodeRef};

use driftmail_policy::{SanitizeOptions, BLOCKED_SRC_ATTR};

use crate::error::{SanitizerError, SanitizerResult};
use crate::images::{
    resolve_image_policy, ImagePolicy, BLOCKED_IMAGE_ALT, BLOCKED_IMAGE_CLASS,
    BLOCKED_IMAGE_PLACEHOLDER,
};
use crate::metrics::SanitizerMetrics;

/// Open hyperlinks in a new browsing context.
const ANCHOR_TARGET: &str = "_blank";

/// Two independent protections: no reference back to the originating window,
/// and no referrer header sent to the destination.
const ANCHOR_REL: &str = "noopener noreferrer";

/// Apply the rewrite hooks to every surviving element of a filtered fragment.
pub(crate) fn rewrite_fragment(
    fragment: &str,
    options: &SanitizeOptions,
    metrics: &SanitizerMetrics,
) -> SanitizerResult<String> {
    let document = kuchiki::parse_html().one(fragment);

    let anchors = document
        .select("a")
        .map_err(|_| SanitizerError::selector("a"))?;
    for anchor in anchors {
        harden_anchor(&anchor);
        metrics.increment_links_hardened();
    }

    let images = document
        .select("img")
        .map_err(|_| SanitizerError::selector("img"))?;
    for image in images {
        rewrite_image(&image, options, metrics);
    }

    serialize_fragment(&document)
}

/// Every hyperlink opens in a new context with opener and referrer
/// suppressed, regardless of scheme.
fn harden_anchor(anchor: &NodeDataRef<ElementData>) {
    let mut attributes = anchor.attributes.borrow_mut();
    attributes.insert("target", ANCHOR_TARGET.to_string());
    attributes.insert("rel", ANCHOR_REL.to_string());
}

fn rewrite_image(
    image: &NodeDataRef<ElementData>,
    options: &SanitizeOptions,
    metrics: &SanitizerMetrics,
) {
    let mut attributes = image.attributes.borrow_mut();

    let src = match attributes.get("src") {
        Some(src) => src.to_string(),
        None => {
            // Only the engine may write the blocked-source attribute.
            attributes.remove(BLOCKED_SRC_ATTR);
            return;
        }
    };

    if has_script_protocol(&src) {
        // Broken image with no fallback src, rather than any residual
        // execution path.
        attributes.remove("src");
        attributes.remove(BLOCKED_SRC_ATTR);
        metrics.increment_images_stripped();
        tracing::warn!("stripped script-protocol image source");
        return;
    }

    match resolve_image_policy(&src, options) {
        ImagePolicy::PassThrough => {
            // A placeholder image keeps its recorded original URL; anything
            // else must not carry an attacker-supplied one.
            if src != BLOCKED_IMAGE_PLACEHOLDER {
                attributes.remove(BLOCKED_SRC_ATTR);
            }
        }
        ImagePolicy::BlockAndPlaceholder => {
            attributes.insert("src", BLOCKED_IMAGE_PLACEHOLDER.to_string());
            attributes.insert("alt", BLOCKED_IMAGE_ALT.to_string());
            append_class(&mut attributes, BLOCKED_IMAGE_CLASS);
            attributes.insert(BLOCKED_SRC_ATTR, src);
            metrics.increment_images_blocked();
            tracing::debug!("blocked remote image source");
        }
        ImagePolicy::Strip => {
            attributes.remove("src");
            attributes.remove(BLOCKED_SRC_ATTR);
            metrics.increment_images_stripped();
            tracing::debug!("stripped image source with unsupported scheme");
        }
    }
}

/// Scheme sniffing over an attacker-controlled value: normalize away ASCII
/// whitespace and control characters, lowercase, then prefix-match. Browsers
/// ignore those characters inside a scheme, so the check must too.
fn has_script_protocol(src: &str) -> bool {
    let normalized: String = src
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect::<String>()
        .to_ascii_lowercase();
    normalized.starts_with("javascript:") || normalized.starts_with("vbscript:")
}

/// Append a class token unless it is already present.
fn append_class(attributes: &mut Attributes, class: &str) {
    let updated = match attributes.get("class") {
        Some(existing) => {
            if existing.split_ascii_whitespace().any(|token| token == class) {
                return;
            }
            format!("{} {}", existing, class)
        }
        None => class.to_string(),
    };
    attributes.insert("class", updated);
}

/// Serialize the children of `<body>` back into a fragment string, so the
/// document wrappers the tree parser introduced never reach the output.
fn serialize_fragment(document: &NodeRef) -> SanitizerResult<String> {
    let body = document
        .select_first("body")
        .map_err(|_| SanitizerError::selector("body"))?;

    let mut bytes = Vec::new();
    for child in body.as_node().children() {
        child.serialize(&mut bytes)?;
    }
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_protocol_detection() {
        assert!(has_script_protocol("javascript:alert(1)"));
        assert!(has_script_protocol("JaVaScRiPt:alert(1)"));
        assert!(has_script_protocol("java\tscript:alert(1)"));
        assert!(has_script_protocol(" javascript:alert(1)"));
        assert!(has_script_protocol("vbscript:msgbox(1)"));
        assert!(!has_script_protocol("https://example.com/a.png"));
        assert!(!has_script_protocol("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_append_class_is_idempotent() {
        let mut attributes = Attributes {
            map: Default::default(),
        };
        append_class(&mut attributes, BLOCKED_IMAGE_CLASS);
        assert_eq!(attributes.get("class"), Some(BLOCKED_IMAGE_CLASS));

        append_class(&mut attributes, BLOCKED_IMAGE_CLASS);
        assert_eq!(attributes.get("class"), Some(BLOCKED_IMAGE_CLASS));

        attributes.insert("class", "sender-style".to_string());
        append_class(&mut attributes, BLOCKED_IMAGE_CLASS);
        assert_eq!(
            attributes.get("class"),
            Some(format!("sender-style {}", BLOCKED_IMAGE_CLASS).as_str())
        );
    }

    #[test]
    fn test_serialize_drops_document_wrappers() {
        let metrics = SanitizerMetrics::new();
        let out =
            rewrite_fragment("<p>hello</p>", &SanitizeOptions::default(), &metrics).unwrap();
        assert_eq!(out, "<p>hello</p>");
    }

    #[test]
    fn test_text_only_fragment_survives() {
        let metrics = SanitizerMetrics::new();
        let out = rewrite_fragment("just text", &SanitizeOptions::default(), &metrics).unwrap();
        assert_eq!(out, "just text");
    }
}
