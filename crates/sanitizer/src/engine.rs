//! Trust-boundary filtering pass.
//!
//! Configures an [`ammonia::Builder`] per call from the allowlist policy and
//! runs it over the raw fragment. Everything here is call-scoped: the builder
//! is a local value, so concurrent sanitize calls cannot observe each other's
//! configuration and there is nothing to install or tear down.

use std::collections::HashMap;

use ammonia::Builder;
use driftmail_policy::AllowlistPolicy;

/// Run the allow/forbid filtering pass over a raw HTML fragment.
///
/// The fragment is parsed with HTML5 error recovery, so malformed input is
/// repaired rather than rejected. Tags outside the retained set are dropped;
/// the forbidden set is removed together with its entire subtree so script
/// or style text can never re-surface as literal markup. Attributes survive
/// only if retained by the policy, and href/src values with a scheme outside
/// the allowed set lose the attribute entirely.
pub(crate) fn filter_fragment(raw_html: &str, policy: &AllowlistPolicy) -> String {
    let mut builder = Builder::default();
    builder
        .tags(policy.retained_tags())
        .clean_content_tags(policy.subtree_removal_tags())
        .generic_attributes(policy.retained_attributes())
        // The builder ships per-tag attribute allowlists; the policy tables
        // are the only source of truth, so those must not survive.
        .tag_attributes(HashMap::new())
        .url_schemes(policy.url_schemes())
        // `rel` is in the attribute allowlist and owned by the rewrite pass;
        // ammonia refuses to manage it at the same time.
        .link_rel(None)
        .strip_comments(true);

    let filtered = builder.clean(raw_html).to_string();
    tracing::debug!(
        input_len = raw_html.len(),
        output_len = filtered.len(),
        "filtered message fragment"
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftmail_policy::AllowlistPolicy;

    fn filter(html: &str) -> String {
        filter_fragment(html, &AllowlistPolicy::message_view())
    }

    #[test]
    fn test_script_subtree_removed_entirely() {
        let out = filter("<p>hi</p><script>alert(1)</script>");
        assert!(!out.contains("script"));
        assert!(!out.contains("alert(1)"));
        assert!(out.contains("<p>hi</p>"));
    }

    #[test]
    fn test_forbidden_tags_removed_with_content() {
        let out = filter(
            "<style>p{display:none}</style>\
             <iframe src=\"https://evil.example\">fallback</iframe>\
             <form action=\"/steal\"><input name=\"q\"><button>go</button></form>",
        );
        assert!(!out.contains("style"));
        assert!(!out.contains("display:none"));
        assert!(!out.contains("iframe"));
        assert!(!out.contains("fallback"));
        assert!(!out.contains("form"));
        assert!(!out.contains("button"));
    }

    #[test]
    fn test_unknown_tags_unwrap_but_keep_text() {
        let out = filter("<center>hello</center>");
        assert!(!out.contains("center"));
        assert!(out.contains("hello"));
    }

    #[test]
    fn test_event_handlers_stripped_any_case() {
        let out = filter(r#"<img src="data:image/png;base64,AAAA" onerror="x" ONLOAD="y">"#);
        assert!(!out.to_lowercase().contains("onerror"));
        assert!(!out.to_lowercase().contains("onload"));
        assert!(out.contains("<img"));
    }

    #[test]
    fn test_data_attributes_dropped() {
        let out = filter(r#"<p data-tracker="1" class="note">x</p>"#);
        assert!(!out.contains("data-tracker"));
        assert!(out.contains(r#"class="note""#));
    }

    #[test]
    fn test_disallowed_schemes_lose_the_attribute() {
        let out = filter(r#"<a href="javascript:alert(1)">link</a>"#);
        assert!(!out.contains("javascript"));
        assert!(!out.contains("href"));
        assert!(out.contains("link"));
    }

    #[test]
    fn test_per_tag_attribute_defaults_do_not_leak() {
        // `start` is not in the policy allowlist and must not survive via a
        // built-in per-tag table.
        let out = filter(r#"<ol start="5"><li>x</li></ol>"#);
        assert!(!out.contains("start="));
        assert!(out.contains("<li>x</li>"));
    }

    #[test]
    fn test_fragment_mode_no_document_wrappers() {
        let out = filter("<p>x</p>");
        assert!(!out.contains("<html"));
        assert!(!out.contains("<body"));
        assert_eq!(out, "<p>x</p>");
    }
}
