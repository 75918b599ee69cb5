//! Image source policy for the message view.
//!
//! A pure, total classification over `(src, options)`. Blocking remote
//! images by default defeats the most common email-tracking technique
//! (beacon pixels) without breaking inline content: `data:` images are fully
//! contained in the markup and cannot phone home.

use driftmail_policy::SanitizeOptions;
use url::Url;

/// Inert inline SVG shown in place of a blocked remote image. Being a
/// `data:image` URL, it classifies as an inline image on re-sanitization,
/// which keeps repeated sanitize calls a no-op.
pub const BLOCKED_IMAGE_PLACEHOLDER: &str = "data:image/svg+xml,%3Csvg%20xmlns='http://www.w3.org/2000/svg'%20width='24'%20height='24'%3E%3Crect%20width='24'%20height='24'%20fill='%23cbd5e1'/%3E%3C/svg%3E";

/// Alt text applied to a blocked remote image.
pub const BLOCKED_IMAGE_ALT: &str = "Remote image blocked for privacy";

/// Marker class applied to a blocked remote image so the view can style it.
pub const BLOCKED_IMAGE_CLASS: &str = "driftmail-blocked-image";

/// Outcome of classifying an image source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePolicy {
    /// Leave the source untouched
    PassThrough,
    /// Replace the source with the placeholder and record the original URL
    BlockAndPlaceholder,
    /// Remove the source attribute entirely
    Strip,
}

/// Classify an image `src` value under the given options.
///
/// Relative references and unparseable values carry no scheme we can trust,
/// so they fall into the `Strip` arm.
pub fn resolve_image_policy(src: &str, options: &SanitizeOptions) -> ImagePolicy {
    match Url::parse(src) {
        Ok(url) => match url.scheme() {
            "data" if has_image_media_type(&url) => ImagePolicy::PassThrough,
            "http" | "https" => {
                if options.allow_external_images {
                    ImagePolicy::PassThrough
                } else {
                    ImagePolicy::BlockAndPlaceholder
                }
            }
            _ => ImagePolicy::Strip,
        },
        Err(_) => ImagePolicy::Strip,
    }
}

/// Whether a `data:` URL is scoped to image media types.
fn has_image_media_type(url: &Url) -> bool {
    let path = url.path();
    path.len() >= 6 && path[..6].eq_ignore_ascii_case("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocking() -> SanitizeOptions {
        SanitizeOptions::default()
    }

    fn permissive() -> SanitizeOptions {
        SanitizeOptions::new().with_external_images(true)
    }

    #[test]
    fn test_inline_images_pass_regardless_of_options() {
        let src = "data:image/png;base64,AAAA";
        assert_eq!(resolve_image_policy(src, &blocking()), ImagePolicy::PassThrough);
        assert_eq!(resolve_image_policy(src, &permissive()), ImagePolicy::PassThrough);
    }

    #[test]
    fn test_remote_images_blocked_by_default() {
        assert_eq!(
            resolve_image_policy("https://evil.example/pixel.png", &blocking()),
            ImagePolicy::BlockAndPlaceholder
        );
        assert_eq!(
            resolve_image_policy("http://evil.example/pixel.png", &blocking()),
            ImagePolicy::BlockAndPlaceholder
        );
    }

    #[test]
    fn test_remote_images_pass_when_opted_in() {
        assert_eq!(
            resolve_image_policy("https://cdn.example/logo.png", &permissive()),
            ImagePolicy::PassThrough
        );
    }

    #[test]
    fn test_scheme_matching_is_case_insensitive() {
        assert_eq!(
            resolve_image_policy("HTTPS://evil.example/pixel.png", &blocking()),
            ImagePolicy::BlockAndPlaceholder
        );
        assert_eq!(
            resolve_image_policy("DATA:IMAGE/gif;base64,AAAA", &blocking()),
            ImagePolicy::PassThrough
        );
    }

    #[test]
    fn test_non_image_data_urls_are_stripped() {
        assert_eq!(
            resolve_image_policy("data:text/html,<b>x</b>", &blocking()),
            ImagePolicy::Strip
        );
    }

    #[test]
    fn test_other_schemes_and_relative_refs_are_stripped() {
        for src in [
            "javascript:alert(1)",
            "vbscript:msgbox(1)",
            "ftp://host/img.png",
            "cid:part1@example",
            "file:///etc/passwd",
            "/relative/path.png",
            "pixel.png",
            "",
        ] {
            assert_eq!(
                resolve_image_policy(src, &permissive()),
                ImagePolicy::Strip,
                "src {:?} should strip",
                src
            );
        }
    }

    #[test]
    fn test_placeholder_classifies_as_inline_image() {
        assert_eq!(
            resolve_image_policy(BLOCKED_IMAGE_PLACEHOLDER, &blocking()),
            ImagePolicy::PassThrough
        );
    }
}
