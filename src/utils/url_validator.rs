//! Target URL validation.

use url::Url;

/// Returns true if `raw` is an absolute `http`/`https` URL with a non-empty host.
///
/// Only the shape is checked; the URL is stored exactly as given. The parser
/// strips whitespace and control characters and repairs a missing `//`, so
/// those are rejected on the raw input first: what gets stored must be usable
/// verbatim as a `Location` header.
pub fn is_valid_url(raw: &str) -> bool {
    if raw.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return false;
    }

    let Some((scheme, _)) = raw.split_once("://") else {
        return false;
    };
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return false;
    }

    let Ok(url) = Url::parse(raw) else {
        return false;
    };

    matches!(url.scheme(), "http" | "https")
        && url.has_authority()
        && url.host_str().is_some_and(|h| !h.is_empty())
}
