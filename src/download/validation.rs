//! URL syntax validation performed before any I/O.

use url::Url;

/// Returns true if `raw` is an absolute http(s) URL with a host.
#[must_use]
pub fn is_valid_url(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.len() != raw.len() {
        return false;
    }
    match Url::parse(trimmed) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}
