//! HTTP byte-range helpers.

/// Builds the `Range` request header value for resuming at `offset`.
#[must_use]
pub fn range_header_value(offset: u64) -> String {
    format!("bytes={offset}-")
}

/// Extracts the complete resource length from a `Content-Range` header.
///
/// The expected form is `bytes <start>-<end>/<total>`; the total is whatever
/// follows the final `/`. Returns `None` when there is no `/`, the total is
/// unknown (`*`), or it is not an integer.
#[must_use]
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    let (_, total) = header.rsplit_once('/')?;
    total.trim().parse::<u64>().ok()
}
