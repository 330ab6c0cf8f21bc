//! Response header interpretation helpers.

/// Returns true if a `Content-Encoding` value declares gzip.
///
/// Matches `gzip` and the legacy `x-gzip` token case-insensitively, also when
/// listed among several codings.
#[must_use]
pub fn is_gzip_content(content_encoding: Option<&str>) -> bool {
    content_encoding.is_some_and(|value| {
        value
            .split(',')
            .map(str::trim)
            .any(|coding| {
                coding.eq_ignore_ascii_case("gzip") || coding.eq_ignore_ascii_case("x-gzip")
            })
    })
}
