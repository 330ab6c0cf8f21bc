//! Filename derivation and sanitization for download targets.
//!
//! Resuming relies on the same URL mapping to the same temp file on every
//! run, so derived names are deterministic (no timestamps or unique suffixes).

use std::path::{Component, Path};

use tracing::debug;
use url::Url;

/// Name used when the URL carries no usable path segment.
pub const FALLBACK_FILENAME: &str = "download.bin";

/// Derives a target file name from the last path segment of `url`.
///
/// The segment is percent-decoded and sanitized. Falls back to
/// [`FALLBACK_FILENAME`] for unparseable URLs, empty paths and names that
/// sanitize to nothing useful.
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return FALLBACK_FILENAME.to_string();
    };

    if let Some(mut segments) = parsed.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let decoded = urlencoding::decode(last).unwrap_or_else(|e| {
            debug!(segment = %last, error = %e, "URL decoding failed, using raw segment");
            last.into()
        });
        let sanitized = sanitize_filename(&decoded);
        if !sanitized.trim_matches('_').is_empty() {
            return sanitized;
        }
    }

    FALLBACK_FILENAME.to_string()
}

/// Sanitizes a filename by replacing invalid characters.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized
            .chars()
            .map(|c| if c == '.' { '_' } else { c })
            .collect()
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url_uses_last_segment() {
        assert_eq!(
            filename_from_url("https://example.com/pub/archive.tar.gz"),
            "archive.tar.gz"
        );
        assert_eq!(
            filename_from_url("https://example.com/file.iso?token=abc"),
            "file.iso"
        );
    }

    #[test]
    fn test_filename_from_url_decodes_percent_encoding() {
        assert_eq!(
            filename_from_url("https://example.com/my%20report.pdf"),
            "my report.pdf"
        );
    }

    #[test]
    fn test_filename_from_url_falls_back() {
        assert_eq!(filename_from_url("https://example.com/"), FALLBACK_FILENAME);
        assert_eq!(filename_from_url("https://example.com"), FALLBACK_FILENAME);
        assert_eq!(filename_from_url("not a url"), FALLBACK_FILENAME);
        assert_eq!(filename_from_url("https://example.com/.."), FALLBACK_FILENAME);
    }

    #[test]
    fn test_filename_from_url_is_deterministic() {
        let url = "https://example.com/data.bin";
        assert_eq!(filename_from_url(url), filename_from_url(url));
    }

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("file/name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file\\name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file:name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("a*b?c\"d<e>f|g"), "a_b_c_d_e_f_g");
    }

    #[test]
    fn test_sanitize_filename_neutralizes_dot_segments() {
        assert_eq!(sanitize_filename(".."), "__");
        assert_eq!(sanitize_filename("."), "_");
        assert_eq!(sanitize_filename(""), "_");
    }

    #[test]
    fn test_sanitize_filename_decoded_traversal() {
        assert_eq!(
            filename_from_url("https://example.com/%2E%2E%2Fetc%2Fpasswd"),
            ".._etc_passwd"
        );
    }
}
