//! User-Agent string for download requests.

/// Project URL for User-Agent identification (RFC 9308 good citizenship).
const PROJECT_UA_URL: &str = "https://github.com/fierce/resume-downloader";

/// Default User-Agent for download requests (identifies the tool and version).
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("resume-dl/{version} (+{PROJECT_UA_URL})")
}
