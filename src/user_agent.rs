//! Shared User-Agent strings for catalog and stream HTTP traffic.
//!
//! Single source for project URL and UA format so catalog lookups and stream
//! downloads stay consistent and easy to update (good citizenship; RFC 9308).

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/tvgrab";

/// Default User-Agent for all session traffic (identifies the library).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("tvgrab/{version} (catalog-client; +{PROJECT_UA_URL})")
}
