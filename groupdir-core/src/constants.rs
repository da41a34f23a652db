//! Constants for groupdir.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM API
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the W3C API.
pub const DEFAULT_W3C_API_URL: &str = "https://api.w3.org";

/// Query parameter carrying the API credential on every upstream call.
pub const API_KEY_PARAM: &str = "apikey";

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "W3C_API_KEY";

/// Upstream request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Link relation pointing at the group's homepage.
pub const LINK_HOMEPAGE: &str = "homepage";

/// Link relation pointing at the patent policy status page.
pub const LINK_PP_STATUS: &str = "pp-status";

/// Link relation pointing at the group's active charter resource.
pub const LINK_ACTIVE_CHARTER: &str = "active-charter";

/// Field of the charter resource holding the patent policy document URL.
pub const PATENT_POLICY_FIELD: &str = "patent-policy";

/// Marker substring identifying the 2017 patent policy document.
pub const PATENT_POLICY_2017_MARKER: &str = "Patent-Policy-2017";

// ═══════════════════════════════════════════════════════════════════════════════
// CACHING
// ═══════════════════════════════════════════════════════════════════════════════

/// How long a resolved group stays in the lookup cache (2 weeks).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// How long a group whose patent policy lookup failed stays cached (1 hour).
pub const DEGRADED_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// `max-age` advertised to HTTP clients for single-group responses (24 hours).
pub const RESPONSE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_ttl_is_two_weeks() {
        assert_eq!(DEFAULT_CACHE_TTL.as_secs(), 1_209_600);
    }

    #[test]
    fn test_degraded_ttl_is_shorter() {
        assert!(DEGRADED_CACHE_TTL < DEFAULT_CACHE_TTL);
    }

    #[test]
    fn test_response_max_age_is_one_day() {
        assert_eq!(RESPONSE_MAX_AGE_SECS, 86_400);
    }
}
