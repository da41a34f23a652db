//! Error types for groupdir.
//!
//! Every error knows the HTTP status it should be surfaced with, so the
//! inbound HTTP layer can forward upstream failures verbatim.

use thiserror::Error;

/// Result type alias using `GroupError`.
pub type Result<T> = std::result::Result<T, GroupError>;

/// Main error type for all groupdir operations.
#[derive(Debug, Error)]
pub enum GroupError {
    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUP ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Shortname is not present in the group registry.
    #[error("No group with groupName: {0}")]
    NotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Upstream API answered with a non-success status.
    #[error("{message}")]
    Remote {
        /// Upstream HTTP status code
        status: u16,
        /// Status-derived message (reason phrase)
        message: String,
    },

    /// Network failure while talking to the upstream API.
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// Upstream URL could not be built.
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // STARTUP ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GroupError {
    /// Builds a [`GroupError::Remote`] from an upstream status and reason phrase.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        GroupError::Remote {
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error is surfaced with.
    pub fn status_code(&self) -> u16 {
        match self {
            GroupError::NotFound(_) => 404,
            GroupError::Remote { status, .. } => *status,
            GroupError::Transport(_) | GroupError::InvalidUrl(_) | GroupError::Json(_) => 502,
            GroupError::Config(_) | GroupError::Io(_) => 500,
        }
    }

    /// Returns true if this error came from the upstream API.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GroupError::Remote { .. }
                | GroupError::Transport(_)
                | GroupError::InvalidUrl(_)
                | GroupError::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_group() {
        let err = GroupError::NotFound("nope".into());
        assert_eq!(err.to_string(), "No group with groupName: nope");
        assert_eq!(err.status_code(), 404);
        assert!(!err.is_upstream());
    }

    #[test]
    fn test_remote_keeps_upstream_status() {
        let err = GroupError::remote(503, "Service Unavailable");
        assert_eq!(err.status_code(), 503);
        assert_eq!(err.to_string(), "Service Unavailable");
        assert!(err.is_upstream());
    }

    #[test]
    fn test_transport_is_bad_gateway() {
        assert_eq!(GroupError::Transport("reset".into()).status_code(), 502);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(GroupError::from);
        assert!(matches!(result, Err(GroupError::Json(_))));
    }
}
