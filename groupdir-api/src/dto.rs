//! DTOs for API responses.

use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
    /// Registered shortnames
    pub registry_size: usize,
    /// Groups currently cached and fresh
    pub cached: usize,
}
