//! Common traits for groupdir.
//!
//! These are the seams the lookup orchestrator is built against, so tests can
//! swap the upstream API and the wall clock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{GroupCategory, GroupRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// FETCHER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolves a numeric group id into full group metadata.
///
/// Implementations are read-only and idempotent: calling `fetch` twice for
/// the same id has no side effects beyond the network traffic.
#[async_trait]
pub trait GroupFetcher: Send + Sync {
    /// Fetches the record for `id`, stamping it with the registry-derived
    /// `shortname` and `category`.
    async fn fetch(&self, id: u64, shortname: &str, category: GroupCategory)
        -> Result<GroupRecord>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of the current time for expiry decisions.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
