//! TTL cache for groupdir.
//!
//! Generic in-memory cache with a per-instance default TTL and lazy expiry.

mod cache;

pub use cache::{CacheConfig, CacheStats, TtlCache};
