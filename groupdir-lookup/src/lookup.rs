//! Cache-backed group lookups.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use groupdir_cache::{CacheStats, TtlCache};
use groupdir_core::constants::{DEFAULT_CACHE_TTL, DEGRADED_CACHE_TTL};
use groupdir_core::error::{GroupError, Result};
use groupdir_core::traits::{Clock, GroupFetcher};
use groupdir_core::types::GroupRecord;
use groupdir_core::SystemClock;
use groupdir_fetch::{FetcherConfig, W3cClient};
use groupdir_registry::GroupRegistry;

/// Lookup configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LookupConfig {
    /// W3C API configuration
    pub fetcher: FetcherConfig,
    /// Cache TTL in seconds
    pub cache_ttl_seconds: u64,
    /// Cache TTL in seconds for groups whose patent policy lookup failed
    #[serde(default = "default_degraded_ttl_seconds")]
    pub degraded_ttl_seconds: u64,
    /// Group table to use instead of the bundled one
    pub groups_file: Option<PathBuf>,
}

impl LookupConfig {
    /// Creates a config for the public W3C API with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            fetcher: FetcherConfig::new(api_key),
            cache_ttl_seconds: DEFAULT_CACHE_TTL.as_secs(),
            degraded_ttl_seconds: default_degraded_ttl_seconds(),
            groups_file: None,
        }
    }

    /// Points the fetcher at another API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.fetcher = self.fetcher.with_base_url(base_url);
        self
    }

    /// Loads the registry from `path` instead of the bundled table.
    pub fn with_groups_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.groups_file = Some(path.into());
        self
    }

    /// Cache TTL as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Degraded-record TTL as a duration.
    pub fn degraded_ttl(&self) -> Duration {
        Duration::from_secs(self.degraded_ttl_seconds)
    }
}

fn default_degraded_ttl_seconds() -> u64 {
    DEGRADED_CACHE_TTL.as_secs()
}

/// Group lookup service.
///
/// Resolves a shortname by:
/// 1. Returning the cached record if it is still fresh
/// 2. Looking up the group id in the registry
/// 3. Fetching the record from the upstream API
/// 4. Caching the record
///
/// Failures are never cached. A record whose patent policy could not be
/// read is cached for the shorter degraded TTL so the policy is retried soon. Concurrent cold lookups of the same name are
/// not coalesced; each one fetches.
pub struct GroupLookup {
    registry: Arc<GroupRegistry>,
    fetcher: Arc<dyn GroupFetcher>,
    cache: TtlCache<GroupRecord>,
    degraded_ttl: Duration,
}

impl GroupLookup {
    /// Creates a lookup service from its collaborators.
    pub fn new(
        registry: Arc<GroupRegistry>,
        fetcher: Arc<dyn GroupFetcher>,
        cache: TtlCache<GroupRecord>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            cache,
            degraded_ttl: DEGRADED_CACHE_TTL,
        }
    }

    /// Sets how long records with an unresolved patent policy stay cached.
    /// Never longer than the cache's own TTL.
    pub fn with_degraded_ttl(mut self, ttl: Duration) -> Self {
        self.degraded_ttl = ttl;
        self
    }

    /// Creates a lookup service backed by the W3C API.
    pub fn with_config(config: LookupConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a lookup service backed by the W3C API, expiring cache
    /// entries against `clock`.
    pub fn with_clock(config: LookupConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let registry = match &config.groups_file {
            Some(path) => Arc::new(GroupRegistry::from_file(path)?),
            None => GroupRegistry::bundled(),
        };
        let fetcher = Arc::new(W3cClient::with_config(config.fetcher.clone())?);
        let cache = TtlCache::with_clock(config.cache_ttl(), clock);

        info!(
            groups = registry.len(),
            ttl_seconds = config.cache_ttl_seconds,
            "Group lookup ready"
        );

        Ok(Self::new(registry, fetcher, cache).with_degraded_ttl(config.degraded_ttl()))
    }

    /// Resolves one group.
    ///
    /// Fails with [`GroupError::NotFound`] for unregistered names and passes
    /// upstream errors through unchanged.
    #[instrument(skip(self))]
    pub async fn lookup_one(&self, shortname: &str) -> Result<GroupRecord> {
        if let Some(record) = self.cache.get(shortname) {
            debug!(shortname, "Cache hit");
            return Ok(record);
        }

        debug!(shortname, "Cache miss, resolving");

        let meta = self
            .registry
            .resolve(shortname)
            .ok_or_else(|| GroupError::NotFound(shortname.to_string()))?;

        let record = self
            .fetcher
            .fetch(meta.id, &meta.shortname, meta.category)
            .await?;

        if record.policy_unresolved() {
            let ttl = self.degraded_ttl.min(self.cache.ttl());
            debug!(shortname, ttl_seconds = ttl.as_secs(), "Caching degraded record");
            self.cache.set_with_ttl(shortname, record.clone(), ttl);
        } else {
            self.cache.set(shortname, record.clone());
        }
        Ok(record)
    }

    /// Resolves every registered group.
    ///
    /// All lookups run concurrently and every one is awaited regardless of
    /// the others. The result is then read back from the cache; a group whose
    /// lookup failed is returned with its registry identity only. Never
    /// fails, and returns exactly one record per registered shortname.
    #[instrument(skip(self))]
    pub async fn lookup_all(&self) -> Vec<GroupRecord> {
        let entries = self.registry.entries();

        let outcomes = join_all(
            entries
                .iter()
                .map(|meta| self.lookup_one(&meta.shortname)),
        )
        .await;

        let failed = entries
            .iter()
            .zip(&outcomes)
            .filter_map(|(meta, outcome)| outcome.as_ref().err().map(|err| (meta, err)))
            .inspect(|(meta, err)| {
                warn!(shortname = %meta.shortname, error = %err, "Serving registry data only");
            })
            .count();

        debug!(total = entries.len(), failed, "Resolved all groups");

        entries
            .into_iter()
            .map(|meta| {
                self.cache
                    .get(&meta.shortname)
                    .unwrap_or_else(|| GroupRecord::from_meta(meta))
            })
            .collect()
    }

    /// Returns the cached record for `shortname` without fetching.
    pub fn cached(&self, shortname: &str) -> Option<GroupRecord> {
        self.cache.get(shortname)
    }

    /// The group registry.
    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
