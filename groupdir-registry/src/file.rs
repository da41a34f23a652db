//! Loading the registry from its JSON table.
//!
//! The table is a JSON object with one map per category:
//!
//! ```json
//! { "wg": { "webperf": 45211 }, "cg": { "wicg": 80485 } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::Deserialize;
use tracing::{debug, info, instrument};

use groupdir_core::error::{GroupError, Result};
use groupdir_core::types::GroupCategory;

use crate::GroupRegistry;

/// Table compiled into the binary.
const BUNDLED_GROUPS: &str = include_str!("../data/groups.json");

static BUNDLED: OnceLock<Arc<GroupRegistry>> = OnceLock::new();

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupTable {
    #[serde(default)]
    wg: BTreeMap<String, u64>,
    #[serde(default)]
    cg: BTreeMap<String, u64>,
}

impl GroupRegistry {
    /// Process-wide registry parsed once from the bundled table.
    pub fn bundled() -> Arc<GroupRegistry> {
        BUNDLED
            .get_or_init(|| {
                let registry = GroupRegistry::from_json(BUNDLED_GROUPS)
                    .expect("bundled groups.json is valid");
                debug!(groups = registry.len(), "Loaded bundled group registry");
                Arc::new(registry)
            })
            .clone()
    }

    /// Parses a registry from a JSON table.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: GroupTable = serde_json::from_str(json)?;
        GroupRegistry::new(table.wg, table.cg)
    }

    /// Loads a registry from a JSON table on disk.
    #[instrument]
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            GroupError::Config(format!("Cannot read group table {}: {}", path.display(), e))
        })?;
        let registry = Self::from_json(&json)?;

        info!(
            working_groups = registry.category_len(GroupCategory::WorkingGroup),
            community_groups = registry.category_len(GroupCategory::CommunityGroup),
            "Loaded group registry"
        );

        Ok(registry)
    }
}
