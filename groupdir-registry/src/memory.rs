//! In-memory group registry.

use std::collections::{BTreeMap, BTreeSet};

use groupdir_core::error::{GroupError, Result};
use groupdir_core::types::{GroupCategory, GroupMeta};

/// Read-only mapping from shortnames to group ids, one map per category.
///
/// # Lookup order
///
/// A shortname listed under several categories resolves to the first
/// category in [`GroupCategory::PRIORITY`] (working groups win).
#[derive(Clone, Debug, Default)]
pub struct GroupRegistry {
    /// Working groups: shortname → id
    working_groups: BTreeMap<String, u64>,
    /// Community groups: shortname → id
    community_groups: BTreeMap<String, u64>,
}

impl GroupRegistry {
    /// Creates a registry from the two category maps.
    ///
    /// Rejects zero ids; upstream ids are always positive.
    pub fn new(
        working_groups: BTreeMap<String, u64>,
        community_groups: BTreeMap<String, u64>,
    ) -> Result<Self> {
        let registry = Self {
            working_groups,
            community_groups,
        };

        for category in GroupCategory::PRIORITY {
            if let Some((name, _)) = registry.map(category).iter().find(|(_, id)| **id == 0) {
                return Err(GroupError::Config(format!(
                    "Group '{}' ({}) has id 0",
                    name, category
                )));
            }
        }

        Ok(registry)
    }

    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolves a shortname to its category and id.
    pub fn resolve(&self, shortname: &str) -> Option<GroupMeta> {
        GroupCategory::PRIORITY.into_iter().find_map(|category| {
            self.map(category)
                .get(shortname)
                .map(|id| GroupMeta::new(shortname, category, *id))
        })
    }

    /// Returns true if the shortname is registered in any category.
    pub fn contains(&self, shortname: &str) -> bool {
        self.resolve(shortname).is_some()
    }

    /// All registered shortnames, each once.
    ///
    /// Working groups come first, then community-group-only names, each
    /// block in lexical order.
    pub fn shortnames(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        GroupCategory::PRIORITY
            .into_iter()
            .flat_map(|category| self.map(category).keys())
            .filter(|name| seen.insert(name.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Resolved identity of every registered shortname, in
    /// [`shortnames`](Self::shortnames) order.
    pub fn entries(&self) -> Vec<GroupMeta> {
        self.shortnames()
            .into_iter()
            .filter_map(|name| self.resolve(name))
            .collect()
    }

    /// Number of distinct shortnames.
    pub fn len(&self) -> usize {
        self.shortnames().len()
    }

    /// Returns true if no group is registered.
    pub fn is_empty(&self) -> bool {
        self.working_groups.is_empty() && self.community_groups.is_empty()
    }

    /// Number of groups registered under `category`.
    pub fn category_len(&self, category: GroupCategory) -> usize {
        self.map(category).len()
    }

    fn map(&self, category: GroupCategory) -> &BTreeMap<String, u64> {
        match category {
            GroupCategory::WorkingGroup => &self.working_groups,
            GroupCategory::CommunityGroup => &self.community_groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, u64)]) -> BTreeMap<String, u64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn test_registry() -> GroupRegistry {
        GroupRegistry::new(
            map(&[("webperf", 109735), ("css", 32061)]),
            map(&[("webperf", 109735), ("wicg", 80485)]),
        )
        .unwrap()
    }

    #[test]
    fn test_working_group_wins() {
        let meta = test_registry().resolve("webperf").unwrap();
        assert_eq!(meta.category, GroupCategory::WorkingGroup);
        assert_eq!(meta.id, 109735);
        assert_eq!(meta.shortname, "webperf");
    }

    #[test]
    fn test_community_group_resolves() {
        let meta = test_registry().resolve("wicg").unwrap();
        assert_eq!(meta, GroupMeta::new("wicg", GroupCategory::CommunityGroup, 80485));
    }

    #[test]
    fn test_unknown_name() {
        let registry = test_registry();
        assert!(registry.resolve("nope").is_none());
        assert!(!registry.contains("nope"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(test_registry().resolve("WebPerf").is_none());
    }

    #[test]
    fn test_shortnames_are_deduplicated() {
        let registry = test_registry();
        assert_eq!(registry.shortnames(), vec!["css", "webperf", "wicg"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.category_len(GroupCategory::CommunityGroup), 2);
    }

    #[test]
    fn test_entries_follow_priority() {
        let entries = test_registry().entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].category, GroupCategory::WorkingGroup);
        assert_eq!(entries[2].category, GroupCategory::CommunityGroup);
    }

    #[test]
    fn test_zero_id_rejected() {
        let err = GroupRegistry::new(map(&[("bad", 0)]), BTreeMap::new()).unwrap_err();
        assert!(matches!(err, GroupError::Config(_)));
    }

    #[test]
    fn test_empty_registry() {
        let registry = GroupRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.shortnames().is_empty());
    }
}
