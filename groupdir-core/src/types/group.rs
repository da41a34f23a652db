//! Group identity and metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GroupError;
use crate::types::PolicyStatus;

/// Category of a W3C group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupCategory {
    /// Working group.
    #[serde(rename = "wg")]
    WorkingGroup,
    /// Community group.
    #[serde(rename = "cg")]
    CommunityGroup,
}

impl GroupCategory {
    /// Registry lookup order: a name present in several categories resolves
    /// to the first one listed here.
    pub const PRIORITY: [GroupCategory; 2] =
        [GroupCategory::WorkingGroup, GroupCategory::CommunityGroup];

    /// Short wire name (`wg` / `cg`).
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupCategory::WorkingGroup => "wg",
            GroupCategory::CommunityGroup => "cg",
        }
    }
}

impl fmt::Display for GroupCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupCategory {
    type Err = GroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wg" => Ok(GroupCategory::WorkingGroup),
            "cg" => Ok(GroupCategory::CommunityGroup),
            other => Err(GroupError::Config(format!("Unknown group category: {}", other))),
        }
    }
}

/// Registry-derived identity of a group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMeta {
    /// Short name used as the external key
    pub shortname: String,
    /// Group category
    #[serde(rename = "type")]
    pub category: GroupCategory,
    /// Upstream numeric id
    pub id: u64,
}

impl GroupMeta {
    /// Creates a new identity.
    pub fn new(shortname: impl Into<String>, category: GroupCategory, id: u64) -> Self {
        Self {
            shortname: shortname.into(),
            category,
            id,
        }
    }
}

/// A resolved group.
///
/// The identity (`shortname`, `category`, `id`) is fixed at construction and
/// only readable afterwards. A refresh replaces the whole record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    #[serde(flatten)]
    meta: GroupMeta,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Group homepage
    #[serde(rename = "URI", default, skip_serializing_if = "Option::is_none")]
    pub homepage_uri: Option<String>,
    /// Patent policy status page
    #[serde(rename = "patentURI", default, skip_serializing_if = "Option::is_none")]
    pub patent_statement_uri: Option<String>,
    /// Patent policy of the active charter
    #[serde(
        rename = "patentPolicy",
        default,
        skip_serializing_if = "PolicyStatus::is_undetermined"
    )]
    pub patent_policy: PolicyStatus,
    /// Set when the charter could not be read, so the policy may be wrong.
    #[serde(skip)]
    policy_unresolved: bool,
}

impl GroupRecord {
    /// Creates a record with identity only; everything else absent.
    pub fn partial(shortname: impl Into<String>, category: GroupCategory, id: u64) -> Self {
        Self::from_meta(GroupMeta::new(shortname, category, id))
    }

    /// Creates a record with identity only from a registry entry.
    pub fn from_meta(meta: GroupMeta) -> Self {
        Self {
            meta,
            name: None,
            homepage_uri: None,
            patent_statement_uri: None,
            patent_policy: PolicyStatus::Undetermined,
            policy_unresolved: false,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the patent policy as undetermined because its lookup failed.
    pub fn with_unresolved_policy(mut self) -> Self {
        self.patent_policy = PolicyStatus::Undetermined;
        self.policy_unresolved = true;
        self
    }

    /// Returns true if the patent policy lookup failed.
    ///
    /// Not part of the wire format.
    pub fn policy_unresolved(&self) -> bool {
        self.policy_unresolved
    }

    /// Short name used as the external key.
    pub fn shortname(&self) -> &str {
        &self.meta.shortname
    }

    /// Group category.
    pub fn category(&self) -> GroupCategory {
        self.meta.category
    }

    /// Upstream numeric id.
    pub fn id(&self) -> u64 {
        self.meta.id
    }

    /// Registry identity of this record.
    pub fn meta(&self) -> &GroupMeta {
        &self.meta
    }

    /// Returns true if only the registry identity is known.
    pub fn is_partial(&self) -> bool {
        self.name.is_none()
            && self.homepage_uri.is_none()
            && self.patent_statement_uri.is_none()
            && self.patent_policy.is_undetermined()
    }
}

impl From<GroupMeta> for GroupRecord {
    fn from(meta: GroupMeta) -> Self {
        Self::from_meta(meta)
    }
}
