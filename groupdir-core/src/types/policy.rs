//! Patent policy classification.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::PATENT_POLICY_2017_MARKER;

/// W3C patent policy a group's active charter operates under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatentPolicy {
    /// The 2017 patent policy.
    #[serde(rename = "PP2017")]
    Pp2017,
    /// The 2020 patent policy.
    #[serde(rename = "PP2020")]
    Pp2020,
}

impl PatentPolicy {
    /// Classifies the patent policy document URL found on a charter.
    ///
    /// Anything that is not a non-empty string is "known absent". Any URL
    /// that does not name the 2017 document is taken to be the 2020 one.
    /// This is a string match on the document URL, not an upstream code.
    pub fn classify_url(value: Option<&serde_json::Value>) -> PolicyStatus {
        match value.and_then(serde_json::Value::as_str) {
            None | Some("") => PolicyStatus::Absent,
            Some(url) if url.contains(PATENT_POLICY_2017_MARKER) => {
                PolicyStatus::Known(PatentPolicy::Pp2017)
            }
            Some(_) => PolicyStatus::Known(PatentPolicy::Pp2020),
        }
    }

    /// Wire name of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatentPolicy::Pp2017 => "PP2017",
            PatentPolicy::Pp2020 => "PP2020",
        }
    }
}

impl fmt::Display for PatentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is known about a group's patent policy.
///
/// On the wire, `Undetermined` omits the field entirely while `Absent` is an
/// explicit `null`. Struct fields of this type need
/// `#[serde(default, skip_serializing_if = "PolicyStatus::is_undetermined")]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PolicyStatus {
    /// No active charter was seen, so nothing was looked up.
    #[default]
    Undetermined,
    /// The active charter names no patent policy document.
    Absent,
    /// The active charter's patent policy.
    Known(PatentPolicy),
}

impl PolicyStatus {
    /// Returns true when the field should be omitted from JSON.
    pub fn is_undetermined(&self) -> bool {
        matches!(self, PolicyStatus::Undetermined)
    }

    /// The classified policy, if any.
    pub fn policy(&self) -> Option<PatentPolicy> {
        match self {
            PolicyStatus::Known(policy) => Some(*policy),
            _ => None,
        }
    }
}

impl Serialize for PolicyStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PolicyStatus::Known(policy) => policy.serialize(serializer),
            PolicyStatus::Undetermined | PolicyStatus::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for PolicyStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only reached when the field is present; a missing field falls back
        // to `Default` (undetermined).
        Ok(match Option::<PatentPolicy>::deserialize(deserializer)? {
            Some(policy) => PolicyStatus::Known(policy),
            None => PolicyStatus::Absent,
        })
    }
}
