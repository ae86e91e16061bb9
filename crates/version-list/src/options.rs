use serde::{Deserialize, Serialize};

/// Construction options for a [`VersionList`](crate::VersionList).
///
/// Deserializable so an embedding application can keep it in its own
/// configuration; missing fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    /// Number of tree slots to pre-allocate, and to re-allocate after `clr`.
    pub capacity: usize,
}

impl ListOptions {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }
}
