//! Named sample groups and their per-dataset collection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Normalize a display name: trim and collapse whitespace runs to `_`.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}

/// A named group of samples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleGroup {
    /// Group name (normalized).
    pub name: String,
    /// Sample identifiers, in construction order.
    pub samples: Vec<String>,
}

impl SampleGroup {
    /// Create a group; the name is normalized.
    pub fn new(name: &str, samples: Vec<String>) -> Self {
        Self {
            name: normalize_name(name),
            samples,
        }
    }

    /// Number of samples in the group.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the group is empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check if the group contains a sample.
    pub fn contains(&self, sample_id: &str) -> bool {
        self.samples.iter().any(|s| s == sample_id)
    }
}

/// A dataset's group collection, keyed by name.
///
/// Insertion order is preserved; re-adding an existing name replaces the
/// group in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSet {
    order: Vec<String>,
    groups: HashMap<String, SampleGroup>,
}

impl GroupSet {
    /// Create an empty group collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a group, replacing any prior group with the same name.
    pub fn add(&mut self, group: SampleGroup) {
        if !self.groups.contains_key(&group.name) {
            self.order.push(group.name.clone());
        }
        self.groups.insert(group.name.clone(), group);
    }

    /// Look up a group by name.
    pub fn get(&self, name: &str) -> Option<&SampleGroup> {
        self.groups.get(name)
    }

    /// Check if a group exists.
    pub fn contains(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Group names in insertion order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if there are no groups.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over groups in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SampleGroup> {
        self.order.iter().map(|name| &self.groups[name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  high   grade tumor "), "high_grade_tumor");
        assert_eq!(normalize_name("control"), "control");
    }

    #[test]
    fn test_group_construction() {
        let group = SampleGroup::new("low risk", vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(group.name, "low_risk");
        assert_eq!(group.len(), 2);
        assert!(group.contains("s1"));
        assert!(!group.contains("s3"));
    }

    #[test]
    fn test_group_set_insertion_order() {
        let mut set = GroupSet::new();
        set.add(SampleGroup::new("b", vec![]));
        set.add(SampleGroup::new("a", vec!["s1".to_string()]));
        assert_eq!(set.names(), &["b", "a"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_group_set_overwrite() {
        let mut set = GroupSet::new();
        set.add(SampleGroup::new("g", vec!["s1".to_string()]));
        set.add(SampleGroup::new("g", vec!["s2".to_string(), "s3".to_string()]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("g").unwrap().samples, vec!["s2", "s3"]);
        assert_eq!(set.names(), &["g"]);
    }

    #[test]
    fn test_group_set_serde_roundtrip() {
        let mut set = GroupSet::new();
        set.add(SampleGroup::new("g1", vec!["s1".to_string()]));
        set.add(SampleGroup::new("g2", vec!["s2".to_string()]));

        let json = serde_json::to_string(&set).unwrap();
        let restored: GroupSet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.names(), set.names());
        assert_eq!(restored.get("g1").unwrap().samples, vec!["s1"]);
    }
}
