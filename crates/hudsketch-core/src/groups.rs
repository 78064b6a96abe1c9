//! Named, possibly overlapping sets of shape indices.
//!
//! Groups are independent of the selection and never own shapes. Like the
//! selection they refer to shapes by index, so every store removal must be
//! followed by [`GroupRegistry::reconcile_deletion`].

use crate::selection::shift_indices_after_removal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Display color of a new group, as an RGB triple.
pub const DEFAULT_GROUP_COLOR: [u8; 3] = [100, 150, 255];

/// A named set of shape indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeGroup {
    pub name: String,
    pub indices: BTreeSet<usize>,
    /// Color used by hosts to highlight the members.
    pub color: [u8; 3],
}

impl ShapeGroup {
    pub fn new(name: impl Into<String>, indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: name.into(),
            indices: indices.into_iter().collect(),
            color: DEFAULT_GROUP_COLOR,
        }
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// All groups of a document, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupRegistry {
    groups: Vec<ShapeGroup>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from decoded groups.
    ///
    /// A name already used by an earlier group gets a `_N` suffix, as in
    /// [`Self::create`].
    pub fn from_groups(groups: Vec<ShapeGroup>) -> Self {
        let mut registry = Self::new();
        for mut group in groups {
            let name = registry.unique_name(&group.name);
            if name != group.name {
                log::warn!("duplicate group name {:?} loaded as {name:?}", group.name);
                group.name = name;
            }
            registry.groups.push(group);
        }
        registry
    }

    /// Create a group and return its final name.
    ///
    /// A taken name gets the first free `_1`, `_2`, ... suffix.
    pub fn create(&mut self, name: &str, indices: impl IntoIterator<Item = usize>) -> String {
        let final_name = self.unique_name(name);
        if final_name != name {
            log::debug!("group name {name:?} taken, using {final_name:?}");
        }
        self.groups.push(ShapeGroup::new(final_name.clone(), indices));
        final_name
    }

    fn unique_name(&self, name: &str) -> String {
        if self.get(name).is_none() {
            return name.to_string();
        }
        (1..)
            .map(|i| format!("{name}_{i}"))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    /// Rename a group. Fails if `old` is missing or `new` is already taken.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if self.get(new).is_some() {
            return false;
        }
        match self.get_mut(old) {
            Some(group) => {
                group.name = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Remove a group. Its member shapes are unaffected.
    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.name != name);
        self.groups.len() != before
    }

    pub fn get(&self, name: &str) -> Option<&ShapeGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ShapeGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// Add shapes to an existing group.
    pub fn add_to_group(&mut self, name: &str, indices: impl IntoIterator<Item = usize>) -> bool {
        match self.get_mut(name) {
            Some(group) => {
                group.indices.extend(indices);
                true
            }
            None => false,
        }
    }

    /// Remove shapes from an existing group.
    pub fn remove_from_group(&mut self, name: &str, indices: impl IntoIterator<Item = usize>) -> bool {
        match self.get_mut(name) {
            Some(group) => {
                for idx in indices {
                    group.indices.remove(&idx);
                }
                true
            }
            None => false,
        }
    }

    /// Groups containing the shape at `index`.
    pub fn groups_for_shape(&self, index: usize) -> impl Iterator<Item = &ShapeGroup> {
        self.groups.iter().filter(move |g| g.contains(index))
    }

    pub fn names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Drop `deleted` from every group and shift higher members down by one.
    pub fn reconcile_deletion(&mut self, deleted: usize) {
        for group in &mut self.groups {
            group.indices = shift_indices_after_removal(&group.indices, deleted);
        }
    }

    /// Indices in `[0, total)` that belong to no group.
    pub fn ungrouped(&self, total: usize) -> BTreeSet<usize> {
        (0..total)
            .filter(|idx| !self.groups.iter().any(|g| g.contains(*idx)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_suffixes_duplicates() {
        let mut groups = GroupRegistry::new();
        assert_eq!(groups.create("hud", [0]), "hud");
        assert_eq!(groups.create("hud", [1]), "hud_1");
        assert_eq!(groups.create("hud", [2]), "hud_2");
        assert_eq!(groups.names(), vec!["hud", "hud_1", "hud_2"]);
        assert_eq!(groups.get("hud").unwrap().color, DEFAULT_GROUP_COLOR);
    }

    #[test]
    fn test_from_groups_makes_names_unique() {
        let mut groups = GroupRegistry::from_groups(vec![
            ShapeGroup::new("hud", [0]),
            ShapeGroup::new("hud", [1]).with_color([1, 2, 3]),
            ShapeGroup::new("hud_1", [2]),
        ]);
        assert_eq!(groups.names(), vec!["hud", "hud_1", "hud_1_1"]);
        assert_eq!(groups.get("hud_1").unwrap().color, [1, 2, 3]);
        assert!(groups.get("hud_1").unwrap().contains(1));

        assert!(groups.rename("hud", "left"));
        assert_eq!(groups.names(), vec!["left", "hud_1", "hud_1_1"]);
        assert!(groups.delete("hud_1"));
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_rename() {
        let mut groups = GroupRegistry::new();
        groups.create("a", []);
        groups.create("b", []);
        assert!(!groups.rename("a", "b"));
        assert!(!groups.rename("missing", "c"));
        assert!(groups.rename("a", "c"));
        assert!(groups.get("a").is_none());
        assert!(groups.get("c").is_some());
    }

    #[test]
    fn test_delete_keeps_others() {
        let mut groups = GroupRegistry::new();
        groups.create("a", [1]);
        groups.create("b", [1]);
        assert!(groups.delete("a"));
        assert!(!groups.delete("a"));
        assert_eq!(groups.len(), 1);
        assert!(groups.get("b").unwrap().contains(1));
    }

    #[test]
    fn test_reconcile_deletion() {
        let mut groups = GroupRegistry::new();
        groups.create("a", [0, 2, 4]);
        groups.create("b", [2, 3]);
        groups.reconcile_deletion(2);
        assert_eq!(groups.get("a").unwrap().indices, BTreeSet::from([0, 3]));
        assert_eq!(groups.get("b").unwrap().indices, BTreeSet::from([2]));
    }

    #[test]
    fn test_ungrouped_and_membership() {
        let mut groups = GroupRegistry::new();
        groups.create("a", [0, 2]);
        groups.create("b", [2]);
        assert_eq!(groups.ungrouped(4), BTreeSet::from([1, 3]));
        assert_eq!(groups.groups_for_shape(2).count(), 2);
        assert!(groups.add_to_group("b", [3]));
        assert!(groups.remove_from_group("a", [0]));
        assert_eq!(groups.ungrouped(4), BTreeSet::from([0, 1]));
        assert!(!groups.add_to_group("missing", [1]));
    }
}
