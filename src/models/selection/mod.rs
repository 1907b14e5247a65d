// Selection module
// Set of selected interval ids

use std::collections::BTreeSet;

use crate::models::interval::IntervalId;

/// Selected interval ids. Unordered, no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<IntervalId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = IntervalId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Replace the whole selection.
    pub fn set(&mut self, ids: impl IntoIterator<Item = IntervalId>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn insert(&mut self, id: IntervalId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: &IntervalId) -> bool {
        self.ids.remove(id)
    }

    /// Add the id if absent, remove it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, id: IntervalId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &IntervalId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntervalId> {
        self.ids.iter()
    }

    pub fn to_vec(&self) -> Vec<IntervalId> {
        self.ids.iter().copied().collect()
    }

    /// Drop ids for which `keep` returns false.
    pub fn retain(&mut self, keep: impl FnMut(&IntervalId) -> bool) {
        self.ids.retain(keep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicates() {
        let id = IntervalId::new();
        let selection = Selection::from_ids([id, id, id]);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut selection = Selection::new();
        let id = IntervalId::new();
        assert!(selection.toggle(id));
        assert!(selection.contains(&id));
        assert!(!selection.toggle(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_set_replaces() {
        let a = IntervalId::new();
        let b = IntervalId::new();
        let mut selection = Selection::from_ids([a]);
        selection.set([b]);
        assert!(!selection.contains(&a));
        assert!(selection.contains(&b));
    }
}
