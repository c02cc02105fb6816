//! Selection state for bulk messaging.

use std::collections::BTreeSet;

use crate::contact::RecordId;

/// Set of record ids checked for a bulk action.
///
/// The selection knows nothing about which ids exist; the
/// [`Roster`](crate::Roster) keeps it consistent with its records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<RecordId>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`, returning whether it is now selected.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Drop `id` from the selection. Returns `true` if it was selected.
    pub fn remove(&mut self, id: RecordId) -> bool {
        self.ids.remove(&id)
    }

    /// Replace the selection with exactly the given ids.
    pub fn select_only(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        self.ids = ids.into_iter().collect();
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Check whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over the selected ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = RecordId> + '_ {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_membership() {
        let mut selection = Selection::new();
        let id = RecordId::new(1);

        assert!(selection.toggle(id));
        assert!(selection.contains(id));
        assert!(!selection.toggle(id));
        assert!(!selection.contains(id));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_only_replaces() {
        let mut selection = Selection::new();
        selection.toggle(RecordId::new(9));
        selection.select_only([RecordId::new(1), RecordId::new(2)]);

        assert_eq!(selection.len(), 2);
        assert!(!selection.contains(RecordId::new(9)));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut selection = Selection::new();
        selection.select_only([RecordId::new(1), RecordId::new(2)]);

        assert!(selection.remove(RecordId::new(1)));
        assert!(!selection.remove(RecordId::new(1)));
        assert_eq!(selection.len(), 1);

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_iter_is_ordered() {
        let mut selection = Selection::new();
        selection.select_only([RecordId::new(3), RecordId::new(1), RecordId::new(2)]);
        let ids: Vec<u64> = selection.iter().map(RecordId::get).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
