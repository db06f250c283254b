//! Selection set for bulk actions.

use serde::{Deserialize, Serialize};

/// Set of checked record identifiers, kept in the order they were checked.
///
/// The set itself is scope-agnostic; [`crate::ListView`] keeps it a subset of
/// the visible rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection<Id> {
    selected: Vec<Id>,
}

impl<Id> Default for Selection<Id> {
    fn default() -> Self {
        Self { selected: Vec::new() }
    }
}

impl<Id: Copy + PartialEq> Selection<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> &[Id] {
        &self.selected
    }

    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    pub fn select(&mut self, id: Id) {
        if !self.is_selected(&id) {
            self.selected.push(id);
        }
    }

    pub fn deselect(&mut self, id: &Id) {
        self.selected.retain(|s| s != id);
    }

    /// Flip one record; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.is_selected(&id) {
            self.deselect(&id);
            false
        } else {
            self.selected.push(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Select every id in `visible` (already selected ids stay put).
    pub fn select_all(&mut self, visible: &[Id]) {
        for id in visible {
            self.select(*id);
        }
    }

    /// True iff the selection covers the visible rows exactly and there is at
    /// least one visible row.
    pub fn is_all_selected(&self, visible: &[Id]) -> bool {
        !visible.is_empty() && self.selected.len() == visible.len()
    }

    /// Clear when everything is selected, otherwise select every visible row.
    pub fn toggle_all(&mut self, visible: &[Id]) {
        if self.is_all_selected(visible) {
            self.clear();
        } else {
            self.select_all(visible);
        }
    }

    /// Drop ids that are no longer visible.
    pub fn retain_visible(&mut self, visible: &[Id]) {
        self.selected.retain(|id| visible.contains(id));
    }

    /// Hand the selected ids to a bulk operation and leave the set empty.
    pub fn take(&mut self) -> Vec<Id> {
        std::mem::take(&mut self.selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut sel = Selection::new();
        assert!(sel.toggle(1));
        assert!(sel.is_selected(&1));
        assert!(!sel.toggle(1));
        assert!(sel.is_empty());
    }

    #[test]
    fn all_selected_needs_non_empty_view() {
        let sel: Selection<u32> = Selection::new();
        assert!(!sel.is_all_selected(&[]));
    }

    #[test]
    fn toggle_all_selects_then_clears() {
        let visible = [1, 2, 3];
        let mut sel = Selection::new();
        sel.toggle(2);
        sel.toggle_all(&visible);
        assert!(sel.is_all_selected(&visible));
        assert_eq!(sel.ids(), &[2, 1, 3]);
        sel.toggle_all(&visible);
        assert!(sel.is_empty());
    }

    #[test]
    fn take_empties_the_set() {
        let mut sel = Selection::new();
        sel.select_all(&[7, 8]);
        assert_eq!(sel.take(), vec![7, 8]);
        assert!(sel.is_empty());
    }

    #[test]
    fn retain_visible_prunes_hidden_rows() {
        let mut sel = Selection::new();
        sel.select_all(&[1, 2, 3]);
        sel.retain_visible(&[3, 1]);
        assert_eq!(sel.ids(), &[1, 3]);
    }
}
