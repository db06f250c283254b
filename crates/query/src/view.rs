//! List-view controller: filter + sort + selection over one entity store.

use std::collections::HashMap;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use stockdesk_core::Entity;

use crate::filter::{RecordFilter, run_query};
use crate::pagination::Pagination;
use crate::selection::Selection;
use crate::sort::SortKey;

/// Visible-row state for one entity screen.
///
/// The view never owns records. Callers pass the current store contents to
/// [`ListView::refresh`] after every mutation; the view recomputes the visible
/// ids and prunes the selection down to them.
#[derive(Debug, Clone)]
pub struct ListView<T: Entity, F, S> {
    filter: F,
    sort: S,
    visible: Vec<T::Id>,
    selection: Selection<T::Id>,
    _records: PhantomData<fn() -> T>,
}

impl<T, F, S> ListView<T, F, S>
where
    T: Entity,
    F: RecordFilter<T>,
    S: SortKey<T>,
{
    pub fn new(filter: F, sort: S) -> Self {
        Self {
            filter,
            sort,
            visible: Vec::new(),
            selection: Selection::new(),
            _records: PhantomData,
        }
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn sort(&self) -> &S {
        &self.sort
    }

    /// Replace the filter. Takes effect on the next refresh.
    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
    }

    /// Edit the filter in place. Takes effect on the next refresh.
    pub fn update_filter(&mut self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.filter);
    }

    /// Replace the sort key. Takes effect on the next refresh.
    pub fn set_sort(&mut self, sort: S) {
        self.sort = sort;
    }

    /// Re-run the filter/sort pass over `records`.
    pub fn refresh(&mut self, records: &[T], now: DateTime<Utc>) -> &[T::Id] {
        self.visible = run_query(records, &self.filter, &self.sort, now)
            .into_iter()
            .map(|r| *r.id())
            .collect();
        self.selection.retain_visible(&self.visible);
        tracing::debug!(
            total = records.len(),
            visible = self.visible.len(),
            selected = self.selection.len(),
            "list view refreshed"
        );
        &self.visible
    }

    pub fn visible(&self) -> &[T::Id] {
        &self.visible
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_visible(&self, id: &T::Id) -> bool {
        self.visible.contains(id)
    }

    /// Resolve the visible ids against `records`, in visible order.
    ///
    /// Ids that no longer exist in `records` are skipped.
    pub fn rows<'a>(&self, records: &'a [T]) -> Vec<&'a T> {
        let by_id: HashMap<T::Id, &'a T> = records.iter().map(|r| (*r.id(), r)).collect();
        self.visible.iter().filter_map(|id| by_id.get(id).copied()).collect()
    }

    pub fn page<'a>(&self, records: &'a [T], pagination: Pagination) -> Vec<&'a T> {
        let rows = self.rows(records);
        pagination.slice(&rows).to_vec()
    }

    pub fn selection(&self) -> &Selection<T::Id> {
        &self.selection
    }

    /// Toggle a visible row. Hidden rows cannot be selected; returns whether
    /// the row is selected afterwards.
    pub fn toggle(&mut self, id: T::Id) -> bool {
        if !self.is_visible(&id) {
            tracing::debug!(?id, "ignoring selection toggle for hidden row");
            return false;
        }
        self.selection.toggle(id)
    }

    pub fn deselect(&mut self, id: &T::Id) {
        self.selection.deselect(id);
    }

    pub fn is_all_selected(&self) -> bool {
        self.selection.is_all_selected(&self.visible)
    }

    /// "Select all" over the visible rows, or clear when all are selected.
    pub fn toggle_all(&mut self) {
        self.selection.toggle_all(&self.visible);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids for a bulk operation; the selection is left empty.
    pub fn take_selection(&mut self) -> Vec<T::Id> {
        self.selection.take()
    }
}
