//! Screen controllers.
//!
//! One controller per entity screen. Each owns its entity store, a
//! [`ListView`] over it, and the feedback collaborators it reports through.
//! Every mutation ends with a refresh so the visible rows and the selection
//! never lag behind the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockdesk_core::{DomainError, DomainResult, Entity};
use stockdesk_feedback::{Confirm, Notification, Notifier};
use stockdesk_query::{ListView, Pagination, RecordFilter, SortKey};

use crate::read_model::Repository;

pub mod alerts;
pub mod categories;
pub mod inventory;
pub mod movements;
pub mod orders;
pub mod suppliers;

pub use alerts::AlertsScreen;
pub use categories::CategoriesScreen;
pub use inventory::InventoryScreen;
pub use movements::MovementsScreen;
pub use orders::OrdersScreen;
pub use suppliers::SuppliersScreen;

/// Result of a user-triggered action that passed its guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action ran and touched this many records.
    Applied(usize),
    /// The confirmation prompt was answered no.
    Declined,
    /// The edit form was closed without saving.
    Cancelled,
}

/// Toast and confirmation collaborators shared by all screens.
#[derive(Clone)]
pub struct Feedback {
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn Confirm>,
}

impl core::fmt::Debug for Feedback {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Feedback").finish_non_exhaustive()
    }
}

impl Feedback {
    pub fn new(notifier: Arc<dyn Notifier>, confirm: Arc<dyn Confirm>) -> Self {
        Self { notifier, confirm }
    }

    pub fn notify(&self, notification: Notification) {
        self.notifier.notify(notification);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(Notification::info(message));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notification::success(message));
    }

    pub fn confirm(&self, prompt: &str) -> bool {
        self.confirm.confirm(prompt)
    }

    /// Surface a guard refusal and hand the error back to the caller.
    pub fn refuse(&self, err: DomainError) -> DomainError {
        tracing::warn!(reason = %err, "action blocked");
        self.notify(Notification::blocked(err.to_string()));
        err
    }
}

/// Record kinds a screen can show in prompts and notifications.
pub trait ScreenRecord: Entity + Clone + Send + Sync + 'static {
    /// Plural noun used in bulk messages, e.g. `"categories"`.
    const PLURAL: &'static str;

    fn display_name(&self) -> &str;
}

/// Store + list view + paging: the part every entity screen shares.
#[derive(Debug)]
pub struct EntityScreen<T: Entity, F, S, R> {
    store: R,
    view: ListView<T, F, S>,
    pagination: Pagination,
    feedback: Feedback,
}

impl<T, F, S, R> EntityScreen<T, F, S, R>
where
    T: ScreenRecord,
    F: RecordFilter<T>,
    S: SortKey<T>,
    R: Repository<T>,
{
    pub fn new(store: R, filter: F, sort: S, feedback: Feedback, page_size: usize) -> Self {
        Self {
            store,
            view: ListView::new(filter, sort),
            pagination: Pagination::new(0, page_size),
            feedback,
        }
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn view(&self) -> &ListView<T, F, S> {
        &self.view
    }

    /// Re-run filter and sort against the store. Returns the visible row count.
    pub fn refresh(&mut self, now: DateTime<Utc>) -> usize {
        let records = self.store.list();
        self.view.refresh(&records, now).len()
    }

    /// Visible rows, filtered and sorted.
    pub fn rows(&self) -> Vec<T> {
        let records = self.store.list();
        self.view.rows(&records).into_iter().cloned().collect()
    }

    /// Visible rows on the current page.
    pub fn page(&self) -> Vec<T> {
        let records = self.store.list();
        self.view.page(&records, self.pagination).into_iter().cloned().collect()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.view.visible_len())
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.page = page;
    }

    pub fn filter(&self) -> &F {
        self.view.filter()
    }

    /// Replace the filter and refresh; paging restarts at the first page.
    pub fn set_filter(&mut self, filter: F, now: DateTime<Utc>) -> usize {
        self.view.set_filter(filter);
        self.pagination.page = 0;
        self.refresh(now)
    }

    pub fn update_filter(&mut self, edit: impl FnOnce(&mut F), now: DateTime<Utc>) -> usize {
        self.view.update_filter(edit);
        self.pagination.page = 0;
        self.refresh(now)
    }

    pub fn set_sort(&mut self, sort: S, now: DateTime<Utc>) -> usize {
        self.view.set_sort(sort);
        self.refresh(now)
    }

    pub fn toggle(&mut self, id: T::Id) -> bool {
        self.view.toggle(id)
    }

    pub fn toggle_all(&mut self) {
        self.view.toggle_all();
    }

    pub fn is_all_selected(&self) -> bool {
        self.view.is_all_selected()
    }

    pub fn selected(&self) -> &[T::Id] {
        self.view.selection().ids()
    }

    pub fn clear_selection(&mut self) {
        self.view.clear_selection();
    }

    /// Records currently selected, in selection order.
    pub fn selected_records(&self) -> Vec<T> {
        self.selected().iter().filter_map(|id| self.store.get(id)).collect()
    }

    /// Selected ids for a bulk action; the selection is left empty.
    pub fn take_selection(&mut self) -> Vec<T::Id> {
        self.view.take_selection()
    }

    pub fn get(&self, id: &T::Id) -> DomainResult<T> {
        self.store.get(id).ok_or_else(DomainError::not_found)
    }

    pub fn insert(&mut self, record: T, now: DateTime<Utc>) -> DomainResult<()> {
        self.store.insert(record)?;
        self.refresh(now);
        Ok(())
    }

    pub fn prepend(&mut self, record: T, now: DateTime<Utc>) -> DomainResult<()> {
        self.store.prepend(record)?;
        self.refresh(now);
        Ok(())
    }

    /// Load, mutate and store one record, then refresh.
    pub fn modify<V>(
        &mut self,
        id: &T::Id,
        now: DateTime<Utc>,
        edit: impl FnOnce(&mut T) -> DomainResult<V>,
    ) -> DomainResult<(T, V)> {
        let mut record = self.get(id)?;
        let value = edit(&mut record)?;
        self.store.update(record.clone())?;
        self.refresh(now);
        Ok((record, value))
    }

    /// Single delete: guard, confirm, remove.
    pub fn delete_guarded(
        &mut self,
        id: &T::Id,
        guard: impl FnOnce(&T) -> DomainResult<()>,
        now: DateTime<Utc>,
    ) -> DomainResult<Outcome> {
        let record = self.get(id)?;
        guard(&record).map_err(|e| self.feedback.refuse(e))?;

        let name = record.display_name();
        if !self.feedback.confirm(&format!("Are you sure you want to delete \"{name}\"?")) {
            return Ok(Outcome::Declined);
        }
        self.store.remove(id)?;
        self.view.deselect(id);
        self.refresh(now);
        tracing::info!(id = ?id, name, "record deleted");
        self.feedback.success(format!("{name} deleted successfully"));
        Ok(Outcome::Applied(1))
    }

    pub fn delete(&mut self, id: &T::Id, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.delete_guarded(id, |_| Ok(()), now)
    }

    /// Bulk delete over the selection: guard the whole batch, confirm once,
    /// remove, then send one summary notification.
    ///
    /// A refused or declined batch leaves the selection untouched.
    pub fn bulk_delete_guarded(
        &mut self,
        guard: impl FnOnce(&[T]) -> DomainResult<()>,
        now: DateTime<Utc>,
    ) -> DomainResult<Outcome> {
        let selected = self.selected_records();
        if selected.is_empty() {
            return Ok(Outcome::Applied(0));
        }
        guard(&selected).map_err(|e| self.feedback.refuse(e))?;

        let prompt = format!("Are you sure you want to delete {} {}?", selected.len(), T::PLURAL);
        if !self.feedback.confirm(&prompt) {
            return Ok(Outcome::Declined);
        }
        let ids = self.view.take_selection();
        let removed = self.store.remove_many(&ids)?;
        self.refresh(now);
        tracing::info!(count = removed.len(), kind = T::PLURAL, "bulk delete");
        self.feedback
            .success(format!("{} {} deleted successfully", removed.len(), T::PLURAL));
        Ok(Outcome::Applied(removed.len()))
    }

    pub fn bulk_delete(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.bulk_delete_guarded(|_| Ok(()), now)
    }

    /// Apply `edit` to every selected record, clear the selection, refresh and
    /// send one summary built from the number of records `edit` changed.
    pub fn bulk_update(
        &mut self,
        now: DateTime<Utc>,
        mut edit: impl FnMut(&mut T) -> bool,
        summary: impl FnOnce(usize) -> String,
    ) -> DomainResult<Outcome> {
        let ids = self.view.take_selection();
        let mut changed = 0;
        for id in &ids {
            let Some(mut record) = self.store.get(id) else {
                continue;
            };
            if edit(&mut record) {
                self.store.update(record)?;
                changed += 1;
            }
        }
        self.refresh(now);
        tracing::info!(selected = ids.len(), changed, kind = T::PLURAL, "bulk update");
        self.feedback.success(summary(changed));
        Ok(Outcome::Applied(changed))
    }
}
