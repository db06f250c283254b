use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockdesk_catalog::{
    Category, CategoryDraft, CategoryFilter, CategorySort, CategorySummary, ensure_bulk_deletable,
};
use stockdesk_core::{CategoryId, DomainResult};
use stockdesk_feedback::{DialogHost, EditOutcome, EditRequest, Notification};

use crate::config::Config;
use crate::read_model::Repository;
use crate::screens::{EntityScreen, Feedback, Outcome, ScreenRecord};

impl ScreenRecord for Category {
    const PLURAL: &'static str = "categories";

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Category grid/table.
pub struct CategoriesScreen<R> {
    list: EntityScreen<Category, CategoryFilter, CategorySort, R>,
    dialog: Arc<dyn DialogHost<CategoryDraft>>,
}

impl<R: Repository<Category>> CategoriesScreen<R> {
    pub fn new(
        store: R,
        feedback: Feedback,
        dialog: Arc<dyn DialogHost<CategoryDraft>>,
        config: &Config,
    ) -> Self {
        Self {
            list: EntityScreen::new(
                store,
                CategoryFilter::default(),
                CategorySort::default(),
                feedback,
                config.page_size,
            ),
            dialog,
        }
    }

    pub fn list(&self) -> &EntityScreen<Category, CategoryFilter, CategorySort, R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityScreen<Category, CategoryFilter, CategorySort, R> {
        &mut self.list
    }

    /// Back to the default filter and sort.
    pub fn clear_filters(&mut self, now: DateTime<Utc>) {
        self.list.set_sort(CategorySort::default(), now);
        self.list.set_filter(CategoryFilter::default(), now);
    }

    pub fn add_category(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let EditOutcome::Saved(draft) = self.dialog.open(EditRequest::Create).wait() else {
            return Ok(Outcome::Cancelled);
        };
        let category = draft.into_category(CategoryId::new(), now).inspect_err(|e| {
            self.list.feedback().notify(Notification::warning(e.to_string()));
        })?;
        let name = category.name.clone();
        self.list.insert(category, now)?;
        tracing::info!(name = %name, "category added");
        self.list.feedback().success(format!("{name} added successfully"));
        Ok(Outcome::Applied(1))
    }

    pub fn edit_category(&mut self, id: &CategoryId, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let current = self.list.get(id)?;
        let request = EditRequest::Edit(CategoryDraft {
            name: current.name.clone(),
            description: current.description.clone(),
            icon: current.icon.clone(),
            color: current.color.clone(),
        });
        let EditOutcome::Saved(draft) = self.dialog.open(request).wait() else {
            return Ok(Outcome::Cancelled);
        };
        let feedback = self.list.feedback().clone();
        let (category, ()) = self
            .list
            .modify(id, now, |c| draft.apply_to(c, now))
            .inspect_err(|e| feedback.notify(Notification::warning(e.to_string())))?;
        feedback.success(format!("{} updated successfully", category.name));
        Ok(Outcome::Applied(1))
    }

    pub fn toggle_status(&mut self, id: &CategoryId, now: DateTime<Utc>) -> DomainResult<bool> {
        let (category, active) = self.list.modify(id, now, |c| Ok(c.toggle_active(now)))?;
        let verb = if active { "activated" } else { "deactivated" };
        self.list
            .feedback()
            .success(format!("{} {verb} successfully", category.name));
        Ok(active)
    }

    /// Appends an empty copy of the category.
    pub fn duplicate(&mut self, id: &CategoryId, now: DateTime<Utc>) -> DomainResult<CategoryId> {
        let original = self.list.get(id)?;
        let copy = original.duplicate(CategoryId::new(), now);
        let copy_id = copy.id;
        self.list.insert(copy, now)?;
        self.list
            .feedback()
            .success(format!("{} duplicated successfully", original.name));
        Ok(copy_id)
    }

    /// Refused with a blocking notification while the category still has items.
    pub fn delete(&mut self, id: &CategoryId, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.list.delete_guarded(id, Category::ensure_deletable, now)
    }

    pub fn bulk_activate(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.bulk_set_active(true, now)
    }

    pub fn bulk_deactivate(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.bulk_set_active(false, now)
    }

    fn bulk_set_active(&mut self, active: bool, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let verb = if active { "activated" } else { "deactivated" };
        self.list.bulk_update(
            now,
            |c| {
                c.set_active(active, now);
                true
            },
            |_| format!("Selected categories {verb}"),
        )
    }

    /// All-or-nothing: one category with items refuses the whole batch.
    pub fn bulk_delete(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.list
            .bulk_delete_guarded(|selected| ensure_bulk_deletable(selected), now)
    }

    pub fn summary(&self) -> CategorySummary {
        CategorySummary::compute(&self.list.store().list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use stockdesk_catalog::CategoryStatus;
    use stockdesk_core::{DomainError, Money};
    use stockdesk_feedback::{InMemoryNotifier, ScriptedConfirm, ScriptedDialog, Tone};
    use stockdesk_query::Facet;

    use crate::read_model::InMemoryRepository;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 9, 0, 0).unwrap()
    }

    fn category(n: u128, name: &str, active: bool, items: u32) -> Category {
        Category {
            id: CategoryId::from_u128(n),
            name: name.to_string(),
            description: String::new(),
            icon: "category".into(),
            color: "#4caf50".into(),
            is_active: active,
            item_count: items,
            total_value: Money::from_cents(i64::from(items) * 100),
            created_at: now() - Duration::days(n as i64),
            last_updated: now() - Duration::days(n as i64),
        }
    }

    fn screen(
        answers: Vec<bool>,
    ) -> (CategoriesScreen<InMemoryRepository<Category>>, Arc<InMemoryNotifier>) {
        let store = InMemoryRepository::with_records([
            category(1, "Electronics", true, 45),
            category(2, "Books", true, 0),
            category(3, "Garden", false, 0),
            category(4, "Toys", true, 12),
        ]);
        let notifier = Arc::new(InMemoryNotifier::new());
        let feedback = Feedback::new(notifier.clone(), Arc::new(ScriptedConfirm::new(answers)));
        let dialog: Arc<ScriptedDialog<CategoryDraft>> = Arc::new(ScriptedDialog::new([]));
        let mut screen = CategoriesScreen::new(store, feedback, dialog, &Config::default());
        screen.list_mut().refresh(now());
        (screen, notifier)
    }

    #[test]
    fn delete_with_items_is_blocked_before_confirmation() {
        let (mut screen, notifier) = screen(vec![]);
        let err = screen.delete(&CategoryId::from_u128(1), now()).unwrap_err();
        assert_eq!(err, DomainError::blocked("Cannot delete Electronics. It contains 45 items."));
        let toast = notifier.last().unwrap();
        assert_eq!(toast.tone, Tone::Blocked);
        assert_eq!(toast.duration_ms, 5_000);
        assert_eq!(screen.list().store().len(), 4);
    }

    #[test]
    fn delete_empty_category_after_confirmation() {
        let (mut screen, notifier) = screen(vec![true]);
        let outcome = screen.delete(&CategoryId::from_u128(2), now()).unwrap();
        assert_eq!(outcome, Outcome::Applied(1));
        assert_eq!(notifier.last().unwrap().message, "Books deleted successfully");
        assert_eq!(screen.list().rows().len(), 3);
    }

    #[test]
    fn bulk_delete_refuses_whole_batch() {
        let (mut screen, notifier) = screen(vec![true]);
        screen.list_mut().toggle(CategoryId::from_u128(2));
        screen.list_mut().toggle(CategoryId::from_u128(4));
        let err = screen.bulk_delete(now()).unwrap_err();
        assert!(matches!(err, DomainError::Blocked(_)));
        assert_eq!(screen.list().store().len(), 4);
        assert_eq!(screen.list().selected().len(), 2);
        assert_eq!(notifier.history().len(), 1);

        screen.list_mut().toggle(CategoryId::from_u128(4));
        screen.list_mut().toggle(CategoryId::from_u128(3));
        assert_eq!(screen.bulk_delete(now()).unwrap(), Outcome::Applied(2));
        assert_eq!(notifier.last().unwrap().message, "2 categories deleted successfully");
    }

    #[test]
    fn bulk_deactivate_clears_selection_and_notifies_once() {
        let (mut screen, notifier) = screen(vec![]);
        screen.list_mut().toggle_all();
        assert_eq!(screen.bulk_deactivate(now()).unwrap(), Outcome::Applied(4));
        assert!(screen.list().selected().is_empty());
        assert_eq!(screen.summary().active, 0);
        assert_eq!(notifier.history().len(), 1);
        assert_eq!(notifier.last().unwrap().message, "Selected categories deactivated");
    }

    #[test]
    fn status_filter_prunes_selection() {
        let (mut screen, _) = screen(vec![]);
        screen.list_mut().toggle(CategoryId::from_u128(1));
        screen.list_mut().toggle(CategoryId::from_u128(3));
        screen.list_mut().set_filter(
            CategoryFilter { status: Facet::is(CategoryStatus::Inactive), ..Default::default() },
            now(),
        );
        assert_eq!(screen.list().selected(), &[CategoryId::from_u128(3)]);
        assert!(screen.list().is_all_selected());
    }

    #[test]
    fn toggle_and_duplicate() {
        let (mut screen, notifier) = screen(vec![]);
        assert!(screen.toggle_status(&CategoryId::from_u128(3), now()).unwrap());
        assert_eq!(notifier.last().unwrap().message, "Garden activated successfully");

        let copy = screen.duplicate(&CategoryId::from_u128(1), now()).unwrap();
        let stored = screen.list().get(&copy).unwrap();
        assert_eq!(stored.name, "Electronics (Copy)");
        assert_eq!(stored.status(), CategoryStatus::Empty);
        assert_eq!(screen.summary().empty, 3);
    }

    #[test]
    fn cancelled_add_dialog_changes_nothing() {
        let (mut screen, notifier) = screen(vec![]);
        assert_eq!(screen.add_category(now()).unwrap(), Outcome::Cancelled);
        assert_eq!(screen.list().store().len(), 4);
        assert!(notifier.history().is_empty());
    }
}
