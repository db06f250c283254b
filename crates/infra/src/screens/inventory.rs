use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockdesk_core::{DomainResult, ItemId};
use stockdesk_feedback::{DialogHost, EditOutcome, EditRequest, Notification};
use stockdesk_inventory::{InventoryItem, ItemDraft, ItemFilter, ItemSort, ItemSummary};
use stockdesk_query::aggregate::distinct_sorted;

use crate::config::Config;
use crate::read_model::Repository;
use crate::screens::{EntityScreen, Feedback, Outcome, ScreenRecord};

impl ScreenRecord for InventoryItem {
    const PLURAL: &'static str = "items";

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Inventory table: items with derived stock status.
pub struct InventoryScreen<R> {
    list: EntityScreen<InventoryItem, ItemFilter, ItemSort, R>,
    dialog: Arc<dyn DialogHost<ItemDraft>>,
}

impl<R: Repository<InventoryItem>> InventoryScreen<R> {
    pub fn new(store: R, feedback: Feedback, dialog: Arc<dyn DialogHost<ItemDraft>>, config: &Config) -> Self {
        Self {
            list: EntityScreen::new(store, ItemFilter::default(), ItemSort::default(), feedback, config.page_size),
            dialog,
        }
    }

    pub fn list(&self) -> &EntityScreen<InventoryItem, ItemFilter, ItemSort, R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityScreen<InventoryItem, ItemFilter, ItemSort, R> {
        &mut self.list
    }

    /// Open the blank item form and store whatever comes back.
    pub fn add_item(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let EditOutcome::Saved(draft) = self.dialog.open(EditRequest::Create).wait() else {
            return Ok(Outcome::Cancelled);
        };
        let item = draft.into_item(ItemId::new(), now).inspect_err(|e| {
            self.list.feedback().notify(Notification::warning(e.to_string()));
        })?;
        let name = item.name.clone();
        tracing::info!(sku = %item.sku, name = %name, "item added");
        self.list.insert(item, now)?;
        self.list.feedback().success(format!("{name} added successfully"));
        Ok(Outcome::Applied(1))
    }

    pub fn edit_item(&mut self, id: &ItemId, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let current = self.list.get(id)?;
        let request = EditRequest::Edit(ItemDraft::from(&current));
        let EditOutcome::Saved(draft) = self.dialog.open(request).wait() else {
            return Ok(Outcome::Cancelled);
        };
        let feedback = self.list.feedback().clone();
        let (item, ()) = self
            .list
            .modify(id, now, |item| draft.apply_to(item, now))
            .inspect_err(|e| feedback.notify(Notification::warning(e.to_string())))?;
        feedback.success(format!("{} updated successfully", item.name));
        Ok(Outcome::Applied(1))
    }

    pub fn delete(&mut self, id: &ItemId, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.list.delete(id, now)
    }

    pub fn bulk_delete(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.list.bulk_delete(now)
    }

    /// Header figures over the whole store, ignoring the filter.
    pub fn summary(&self) -> ItemSummary {
        ItemSummary::compute(&self.list.store().list())
    }

    /// Options for the category facet.
    pub fn categories(&self) -> Vec<String> {
        distinct_sorted(&self.list.store().list(), |i| i.category.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockdesk_core::Money;
    use stockdesk_feedback::{InMemoryNotifier, ScriptedConfirm, ScriptedDialog, Tone};
    use stockdesk_inventory::StockStatus;
    use stockdesk_query::Facet;

    use crate::read_model::InMemoryRepository;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 9, 0, 0).unwrap()
    }

    fn item(n: u128, name: &str, stock: i64, min: i64) -> InventoryItem {
        InventoryItem {
            id: ItemId::from_u128(n),
            sku: format!("SKU-{n:03}"),
            name: name.to_string(),
            description: String::new(),
            category: if n % 2 == 0 { "Clothing" } else { "Electronics" }.to_string(),
            stock,
            min_stock: min,
            price: Money::from_cents(1000),
            image_url: None,
            last_updated: now(),
        }
    }

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            name: name.into(),
            description: "Non-slip".into(),
            category: "Sports".into(),
            price: Money::from_cents(3499),
            stock: 25,
            min_stock: 12,
            image_url: None,
        }
    }

    struct Fixture {
        screen: InventoryScreen<Arc<InMemoryRepository<InventoryItem>>>,
        notifier: Arc<InMemoryNotifier>,
    }

    fn fixture(answers: Vec<bool>, outcomes: Vec<EditOutcome<ItemDraft>>) -> Fixture {
        let store = Arc::new(InMemoryRepository::with_records([
            item(1, "Wireless Headphones", 45, 10),
            item(2, "Cotton T-Shirts", 8, 15),
            item(3, "Laptop Chargers", 0, 5),
        ]));
        let notifier = Arc::new(InMemoryNotifier::new());
        let feedback = Feedback::new(notifier.clone(), Arc::new(ScriptedConfirm::new(answers)));
        let mut screen = InventoryScreen::new(
            store,
            feedback,
            Arc::new(ScriptedDialog::new(outcomes)),
            &Config::default(),
        );
        screen.list_mut().refresh(now());
        Fixture { screen, notifier }
    }

    #[test]
    fn add_item_stores_validated_draft() {
        let mut f = fixture(vec![], vec![EditOutcome::Saved(draft("Yoga Mat"))]);
        assert_eq!(f.screen.add_item(now()).unwrap(), Outcome::Applied(1));
        let rows = f.screen.list().rows();
        assert_eq!(rows.len(), 4);
        assert!(rows[3].sku.starts_with("YOS-"));
        assert_eq!(f.notifier.last().unwrap().message, "Yoga Mat added successfully");
    }

    #[test]
    fn add_item_cancel_and_invalid_leave_store_alone() {
        let mut f = fixture(vec![], vec![EditOutcome::Cancelled, EditOutcome::Saved(draft("Ab"))]);
        assert_eq!(f.screen.add_item(now()).unwrap(), Outcome::Cancelled);
        assert!(f.screen.add_item(now()).is_err());
        assert_eq!(f.screen.list().store().len(), 3);
        assert_eq!(f.notifier.last().unwrap().tone, Tone::Warning);
    }

    #[test]
    fn edit_item_applies_form() {
        let mut edited = draft("Cotton Tees");
        edited.stock = 50;
        let mut f = fixture(vec![], vec![EditOutcome::Saved(edited)]);
        f.screen.edit_item(&ItemId::from_u128(2), now()).unwrap();
        let stored = f.screen.list().get(&ItemId::from_u128(2)).unwrap();
        assert_eq!(stored.name, "Cotton Tees");
        assert_eq!(stored.sku, "SKU-002");
        assert_eq!(stored.status(), StockStatus::InStock);
    }

    #[test]
    fn status_facet_then_bulk_delete_visible_rows() {
        let mut f = fixture(vec![true], vec![]);
        f.screen.list_mut().set_filter(
            ItemFilter { status: Facet::is(StockStatus::LowStock), ..Default::default() },
            now(),
        );
        f.screen.list_mut().toggle_all();
        assert!(f.screen.list().is_all_selected());
        assert_eq!(f.screen.bulk_delete(now()).unwrap(), Outcome::Applied(1));
        assert_eq!(f.screen.list().store().len(), 2);
        assert!(f.screen.list().selected().is_empty());
        assert_eq!(f.notifier.history().len(), 1);
        assert_eq!(f.notifier.last().unwrap().message, "1 items deleted successfully");
    }

    #[test]
    fn declined_delete_keeps_item() {
        let mut f = fixture(vec![false], vec![]);
        assert_eq!(f.screen.delete(&ItemId::from_u128(1), now()).unwrap(), Outcome::Declined);
        assert_eq!(f.screen.list().store().len(), 3);
        assert!(f.notifier.history().is_empty());
    }

    #[test]
    fn summary_ignores_filter() {
        let mut f = fixture(vec![], vec![]);
        f.screen.list_mut().update_filter(|flt| flt.search = "zzz".into(), now());
        assert!(f.screen.list().rows().is_empty());
        let summary = f.screen.summary();
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.low_stock, 1);
        assert_eq!(summary.out_of_stock, 1);
        assert_eq!(f.screen.categories(), vec!["Clothing", "Electronics"]);
    }
}
