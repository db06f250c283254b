use chrono::{DateTime, Utc};

use stockdesk_core::{DomainResult, ItemId};
use stockdesk_inventory::{AlertFilter, AlertSummary, LowStockItem, SeverityThresholds};
use stockdesk_query::NoSort;
use stockdesk_query::aggregate::distinct_sorted;

use crate::config::Config;
use crate::read_model::Repository;
use crate::screens::{EntityScreen, Feedback, Outcome, ScreenRecord};

impl ScreenRecord for LowStockItem {
    const PLURAL: &'static str = "items";

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// Low-stock alert board. Severity is recomputed from the configured
/// thresholds on every refresh.
pub struct AlertsScreen<R> {
    list: EntityScreen<LowStockItem, AlertFilter, NoSort, R>,
}

impl<R: Repository<LowStockItem>> AlertsScreen<R> {
    pub fn new(store: R, feedback: Feedback, config: &Config) -> Self {
        let filter = AlertFilter { thresholds: config.thresholds, ..AlertFilter::default() };
        Self {
            list: EntityScreen::new(store, filter, NoSort, feedback, config.page_size),
        }
    }

    pub fn list(&self) -> &EntityScreen<LowStockItem, AlertFilter, NoSort, R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityScreen<LowStockItem, AlertFilter, NoSort, R> {
        &mut self.list
    }

    pub fn thresholds(&self) -> SeverityThresholds {
        self.list.filter().thresholds
    }

    /// Clears search and facets; the thresholds stay.
    pub fn clear_filters(&mut self, now: DateTime<Utc>) {
        let thresholds = self.thresholds();
        self.list.set_filter(AlertFilter { thresholds, ..AlertFilter::default() }, now);
    }

    pub fn create_order(&self, id: &ItemId) -> DomainResult<()> {
        let item = self.list.get(id)?;
        self.list.feedback().info(format!("Creating order for {}...", item.name));
        Ok(())
    }

    pub fn bulk_create_orders(&mut self) -> Outcome {
        let ids = self.list.take_selection();
        if ids.is_empty() {
            return Outcome::Applied(0);
        }
        tracing::info!(count = ids.len(), "bulk reorder requested");
        self.list
            .feedback()
            .info(format!("Creating orders for {} selected items...", ids.len()));
        Outcome::Applied(ids.len())
    }

    pub fn bulk_update_thresholds(&mut self) -> Outcome {
        let ids = self.list.take_selection();
        if ids.is_empty() {
            return Outcome::Applied(0);
        }
        tracing::info!(count = ids.len(), "bulk threshold update requested");
        self.list
            .feedback()
            .info(format!("Updating thresholds for {} selected items...", ids.len()));
        Outcome::Applied(ids.len())
    }

    pub fn summary(&self) -> AlertSummary {
        AlertSummary::compute(&self.list.store().list(), self.thresholds())
    }

    pub fn categories(&self) -> Vec<String> {
        distinct_sorted(&self.list.store().list(), |i| i.category.clone())
    }

    pub fn locations(&self) -> Vec<String> {
        distinct_sorted(&self.list.store().list(), |i| i.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::TimeZone;
    use stockdesk_core::Money;
    use stockdesk_feedback::{InMemoryNotifier, ScriptedConfirm, Tone};
    use stockdesk_inventory::AlertSeverity;
    use stockdesk_query::Facet;

    use crate::read_model::InMemoryRepository;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 9, 0, 0).unwrap()
    }

    fn row(n: u128, category: &str, location: &str, current: i64) -> LowStockItem {
        LowStockItem {
            id: ItemId::from_u128(n),
            name: format!("Part {n}"),
            sku: format!("PRT-{n:03}"),
            category: category.to_string(),
            current_stock: current,
            reorder_point: 30,
            minimum_stock: 10,
            maximum_stock: 200,
            unit: "pcs".into(),
            unit_cost: Money::from_cents(1000),
            reorder_quantity: 100,
            preferred_supplier: "Global Supply Co.".into(),
            lead_time_days: 5,
            location: location.to_string(),
            last_updated: now(),
            average_daily_sales: 1.0,
        }
    }

    fn board(config: &Config) -> (AlertsScreen<InMemoryRepository<LowStockItem>>, Arc<InMemoryNotifier>) {
        let store = InMemoryRepository::with_records([
            row(1, "Widgets", "A-1-01", 0),
            row(2, "Electronics", "B-2-03", 9),
            row(3, "Electronics", "A-1-01", 18),
            row(4, "Widgets", "C-1-02", 25),
        ]);
        let notifier = Arc::new(InMemoryNotifier::new());
        let feedback = Feedback::new(notifier.clone(), Arc::new(ScriptedConfirm::new([])));
        let mut screen = AlertsScreen::new(store, feedback, config);
        screen.list_mut().refresh(now());
        (screen, notifier)
    }

    #[test]
    fn severity_facet_uses_configured_thresholds() {
        let (mut screen, _) = board(&Config::default());
        let n = screen
            .list_mut()
            .update_filter(|f| f.severity = Facet::is(AlertSeverity::Critical), now());
        assert_eq!(n, 1);

        let strict = Config {
            thresholds: SeverityThresholds::new(0.1, 0.6).unwrap(),
            ..Config::default()
        };
        let (mut screen, _) = board(&strict);
        let n = screen
            .list_mut()
            .update_filter(|f| f.severity = Facet::is(AlertSeverity::Critical), now());
        assert_eq!(n, 0);
        assert_eq!(screen.summary().low_count, 2);
    }

    #[test]
    fn bulk_actions_notify_once_and_clear_selection() {
        let (mut screen, notifier) = board(&Config::default());
        screen.list_mut().toggle_all();
        assert_eq!(screen.bulk_create_orders(), Outcome::Applied(4));
        assert!(screen.list().selected().is_empty());

        screen.list_mut().toggle(ItemId::from_u128(2));
        assert_eq!(screen.bulk_update_thresholds(), Outcome::Applied(1));

        let messages: Vec<_> = notifier.history().into_iter().map(|n| n.message).collect();
        assert_eq!(
            messages,
            vec![
                "Creating orders for 4 selected items...",
                "Updating thresholds for 1 selected items..."
            ]
        );
        assert!(notifier.history().iter().all(|n| n.tone == Tone::Info));
    }

    #[test]
    fn bulk_actions_on_empty_selection_are_silent() {
        let (mut screen, notifier) = board(&Config::default());
        assert_eq!(screen.bulk_create_orders(), Outcome::Applied(0));
        assert_eq!(screen.bulk_update_thresholds(), Outcome::Applied(0));
        assert!(notifier.history().is_empty());
    }

    #[test]
    fn clear_filters_keeps_thresholds() {
        let strict = Config {
            thresholds: SeverityThresholds::new(0.1, 0.6).unwrap(),
            ..Config::default()
        };
        let (mut screen, _) = board(&strict);
        screen.list_mut().update_filter(|f| f.category = Facet::is("Widgets".to_string()), now());
        assert_eq!(screen.list().rows().len(), 2);
        screen.clear_filters(now());
        assert_eq!(screen.list().rows().len(), 4);
        assert_eq!(screen.thresholds(), strict.thresholds);
    }

    #[test]
    fn summary_and_facet_values() {
        let (screen, notifier) = board(&Config::default());
        let s = screen.summary();
        assert_eq!(s.critical_count, 2);
        assert_eq!(s.critical_value, Money::from_cents(9000));
        assert_eq!(s.out_of_stock_count, 1);
        assert_eq!(screen.categories(), vec!["Electronics", "Widgets"]);
        assert_eq!(screen.locations(), vec!["A-1-01", "B-2-03", "C-1-02"]);

        screen.create_order(&ItemId::from_u128(3)).unwrap();
        assert_eq!(notifier.last().unwrap().message, "Creating order for Part 3...");
    }
}
