//! Cross-screen tests: several screens over one set of shared stores.
//!
//! Verifies:
//! - Mutations made through one screen show up in the dashboard built from the stores
//! - Notifications reach a subscriber in the order the actions ran
//! - Blocked actions leave every store untouched

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};

    use stockdesk_catalog::{Category, CategoryDraft};
    use stockdesk_core::{CategoryId, Money, OrderId};
    use stockdesk_feedback::{
        EditOutcome, InMemoryNotifier, Notifier, ScriptedConfirm, ScriptedDialog, Tone,
    };
    use stockdesk_inventory::{MovementDraft, MovementType};
    use stockdesk_purchasing::{OrderLine, OrderStatus, PurchaseOrder};

    use crate::config::Config;
    use crate::screens::{CategoriesScreen, Feedback, MovementsScreen, OrdersScreen, Outcome};
    use crate::snapshot::{Dashboard, Snapshot, Stores};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 10, 0, 0).unwrap()
    }

    fn category(n: u128, name: &str, items: u32) -> Category {
        Category {
            id: CategoryId::from_u128(n),
            name: name.to_string(),
            description: format!("{name} and accessories"),
            icon: "category".into(),
            color: "#2196f3".into(),
            is_active: true,
            item_count: items,
            total_value: Money::from_cents(i64::from(items) * 1500),
            created_at: now() - Duration::days(30),
            last_updated: now() - Duration::days(1),
        }
    }

    fn order(n: u128, po: &str, status: OrderStatus) -> PurchaseOrder {
        PurchaseOrder {
            id: OrderId::from_u128(n),
            po_number: po.to_string(),
            supplier: "TechCorp Inc.".into(),
            supplier_contact: "orders@techcorp.example".into(),
            ordered_at: now() - Duration::days(3),
            expected_delivery: Some(now() + Duration::days(4)),
            actual_delivery: None,
            status,
            lines: vec![OrderLine {
                name: "Widget Pro".into(),
                quantity: 10,
                unit_price: Money::from_cents(2500),
            }],
            tracking_number: None,
            notes: None,
            created_by: "John Smith".into(),
            last_updated: now() - Duration::days(3),
        }
    }

    fn stores() -> Stores {
        Snapshot {
            categories: vec![category(1, "Electronics", 12), category(2, "Seasonal", 0)],
            orders: vec![
                order(1, "PO-2024-001", OrderStatus::Pending),
                order(2, "PO-2024-002", OrderStatus::Delivered),
            ],
            ..Snapshot::default()
        }
        .into_stores()
    }

    fn feedback(notifier: &Arc<InMemoryNotifier>, answers: Vec<bool>) -> Feedback {
        Feedback::new(notifier.clone(), Arc::new(ScriptedConfirm::new(answers)))
    }

    #[test]
    fn screen_actions_flow_into_dashboard() {
        let stores = stores();
        let notifier = Arc::new(InMemoryNotifier::new());
        let config = Config::default();

        let mut orders = OrdersScreen::new(stores.orders.clone(), feedback(&notifier, vec![true]), &config);
        orders.list_mut().refresh(now());
        orders.list_mut().toggle_all();
        assert_eq!(orders.bulk_cancel(now()).unwrap(), Outcome::Applied(1));

        let receiving = MovementDraft {
            kind: Some(MovementType::Inbound),
            item_name: "Widget Pro".into(),
            item_sku: "WDW-001".into(),
            current_stock: 4,
            quantity: 10,
            location: Some("A-1-01".into()),
            from_location: None,
            to_location: None,
            reference: "PO-2024-002".into(),
            reason: None,
            cost: Some(Money::from_cents(25_000)),
            notes: None,
        };
        let mut movements = MovementsScreen::new(
            stores.movements.clone(),
            feedback(&notifier, vec![]),
            Arc::new(ScriptedDialog::new([EditOutcome::Saved(receiving)])),
            "John Smith",
            &config,
        );
        movements.record(now()).unwrap();

        let dashboard = Dashboard::compute(&stores.snapshot(), &config, now());
        assert_eq!(dashboard.orders.pending, 0);
        assert_eq!(dashboard.movements.today_count, 1);
        assert_eq!(dashboard.movements.today_value, Money::from_cents(25_000));
        assert_eq!(dashboard.categories.most_popular.as_deref(), Some("Electronics"));
    }

    #[test]
    fn subscriber_sees_notifications_in_order() {
        let stores = stores();
        let notifier = Arc::new(InMemoryNotifier::new());
        let subscription = notifier.subscribe();

        let mut categories = CategoriesScreen::new(
            stores.categories.clone(),
            feedback(&notifier, vec![true]),
            Arc::new(ScriptedDialog::<CategoryDraft>::new([])),
            &Config::default(),
        );
        categories.list_mut().refresh(now());
        categories.toggle_status(&CategoryId::from_u128(2), now()).unwrap();
        categories.delete(&CategoryId::from_u128(2), now()).unwrap();

        let seen: Vec<_> = subscription.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(
            seen,
            vec!["Seasonal deactivated successfully", "Seasonal deleted successfully"]
        );
    }

    #[test]
    fn blocked_bulk_delete_changes_nothing() {
        let stores = stores();
        let before = stores.snapshot();
        let notifier = Arc::new(InMemoryNotifier::new());

        let mut categories = CategoriesScreen::new(
            stores.categories.clone(),
            feedback(&notifier, vec![true]),
            Arc::new(ScriptedDialog::<CategoryDraft>::new([])),
            &Config::default(),
        );
        categories.list_mut().refresh(now());
        categories.list_mut().toggle_all();
        assert!(categories.bulk_delete(now()).is_err());

        assert_eq!(stores.snapshot(), before);
        assert_eq!(categories.list().selected().len(), 2);
        let last = notifier.last().unwrap();
        assert_eq!(last.tone, Tone::Blocked);
        assert_eq!(last.message, "Cannot delete categories that contain items");
    }
}
