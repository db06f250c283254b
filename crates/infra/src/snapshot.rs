//! Whole-workspace JSON snapshot and the dashboard computed from it.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockdesk_catalog::{Category, CategorySummary};
use stockdesk_inventory::{
    AlertSummary, InventoryItem, ItemSummary, LowStockItem, MovementSummary, StockMovement,
};
use stockdesk_parties::{Supplier, SupplierSummary};
use stockdesk_purchasing::{OrderSummary, PurchaseOrder};

use crate::config::Config;
use crate::read_model::{InMemoryRepository, Repository};
use crate::reports::{GeneratedReport, Kpis};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every entity store at one point in time. Missing sections are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub items: Vec<InventoryItem>,
    pub categories: Vec<Category>,
    pub suppliers: Vec<Supplier>,
    pub orders: Vec<PurchaseOrder>,
    pub movements: Vec<StockMovement>,
    pub alerts: Vec<LowStockItem>,
    pub reports: Vec<GeneratedReport>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Split into one shared in-memory store per entity, ready to back the screens.
    pub fn into_stores(self) -> Stores {
        Stores {
            items: Arc::new(InMemoryRepository::with_records(self.items)),
            categories: Arc::new(InMemoryRepository::with_records(self.categories)),
            suppliers: Arc::new(InMemoryRepository::with_records(self.suppliers)),
            orders: Arc::new(InMemoryRepository::with_records(self.orders)),
            movements: Arc::new(InMemoryRepository::with_records(self.movements)),
            alerts: Arc::new(InMemoryRepository::with_records(self.alerts)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stores {
    pub items: Arc<InMemoryRepository<InventoryItem>>,
    pub categories: Arc<InMemoryRepository<Category>>,
    pub suppliers: Arc<InMemoryRepository<Supplier>>,
    pub orders: Arc<InMemoryRepository<PurchaseOrder>>,
    pub movements: Arc<InMemoryRepository<StockMovement>>,
    pub alerts: Arc<InMemoryRepository<LowStockItem>>,
}

impl Stores {
    /// Current contents of every store. Report history is not kept in a store.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            items: self.items.list(),
            categories: self.categories.list(),
            suppliers: self.suppliers.list(),
            orders: self.orders.list(),
            movements: self.movements.list(),
            alerts: self.alerts.list(),
            reports: Vec::new(),
        }
    }
}

/// Header figures of every screen, as printed by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub generated_at: DateTime<Utc>,
    pub kpis: Kpis,
    pub inventory: ItemSummary,
    pub categories: CategorySummary,
    pub suppliers: SupplierSummary,
    pub orders: OrderSummary,
    pub movements: MovementSummary,
    pub alerts: AlertSummary,
    pub recent_reports: usize,
}

impl Dashboard {
    pub fn compute(snapshot: &Snapshot, config: &Config, now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            kpis: Kpis::compute(&snapshot.items),
            inventory: ItemSummary::compute(&snapshot.items),
            categories: CategorySummary::compute(&snapshot.categories),
            suppliers: SupplierSummary::compute(&snapshot.suppliers),
            orders: OrderSummary::compute(&snapshot.orders, now),
            movements: MovementSummary::compute(&snapshot.movements, now),
            alerts: AlertSummary::compute(&snapshot.alerts, config.thresholds),
            recent_reports: snapshot.reports.len().min(config.recent_reports_cap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockdesk_core::Money;

    const SNAPSHOT: &str = r#"{
        "items": [
            {
                "id": "00000000-0000-0000-0000-000000000001",
                "sku": "WDW-001",
                "name": "Widget Pro",
                "description": "Flagship widget",
                "category": "Widgets",
                "stock": 4,
                "min_stock": 5,
                "price": 2500,
                "last_updated": "2024-11-18T10:00:00Z"
            },
            {
                "id": "00000000-0000-0000-0000-000000000002",
                "sku": "CBE-002",
                "name": "Cable Pack",
                "description": "",
                "category": "Electronics",
                "stock": 50,
                "min_stock": 10,
                "price": 300,
                "last_updated": "2024-11-18T10:00:00Z"
            }
        ]
    }"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 20, 9, 0, 0).unwrap()
    }

    #[test]
    fn partial_snapshot_loads_with_empty_sections() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.items.len(), 2);
        assert!(snapshot.orders.is_empty());

        let dashboard = Dashboard::compute(&snapshot, &Config::default(), now());
        assert_eq!(dashboard.inventory.low_stock, 1);
        assert_eq!(dashboard.kpis.total_inventory_value, Money::from_cents(10_000 + 15_000));
        assert_eq!(dashboard.orders.total, 0);
        assert_eq!(dashboard.alerts.total, 0);
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        assert!(matches!(Snapshot::from_json("{\"items\": 3}"), Err(SnapshotError::Json(_))));
        assert!(matches!(Snapshot::load("/nonexistent/stockdesk.json"), Err(SnapshotError::Io(_))));
    }

    #[test]
    fn stores_share_records() {
        let stores = Snapshot::from_json(SNAPSHOT).unwrap().into_stores();
        let alias = stores.clone();
        let first = alias.items.list()[0].id;
        alias.items.remove(&first).unwrap();
        assert_eq!(stores.items.len(), 1);
        assert_eq!(stores.snapshot().items.len(), 1);
    }
}
