//! Low-stock alert rows.
//!
//! Severity is derived from `current_stock` and `reorder_point` on every read,
//! using the thresholds the caller passes in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{Entity, ItemId, Money};
use stockdesk_query::aggregate::{count_where, distinct_sorted, sum_where};
use stockdesk_query::{Facet, RecordFilter, Searchable, TextSearch};

use crate::status::{AlertSeverity, SeverityThresholds, alert_severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub id: ItemId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub minimum_stock: i64,
    pub maximum_stock: i64,
    pub unit: String,
    pub unit_cost: Money,
    pub reorder_quantity: i64,
    pub preferred_supplier: String,
    pub lead_time_days: u32,
    pub location: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub average_daily_sales: f64,
}

impl LowStockItem {
    pub fn severity(&self, thresholds: SeverityThresholds) -> AlertSeverity {
        alert_severity(self.current_stock, self.reorder_point, thresholds)
    }

    /// Current stock as a rounded percentage of the maximum; 0 when no maximum is set.
    pub fn stock_percentage(&self) -> u32 {
        if self.maximum_stock <= 0 {
            return 0;
        }
        let pct = (self.current_stock.max(0) as f64 / self.maximum_stock as f64) * 100.0;
        pct.round() as u32
    }

    /// Cost of one reorder at the configured reorder quantity.
    pub fn reorder_cost(&self) -> Money {
        self.unit_cost.times(self.reorder_quantity)
    }

    /// Value of the stock on hand.
    pub fn stock_value(&self) -> Money {
        self.unit_cost.times(self.current_stock.max(0))
    }

    /// Whole days until the stock runs out at the average sales rate.
    ///
    /// `None` when there is no recorded sales rate.
    pub fn days_stock_left(&self) -> Option<i64> {
        if self.average_daily_sales <= 0.0 {
            return None;
        }
        Some((self.current_stock.max(0) as f64 / self.average_daily_sales).floor() as i64)
    }
}

impl Entity for LowStockItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for LowStockItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.sku, &self.category]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertFilter {
    pub search: TextSearch,
    pub category: Facet<String>,
    pub location: Facet<String>,
    pub severity: Facet<AlertSeverity>,
    #[serde(default)]
    pub thresholds: SeverityThresholds,
}

impl RecordFilter<LowStockItem> for AlertFilter {
    fn matches(&self, item: &LowStockItem, _now: DateTime<Utc>) -> bool {
        self.search.matches(item.search_fields())
            && self.category.matches_str(&item.category)
            && self.location.matches_str(&item.location)
            && self.severity.matches(&item.severity(self.thresholds))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub total: usize,
    /// Critical plus out-of-stock rows.
    pub critical_count: usize,
    pub critical_value: Money,
    pub low_count: usize,
    pub low_value: Money,
    pub reorder_count: usize,
    pub out_of_stock_count: usize,
    pub categories: Vec<String>,
    pub locations: Vec<String>,
}

impl AlertSummary {
    pub fn compute(items: &[LowStockItem], thresholds: SeverityThresholds) -> Self {
        let severity = |i: &LowStockItem| i.severity(thresholds);
        let critical = |i: &LowStockItem| severity(i).is_critical();
        let low = |i: &LowStockItem| severity(i) == AlertSeverity::Low;
        Self {
            total: items.len(),
            critical_count: count_where(items, critical),
            critical_value: sum_where(items, critical, LowStockItem::stock_value),
            low_count: count_where(items, low),
            low_value: sum_where(items, low, LowStockItem::stock_value),
            reorder_count: count_where(items, |i| severity(i) == AlertSeverity::Reorder),
            out_of_stock_count: count_where(items, |i| severity(i) == AlertSeverity::OutOfStock),
            categories: distinct_sorted(items, |i| i.category.clone()),
            locations: distinct_sorted(items, |i| i.location.clone()),
        }
    }
}
