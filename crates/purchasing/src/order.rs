use core::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult, Entity, Money, OrderId};
use stockdesk_query::aggregate::{count_where, distinct_sorted, sum_by};
use stockdesk_query::date_bucket::matches_bucket;
use stockdesk_query::{DateBucket, Facet, RecordFilter, Searchable, TextSearch};

/// Purchase order status lifecycle.
///
/// `Pending → Confirmed → Shipped → Delivered`, or `Cancelled` from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Fulfilment progress shown on the order card.
    pub fn progress(self) -> u8 {
        match self {
            OrderStatus::Pending => 20,
            OrderStatus::Confirmed => 40,
            OrderStatus::Shipped => 70,
            OrderStatus::Delivered => 100,
            OrderStatus::Cancelled => 0,
        }
    }

    pub fn progress_label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Awaiting confirmation",
            OrderStatus::Confirmed => "Processing order",
            OrderStatus::Shipped => "In transit",
            OrderStatus::Delivered => "Delivered successfully",
            OrderStatus::Cancelled => "Order cancelled",
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.slug() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown order status: {s:?}")))
    }
}

/// Purchase order line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl OrderLine {
    pub fn total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: OrderId,
    pub po_number: String,
    pub supplier: String,
    #[serde(default)]
    pub supplier_contact: String,
    pub ordered_at: DateTime<Utc>,
    #[serde(default)]
    pub expected_delivery: Option<DateTime<Utc>>,
    #[serde(default)]
    pub actual_delivery: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_by: String,
    pub last_updated: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Sum of line totals.
    pub fn total_amount(&self) -> Money {
        self.lines.iter().map(OrderLine::total).sum()
    }

    /// Past its expected delivery and still open.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && self.expected_delivery.is_some_and(|due| due < now)
    }

    pub fn is_cancellable(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn is_confirmable(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Moves the order forward through the lifecycle. Delivering stamps the
    /// actual delivery time.
    pub fn advance_to(&mut self, next: OrderStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if next == OrderStatus::Cancelled {
            return self.cancel(now);
        }
        if self.status.is_terminal() {
            return Err(DomainError::invariant(format!(
                "{} is already {}",
                self.po_number, self.status
            )));
        }
        if next <= self.status {
            return Err(DomainError::invariant(format!(
                "cannot move {} from {} back to {}",
                self.po_number, self.status, next
            )));
        }
        self.status = next;
        self.last_updated = now;
        if next == OrderStatus::Delivered {
            self.actual_delivery = Some(now);
        }
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_cancellable() {
            return Err(DomainError::invariant(format!(
                "{} is {} and cannot be cancelled",
                self.po_number, self.status
            )));
        }
        self.status = OrderStatus::Cancelled;
        self.last_updated = now;
        Ok(())
    }

    /// Fresh pending copy due in seven days.
    pub fn duplicate(&self, id: OrderId, po_number: String, now: DateTime<Utc>) -> PurchaseOrder {
        PurchaseOrder {
            id,
            po_number,
            ordered_at: now,
            expected_delivery: Some(now + Duration::days(7)),
            actual_delivery: None,
            status: OrderStatus::Pending,
            tracking_number: None,
            last_updated: now,
            ..self.clone()
        }
    }
}

impl Entity for PurchaseOrder {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for PurchaseOrder {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![&self.po_number, &self.supplier];
        fields.extend(self.lines.iter().map(|l| l.name.as_str()));
        fields
    }
}

/// Orders eligible for bulk cancel: everything not yet delivered or cancelled.
pub fn cancellable<'a>(orders: impl IntoIterator<Item = &'a PurchaseOrder>) -> Vec<OrderId> {
    orders.into_iter().filter(|o| o.is_cancellable()).map(|o| o.id).collect()
}

/// Orders eligible for bulk confirm: pending only.
pub fn confirmable<'a>(orders: impl IntoIterator<Item = &'a PurchaseOrder>) -> Vec<OrderId> {
    orders.into_iter().filter(|o| o.is_confirmable()).map(|o| o.id).collect()
}

/// Next `PO-<year>-<serial:03>` after the highest serial already used this year.
///
/// Fails with `Conflict` once the year's serials are exhausted.
pub fn next_po_number<'a>(
    existing: impl IntoIterator<Item = &'a str>,
    now: DateTime<Utc>,
) -> DomainResult<String> {
    let prefix = format!("PO-{}-", now.year());
    let last = existing
        .into_iter()
        .filter_map(|po| po.strip_prefix(&prefix))
        .filter_map(|serial| serial.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    let next = last
        .checked_add(1)
        .ok_or_else(|| DomainError::conflict(format!("no PO numbers left for {}", now.year())))?;
    Ok(format!("{prefix}{next:03}"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub search: TextSearch,
    pub status: Facet<OrderStatus>,
    pub supplier: Facet<String>,
    pub date: Option<DateBucket>,
}

impl OrderFilter {
    /// Status chips above the table set the status facet directly.
    pub fn quick(status: Option<OrderStatus>) -> Self {
        Self { status: status.into(), ..Self::default() }
    }
}

impl RecordFilter<PurchaseOrder> for OrderFilter {
    fn matches(&self, order: &PurchaseOrder, now: DateTime<Utc>) -> bool {
        self.search.matches(order.search_fields())
            && self.status.matches(&order.status)
            && self.supplier.matches_str(&order.supplier)
            && matches_bucket(self.date, order.ordered_at, now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total: usize,
    pub this_month: usize,
    pub pending: usize,
    pub total_value: Money,
    pub overdue: usize,
    pub suppliers: Vec<String>,
}

impl OrderSummary {
    pub fn compute(orders: &[PurchaseOrder], now: DateTime<Utc>) -> Self {
        Self {
            total: orders.len(),
            this_month: count_where(orders, |o| DateBucket::Month.contains(o.ordered_at, now)),
            pending: count_where(orders, |o| o.status == OrderStatus::Pending),
            total_value: sum_by(orders, PurchaseOrder::total_amount),
            overdue: count_where(orders, |o| o.is_overdue(now)),
            suppliers: distinct_sorted(orders, |o| o.supplier.clone()),
        }
    }
}
