use chrono::{DateTime, Utc};

use stockdesk_core::{DomainError, DomainResult, OrderId};
use stockdesk_purchasing::{
    OrderFilter, OrderStatus, OrderSummary, PurchaseOrder, cancellable, next_po_number,
};
use stockdesk_query::NoSort;
use stockdesk_query::aggregate::distinct_sorted;

use crate::config::Config;
use crate::read_model::Repository;
use crate::screens::{EntityScreen, Feedback, Outcome, ScreenRecord};

impl ScreenRecord for PurchaseOrder {
    const PLURAL: &'static str = "orders";

    fn display_name(&self) -> &str {
        &self.po_number
    }
}

/// Purchase order list. Rows stay in store order.
pub struct OrdersScreen<R> {
    list: EntityScreen<PurchaseOrder, OrderFilter, NoSort, R>,
}

impl<R: Repository<PurchaseOrder>> OrdersScreen<R> {
    pub fn new(store: R, feedback: Feedback, config: &Config) -> Self {
        Self {
            list: EntityScreen::new(store, OrderFilter::default(), NoSort, feedback, config.page_size),
        }
    }

    pub fn list(&self) -> &EntityScreen<PurchaseOrder, OrderFilter, NoSort, R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut EntityScreen<PurchaseOrder, OrderFilter, NoSort, R> {
        &mut self.list
    }

    /// Status chip: narrows to one status, or clears with `None`.
    pub fn set_quick_filter(&mut self, status: Option<OrderStatus>, now: DateTime<Utc>) -> usize {
        self.list.update_filter(|f| f.status = status.into(), now)
    }

    pub fn clear_filters(&mut self, now: DateTime<Utc>) {
        self.list.set_filter(OrderFilter::default(), now);
    }

    /// Move one order forward (confirmed, shipped or delivered).
    pub fn update_status(
        &mut self,
        id: &OrderId,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if status == OrderStatus::Cancelled {
            return Err(DomainError::validation("use cancel to cancel an order"));
        }
        let (order, ()) = self.list.modify(id, now, |o| o.advance_to(status, now))?;
        tracing::info!(po = %order.po_number, status = %status, "order status updated");
        self.list
            .feedback()
            .success(format!("{} marked as {status}", order.po_number));
        Ok(())
    }

    pub fn cancel(&mut self, id: &OrderId, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let order = self.list.get(id)?;
        if !order.is_cancellable() {
            let err = DomainError::blocked(format!("{} cannot be cancelled", order.po_number));
            return Err(self.list.feedback().refuse(err));
        }
        let prompt = format!("Are you sure you want to cancel order {}?", order.po_number);
        if !self.list.feedback().confirm(&prompt) {
            return Ok(Outcome::Declined);
        }
        self.list.modify(id, now, |o| o.cancel(now))?;
        self.list
            .feedback()
            .success(format!("{} cancelled successfully", order.po_number));
        Ok(Outcome::Applied(1))
    }

    /// Appends a pending copy under the next free PO number.
    pub fn duplicate(&mut self, id: &OrderId, now: DateTime<Utc>) -> DomainResult<OrderId> {
        let original = self.list.get(id)?;
        let existing = self.list.store().list();
        let po_number = next_po_number(existing.iter().map(|o| o.po_number.as_str()), now)?;
        let copy = original.duplicate(OrderId::new(), po_number, now);
        let copy_id = copy.id;
        self.list.insert(copy, now)?;
        self.list
            .feedback()
            .success(format!("{} duplicated successfully", original.po_number));
        Ok(copy_id)
    }

    /// Confirms the pending orders in the selection; others are skipped.
    pub fn bulk_confirm(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        self.list.bulk_update(
            now,
            |o| o.is_confirmable() && o.advance_to(OrderStatus::Confirmed, now).is_ok(),
            |n| format!("{n} orders confirmed"),
        )
    }

    /// Cancels the cancellable part of the selection after one confirmation.
    ///
    /// Blocked when nothing selected can be cancelled.
    pub fn bulk_cancel(&mut self, now: DateTime<Utc>) -> DomainResult<Outcome> {
        let targets = cancellable(&self.list.selected_records());
        if targets.is_empty() {
            let err = DomainError::blocked("No orders can be cancelled");
            return Err(self.list.feedback().refuse(err));
        }
        let prompt = format!("Are you sure you want to cancel {} orders?", targets.len());
        if !self.list.feedback().confirm(&prompt) {
            return Ok(Outcome::Declined);
        }
        self.list.bulk_update(
            now,
            |o| targets.contains(&o.id) && o.cancel(now).is_ok(),
            |n| format!("{n} orders cancelled"),
        )
    }

    pub fn summary(&self, now: DateTime<Utc>) -> OrderSummary {
        OrderSummary::compute(&self.list.store().list(), now)
    }

    /// Options for the supplier facet.
    pub fn suppliers(&self) -> Vec<String> {
        distinct_sorted(&self.list.store().list(), |o| o.supplier.clone())
    }
}
