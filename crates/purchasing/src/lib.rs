//! Purchasing domain module (purchase orders).
//!
//! This crate contains business rules for purchase orders: the status lifecycle,
//! overdue detection, bulk confirm/cancel eligibility and PO numbering. Pure
//! domain logic (no IO, no storage).

pub mod order;

pub use order::{
    OrderFilter, OrderLine, OrderStatus, OrderSummary, PurchaseOrder, cancellable, confirmable,
    next_po_number,
};
