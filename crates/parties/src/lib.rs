//! Parties domain module (suppliers).
//!
//! Supplier records, their status lifecycle, and the supplier screen's filter,
//! sort and summary. Pure domain logic (no IO, no storage).

pub mod supplier;

pub use supplier::{
    Supplier, SupplierDraft, SupplierFilter, SupplierSort, SupplierStatus, SupplierSummary,
};
