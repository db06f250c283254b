//! Catalog domain module.
//!
//! Product categories: derived status, the referential deletion guard, and
//! duplication. Pure domain logic (no IO, no storage).

pub mod category;

pub use category::{
    Category, CategoryDraft, CategoryFilter, CategorySort, CategoryStatus, CategorySummary,
    ensure_bulk_deletable,
};
