//! `stockdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by every entity screen
//! (no storage, no presentation concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ItemId, MovementId, OrderId, ReportId, SupplierId};
pub use value_object::{Money, ValueObject};
