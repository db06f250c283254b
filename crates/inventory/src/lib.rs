//! Inventory domain module.
//!
//! Items, the low-stock alert rows derived from them, and stock movements, plus
//! the single stock status / alert severity derivation every screen shares.
//! Pure domain logic (no IO, no storage).

pub mod alert;
pub mod item;
pub mod movement;
pub mod status;

pub use alert::{AlertFilter, AlertSummary, LowStockItem};
pub use item::{InventoryItem, ItemDraft, ItemFilter, ItemSort, ItemSummary, generate_sku};
pub use movement::{
    MovementDirection, MovementDraft, MovementFilter, MovementStatus, MovementSummary,
    MovementType, StockMovement,
};
pub use status::{AlertSeverity, SeverityThresholds, StockStatus, alert_severity, stock_status};
