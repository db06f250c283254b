//! Infrastructure layer: entity stores, configuration, screen controllers,
//! reports and workspace snapshots.

pub mod config;
pub mod read_model;
pub mod reports;
pub mod screens;
pub mod snapshot;

#[cfg(test)]
mod integration_tests;

pub use config::{Config, ConfigError, LogFormat};
pub use read_model::{InMemoryRepository, Repository, RepositoryError};
pub use reports::{Kpis, Period, ReportKind, ReportsScreen};
pub use screens::{
    AlertsScreen, CategoriesScreen, EntityScreen, Feedback, InventoryScreen, MovementsScreen,
    OrdersScreen, Outcome, SuppliersScreen,
};
pub use snapshot::{Dashboard, Snapshot, SnapshotError, Stores};
