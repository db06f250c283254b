//! Threshold-to-state derivation shared by every screen.
//!
//! Status and severity are never stored on records; they are always computed
//! from the numeric fields so the two cannot drift apart.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use stockdesk_core::{DomainError, DomainResult};

/// Stock status of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    pub fn label(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::InStock => "In Stock",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out-of-stock",
            StockStatus::LowStock => "low-stock",
            StockStatus::InStock => "in-stock",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StockStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [StockStatus::OutOfStock, StockStatus::LowStock, StockStatus::InStock]
            .into_iter()
            .find(|st| st.slug() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown stock status: {s:?}")))
    }
}

/// `current == 0` → out of stock; `current <= minimum` → low; otherwise in stock.
///
/// Negative stock counts as out of stock.
pub fn stock_status(current: i64, minimum: i64) -> StockStatus {
    if current <= 0 {
        StockStatus::OutOfStock
    } else if current <= minimum {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

/// Severity of a low-stock alert, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertSeverity {
    OutOfStock,
    Critical,
    Low,
    Reorder,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 4] = [
        AlertSeverity::OutOfStock,
        AlertSeverity::Critical,
        AlertSeverity::Low,
        AlertSeverity::Reorder,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            AlertSeverity::OutOfStock => "out-of-stock",
            AlertSeverity::Critical => "critical",
            AlertSeverity::Low => "low",
            AlertSeverity::Reorder => "reorder",
        }
    }

    /// Out-of-stock and critical rows both count as critical in summaries.
    pub fn is_critical(self) -> bool {
        matches!(self, AlertSeverity::OutOfStock | AlertSeverity::Critical)
    }
}

impl FromStr for AlertSeverity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertSeverity::ALL
            .into_iter()
            .find(|sev| sev.slug() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown alert severity: {s:?}")))
    }
}

/// Ratios of the reorder point below which an alert escalates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    critical_ratio: f64,
    low_ratio: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical_ratio: 0.3,
            low_ratio: 0.6,
        }
    }
}

impl SeverityThresholds {
    /// Requires `0 < critical < low <= 1`.
    pub fn new(critical_ratio: f64, low_ratio: f64) -> DomainResult<Self> {
        let ordered = critical_ratio > 0.0 && critical_ratio < low_ratio && low_ratio <= 1.0;
        if !ordered {
            return Err(DomainError::validation(format!(
                "severity ratios must satisfy 0 < critical < low <= 1 (critical={critical_ratio}, low={low_ratio})"
            )));
        }
        Ok(Self {
            critical_ratio,
            low_ratio,
        })
    }

    pub fn critical_ratio(&self) -> f64 {
        self.critical_ratio
    }

    pub fn low_ratio(&self) -> f64 {
        self.low_ratio
    }
}

/// Alert severity for stock at or near its reorder point.
///
/// `current == 0` → out of stock; `current <= reorder × critical` → critical;
/// `current <= reorder × low` → low; anything else → reorder.
pub fn alert_severity(current: i64, reorder_point: i64, thresholds: SeverityThresholds) -> AlertSeverity {
    if current <= 0 {
        return AlertSeverity::OutOfStock;
    }
    let current = current as f64;
    let reorder_point = reorder_point as f64;
    if current <= reorder_point * thresholds.critical_ratio {
        AlertSeverity::Critical
    } else if current <= reorder_point * thresholds.low_ratio {
        AlertSeverity::Low
    } else {
        AlertSeverity::Reorder
    }
}
