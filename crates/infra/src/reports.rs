//! Reports screen: period selection, KPIs over the live stores and the
//! recently generated report history.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockdesk_core::{DomainError, DomainResult, Money, ReportId};
use stockdesk_inventory::{InventoryItem, StockStatus};
use stockdesk_query::aggregate::{count_where, percentage, sum_by};

use crate::config::Config;
use crate::screens::{Feedback, Outcome};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("unknown report period: {0:?}")]
    UnknownPeriod(String),

    #[error("custom range starts after it ends ({from} > {to})")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("report not found: {0}")]
    NotFound(ReportId),
}

impl From<ReportError> for DomainError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotFound(_) => DomainError::not_found(),
            other => DomainError::validation(other.to_string()),
        }
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Reporting period. Preset periods end today; a custom period keeps its own dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    Custom { from: NaiveDate, to: NaiveDate },
}

impl Period {
    pub fn custom(from: NaiveDate, to: NaiveDate) -> Result<Self, ReportError> {
        if from > to {
            return Err(ReportError::InvalidRange { from, to });
        }
        Ok(Period::Custom { from, to })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Week => "This Week",
            Period::Month => "This Month",
            Period::Quarter => "This Quarter",
            Period::Year => "This Year",
            Period::Custom { .. } => "Custom Range",
        }
    }

    pub fn range(&self, now: DateTime<Utc>) -> DateRange {
        let today = now.date_naive();
        let from = match *self {
            Period::Today => today,
            Period::Week => (now - Duration::days(7)).date_naive(),
            Period::Month => today - Duration::days(i64::from(today.day0())),
            Period::Quarter => {
                let first_month = today.month0() / 3 * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today)
            }
            Period::Year => today - Duration::days(i64::from(today.ordinal0())),
            Period::Custom { from, to } => return DateRange { from, to },
        };
        DateRange { from, to: today }
    }
}

impl FromStr for Period {
    type Err = ReportError;

    /// Preset periods only; custom ranges go through [`Period::custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(Period::Today),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            other => Err(ReportError::UnknownPeriod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportCategory {
    Inventory,
    Sales,
    Movement,
    Supplier,
}

/// Report kind, identified by its slug. Unrecognised slugs are custom reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ReportKind(String);

const REPORT_NAMES: [(&str, &str); 16] = [
    ("inventory-valuation", "Inventory Valuation Report"),
    ("stock-levels", "Stock Levels Report"),
    ("low-stock", "Low Stock Alert Report"),
    ("abc-analysis", "ABC Analysis Report"),
    ("sales-summary", "Sales Summary Report"),
    ("top-products", "Top Selling Products Report"),
    ("sales-by-category", "Sales by Category Report"),
    ("profit-analysis", "Profit Analysis Report"),
    ("movement-summary", "Movement Summary Report"),
    ("transfer-report", "Transfer Report"),
    ("adjustments", "Stock Adjustments Report"),
    ("shrinkage", "Shrinkage Analysis Report"),
    ("supplier-performance", "Supplier Performance Report"),
    ("purchase-analysis", "Purchase Analysis Report"),
    ("cost-comparison", "Cost Comparison Report"),
    ("order-history", "Order History Report"),
];

impl ReportKind {
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn slug(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        REPORT_NAMES.iter().any(|(slug, _)| *slug == self.0)
    }

    pub fn name(&self) -> &'static str {
        REPORT_NAMES
            .iter()
            .find(|(slug, _)| *slug == self.0)
            .map_or("Custom Report", |&(_, name)| name)
    }

    /// Keyword match on the slug, checked sales, movement, supplier in that order.
    pub fn category(&self) -> ReportCategory {
        let has = |words: &[&str]| words.iter().any(|w| self.0.contains(w));
        if has(&["sales", "profit", "products"]) {
            ReportCategory::Sales
        } else if has(&["movement", "transfer", "adjustment", "shrinkage"]) {
            ReportCategory::Movement
        } else if has(&["supplier", "purchase", "cost", "order"]) {
            ReportCategory::Supplier
        } else {
            ReportCategory::Inventory
        }
    }

    /// Slug with its first hyphen turned into a space, as used in progress messages.
    pub fn spoken(&self) -> String {
        self.0.replacen('-', " ", 1)
    }
}

impl From<String> for ReportKind {
    fn from(slug: String) -> Self {
        Self(slug)
    }
}

impl From<ReportKind> for String {
    fn from(kind: ReportKind) -> Self {
        kind.0
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Ready,
    Generating,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub id: ReportId,
    pub name: String,
    pub kind: ReportKind,
    pub category: ReportCategory,
    /// Label of the period the report covers, e.g. `"This Month"`.
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub description: String,
}

impl GeneratedReport {
    pub fn new(id: ReportId, kind: ReportKind, period: &Period, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: kind.name().to_string(),
            category: kind.category(),
            period: period.label().to_string(),
            generated_at: now,
            status: ReportStatus::Ready,
            description: format!("Generated {} report", kind.spoken()),
            kind,
        }
    }
}

/// Headline figures computed from the inventory store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_inventory_value: Money,
    pub item_count: usize,
    /// Items that are low or out of stock.
    pub low_stock_count: usize,
    pub low_stock_percentage: f64,
}

impl Kpis {
    pub fn compute(items: &[InventoryItem]) -> Self {
        let low_stock_count = count_where(items, |i| i.status() != StockStatus::InStock);
        Self {
            total_inventory_value: sum_by(items, InventoryItem::stock_value),
            item_count: items.len(),
            low_stock_count,
            low_stock_percentage: percentage(low_stock_count, items.len()),
        }
    }
}

/// Report generation and the capped, newest-first history of generated reports.
#[derive(Debug)]
pub struct ReportsScreen {
    history: Vec<GeneratedReport>,
    cap: usize,
    period: Period,
    feedback: Feedback,
}

impl ReportsScreen {
    pub fn new(feedback: Feedback, config: &Config) -> Self {
        Self {
            history: Vec::new(),
            cap: config.recent_reports_cap,
            period: Period::default(),
            feedback,
        }
    }

    /// Seed the history; reports are ordered newest first and cut to the cap.
    pub fn with_history(mut self, reports: impl IntoIterator<Item = GeneratedReport>) -> Self {
        self.history = reports.into_iter().collect();
        self.history.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        self.history.truncate(self.cap);
        self
    }

    pub fn history(&self) -> &[GeneratedReport] {
        &self.history
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Switch the reporting period and return the range it now covers.
    pub fn set_period(&mut self, period: Period, now: DateTime<Utc>) -> DomainResult<DateRange> {
        if let Period::Custom { from, to } = period {
            Period::custom(from, to)?;
            self.feedback.info(format!(
                "Date range updated: {} to {}",
                from.format("%a %b %d %Y"),
                to.format("%a %b %d %Y")
            ));
        }
        self.period = period;
        Ok(period.range(now))
    }

    pub fn range(&self, now: DateTime<Utc>) -> DateRange {
        self.period.range(now)
    }

    /// Generate a report for the current period and put it at the top of the history.
    pub fn generate(&mut self, kind: ReportKind, now: DateTime<Utc>) -> GeneratedReport {
        self.feedback.info(format!("Generating {} report...", kind.spoken()));
        let report = GeneratedReport::new(ReportId::new(), kind, &self.period, now);
        tracing::info!(
            kind = %report.kind,
            category = ?report.category,
            period = %report.period,
            "report generated"
        );
        self.history.insert(0, report.clone());
        if self.history.len() > self.cap {
            let dropped = self.history.len() - self.cap;
            self.history.truncate(self.cap);
            tracing::debug!(dropped, "report history trimmed");
        }
        self.feedback.success("Report generated successfully!");
        report
    }

    pub fn delete(&mut self, id: &ReportId) -> DomainResult<Outcome> {
        let index = self
            .history
            .iter()
            .position(|r| &r.id == id)
            .ok_or(ReportError::NotFound(*id))?;
        let prompt = format!("Are you sure you want to delete \"{}\"?", self.history[index].name);
        if !self.feedback.confirm(&prompt) {
            return Ok(Outcome::Declined);
        }
        let removed = self.history.remove(index);
        tracing::info!(id = %removed.id, name = %removed.name, "report deleted");
        self.feedback.success("Report deleted successfully");
        Ok(Outcome::Applied(1))
    }

    pub fn kpis(&self, items: &[InventoryItem]) -> Kpis {
        Kpis::compute(items)
    }
}
