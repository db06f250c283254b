use core::cmp::Ordering;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult, Entity, Money, SupplierId};
use stockdesk_query::aggregate::{count_where, max_by_first, sum_by};
use stockdesk_query::sort::compare_f64;
use stockdesk_query::{Facet, RecordFilter, Searchable, SortKey, TextSearch, compare_text};

/// Supplier status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Active,
    Inactive,
    /// Registered but not yet approved.
    Pending,
}

impl FromStr for SupplierStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SupplierStatus::Active),
            "inactive" => Ok(SupplierStatus::Inactive),
            "pending" => Ok(SupplierStatus::Pending),
            other => Err(DomainError::validation(format!("unknown supplier status: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    /// Contact person.
    pub name: String,
    pub company: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    pub status: SupplierStatus,
    /// 0.0 ..= 5.0
    pub rating: f64,
    pub order_count: u32,
    pub total_spent: Money,
    #[serde(default)]
    pub last_order_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Supplier {
    pub const MAX_RATING: f64 = 5.0;

    pub fn is_active(&self) -> bool {
        self.status == SupplierStatus::Active
    }

    pub fn set_status(&mut self, status: SupplierStatus, now: DateTime<Utc>) {
        self.status = status;
        self.last_updated = now;
    }

    /// Active becomes inactive; inactive and pending become active.
    pub fn toggle_status(&mut self, now: DateTime<Utc>) -> SupplierStatus {
        let next = match self.status {
            SupplierStatus::Active => SupplierStatus::Inactive,
            SupplierStatus::Inactive | SupplierStatus::Pending => SupplierStatus::Active,
        };
        self.set_status(next, now);
        next
    }

    /// Copy with order history cleared, never primary.
    pub fn duplicate(&self, id: SupplierId, now: DateTime<Utc>) -> Supplier {
        Supplier {
            id,
            name: format!("{} (Copy)", self.name),
            email: format!("copy.{}", self.email),
            order_count: 0,
            total_spent: Money::ZERO,
            last_order_at: None,
            is_primary: false,
            created_at: now,
            last_updated: now,
            ..self.clone()
        }
    }

    /// Up to two upper-cased initials of the contact name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.company, &self.email]
    }
}

/// Add/edit form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierDraft {
    pub name: String,
    pub company: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub rating: f64,
}

impl SupplierDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("supplier name cannot be empty"));
        }
        if self.company.trim().is_empty() {
            return Err(DomainError::validation("company cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(DomainError::validation(format!("invalid email: {:?}", self.email)));
        }
        if !(0.0..=Supplier::MAX_RATING).contains(&self.rating) {
            return Err(DomainError::validation("rating must be between 0 and 5"));
        }
        Ok(())
    }

    /// New suppliers start out pending.
    pub fn into_supplier(self, id: SupplierId, now: DateTime<Utc>) -> DomainResult<Supplier> {
        self.validate()?;
        Ok(Supplier {
            id,
            name: self.name.trim().to_string(),
            company: self.company.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone,
            location: self.location,
            status: SupplierStatus::Pending,
            rating: self.rating,
            order_count: 0,
            total_spent: Money::ZERO,
            last_order_at: None,
            is_primary: false,
            is_verified: false,
            created_at: now,
            last_updated: now,
        })
    }

    pub fn apply_to(self, supplier: &mut Supplier, now: DateTime<Utc>) -> DomainResult<()> {
        self.validate()?;
        supplier.name = self.name.trim().to_string();
        supplier.company = self.company.trim().to_string();
        supplier.email = self.email.trim().to_string();
        supplier.phone = self.phone;
        supplier.location = self.location;
        supplier.rating = self.rating;
        supplier.last_updated = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierFilter {
    pub search: TextSearch,
    pub status: Facet<SupplierStatus>,
    /// Inclusive lower bound on rating.
    #[serde(default)]
    pub min_rating: Option<f64>,
}

impl RecordFilter<Supplier> for SupplierFilter {
    fn matches(&self, supplier: &Supplier, _now: DateTime<Utc>) -> bool {
        self.search.matches(supplier.search_fields())
            && self.status.matches(&supplier.status)
            && self.min_rating.is_none_or(|min| supplier.rating >= min)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierSort {
    #[default]
    Name,
    NameDesc,
    /// Highest first.
    Rating,
    /// Most orders first.
    Orders,
    /// Most recent order first; suppliers without orders last.
    LastOrder,
}

impl SortKey<Supplier> for SupplierSort {
    fn compare(&self, a: &Supplier, b: &Supplier) -> Ordering {
        match self {
            SupplierSort::Name => compare_text(&a.name, &b.name),
            SupplierSort::NameDesc => compare_text(&b.name, &a.name),
            SupplierSort::Rating => compare_f64(b.rating, a.rating),
            SupplierSort::Orders => b.order_count.cmp(&a.order_count),
            SupplierSort::LastOrder => b.last_order_at.cmp(&a.last_order_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierSummary {
    pub total: usize,
    pub active: usize,
    pub total_orders: u64,
    pub total_spent: Money,
    pub top_rated: Option<String>,
    pub top_rating: Option<f64>,
}

impl SupplierSummary {
    pub fn compute(suppliers: &[Supplier]) -> Self {
        let top = max_by_first(suppliers, |s| s.rating);
        Self {
            total: suppliers.len(),
            active: count_where(suppliers, Supplier::is_active),
            total_orders: sum_by(suppliers, |s| u64::from(s.order_count)),
            total_spent: sum_by(suppliers, |s| s.total_spent),
            top_rated: top.map(|s| s.name.clone()),
            top_rating: top.map(|s| s.rating),
        }
    }
}
