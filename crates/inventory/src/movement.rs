//! Stock movements: inbound/outbound/transfer/adjustment records and the
//! record-movement form.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult, Entity, Money, MovementId};
use stockdesk_query::aggregate::{count_where, distinct_sorted, sum_where};
use stockdesk_query::date_bucket::matches_bucket;
use stockdesk_query::{DateBucket, Facet, FacetSet, RecordFilter, Searchable, TextSearch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Inbound,
    Outbound,
    Transfer,
    Adjustment,
    Return,
    Damage,
    Theft,
}

/// Which way a movement moves stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    Increase,
    Decrease,
    Neutral,
}

impl MovementType {
    pub const ALL: [MovementType; 7] = [
        MovementType::Inbound,
        MovementType::Outbound,
        MovementType::Transfer,
        MovementType::Adjustment,
        MovementType::Return,
        MovementType::Damage,
        MovementType::Theft,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            MovementType::Inbound => "inbound",
            MovementType::Outbound => "outbound",
            MovementType::Transfer => "transfer",
            MovementType::Adjustment => "adjustment",
            MovementType::Return => "return",
            MovementType::Damage => "damage",
            MovementType::Theft => "theft",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MovementType::Inbound => "Stock In",
            MovementType::Outbound => "Stock Out",
            MovementType::Transfer => "Transfer",
            MovementType::Adjustment => "Adjustment",
            MovementType::Return => "Return",
            MovementType::Damage => "Damage",
            MovementType::Theft => "Theft/Loss",
        }
    }

    /// Types whose quantity is stored as a negative number.
    pub fn removes_stock(self) -> bool {
        matches!(self, MovementType::Outbound | MovementType::Damage | MovementType::Theft)
    }

    /// Types that start out pending approval.
    pub fn needs_approval(self) -> bool {
        matches!(self, MovementType::Adjustment | MovementType::Damage)
    }

    /// Types that carry a cost.
    pub fn carries_cost(self) -> bool {
        matches!(
            self,
            MovementType::Inbound | MovementType::Outbound | MovementType::Damage | MovementType::Return
        )
    }

    /// Reference placeholder prefix, e.g. `PO` for inbound.
    pub fn reference_prefix(self) -> &'static str {
        match self {
            MovementType::Inbound => "PO",
            MovementType::Outbound => "SO",
            MovementType::Transfer => "TR",
            MovementType::Adjustment => "ADJ",
            MovementType::Return => "RET",
            MovementType::Damage => "DMG",
            MovementType::Theft => "LOSS",
        }
    }

    /// Direction of a stored (signed) quantity of this type.
    pub fn direction(self, quantity: i64) -> MovementDirection {
        match self {
            MovementType::Inbound | MovementType::Return => MovementDirection::Increase,
            MovementType::Outbound | MovementType::Damage | MovementType::Theft => {
                MovementDirection::Decrease
            }
            MovementType::Adjustment if quantity > 0 => MovementDirection::Increase,
            MovementType::Adjustment if quantity < 0 => MovementDirection::Decrease,
            MovementType::Adjustment | MovementType::Transfer => MovementDirection::Neutral,
        }
    }
}

impl FromStr for MovementType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovementType::ALL
            .into_iter()
            .find(|t| t.slug() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown movement type: {s:?}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    Completed,
    Pending,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub item_name: String,
    pub item_sku: String,
    #[serde(rename = "type")]
    pub kind: MovementType,
    /// Signed: negative for stock leaving.
    pub quantity: i64,
    pub location: String,
    #[serde(default)]
    pub from_location: Option<String>,
    #[serde(default)]
    pub to_location: Option<String>,
    pub reference: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub cost: Option<Money>,
    pub user: String,
    pub timestamp: DateTime<Utc>,
    pub status: MovementStatus,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl StockMovement {
    pub fn direction(&self) -> MovementDirection {
        self.kind.direction(self.quantity)
    }

    /// Quantity with an explicit `+` for stock coming in.
    pub fn quantity_display(&self) -> String {
        match self.direction() {
            MovementDirection::Increase => format!("+{}", self.quantity),
            _ => self.quantity.to_string(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == MovementStatus::Pending
    }

    /// Pending → completed, recording the approver.
    pub fn approve(&mut self, approver: impl Into<String>) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::invariant("only pending movements can be approved"));
        }
        self.status = MovementStatus::Completed;
        self.approved_by = Some(approver.into());
        Ok(())
    }

    /// Pending → cancelled.
    pub fn reject(&mut self) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::invariant("only pending movements can be rejected"));
        }
        self.status = MovementStatus::Cancelled;
        Ok(())
    }

    /// Copy with a `-COPY` reference, pending again.
    pub fn duplicate(&self, id: MovementId, now: DateTime<Utc>) -> StockMovement {
        StockMovement {
            id,
            reference: format!("{}-COPY", self.reference),
            timestamp: now,
            status: MovementStatus::Pending,
            approved_by: None,
            ..self.clone()
        }
    }
}

impl Entity for StockMovement {
    type Id = MovementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for StockMovement {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.item_name, &self.item_sku, &self.reference, &self.user]
    }
}

/// Record-movement form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub kind: Option<MovementType>,
    pub item_name: String,
    pub item_sku: String,
    /// Stock on hand for the chosen item, used for the impact preview.
    pub current_stock: i64,
    /// Unsigned amount as typed by the user.
    pub quantity: i64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub from_location: Option<String>,
    #[serde(default)]
    pub to_location: Option<String>,
    pub reference: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub cost: Option<Money>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl MovementDraft {
    pub fn validate(&self) -> DomainResult<MovementType> {
        let kind = self
            .kind
            .ok_or_else(|| DomainError::validation("movement type is required"))?;
        if self.item_sku.trim().is_empty() {
            return Err(DomainError::validation("an item must be selected"));
        }
        if self.quantity < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if self.reference.trim().is_empty() {
            return Err(DomainError::validation("reference is required"));
        }
        if kind == MovementType::Transfer {
            if present(&self.from_location).is_none() || present(&self.to_location).is_none() {
                return Err(DomainError::validation(
                    "transfers require both a source and a destination location",
                ));
            }
        } else if present(&self.location).is_none() {
            return Err(DomainError::validation("location is required"));
        }
        Ok(kind)
    }

    /// Stock level after the movement, as shown in the form preview.
    pub fn projected_stock(&self) -> i64 {
        match self.kind {
            Some(MovementType::Inbound | MovementType::Return | MovementType::Adjustment) => {
                self.current_stock + self.quantity
            }
            Some(MovementType::Outbound | MovementType::Damage | MovementType::Theft) => {
                self.current_stock - self.quantity
            }
            Some(MovementType::Transfer) | None => self.current_stock,
        }
    }

    pub fn into_movement(
        self,
        id: MovementId,
        user: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<StockMovement> {
        let kind = self.validate()?;
        let quantity = if kind.removes_stock() { -self.quantity } else { self.quantity };
        let location = if kind == MovementType::Transfer {
            self.to_location.clone()
        } else {
            self.location.clone()
        }
        .unwrap_or_default();
        let status = if kind.needs_approval() {
            MovementStatus::Pending
        } else {
            MovementStatus::Completed
        };
        Ok(StockMovement {
            id,
            item_name: self.item_name,
            item_sku: self.item_sku,
            kind,
            quantity,
            location,
            from_location: self.from_location,
            to_location: self.to_location,
            reference: self.reference,
            reason: self.reason,
            cost: if kind.carries_cost() { self.cost } else { None },
            user: user.into(),
            timestamp: now,
            status,
            approved_by: None,
            notes: self.notes,
        })
    }
}

/// Stock-movement screen filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementFilter {
    pub search: TextSearch,
    pub types: FacetSet<MovementType>,
    pub location: Facet<String>,
    pub user: Facet<String>,
    pub status: Facet<MovementStatus>,
    pub date: Option<DateBucket>,
}

impl RecordFilter<StockMovement> for MovementFilter {
    fn matches(&self, m: &StockMovement, now: DateTime<Utc>) -> bool {
        self.search.matches(m.search_fields())
            && self.types.matches(&m.kind)
            && self.location.matches_str(&m.location)
            && self.user.matches_str(&m.user)
            && self.status.matches(&m.status)
            && matches_bucket(self.date, m.timestamp, now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSummary {
    pub today_count: usize,
    pub today_value: Money,
    pub inbound_last_week: usize,
    pub outbound_last_week: usize,
    pub pending_adjustments: usize,
    pub locations: Vec<String>,
    pub users: Vec<String>,
}

impl MovementSummary {
    pub fn compute(movements: &[StockMovement], now: DateTime<Utc>) -> Self {
        let today = |m: &StockMovement| DateBucket::Today.contains(m.timestamp, now);
        let this_week = |m: &StockMovement| DateBucket::Week.contains(m.timestamp, now);
        Self {
            today_count: count_where(movements, today),
            today_value: sum_where(movements, today, |m| m.cost.unwrap_or_default()),
            inbound_last_week: count_where(movements, |m| {
                m.kind == MovementType::Inbound && this_week(m)
            }),
            outbound_last_week: count_where(movements, |m| {
                m.kind == MovementType::Outbound && this_week(m)
            }),
            pending_adjustments: count_where(movements, |m| {
                m.kind == MovementType::Adjustment && m.is_pending()
            }),
            locations: distinct_sorted(movements, |m| m.location.clone()),
            users: distinct_sorted(movements, |m| m.user.clone()),
        }
    }
}
