use core::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult, Entity, ItemId, Money};
use stockdesk_query::aggregate::{count_where, distinct_sorted, sum_by};
use stockdesk_query::{Facet, RecordFilter, Searchable, SortKey, TextSearch, compare_text};

use crate::status::{StockStatus, stock_status};

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub stock: i64,
    pub min_stock: i64,
    pub price: Money,
    #[serde(default)]
    pub image_url: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl InventoryItem {
    pub fn status(&self) -> StockStatus {
        stock_status(self.stock, self.min_stock)
    }

    /// Price × stock on hand.
    pub fn stock_value(&self) -> Money {
        self.price.times(self.stock.max(0))
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for InventoryItem {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.sku, &self.description]
    }
}

/// Form input for a new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Money,
    pub stock: i64,
    pub min_stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ItemDraft {
    pub const MIN_NAME_LEN: usize = 3;
    pub const MAX_DESCRIPTION_LEN: usize = 500;

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().chars().count() < Self::MIN_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name must be at least {} characters",
                Self::MIN_NAME_LEN
            )));
        }
        if self.description.chars().count() > Self::MAX_DESCRIPTION_LEN {
            return Err(DomainError::validation(format!(
                "description cannot exceed {} characters",
                Self::MAX_DESCRIPTION_LEN
            )));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        if !self.price.is_positive() {
            return Err(DomainError::validation("price must be at least 0.01"));
        }
        if self.stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }
        if self.min_stock < 0 {
            return Err(DomainError::validation("minimum stock cannot be negative"));
        }
        Ok(())
    }

    /// Validate and turn the draft into a stored item with a generated SKU.
    pub fn into_item(self, id: ItemId, now: DateTime<Utc>) -> DomainResult<InventoryItem> {
        self.validate()?;
        let serial = (id.as_uuid().as_u128() % 1000) as u16;
        let sku = generate_sku(&self.name, &self.category, serial)
            .ok_or_else(|| DomainError::validation("name too short for a SKU"))?;
        Ok(InventoryItem {
            id,
            sku,
            name: self.name.trim().to_string(),
            description: self.description,
            category: self.category,
            stock: self.stock,
            min_stock: self.min_stock,
            price: self.price,
            image_url: self.image_url,
            last_updated: now,
        })
    }
}

impl ItemDraft {
    /// Applies an edited form to an existing item. The SKU never changes.
    pub fn apply_to(self, item: &mut InventoryItem, now: DateTime<Utc>) -> DomainResult<()> {
        self.validate()?;
        item.name = self.name.trim().to_string();
        item.description = self.description;
        item.category = self.category;
        item.price = self.price;
        item.stock = self.stock;
        item.min_stock = self.min_stock;
        item.image_url = self.image_url;
        item.last_updated = now;
        Ok(())
    }
}

impl From<&InventoryItem> for ItemDraft {
    fn from(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            price: item.price,
            stock: item.stock,
            min_stock: item.min_stock,
            image_url: item.image_url.clone(),
        }
    }
}

/// `<first two name letters><category initial or X>-<serial:03>`, upper-cased.
///
/// Returns `None` for names shorter than two characters.
pub fn generate_sku(name: &str, category: &str, serial: u16) -> Option<String> {
    let name = name.trim();
    if name.chars().count() < 2 {
        return None;
    }
    let name_code: String = name.chars().take(2).collect::<String>().to_uppercase();
    let category_code = category
        .trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_else(|| "X".to_string());
    Some(format!("{name_code}{category_code}-{:03}", serial % 1000))
}

/// Inventory screen filter: search over name/SKU/description, category, status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemFilter {
    pub search: TextSearch,
    pub category: Facet<String>,
    pub status: Facet<StockStatus>,
}

impl RecordFilter<InventoryItem> for ItemFilter {
    fn matches(&self, item: &InventoryItem, _now: DateTime<Utc>) -> bool {
        self.search.matches(item.search_fields())
            && self.category.matches_str(&item.category)
            && self.status.matches(&item.status())
    }
}

/// Column sort for the inventory table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSort {
    /// Store order.
    #[default]
    None,
    Name,
    Sku,
    StockAscending,
    PriceDescending,
}

impl SortKey<InventoryItem> for ItemSort {
    fn compare(&self, a: &InventoryItem, b: &InventoryItem) -> Ordering {
        match self {
            ItemSort::None => Ordering::Equal,
            ItemSort::Name => compare_text(&a.name, &b.name),
            ItemSort::Sku => compare_text(&a.sku, &b.sku),
            ItemSort::StockAscending => a.stock.cmp(&b.stock),
            ItemSort::PriceDescending => b.price.cmp(&a.price),
        }
    }
}

/// Header figures for the inventory screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub total_items: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub total_value: Money,
    pub categories: Vec<String>,
}

impl ItemSummary {
    pub fn compute(items: &[InventoryItem]) -> Self {
        Self {
            total_items: items.len(),
            low_stock: count_where(items, |i| i.status() == StockStatus::LowStock),
            out_of_stock: count_where(items, |i| i.status() == StockStatus::OutOfStock),
            total_value: sum_by(items, InventoryItem::stock_value),
            categories: distinct_sorted(items, |i| i.category.clone()),
        }
    }
}
