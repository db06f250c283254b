use core::cmp::Ordering;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockdesk_core::{CategoryId, DomainError, DomainResult, Entity, Money};
use stockdesk_query::aggregate::{count_where, max_by_first, sum_by};
use stockdesk_query::{Facet, RecordFilter, Searchable, SortKey, TextSearch, compare_text};

/// Displayed category state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Active,
    Inactive,
    Empty,
}

impl CategoryStatus {
    pub fn label(self) -> &'static str {
        match self {
            CategoryStatus::Active => "Active",
            CategoryStatus::Inactive => "Inactive",
            CategoryStatus::Empty => "Empty",
        }
    }
}

impl FromStr for CategoryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CategoryStatus::Active),
            "inactive" => Ok(CategoryStatus::Inactive),
            "empty" => Ok(CategoryStatus::Empty),
            other => Err(DomainError::validation(format!("unknown category status: {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub is_active: bool,
    pub item_count: u32,
    pub total_value: Money,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Category {
    /// Inactive wins over empty; an active category with no items is `Empty`.
    pub fn status(&self) -> CategoryStatus {
        if !self.is_active {
            CategoryStatus::Inactive
        } else if self.item_count == 0 {
            CategoryStatus::Empty
        } else {
            CategoryStatus::Active
        }
    }

    /// Status facet membership. The facets overlap: an active category with no
    /// items is listed under both `Active` and `Empty`.
    pub fn is_listed_under(&self, status: CategoryStatus) -> bool {
        match status {
            CategoryStatus::Active => self.is_active,
            CategoryStatus::Inactive => !self.is_active,
            CategoryStatus::Empty => self.item_count == 0,
        }
    }

    pub fn set_active(&mut self, active: bool, now: DateTime<Utc>) {
        self.is_active = active;
        self.last_updated = now;
    }

    /// Flips the active flag and returns the new value.
    pub fn toggle_active(&mut self, now: DateTime<Utc>) -> bool {
        self.set_active(!self.is_active, now);
        self.is_active
    }

    /// Refuses deletion while items are still assigned.
    pub fn ensure_deletable(&self) -> DomainResult<()> {
        if self.item_count > 0 {
            return Err(DomainError::blocked(format!(
                "Cannot delete {}. It contains {} items.",
                self.name, self.item_count
            )));
        }
        Ok(())
    }

    /// Empty copy named `"<name> (Copy)"` with fresh timestamps.
    pub fn duplicate(&self, id: CategoryId, now: DateTime<Utc>) -> Category {
        Category {
            id,
            name: format!("{} (Copy)", self.name),
            item_count: 0,
            total_value: Money::ZERO,
            created_at: now,
            last_updated: now,
            ..self.clone()
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.description]
    }
}

/// Bulk deletion is all-or-nothing: any selected category with items refuses the batch.
pub fn ensure_bulk_deletable<'a>(selected: impl IntoIterator<Item = &'a Category>) -> DomainResult<()> {
    if selected.into_iter().any(|c| c.item_count > 0) {
        return Err(DomainError::blocked("Cannot delete categories that contain items"));
    }
    Ok(())
}

/// Add/edit form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl CategoryDraft {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        Ok(())
    }

    pub fn into_category(self, id: CategoryId, now: DateTime<Utc>) -> DomainResult<Category> {
        self.validate()?;
        Ok(Category {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            icon: self.icon,
            color: self.color,
            is_active: true,
            item_count: 0,
            total_value: Money::ZERO,
            created_at: now,
            last_updated: now,
        })
    }

    /// Applies the form to an existing category, keeping its counters.
    pub fn apply_to(self, category: &mut Category, now: DateTime<Utc>) -> DomainResult<()> {
        self.validate()?;
        category.name = self.name.trim().to_string();
        category.description = self.description;
        category.icon = self.icon;
        category.color = self.color;
        category.last_updated = now;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub search: TextSearch,
    pub status: Facet<CategoryStatus>,
}

impl RecordFilter<Category> for CategoryFilter {
    fn matches(&self, category: &Category, _now: DateTime<Utc>) -> bool {
        self.search.matches(category.search_fields())
            && self.status.value().is_none_or(|s| category.is_listed_under(*s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySort {
    #[default]
    Name,
    NameDesc,
    /// Most items first.
    Items,
    /// Newest first.
    Created,
}

impl SortKey<Category> for CategorySort {
    fn compare(&self, a: &Category, b: &Category) -> Ordering {
        match self {
            CategorySort::Name => compare_text(&a.name, &b.name),
            CategorySort::NameDesc => compare_text(&b.name, &a.name),
            CategorySort::Items => b.item_count.cmp(&a.item_count),
            CategorySort::Created => b.created_at.cmp(&a.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub active: usize,
    pub total_items: u64,
    pub most_popular: Option<String>,
    pub empty: usize,
}

impl CategorySummary {
    pub fn compute(categories: &[Category]) -> Self {
        Self {
            active: count_where(categories, |c| c.is_active),
            total_items: sum_by(categories, |c| u64::from(c.item_count)),
            most_popular: max_by_first(categories, |c| c.item_count).map(|c| c.name.clone()),
            empty: count_where(categories, |c| c.item_count == 0),
        }
    }
}
