//! Categorical (exact-match) filters.

use serde::{Deserialize, Serialize};

/// Single-value equality filter. `Any` is the empty filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Facet<V> {
    Any,
    Is(V),
}

impl<V> Default for Facet<V> {
    fn default() -> Self {
        Facet::Any
    }
}

impl<V: PartialEq> Facet<V> {
    pub fn is(value: V) -> Self {
        Facet::Is(value)
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Facet::Any)
    }

    pub fn matches(&self, value: &V) -> bool {
        match self {
            Facet::Any => true,
            Facet::Is(expected) => expected == value,
        }
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Facet::Any => None,
            Facet::Is(v) => Some(v),
        }
    }
}

impl Facet<String> {
    /// Match against a borrowed field without allocating.
    pub fn matches_str(&self, value: &str) -> bool {
        match self {
            Facet::Any => true,
            Facet::Is(expected) => expected == value,
        }
    }
}

impl<V> From<Option<V>> for Facet<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(v) => Facet::Is(v),
            None => Facet::Any,
        }
    }
}

/// Multi-value membership filter. An empty set matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacetSet<V> {
    values: Vec<V>,
}

impl<V> Default for FacetSet<V> {
    fn default() -> Self {
        Self { values: Vec::new() }
    }
}

impl<V: PartialEq> FacetSet<V> {
    pub fn new(values: impl IntoIterator<Item = V>) -> Self {
        let mut set = Self::default();
        for v in values {
            set.insert(v);
        }
        set
    }

    pub fn insert(&mut self, value: V) {
        if !self.values.contains(&value) {
            self.values.push(value);
        }
    }

    pub fn remove(&mut self, value: &V) {
        self.values.retain(|v| v != value);
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn matches(&self, value: &V) -> bool {
        self.values.is_empty() || self.values.contains(value)
    }
}
