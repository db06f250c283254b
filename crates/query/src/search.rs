//! Case-insensitive free-text search.

use serde::{Deserialize, Serialize};

/// Free-text search term.
///
/// An empty term matches every record. A non-empty term matches a record when it
/// is contained (case-insensitively) in at least one of the record's designated
/// fields; a record that designates no fields never matches a non-empty term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextSearch {
    needle: String,
}

impl TextSearch {
    pub fn new(term: impl AsRef<str>) -> Self {
        Self {
            needle: term.as_ref().to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// The normalized (lower-cased) term.
    pub fn term(&self) -> &str {
        &self.needle
    }

    pub fn matches<'a, I>(&self, fields: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.is_empty() {
            return true;
        }
        fields
            .into_iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

impl From<&str> for TextSearch {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
