// Menu filtering.
// Criteria type, the matching rule, and the engine seam the query controller runs against.

use std::collections::BTreeSet;

use crate::error::Result;

use super::MenuItem;

/// Free-text query plus the selected category labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub categories: BTreeSet<String>,
}

impl FilterCriteria {
    #[cfg(test)]
    pub fn new(query: impl Into<String>, categories: impl IntoIterator<Item = String>) -> Self {
        Self {
            query: query.into(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Toggle a category: selecting an already selected one removes it.
    /// Returns true if the category is selected afterwards.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        if self.categories.remove(category) {
            false
        } else {
            self.categories.insert(category.to_string());
            true
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        self.query.is_empty() && self.categories.is_empty()
    }

    /// Matching rule: category narrows, query narrows further.
    /// Text comparison folds case with full Unicode lowering.
    pub fn matches(&self, item: &MenuItem) -> bool {
        let category_ok = self.categories.is_empty() || self.categories.contains(&item.category);
        if !category_ok {
            return false;
        }

        if self.query.is_empty() {
            return true;
        }

        let needle = self.query.to_lowercase();
        item.name.to_lowercase().contains(&needle)
            || item.description.to_lowercase().contains(&needle)
    }
}

/// Something that can answer filter queries over the cached menu.
pub trait FilterEngine: Send + Sync {
    /// Rows matching `criteria`, ordered by name ascending.
    fn filter(&self, criteria: &FilterCriteria) -> Result<Vec<MenuItem>>;
}

/// Filter an in-memory row set with the same rule and ordering as the store.
/// Ties on name keep their input order.
#[cfg(test)]
pub fn filter_items(items: &[MenuItem], criteria: &FilterCriteria) -> Vec<MenuItem> {
    let mut matched: Vec<MenuItem> = items
        .iter()
        .filter(|item| criteria.matches(item))
        .cloned()
        .collect();
    matched.sort_by(|a, b| a.name.cmp(&b.name));
    matched
}
