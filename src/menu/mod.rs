// Menu domain module.
// Menu items, filter criteria, and the loader/controller pipeline built on them.

pub mod controller;
pub mod debounce;
pub mod filter;
pub mod loader;

use serde::{Deserialize, Serialize};

pub use controller::QueryController;
pub use filter::{FilterCriteria, FilterEngine};
pub use loader::{LoadedMenu, MenuLoader, MenuSource};

/// A menu row as stored in the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Assigned by the store on insert.
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Absolute image URL.
    pub image: String,
    pub category: String,
}

/// A menu row that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub category: String,
}

impl MenuItem {
    /// Price formatted for display.
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_price() {
        let item = MenuItem {
            id: 1,
            name: "Bruschetta".into(),
            description: String::new(),
            price: 7.5,
            image: String::new(),
            category: "starters".into(),
        };
        assert_eq!(item.display_price(), "$7.50");
    }
}
