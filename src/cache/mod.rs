// Local persistence module.
// SQLite menu cache, key/value preferences, and the paths they live at.

pub mod paths;
pub mod prefs;
pub mod store;

pub use prefs::Preferences;
pub use store::{CacheState, MenuStore};
