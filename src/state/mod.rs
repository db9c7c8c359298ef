// State management module.
// Handles navigation, the menu screen, form editing, and notices.

pub mod form;
pub mod menu;
pub mod navigation;
pub mod notices;

pub use form::{FieldValue, FormState};
pub use menu::{LoadingState, MenuScreenState};
pub use navigation::{NavigationStack, Screen};
pub use notices::{Notice, NoticeLevel};
