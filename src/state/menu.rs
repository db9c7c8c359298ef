// Home screen state management.
// Tracks the menu load, list selection, search focus, and the category cursor.

use ratatui::widgets::ListState;

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadingState::Loaded(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Keyboard selection over a list whose length is owned elsewhere.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub list_state: ListState,
}

impl Selection {
    /// Select the next item, staying on the last one.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => len - 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item, staying on the first one.
    pub fn select_prev(&mut self, len: usize) {
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Keep the selection inside a list that changed length.
    pub fn clamp(&mut self, len: usize) {
        match (self.list_state.selected(), len) {
            (_, 0) => self.list_state.select(None),
            (None, _) => self.list_state.select(Some(0)),
            (Some(i), len) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }
}

/// Complete state for the Home (menu) screen.
#[derive(Debug, Default)]
pub struct MenuScreenState {
    /// Menu cache load; carries the category labels once loaded.
    pub load: LoadingState<Vec<String>>,
    /// Selection in the filtered menu list.
    pub list: Selection,
    /// Whether keystrokes go to the search bar.
    pub search_focused: bool,
    /// Search text as typed.
    pub search_input: String,
    /// Highlighted category chip.
    pub category_cursor: usize,
}

impl MenuScreenState {
    pub fn categories(&self) -> &[String] {
        self.load.data().map(Vec::as_slice).unwrap_or_default()
    }

    /// Category under the cursor, if any.
    pub fn current_category(&self) -> Option<&str> {
        self.categories()
            .get(self.category_cursor)
            .map(String::as_str)
    }

    pub fn next_category(&mut self) {
        let len = self.categories().len();
        if len > 0 {
            self.category_cursor = (self.category_cursor + 1) % len;
        }
    }

    pub fn prev_category(&mut self) {
        let len = self.categories().len();
        if len > 0 {
            self.category_cursor = (self.category_cursor + len - 1) % len;
        }
    }

    pub fn set_loaded(&mut self, categories: Vec<String>) {
        self.category_cursor = 0;
        self.load = LoadingState::Loaded(categories);
    }
}
