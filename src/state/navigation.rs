// Navigation state management.
// Handles the screen stack: onboarding, the menu home screen, and the profile editor.

/// A screen in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Onboarding,
    Home,
    Profile,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Onboarding => "Welcome",
            Screen::Home => "Menu",
            Screen::Profile => "Profile",
        }
    }
}

/// Navigation stack of screens (bottom = root, top = current).
#[derive(Debug, Clone)]
pub struct NavigationStack {
    stack: Vec<Screen>,
}

impl NavigationStack {
    /// Create a new navigation stack starting at the given screen.
    pub fn new(root: Screen) -> Self {
        Self { stack: vec![root] }
    }

    /// Initial stack depending on whether onboarding was finished.
    pub fn for_onboarded(onboarded: bool) -> Self {
        if onboarded {
            Self::new(Screen::Home)
        } else {
            Self::new(Screen::Onboarding)
        }
    }

    /// Get the current screen.
    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Onboarding)
    }

    /// Push a new screen onto the stack.
    pub fn push(&mut self, screen: Screen) {
        self.stack.push(screen);
    }

    /// Pop the current screen (go back). Returns false if at root.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Replace the whole stack with a single root screen.
    pub fn reset_to(&mut self, root: Screen) {
        self.stack.clear();
        self.stack.push(root);
    }

    /// Screen titles from root to current.
    pub fn trail(&self) -> Vec<&'static str> {
        self.stack.iter().map(Screen::title).collect()
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(Screen::Onboarding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_stack() {
        let mut nav = NavigationStack::for_onboarded(true);

        assert_eq!(nav.current(), Screen::Home);
        assert!(!nav.pop());

        nav.push(Screen::Profile);
        assert_eq!(nav.trail(), ["Menu", "Profile"]);

        assert!(nav.pop());
        assert_eq!(nav.current(), Screen::Home);

        // Can't pop past root
        assert!(!nav.pop());
        assert_eq!(nav.trail().len(), 1);
    }

    #[test]
    fn test_logout_resets_to_onboarding() {
        let mut nav = NavigationStack::for_onboarded(true);
        nav.push(Screen::Profile);

        nav.reset_to(Screen::Onboarding);
        assert_eq!(nav.current(), Screen::Onboarding);
        assert_eq!(nav.trail().len(), 1);
    }

    #[test]
    fn test_not_onboarded_starts_at_onboarding() {
        let nav = NavigationStack::for_onboarded(false);
        assert_eq!(nav.current(), Screen::Onboarding);
        assert_eq!(NavigationStack::default().current(), Screen::Onboarding);
    }
}
