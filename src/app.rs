// App state and main event loop.
// Routes keys per screen and hands menu loads and filter queries to background tasks.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::Result;
use crate::feed::MenuFeed;
use crate::menu::{LoadedMenu, MenuLoader, MenuSource, QueryController};
use crate::profile::{Profile, ProfileStore};
use crate::state::{
    FormState, LoadingState, MenuScreenState, NavigationStack, Notice, Screen,
};
use crate::ui;

/// Results coming back from background tasks.
#[derive(Debug)]
pub enum AppEvent {
    MenuLoaded(Result<LoadedMenu>),
}

/// Main application state.
pub struct App<F> {
    pub nav: NavigationStack,
    pub menu: MenuScreenState,
    pub controller: QueryController,
    pub onboarding_form: FormState,
    pub profile_form: FormState,
    pub profile: Profile,
    /// Latest message for the status bar.
    pub notice: Option<Notice>,
    pub show_help: bool,
    pub should_quit: bool,
    profiles: ProfileStore,
    loader: Arc<MenuLoader<F>>,
    /// Set once the store proved unusable; no further loads are attempted.
    store_unusable: bool,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl<F: MenuFeed + 'static> App<F> {
    /// Must be called from within a tokio runtime context.
    pub fn new(loader: MenuLoader<F>, profiles: ProfileStore, debounce: Duration) -> Result<Self> {
        let profile = profiles.load_profile()?;
        let nav = NavigationStack::for_onboarded(profiles.is_onboarded());
        let controller = QueryController::new(Arc::new(loader.store().clone()), debounce);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            nav,
            menu: MenuScreenState::default(),
            controller,
            onboarding_form: FormState::onboarding(),
            profile_form: FormState::profile(&profile),
            profile,
            notice: None,
            show_help: false,
            should_quit: false,
            profiles,
            loader: Arc::new(loader),
            store_unusable: false,
            events_tx,
            events_rx,
        };

        if app.nav.current() == Screen::Home {
            app.start_menu_load(false);
        }
        Ok(app)
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.poll_background();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply finished background work.
    pub fn poll_background(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::MenuLoaded(result) => self.on_menu_loaded(result),
            }
        }

        if self.controller.poll_updates() {
            self.menu.list.clamp(self.controller.results().len());
            if let Some(e) = self.controller.last_error() {
                self.notice = Some(Notice::warn(format!("Search failed: {e}")));
            }
        }
    }

    /// Kick off a menu load (or a full re-download when `refresh` is set).
    fn start_menu_load(&mut self, refresh: bool) {
        if self.menu.load.is_loading() {
            return;
        }
        if self.store_unusable {
            self.notice = Some(Notice::error("Menu storage is unavailable"));
            return;
        }

        self.menu.load = LoadingState::Loading;
        self.controller.mark_not_ready();

        let loader = self.loader.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = if refresh {
                loader.refresh().await
            } else {
                loader.load().await
            };
            let _ = tx.send(AppEvent::MenuLoaded(result));
        });
    }

    fn on_menu_loaded(&mut self, result: Result<LoadedMenu>) {
        match result {
            Ok(menu) => {
                info!(count = menu.items.len(), source = ?menu.source, "Menu ready");
                if menu.source == MenuSource::Remote {
                    self.notice = Some(Notice::info(format!(
                        "Downloaded {} dishes",
                        menu.items.len()
                    )));
                }
                self.menu.set_loaded(menu.categories);
                self.controller.mark_ready();
            }
            Err(e) => {
                error!(error = %e, "Menu load failed");
                if e.is_fatal() {
                    self.store_unusable = true;
                }
                let message = if e.is_network() {
                    format!("{e}. Check your connection and press r to retry")
                } else {
                    e.to_string()
                };
                self.notice = Some(Notice::error(message));
                self.menu.load = LoadingState::Error(e.to_string());
            }
        }
    }

    /// Handle keyboard and other events.
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match self.nav.current() {
            Screen::Onboarding => self.handle_onboarding_key(key),
            Screen::Home => self.handle_home_key(key),
            Screen::Profile => self.handle_profile_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        if self.menu.search_focused {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.menu.search_focused = false,
                KeyCode::Backspace => {
                    self.menu.search_input.pop();
                    self.controller.set_query(self.menu.search_input.clone());
                }
                KeyCode::Char(c) => {
                    self.menu.search_input.push(c);
                    self.controller.set_query(self.menu.search_input.clone());
                }
                _ => {}
            }
            return;
        }

        let len = self.controller.results().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('/') => self.menu.search_focused = true,
            KeyCode::Down | KeyCode::Char('j') => self.menu.list.select_next(len),
            KeyCode::Up | KeyCode::Char('k') => self.menu.list.select_prev(len),
            KeyCode::Right | KeyCode::Char('l') => self.menu.next_category(),
            KeyCode::Left | KeyCode::Char('h') => self.menu.prev_category(),
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(category) = self.menu.current_category().map(str::to_string) {
                    self.controller.toggle_category(&category);
                }
            }
            KeyCode::Char('c') => self.controller.clear_categories(),
            KeyCode::Char('p') => self.open_profile(),
            KeyCode::Char('r') => {
                if !self.menu.load.is_loaded() {
                    self.start_menu_load(false);
                }
            }
            KeyCode::Char('R') => self.start_menu_load(true),
            KeyCode::Esc => {
                if !self.menu.search_input.is_empty() {
                    self.menu.search_input.clear();
                    self.controller.set_query("");
                }
            }
            _ => {}
        }
    }

    fn handle_onboarding_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Enter => self.submit_onboarding(),
            _ => edit_form(&mut self.onboarding_form, key),
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('l') {
            self.logout();
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.profile_form = FormState::profile(&self.profile);
                self.nav.pop();
            }
            KeyCode::Enter => self.save_profile(),
            _ => edit_form(&mut self.profile_form, key),
        }
    }

    fn submit_onboarding(&mut self) {
        let first_name = self.onboarding_form.text("First name").to_string();
        let email = self.onboarding_form.text("Email").to_string();

        match self.profiles.complete_onboarding(&first_name, &email) {
            Ok(profile) => {
                self.profile_form = FormState::profile(&profile);
                self.profile = profile;
                self.onboarding_form = FormState::onboarding();
                self.nav.reset_to(Screen::Home);
                if matches!(self.menu.load, LoadingState::Idle) {
                    self.start_menu_load(false);
                }
            }
            Err(e) => self.onboarding_form.message = Some(e.to_string()),
        }
    }

    fn open_profile(&mut self) {
        self.profile_form = FormState::profile(&self.profile);
        self.nav.push(Screen::Profile);
    }

    fn save_profile(&mut self) {
        let updated = self.profile_form.to_profile(&self.profile);
        match self.profiles.save_profile(&updated) {
            Ok(()) => {
                self.profile = updated;
                self.profile_form.message = None;
                self.notice = Some(Notice::info("Profile updated successfully"));
                self.nav.pop();
            }
            Err(e) => self.profile_form.message = Some(e.to_string()),
        }
    }

    fn logout(&mut self) {
        match self.profiles.logout() {
            Ok(()) => {
                self.profile = Profile::default();
                self.profile_form = FormState::profile(&self.profile);
                self.onboarding_form = FormState::onboarding();
                self.nav.reset_to(Screen::Onboarding);
            }
            Err(e) => self.notice = Some(Notice::error(format!("Failed to logout: {e}"))),
        }
    }
}

/// Shared text/toggle editing for both forms.
fn edit_form(form: &mut FormState, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.insert_char(c),
        _ => {}
    }
}
