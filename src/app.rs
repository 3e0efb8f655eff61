use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use bgg_api::{BoardGame, GameDetails};
use log::warn;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Collection,
    GameDetail,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(cli_username: Option<String>) -> Self {
        let settings = AppSettings::load();

        let mut app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app.state.collection.sort = app.settings.sort;

        // CLI argument beats the env var beats the remembered username.
        let username = cli_username
            .or_else(|| std::env::var("SHELFTUI_USER").ok())
            .filter(|u| !u.trim().is_empty())
            .or_else(|| app.settings.username.clone());

        match username {
            Some(username) => app.state.collection.username = username.trim().to_owned(),
            None => app.state.prompt.begin(""),
        }

        app
    }

    /// Username to load on startup, unless the prompt is waiting for one.
    pub fn startup_username(&self) -> Option<String> {
        if self.state.prompt.active || self.state.collection.username.is_empty() {
            return None;
        }
        Some(self.state.collection.username.clone())
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_collection_loaded(&mut self, username: String, games: Vec<BoardGame>) {
        self.state.last_error = None;
        self.state.prompt.cancel();
        self.state.collection.username = username;
        self.state.collection.load(games);
        self.update_tab(MenuItem::Collection);
        self.persist_settings();
    }

    pub fn on_game_details_loaded(&mut self, details: GameDetails) {
        self.state.last_error = None;
        let previous_id = self.state.detail.details.as_ref().map(|d| d.id.clone());
        let game_changed = previous_id.as_deref() != Some(details.id.as_str());

        self.state.detail.details = Some(details);
        if game_changed {
            self.state.detail.scroll_offset = 0;
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
        // With nothing loaded yet the likeliest fix is a different
        // username, so hand the user the prompt back.
        if self.state.collection.games.is_empty() {
            let current = self.state.collection.username.clone();
            self.state.prompt.begin(&current);
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Collection navigation — delegated to CollectionState
    // -----------------------------------------------------------------------

    pub fn collection_down(&mut self) {
        self.state.collection.navigate_down();
    }

    pub fn collection_up(&mut self) {
        self.state.collection.navigate_up();
    }

    pub fn cycle_sort(&mut self) {
        self.state.collection.cycle_sort();
        self.persist_settings();
    }

    /// Returns the selected game's id if the user pressed Enter on one.
    /// Switches to the GameDetail tab as a side-effect.
    pub fn select_game(&mut self) -> Option<String> {
        let game_id = self.state.collection.selected_game_id()?;
        self.update_tab(MenuItem::GameDetail);
        Some(game_id)
    }

    // -----------------------------------------------------------------------
    // Username prompt
    // -----------------------------------------------------------------------

    pub fn begin_user_prompt(&mut self) {
        let current = self.state.collection.username.clone();
        self.state.prompt.begin(&current);
    }

    pub fn submit_user_prompt(&mut self) -> Option<String> {
        self.state.prompt.submit()
    }

    pub fn cancel_user_prompt(&mut self) {
        self.state.prompt.cancel();
    }

    fn persist_settings(&mut self) {
        self.settings.username = Some(self.state.collection.username.clone());
        self.settings.sort = self.state.collection.sort;
        if let Err(e) = self.settings.save() {
            warn!("could not persist settings: {e}");
        }
    }
}
