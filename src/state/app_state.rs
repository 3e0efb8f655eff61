use crate::app::MenuItem;
use bgg_api::{BoardGame, GameDetails};
use chrono::Local;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Collection list state
// ---------------------------------------------------------------------------

/// Client-side ordering of the shelf. The feed has no sort parameter, so
/// re-ordering is purely a view concern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Name,
    Year,
    Plays,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Name => "name",
            SortOrder::Year => "year",
            SortOrder::Plays => "plays",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortOrder::Name => SortOrder::Year,
            SortOrder::Year => SortOrder::Plays,
            SortOrder::Plays => SortOrder::Name,
        }
    }
}

#[derive(Debug, Default)]
pub struct CollectionState {
    pub username: String,
    pub games: Vec<BoardGame>,
    /// Selected game index into the sorted list.
    pub selected: usize,
    /// Vertical scroll offset for when games exceed terminal height.
    pub scroll_offset: u16,
    pub sort: SortOrder,
    /// Wall-clock time of the last successful load, for the status line.
    pub loaded_at: Option<String>,
}

impl CollectionState {
    /// Store a freshly fetched collection and apply the active sort.
    pub fn load(&mut self, games: Vec<BoardGame>) {
        self.games = games;
        self.apply_sort();
        self.selected = 0;
        self.scroll_offset = 0;
        self.loaded_at = Some(Local::now().format("%H:%M").to_string());
    }

    /// Advance to the next sort order, keeping the same game selected.
    pub fn cycle_sort(&mut self) {
        let keep = self.selected_game_id();
        self.sort = self.sort.next();
        self.apply_sort();
        if let Some(id) = keep
            && let Some(position) = self.games.iter().position(|g| g.id == id)
        {
            self.selected = position;
        }
    }

    pub fn navigate_down(&mut self) {
        let max = self.games.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_game(&self) -> Option<&BoardGame> {
        self.games.get(self.selected)
    }

    pub fn selected_game_id(&self) -> Option<String> {
        self.selected_game().map(|g| g.id.clone())
    }

    fn apply_sort(&mut self) {
        match self.sort {
            SortOrder::Name => self
                .games
                .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
            // Newest first; unparseable years ("N/A") sink to the bottom.
            SortOrder::Year => self.games.sort_by(|a, b| {
                year_key(b)
                    .cmp(&year_key(a))
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }),
            SortOrder::Plays => self.games.sort_by(|a, b| {
                b.num_plays
                    .cmp(&a.num_plays)
                    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }),
        }
    }
}

fn year_key(game: &BoardGame) -> i32 {
    game.year_published.trim().parse::<i32>().unwrap_or(i32::MIN)
}

// ---------------------------------------------------------------------------
// Game detail state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DetailState {
    pub details: Option<GameDetails>,
    pub scroll_offset: u16,
}

// ---------------------------------------------------------------------------
// Username prompt state
// ---------------------------------------------------------------------------

/// Modal text input for picking whose shelf to load. Active on startup
/// when no username is configured, and again on demand via the `u` key.
#[derive(Debug, Default)]
pub struct PromptState {
    pub active: bool,
    pub input: String,
}

impl PromptState {
    pub fn begin(&mut self, current: &str) {
        self.active = true;
        self.input = current.to_owned();
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.input.clear();
    }

    /// Returns the trimmed username, or `None` if the input was empty.
    pub fn submit(&mut self) -> Option<String> {
        let username = self.input.trim().to_owned();
        if username.is_empty() {
            return None;
        }
        self.active = false;
        self.input.clear();
        Some(username)
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub collection: CollectionState,
    pub detail: DetailState,
    pub prompt: PromptState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, name: &str, year: &str, plays: u32) -> BoardGame {
        BoardGame {
            id: id.to_owned(),
            name: name.to_owned(),
            year_published: year.to_owned(),
            num_plays: plays,
            ..BoardGame::default()
        }
    }

    fn shelf() -> Vec<BoardGame> {
        vec![
            game("1", "Wingspan", "2019", 3),
            game("2", "agricola", "2007", 12),
            game("3", "Brass", "N/A", 5),
        ]
    }

    #[test]
    fn load_sorts_by_name_case_insensitively() {
        let mut state = CollectionState::default();
        state.load(shelf());
        let names: Vec<_> = state.games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["agricola", "Brass", "Wingspan"]);
    }

    #[test]
    fn year_sort_puts_unparseable_years_last() {
        let mut state = CollectionState { sort: SortOrder::Year, ..Default::default() };
        state.load(shelf());
        let names: Vec<_> = state.games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Wingspan", "agricola", "Brass"]);
    }

    #[test]
    fn cycling_sort_keeps_the_selected_game() {
        let mut state = CollectionState::default();
        state.load(shelf());
        state.selected = 2; // Wingspan under name sort
        state.cycle_sort(); // name -> year
        assert_eq!(state.sort, SortOrder::Year);
        assert_eq!(state.selected_game().unwrap().name, "Wingspan");
    }

    #[test]
    fn navigation_clamps_to_the_list() {
        let mut state = CollectionState::default();
        state.load(shelf());
        state.navigate_up();
        assert_eq!(state.selected, 0);
        for _ in 0..10 {
            state.navigate_down();
        }
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn prompt_submit_trims_and_rejects_empty_input() {
        let mut prompt = PromptState::default();
        prompt.begin("");
        prompt.input = "   ".to_owned();
        assert_eq!(prompt.submit(), None);
        assert!(prompt.active, "empty submit keeps the prompt open");

        prompt.input = "  erikschmidt  ".to_owned();
        assert_eq!(prompt.submit(), Some("erikschmidt".to_owned()));
        assert!(!prompt.active);
    }
}
