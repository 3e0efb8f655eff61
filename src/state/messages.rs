use crate::state::network::LoadingState;
use bgg_api::{BoardGame, GameDetails};
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadCollection { username: String },
    LoadGameDetails { game_id: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    CollectionLoaded { username: String, games: Vec<BoardGame> },
    GameDetailsLoaded { details: GameDetails },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
