use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    // The username prompt captures all input while it is open.
    if guard.state.prompt.active {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Enter, _) => {
                if let Some(username) = guard.submit_user_prompt() {
                    drop(guard);
                    let _ = network_requests
                        .send(NetworkRequest::LoadCollection { username })
                        .await;
                }
            }
            (KeyCode::Esc, _) => guard.cancel_user_prompt(),
            (KeyCode::Backspace, _) => {
                guard.state.prompt.input.pop();
            }
            (Char(c), _) => guard.state.prompt.input.push(c),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Collection),
        (_, Char('2'), _) => guard.update_tab(MenuItem::GameDetail),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Collection navigation
        (MenuItem::Collection, Char('j') | KeyCode::Down, _) => guard.collection_down(),
        (MenuItem::Collection, Char('k') | KeyCode::Up, _) => guard.collection_up(),
        (MenuItem::Collection, Char('s'), _) => guard.cycle_sort(),
        (MenuItem::Collection, Char('u'), _) => guard.begin_user_prompt(),
        (MenuItem::Collection, Char('r'), _) => {
            if let Some(username) = guard.startup_username() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::LoadCollection { username })
                    .await;
                return;
            }
        }
        (MenuItem::Collection, KeyCode::Enter, _) => {
            if let Some(game_id) = guard.select_game() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::LoadGameDetails { game_id })
                    .await;
                return;
            }
        }

        // Game detail navigation
        (MenuItem::GameDetail, Char('j') | KeyCode::Down, _) => {
            guard.state.detail.scroll_offset = guard.state.detail.scroll_offset.saturating_add(1);
        }
        (MenuItem::GameDetail, Char('k') | KeyCode::Up, _) => {
            guard.state.detail.scroll_offset = guard.state.detail.scroll_offset.saturating_sub(1);
        }
        (MenuItem::GameDetail, KeyCode::Esc, _) => guard.update_tab(MenuItem::Collection),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
