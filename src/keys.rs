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
    let mut request = None;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Tournaments),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Stats),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Issues),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Tournament list
        (MenuItem::Tournaments, Char('j') | KeyCode::Down, _) => guard.tournament_down(),
        (MenuItem::Tournaments, Char('k') | KeyCode::Up, _) => guard.tournament_up(),
        (MenuItem::Tournaments, KeyCode::Enter, _) => request = guard.tournament_select(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => guard.bracket_next_round(),
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => guard.bracket_prev_round(),
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => guard.bracket_match_down(),
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => guard.bracket_match_up(),
        (MenuItem::Bracket, Char('w') | KeyCode::Tab, _) => guard.bracket_cycle_pane(),

        // Issues scrolling
        (MenuItem::Issues, Char('j') | KeyCode::Down, _) => guard.issues_scroll_down(),
        (MenuItem::Issues, Char('k') | KeyCode::Up, _) => guard.issues_scroll_up(),

        // Global
        (_, Char('R'), _) => request = Some(guard.reload_request()),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if let Some(request) = request {
        drop(guard);
        let _ = network_requests.send(request).await;
    }
}
