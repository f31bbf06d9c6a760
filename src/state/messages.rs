use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use serde_json::Value;
use wrestling_api::TournamentInfo;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadTournaments,
    /// `None` asks the source for its only bracket (file and demo sources).
    LoadBracket { tournament_id: Option<String> },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    TournamentsLoaded { tournaments: Vec<TournamentInfo> },
    /// Raw payload; validation and partitioning happen on the UI side.
    BracketLoaded { tournament_id: Option<String>, payload: Value },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
