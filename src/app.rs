use crate::state::app_settings::{AppSettings, BracketSource};
use crate::state::app_state::AppState;
use crate::state::messages::NetworkRequest;
use log::info;
use serde_json::Value;
use wrestling_api::TournamentInfo;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Tournaments,
    Bracket,
    Stats,
    Issues,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        Self::with_settings(AppSettings::load())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }
        Self { settings, state: AppState::default() }
    }

    /// What to ask the network worker for first.
    ///
    /// Snapshot sources hold exactly one bracket, so they open straight into it.
    pub fn startup_request(&self) -> NetworkRequest {
        match (&self.settings.source, &self.settings.initial_tournament) {
            (_, Some(id)) => NetworkRequest::LoadBracket { tournament_id: Some(id.clone()) },
            (BracketSource::Api { .. }, None) => NetworkRequest::LoadTournaments,
            (BracketSource::File(_) | BracketSource::Demo, None) => {
                NetworkRequest::LoadBracket { tournament_id: None }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_tournaments_loaded(&mut self, tournaments: Vec<TournamentInfo>) {
        self.state.last_error = None;
        self.state.tournaments.load(tournaments);
    }

    pub fn on_bracket_loaded(&mut self, tournament_id: Option<String>, payload: Value) {
        self.state.last_error = None;
        if self.state.bracket.load(tournament_id, payload) {
            let analysis = &self.state.bracket.analysis;
            info!(
                "bracket analysed: valid={} format={} matches={}",
                analysis.validation.is_valid,
                analysis.format.map(|f| f.label()).unwrap_or("-"),
                analysis.stats.total_matches
            );
            self.state.issues_scroll = 0;
        }
        if !self.state.bracket.analysis.is_renderable() {
            self.update_tab(MenuItem::Issues);
        } else if self.state.active_tab == MenuItem::Tournaments {
            self.update_tab(MenuItem::Bracket);
        }
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
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
    // Tournament list
    // -----------------------------------------------------------------------

    pub fn tournament_down(&mut self) {
        self.state.tournaments.select_next();
    }

    pub fn tournament_up(&mut self) {
        self.state.tournaments.select_prev();
    }

    /// The bracket request for the highlighted tournament, if there is one.
    pub fn tournament_select(&self) -> Option<NetworkRequest> {
        let selected = self.state.tournaments.selected()?;
        Some(NetworkRequest::LoadBracket { tournament_id: Some(selected.id.clone()) })
    }

    /// Re-fetch whatever the active view shows.
    pub fn reload_request(&self) -> NetworkRequest {
        match self.state.active_tab {
            MenuItem::Tournaments => NetworkRequest::LoadTournaments,
            _ if self.state.bracket.has_data() => NetworkRequest::LoadBracket {
                tournament_id: self.state.bracket.tournament_id.clone(),
            },
            _ => self.startup_request(),
        }
    }

    // -----------------------------------------------------------------------
    // Bracket navigation, delegated to BracketState
    // -----------------------------------------------------------------------

    pub fn bracket_next_round(&mut self) {
        self.state.bracket.navigate_round_next();
    }

    pub fn bracket_prev_round(&mut self) {
        self.state.bracket.navigate_round_prev();
    }

    pub fn bracket_match_down(&mut self) {
        self.state.bracket.navigate_match_down();
    }

    pub fn bracket_match_up(&mut self) {
        self.state.bracket.navigate_match_up();
    }

    pub fn bracket_cycle_pane(&mut self) {
        self.state.bracket.cycle_pane();
    }

    pub fn issues_scroll_down(&mut self) {
        self.state.issues_scroll = self.state.issues_scroll.saturating_add(1);
    }

    pub fn issues_scroll_up(&mut self) {
        self.state.issues_scroll = self.state.issues_scroll.saturating_sub(1);
    }
}
