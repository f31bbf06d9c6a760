use crate::app::MenuItem;
use chrono::Local;
use serde_json::Value;
use wrestling_api::{Analysis, Bracket, BracketSide, Match, RoundGroup, TournamentInfo, group_rounds};

// ---------------------------------------------------------------------------
// Tournament list state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TournamentListState {
    pub items: Vec<TournamentInfo>,
    pub selected: usize,
    /// False until the first listing arrives, so an empty list can be told
    /// apart from one that is still loading.
    pub loaded: bool,
}

impl TournamentListState {
    pub fn load(&mut self, items: Vec<TournamentInfo>) {
        self.items = items;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        self.loaded = true;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected(&self) -> Option<&TournamentInfo> {
        self.items.get(self.selected)
    }
}

// ---------------------------------------------------------------------------
// Bracket state
// ---------------------------------------------------------------------------

/// Which half of a double-elimination bracket is on screen.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BracketPane {
    #[default]
    Winners,
    Consolation,
    /// Matches whose round label names neither half.
    Unclassified,
}

impl BracketPane {
    pub fn label(&self) -> &'static str {
        match self {
            BracketPane::Winners => BracketSide::Winners.label(),
            BracketPane::Consolation => BracketSide::Consolation.label(),
            BracketPane::Unclassified => "Unclassified",
        }
    }
}

#[derive(Debug, Default)]
pub struct BracketState {
    pub analysis: Analysis,
    /// The snapshot the analysis was built from. A reload that returns the
    /// same value keeps the current analysis and selection.
    payload: Option<Value>,
    pub tournament_id: Option<String>,
    pub pane: BracketPane,
    pub selected_round: usize,
    pub selected_match: usize,
    pub loaded_at: Option<String>,
}

impl BracketState {
    /// Store a snapshot, re-running the analysis only when it changed.
    /// Returns true when the analysis was rebuilt.
    pub fn load(&mut self, tournament_id: Option<String>, payload: Value) -> bool {
        self.loaded_at = Some(Local::now().format("%H:%M:%S").to_string());

        let same_tournament = self.tournament_id == tournament_id;
        if same_tournament && self.payload.as_ref() == Some(&payload) {
            return false;
        }

        self.analysis = Analysis::from_value(Some(&payload));
        self.payload = Some(payload);
        self.tournament_id = tournament_id;

        if same_tournament {
            self.clamp_selection();
        } else {
            self.pane = BracketPane::Winners;
            self.selected_round = 0;
            self.selected_match = 0;
        }
        true
    }

    pub fn has_data(&self) -> bool {
        self.payload.is_some()
    }

    pub fn is_double(&self) -> bool {
        self.analysis.format.is_some_and(|f| f.is_double())
    }

    /// Matches shown in the current pane. Single-elimination brackets ignore
    /// the pane and show everything.
    pub fn pane_matches(&self) -> Vec<&Match> {
        match self.analysis.bracket() {
            None => Vec::new(),
            Some(Bracket::Single(list)) => list,
            Some(Bracket::Double(d)) => match self.pane {
                BracketPane::Winners => d.winners,
                BracketPane::Consolation => d.consolation,
                BracketPane::Unclassified => d.unclassified,
            },
        }
    }

    pub fn rounds(&self) -> Vec<RoundGroup<'_>> {
        group_rounds(&self.pane_matches())
    }

    pub fn selected_match(&self) -> Option<&Match> {
        let rounds = self.rounds();
        rounds
            .get(self.selected_round)?
            .matches
            .get(self.selected_match)
            .copied()
    }

    pub fn navigate_round_next(&mut self) {
        if self.selected_round + 1 < self.rounds().len() {
            self.selected_round += 1;
            self.clamp_match();
        }
    }

    pub fn navigate_round_prev(&mut self) {
        if self.selected_round > 0 {
            self.selected_round -= 1;
            self.clamp_match();
        }
    }

    pub fn navigate_match_down(&mut self) {
        if self.selected_match + 1 < self.matches_in_round() {
            self.selected_match += 1;
        }
    }

    pub fn navigate_match_up(&mut self) {
        self.selected_match = self.selected_match.saturating_sub(1);
    }

    /// Winners, then consolation, then unclassified when there is any.
    pub fn cycle_pane(&mut self) {
        if !self.is_double() {
            return;
        }
        let has_unclassified = self
            .analysis
            .bracket()
            .is_some_and(|b| !b.unclassified().is_empty());
        self.pane = match self.pane {
            BracketPane::Winners => BracketPane::Consolation,
            BracketPane::Consolation if has_unclassified => BracketPane::Unclassified,
            BracketPane::Consolation | BracketPane::Unclassified => BracketPane::Winners,
        };
        self.selected_round = 0;
        self.selected_match = 0;
    }

    fn matches_in_round(&self) -> usize {
        self.rounds()
            .get(self.selected_round)
            .map(|r| r.matches.len())
            .unwrap_or(0)
    }

    fn clamp_match(&mut self) {
        self.selected_match = self.selected_match.min(self.matches_in_round().saturating_sub(1));
    }

    fn clamp_selection(&mut self) {
        if self.pane == BracketPane::Unclassified
            && self.analysis.bracket().is_none_or(|b| b.unclassified().is_empty())
        {
            self.pane = BracketPane::Winners;
        }
        self.selected_round = self.selected_round.min(self.rounds().len().saturating_sub(1));
        self.clamp_match();
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
    pub tournaments: TournamentListState,
    pub bracket: BracketState,
    pub issues_scroll: u16,
}
