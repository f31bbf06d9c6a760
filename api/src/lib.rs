pub mod analysis;
pub mod client;
pub mod format;
pub mod ingest;
pub mod partition;
pub mod round;
pub mod stats;
pub mod validate;
pub mod wire;

pub use analysis::Analysis;
pub use format::{BracketFormat, classify, is_double_elimination};
pub use ingest::{IngestError, ingest_tournament};
pub use partition::{Bracket, DoubleBracket, RoundGroup, group_rounds, partition};
pub use round::{BracketSide, RoundLabel};
pub use stats::TournamentStats;
pub use validate::{ValidationReport, validate_tournament};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types, independent of the API wire format
// ---------------------------------------------------------------------------

/// Match and tournament identifier. The API sends either strings or numbers;
/// both are normalised to their textual form so `7` and `"7"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read an id out of an arbitrary JSON value. Only strings and numbers are ids.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl Serialize for MatchId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// The `tournament` header that accompanies a match list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TournamentInfo {
    pub id: String,
    pub name: Option<String>,
    pub weight_class: Option<String>,
    pub year: Option<u16>,
    pub division: Option<String>,
}

impl TournamentInfo {
    /// "2025 PIAA AAA 152 lbs" style title, skipping whatever is unknown.
    pub fn title(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            parts.push(name.to_owned());
        }
        if let Some(division) = self.division.as_deref().filter(|d| !d.trim().is_empty()) {
            parts.push(division.to_owned());
        }
        if let Some(weight) = self.weight_class.as_deref().filter(|w| !w.trim().is_empty()) {
            parts.push(weight.to_owned());
        }
        if parts.is_empty() {
            format!("Tournament {}", self.id)
        } else {
            parts.join(" ")
        }
    }
}

/// A single contest between two participants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub name: String,
    pub next_match_id: Option<MatchId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_loser_match_id: Option<MatchId>,
    pub tournament_round_text: String,
    pub start_time: Option<String>,
    pub state: MatchState,
    /// First slot / second slot, not seed order.
    pub participants: [Participant; 2],
    /// Parsed once from `tournament_round_text` when the match is ingested.
    #[serde(skip)]
    pub round: RoundLabel,
}

impl Match {
    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    pub fn winner(&self) -> Option<&Participant> {
        self.participants.iter().find(|p| p.is_winner)
    }

    /// `startTime` is informational; unparseable values are simply not shown.
    pub fn start_time_utc(&self) -> Option<DateTime<Utc>> {
        self.start_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// May be a placeholder sentinel while the slot is undetermined.
    pub id: String,
    pub name: Option<String>,
    pub result_text: Option<String>,
    pub is_winner: bool,
    pub status: Option<ParticipantStatus>,
}

impl Participant {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("TBD")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantStatus {
    Played,
}

/// `SCHEDULED → DONE` or `SCHEDULED → SCORE_DONE`. Both terminal states count
/// as completed; they are kept apart so a score entered but not yet finalised
/// can be told from an official result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchState {
    #[default]
    Scheduled,
    Done,
    ScoreDone,
}

impl MatchState {
    pub fn is_completed(&self) -> bool {
        matches!(self, MatchState::Done | MatchState::ScoreDone)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchState::Scheduled => "Scheduled",
            MatchState::Done => "Final",
            MatchState::ScoreDone => "Score in",
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn participant(id: &str, name: &str, is_winner: bool) -> Participant {
        Participant {
            id: id.into(),
            name: Some(name.into()),
            result_text: None,
            is_winner,
            status: None,
        }
    }

    pub fn sample_match(id: &str, round: &str) -> Match {
        Match {
            id: MatchId::from(id),
            name: format!("Match {id}"),
            next_match_id: None,
            next_loser_match_id: None,
            tournament_round_text: round.into(),
            start_time: None,
            state: MatchState::Scheduled,
            participants: [
                participant(&format!("{id}-a"), "Red", false),
                participant(&format!("{id}-b"), "Green", false),
            ],
            round: RoundLabel::parse(round),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn match_ids_from_numbers_and_strings_compare_equal() {
        assert_eq!(MatchId::from_json(&json!(7)), Some(MatchId::from("7")));
        assert_eq!(MatchId::from_json(&json!("7")), Some(MatchId::from("7")));
        assert_eq!(MatchId::from_json(&json!(null)), None);
        assert_eq!(MatchId::from_json(&json!({"id": 7})), None);
    }

    #[test]
    fn both_terminal_states_count_as_completed() {
        assert!(!MatchState::Scheduled.is_completed());
        assert!(MatchState::Done.is_completed());
        assert!(MatchState::ScoreDone.is_completed());
    }

    #[test]
    fn participant_without_name_displays_tbd() {
        let mut p = test_support::participant("x", "Sanderson", false);
        assert_eq!(p.display_name(), "Sanderson");
        p.name = None;
        assert_eq!(p.display_name(), "TBD");
        p.name = Some("  ".into());
        assert_eq!(p.display_name(), "TBD");
    }

    #[test]
    fn start_time_parses_rfc3339_only() {
        let mut m = test_support::sample_match("1", "1");
        m.start_time = Some("2025-02-21T14:30:00Z".into());
        assert!(m.start_time_utc().is_some());
        m.start_time = Some("Friday afternoon".into());
        assert!(m.start_time_utc().is_none());
    }

    #[test]
    fn winner_is_the_flagged_participant() {
        let mut m = test_support::sample_match("1", "1");
        assert!(m.winner().is_none());
        m.participants[1].is_winner = true;
        assert_eq!(m.winner().map(|p| p.id.as_str()), Some("1-b"));
    }

    #[test]
    fn tournament_title_skips_unknown_parts() {
        let info = TournamentInfo {
            id: "9".into(),
            name: Some("District 3 Championships".into()),
            weight_class: Some("152".into()),
            year: Some(2025),
            division: None,
        };
        assert_eq!(info.title(), "2025 District 3 Championships 152");
        assert_eq!(TournamentInfo { id: "9".into(), ..Default::default() }.title(), "Tournament 9");
    }

    #[test]
    fn match_serializes_in_wire_shape() {
        let m = test_support::sample_match("3", "W1");
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["id"], json!("3"));
        assert_eq!(v["tournamentRoundText"], json!("W1"));
        assert_eq!(v["state"], json!("SCHEDULED"));
        assert_eq!(v["participants"].as_array().map(Vec::len), Some(2));
        assert!(v.get("round").is_none());
        assert!(v.get("nextLoserMatchId").is_none());
    }
}
