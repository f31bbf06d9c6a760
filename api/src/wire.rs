/// Wire types for the bracket endpoint of the wrestling REST API.
/// Endpoint: {base}/tournaments/{id}/bracket
///
/// These are deliberately lenient; structural checks live in `validate.rs` and
/// the mapping into domain types lives in `ingest.rs`.
use serde::Deserialize;
use serde_json::{Number, Value};

/// Any non-null JSON value in a field the validator only checks for presence.
/// Ids and round labels arrive as strings or numbers; feeds occasionally send
/// numbers for names or booleans for ids.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WireScalar {
    Text(String),
    Number(Number),
    Flag(bool),
    Other(Value),
}

impl WireScalar {
    /// Always succeeds; arrays and objects come back as their JSON text.
    pub fn into_string(self) -> String {
        match self {
            WireScalar::Text(s) => s,
            WireScalar::Number(n) => n.to_string(),
            WireScalar::Flag(b) => b.to_string(),
            WireScalar::Other(v) => v.to_string(),
        }
    }

    /// Printable scalars only.
    pub fn into_text(self) -> Option<String> {
        match self {
            WireScalar::Other(_) => None,
            other => Some(other.into_string()),
        }
    }

    /// Strings and numbers, the only values that can reference a match.
    pub fn into_id(self) -> Option<String> {
        match self {
            WireScalar::Text(s) => Some(s),
            WireScalar::Number(n) => Some(n.to_string()),
            WireScalar::Flag(_) | WireScalar::Other(_) => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, WireScalar::Flag(true))
    }
}

#[derive(Deserialize, Default, Debug)]
pub struct WirePayload {
    /// Left raw so a malformed header cannot take the match list down with it.
    #[serde(default)]
    pub tournament: Option<Value>,
    #[serde(default)]
    pub matches: Vec<WireMatch>,
}

/// Tournament header. Field names are snake_case on the wire.
#[derive(Deserialize, Default, Debug, Clone)]
pub struct WireTournament {
    pub id: Option<WireScalar>,
    pub name: Option<WireScalar>,
    pub weight_class: Option<WireScalar>,
    /// Usually a number, occasionally a quoted year.
    pub year: Option<WireScalar>,
    pub division: Option<WireScalar>,
}

impl WireTournament {
    /// `None` for anything that is not a header object.
    pub fn from_header(raw: &Value) -> Option<Self> {
        if !raw.is_object() {
            return None;
        }
        Self::deserialize(raw).ok()
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WireMatch {
    pub id: WireScalar,
    #[serde(default)]
    pub name: Option<WireScalar>,
    #[serde(default)]
    pub next_match_id: Option<WireScalar>,
    /// Present only in double-elimination feeds.
    #[serde(default)]
    pub next_loser_match_id: Option<WireScalar>,
    #[serde(default)]
    pub tournament_round_text: Option<WireScalar>,
    #[serde(default)]
    pub start_time: Option<WireScalar>,
    #[serde(default)]
    pub state: Option<WireScalar>,
    pub participants: Vec<WireParticipant>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireParticipant {
    pub id: WireScalar,
    #[serde(default)]
    pub name: Option<WireScalar>,
    #[serde(default)]
    pub result_text: Option<WireScalar>,
    #[serde(default)]
    pub is_winner: Option<WireScalar>,
    #[serde(default)]
    pub status: Option<WireScalar>,
}

/// `GET {base}/tournaments` returns either a bare array or `{ "tournaments": [...] }`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum WireTournamentList {
    Bare(Vec<WireTournament>),
    Wrapped { tournaments: Vec<WireTournament> },
}

impl Default for WireTournamentList {
    fn default() -> Self {
        WireTournamentList::Bare(Vec::new())
    }
}

impl WireTournamentList {
    pub fn into_vec(self) -> Vec<WireTournament> {
        match self {
            WireTournamentList::Bare(list) | WireTournamentList::Wrapped { tournaments: list } => list,
        }
    }
}
