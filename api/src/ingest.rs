use crate::wire::{WireMatch, WireParticipant, WirePayload, WireScalar, WireTournament};
use crate::{Match, MatchId, MatchState, Participant, ParticipantStatus, RoundLabel, TournamentInfo};
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug)]
pub enum IngestError {
    /// The payload does not deserialize into the wire shape at all.
    Shape(serde_json::Error),
    ParticipantCount { match_id: String, found: usize },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Shape(e) => write!(f, "Malformed match list: {e}"),
            IngestError::ParticipantCount { match_id, found } => {
                write!(f, "Match {match_id} has {found} participants, expected 2")
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Shape(e) => Some(e),
            IngestError::ParticipantCount { .. } => None,
        }
    }
}

/// Map a validated tournament payload into domain types.
///
/// Any payload `validate_tournament` accepts ingests: scalar fields take
/// whatever JSON type they are given, and a header that is not an object is
/// dropped. Payloads the validator would reject come back as an `IngestError`.
pub fn ingest_tournament(
    raw: &Value,
) -> Result<(Option<TournamentInfo>, Vec<Match>), IngestError> {
    let payload = WirePayload::deserialize(raw).map_err(IngestError::Shape)?;
    let tournament = payload
        .tournament
        .as_ref()
        .and_then(WireTournament::from_header)
        .and_then(map_tournament);
    let matches = payload
        .matches
        .into_iter()
        .map(map_match)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((tournament, matches))
}

/// A tournament header without an id cannot be selected or reloaded, so it is dropped.
pub(crate) fn map_tournament(t: WireTournament) -> Option<TournamentInfo> {
    let Some(id) = t.id.and_then(WireScalar::into_id) else {
        debug!("tournament header without id ignored");
        return None;
    };
    let year = t
        .year
        .and_then(WireScalar::into_text)
        .and_then(|y| y.trim().parse::<u16>().ok());
    Some(TournamentInfo {
        id,
        name: t.name.and_then(WireScalar::into_text),
        weight_class: t.weight_class.and_then(WireScalar::into_text),
        year,
        division: t.division.and_then(WireScalar::into_text),
    })
}

fn map_match(m: WireMatch) -> Result<Match, IngestError> {
    let id = MatchId::new(m.id.into_string());
    let participants: [WireParticipant; 2] =
        m.participants
            .try_into()
            .map_err(|list: Vec<WireParticipant>| IngestError::ParticipantCount {
                match_id: id.to_string(),
                found: list.len(),
            })?;
    let tournament_round_text = m
        .tournament_round_text
        .and_then(WireScalar::into_id)
        .unwrap_or_default();
    let state = m.state.and_then(WireScalar::into_text);

    Ok(Match {
        round: RoundLabel::parse(&tournament_round_text),
        state: parse_state(state.as_deref(), &id),
        name: m.name.map(WireScalar::into_string).unwrap_or_default(),
        next_match_id: m.next_match_id.and_then(WireScalar::into_id).map(MatchId::new),
        next_loser_match_id: m
            .next_loser_match_id
            .and_then(WireScalar::into_id)
            .map(MatchId::new),
        tournament_round_text,
        start_time: m
            .start_time
            .and_then(WireScalar::into_text)
            .filter(|t| !t.trim().is_empty()),
        participants: participants.map(map_participant),
        id,
    })
}

fn map_participant(p: WireParticipant) -> Participant {
    let status = p.status.and_then(WireScalar::into_text);
    let status = match status.as_deref() {
        None => None,
        Some(s) if s.eq_ignore_ascii_case("PLAYED") => Some(ParticipantStatus::Played),
        Some(other) => {
            debug!("unknown participant status {other:?} treated as not started");
            None
        }
    };
    Participant {
        id: p.id.into_string(),
        name: p.name.and_then(WireScalar::into_text),
        result_text: p.result_text.and_then(WireScalar::into_text),
        is_winner: p.is_winner.is_some_and(|w| w.is_true()),
        status,
    }
}

fn parse_state(state: Option<&str>, match_id: &MatchId) -> MatchState {
    match state.map(str::to_ascii_uppercase).as_deref() {
        Some("DONE") => MatchState::Done,
        Some("SCORE_DONE") => MatchState::ScoreDone,
        None | Some("") | Some("SCHEDULED") => MatchState::Scheduled,
        Some(other) => {
            debug!("match {match_id}: unknown state {other:?} treated as scheduled");
            MatchState::Scheduled
        }
    }
}
