use crate::Match;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketFormat {
    SingleElimination,
    DoubleElimination,
}

impl BracketFormat {
    pub fn is_double(&self) -> bool {
        *self == BracketFormat::DoubleElimination
    }

    pub fn label(&self) -> &'static str {
        match self {
            BracketFormat::SingleElimination => "Single elimination",
            BracketFormat::DoubleElimination => "Double elimination",
        }
    }
}

impl fmt::Display for BracketFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tournament is double elimination iff any match routes its loser somewhere.
///
/// Only the presence of loser routing matters, not whether it points at a real
/// match, so this is one pass with an early exit. No matches means single.
pub fn is_double_elimination(matches: &[Match]) -> bool {
    matches.iter().any(|m| m.next_loser_match_id.is_some())
}

pub fn classify(matches: &[Match]) -> BracketFormat {
    if is_double_elimination(matches) {
        BracketFormat::DoubleElimination
    } else {
        BracketFormat::SingleElimination
    }
}
