use crate::{BracketFormat, BracketSide, Match};
use serde::Serialize;

/// The renderable shape of a tournament. Borrows the caller's matches; nothing
/// is copied or reordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bracket<'a> {
    /// Input order, ungrouped. The renderer groups by round label.
    Single(Vec<&'a Match>),
    Double(DoubleBracket<'a>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DoubleBracket<'a> {
    /// Upper rounds plus the grand final.
    pub winners: Vec<&'a Match>,
    pub consolation: Vec<&'a Match>,
    /// Matches whose round label names neither half. Kept so malformed feeds
    /// stay visible instead of disappearing from the bracket.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unclassified: Vec<&'a Match>,
}

impl<'a> DoubleBracket<'a> {
    pub fn side(&self, side: BracketSide) -> &[&'a Match] {
        match side {
            BracketSide::Winners => &self.winners,
            BracketSide::Consolation => &self.consolation,
        }
    }
}

impl<'a> Bracket<'a> {
    pub fn format(&self) -> BracketFormat {
        match self {
            Bracket::Single(_) => BracketFormat::SingleElimination,
            Bracket::Double(_) => BracketFormat::DoubleElimination,
        }
    }

    /// Every match in every bucket.
    pub fn len(&self) -> usize {
        match self {
            Bracket::Single(matches) => matches.len(),
            Bracket::Double(d) => d.winners.len() + d.consolation.len() + d.unclassified.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn unclassified(&self) -> &[&'a Match] {
        match self {
            Bracket::Single(_) => &[],
            Bracket::Double(d) => &d.unclassified,
        }
    }
}

/// Split a validated match list into the shape the renderer expects.
///
/// Double-elimination membership is decided purely by each match's parsed round
/// label; routing ids are never followed. Does not log, so it is safe to call
/// on every redraw.
pub fn partition(matches: &[Match], format: BracketFormat) -> Bracket<'_> {
    match format {
        BracketFormat::SingleElimination => Bracket::Single(matches.iter().collect()),
        BracketFormat::DoubleElimination => {
            let mut bracket = DoubleBracket::default();
            for m in matches {
                match m.round.side() {
                    Some(BracketSide::Winners) => bracket.winners.push(m),
                    Some(BracketSide::Consolation) => bracket.consolation.push(m),
                    None => bracket.unclassified.push(m),
                }
            }
            Bracket::Double(bracket)
        }
    }
}

/// One column of the drawn bracket: all matches sharing a round label.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundGroup<'a> {
    pub label: &'a str,
    pub matches: Vec<&'a Match>,
}

/// Group matches by `tournamentRoundText`, ordering groups by first appearance
/// and keeping input order within each group.
pub fn group_rounds<'a>(matches: &[&'a Match]) -> Vec<RoundGroup<'a>> {
    let mut groups: Vec<RoundGroup<'a>> = Vec::new();
    for &m in matches {
        let label = m.tournament_round_text.as_str();
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.matches.push(m),
            None => groups.push(RoundGroup { label, matches: vec![m] }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_match;
    use crate::{MatchId, classify};
    use serde_json::json;

    fn ids(matches: &[&Match]) -> Vec<String> {
        matches.iter().map(|m| m.id.to_string()).collect()
    }

    fn double_list() -> Vec<Match> {
        let mut matches = vec![
            sample_match("1", "W1"),
            sample_match("2", "W1"),
            sample_match("3", "L1"),
            sample_match("4", "W2"),
            sample_match("5", "L2"),
            sample_match("6", "GF"),
        ];
        matches[0].next_loser_match_id = Some(MatchId::from("3"));
        matches
    }

    #[test]
    fn single_elimination_returns_input_order() {
        let matches = vec![sample_match("b", "2"), sample_match("a", "1"), sample_match("c", "1")];
        let bracket = partition(&matches, BracketFormat::SingleElimination);
        match &bracket {
            Bracket::Single(list) => assert_eq!(ids(list), vec!["b", "a", "c"]),
            other => panic!("expected single bracket, got {other:?}"),
        }
        assert!(std::ptr::eq(bracket_first(&bracket), &matches[0]));
    }

    fn bracket_first<'a>(bracket: &Bracket<'a>) -> &'a Match {
        match bracket {
            Bracket::Single(list) => list[0],
            Bracket::Double(d) => d.winners[0],
        }
    }

    #[test]
    fn double_elimination_splits_by_round_label() {
        let matches = double_list();
        let bracket = partition(&matches, classify(&matches));
        let Bracket::Double(d) = &bracket else {
            panic!("expected double bracket");
        };
        assert_eq!(ids(&d.winners), vec!["1", "2", "4", "6"]);
        assert_eq!(ids(&d.consolation), vec!["3", "5"]);
        assert!(d.unclassified.is_empty());
        assert_eq!(bracket.len(), matches.len());
    }

    #[test]
    fn grand_final_sits_with_winners_even_when_fed_from_consolation() {
        let mut matches = double_list();
        matches[4].next_match_id = Some(MatchId::from("6"));
        let bracket = partition(&matches, BracketFormat::DoubleElimination);
        let Bracket::Double(d) = bracket else { panic!("expected double bracket") };
        assert_eq!(d.winners.last().map(|m| m.id.as_str()), Some("6"));
    }

    #[test]
    fn unrecognized_labels_go_to_unclassified() {
        let mut matches = double_list();
        matches.push(sample_match("7", "Pool A"));
        matches.push(sample_match("8", "3"));
        let bracket = partition(&matches, BracketFormat::DoubleElimination);
        assert_eq!(ids(bracket.unclassified()), vec!["7", "8"]);
        assert_eq!(bracket.len(), matches.len());
    }

    #[test]
    fn named_stages_keep_their_side() {
        let mut matches = double_list();
        matches.push(sample_match("7", "Winners Final"));
        matches.push(sample_match("8", "Consolation Semifinal"));
        matches.push(sample_match("9", "Losers Final"));
        let Bracket::Double(d) = partition(&matches, BracketFormat::DoubleElimination) else {
            panic!("expected double bracket");
        };
        assert_eq!(ids(&d.winners), vec!["1", "2", "4", "6", "7"]);
        assert_eq!(ids(&d.consolation), vec!["3", "5", "8", "9"]);
        assert!(d.unclassified.is_empty());
    }

    #[test]
    fn empty_inputs() {
        assert!(partition(&[], BracketFormat::SingleElimination).is_empty());
        let double = partition(&[], BracketFormat::DoubleElimination);
        assert_eq!(double, Bracket::Double(DoubleBracket::default()));
        assert_eq!(serde_json::to_value(&double).unwrap(), json!({ "winners": [], "consolation": [] }));
        assert_eq!(
            serde_json::to_value(partition(&[], BracketFormat::SingleElimination)).unwrap(),
            json!([])
        );
    }

    #[test]
    fn side_accessor_matches_buckets() {
        let matches = double_list();
        let Bracket::Double(d) = partition(&matches, BracketFormat::DoubleElimination) else {
            panic!("expected double bracket");
        };
        assert_eq!(d.side(BracketSide::Winners).len(), 4);
        assert_eq!(d.side(BracketSide::Consolation).len(), 2);
    }

    #[test]
    fn group_rounds_keeps_first_appearance_order() {
        let matches = vec![
            sample_match("1", "1"),
            sample_match("2", "1"),
            sample_match("5", "2"),
            sample_match("3", "1"),
            sample_match("6", "3"),
        ];
        let refs: Vec<&Match> = matches.iter().collect();
        let groups = group_rounds(&refs);
        let labels: Vec<&str> = groups.iter().map(|g| g.label).collect();
        assert_eq!(labels, vec!["1", "2", "3"]);
        assert_eq!(ids(&groups[0].matches), vec!["1", "2", "3"]);
        assert!(group_rounds(&[]).is_empty());
    }
}
