use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Summary counts shown alongside the bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentStats {
    /// Distinct round labels, not the highest round number. Upper and lower
    /// rounds with the same number count separately.
    pub total_rounds: usize,
    pub total_matches: usize,
    pub completed_matches: usize,
    pub remaining_matches: usize,
}

impl TournamentStats {
    /// Works on unvalidated data: it is usually called before validation has
    /// finished. Accepts the tournament object or a bare match array; any other
    /// shape yields all zeros.
    pub fn from_raw(raw: Option<&Value>) -> Self {
        let matches: &[Value] = match raw {
            Some(Value::Array(items)) => items,
            Some(other) => other
                .get("matches")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            None => &[],
        };

        let rounds: HashSet<String> = matches
            .iter()
            .filter_map(|m| match m.get("tournamentRoundText")? {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect();
        let completed = matches
            .iter()
            .filter(|m| {
                matches!(
                    m.get("state").and_then(Value::as_str),
                    Some("DONE" | "SCORE_DONE")
                )
            })
            .count();

        Self::from_counts(rounds.len(), matches.len(), completed)
    }

    fn from_counts(total_rounds: usize, total_matches: usize, completed_matches: usize) -> Self {
        Self {
            total_rounds,
            total_matches,
            completed_matches,
            remaining_matches: total_matches - completed_matches,
        }
    }

    /// Share of completed matches, 0.0 for an empty tournament.
    pub fn progress(&self) -> f64 {
        if self.total_matches == 0 {
            0.0
        } else {
            self.completed_matches as f64 / self.total_matches as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_bout(id: u32, round: &str, state: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Bout {id}"),
            "tournamentRoundText": round,
            "state": state,
            "participants": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }]
        })
    }

    #[test]
    fn absent_or_odd_input_is_all_zero() {
        let zero = TournamentStats::default();
        assert_eq!(TournamentStats::from_raw(None), zero);
        assert_eq!(TournamentStats::from_raw(Some(&Value::Null)), zero);
        assert_eq!(TournamentStats::from_raw(Some(&json!("bracket"))), zero);
        assert_eq!(TournamentStats::from_raw(Some(&json!({ "matches": 3 }))), zero);
        assert_eq!(TournamentStats::from_raw(Some(&json!({ "matches": [] }))), zero);
    }

    #[test]
    fn single_done_match() {
        let raw = json!({ "matches": [raw_bout(1, "1", "DONE")] });
        assert_eq!(
            TournamentStats::from_raw(Some(&raw)),
            TournamentStats { total_rounds: 1, total_matches: 1, completed_matches: 1, remaining_matches: 0 }
        );
    }

    #[test]
    fn eight_man_single_elimination_all_done() {
        let rounds = ["1", "1", "1", "1", "2", "2", "3"];
        let list: Vec<Value> = rounds
            .iter()
            .enumerate()
            .map(|(i, r)| raw_bout(i as u32 + 1, r, "DONE"))
            .collect();
        let stats = TournamentStats::from_raw(Some(&Value::Array(list)));
        assert_eq!(
            stats,
            TournamentStats { total_rounds: 3, total_matches: 7, completed_matches: 7, remaining_matches: 0 }
        );
        assert_eq!(stats.progress(), 1.0);
    }

    #[test]
    fn score_done_counts_as_completed() {
        let raw = json!({ "matches": [
            raw_bout(1, "W1", "DONE"),
            raw_bout(2, "W1", "SCORE_DONE"),
            raw_bout(3, "L1", "SCHEDULED"),
            raw_bout(4, "W2", "RUNNING"),
        ] });
        let stats = TournamentStats::from_raw(Some(&raw));
        assert_eq!(stats.completed_matches, 2);
        assert_eq!(stats.remaining_matches, 2);
        assert_eq!(stats.total_rounds, 3);
    }

    #[test]
    fn upper_and_lower_labels_are_distinct_rounds() {
        let raw = json!([raw_bout(1, "W1", "DONE"), raw_bout(2, "L1", "DONE"), raw_bout(3, "W1", "DONE")]);
        assert_eq!(TournamentStats::from_raw(Some(&raw)).total_rounds, 2);
    }

    #[test]
    fn completed_plus_remaining_is_total() {
        let list: Vec<Value> = (0..9u32)
            .map(|i| {
                let state = ["DONE", "SCORE_DONE", "SCHEDULED"][i as usize % 3];
                raw_bout(i, &(i % 4).to_string(), state)
            })
            .collect();
        let stats = TournamentStats::from_raw(Some(&Value::Array(list)));
        assert_eq!(stats.completed_matches + stats.remaining_matches, stats.total_matches);
        assert_eq!(stats.completed_matches, 6);
        assert_eq!(stats.total_rounds, 4);
    }

    #[test]
    fn numeric_labels_match_text_and_unlabelled_bouts_add_no_round() {
        let raw = json!({ "matches": [
            { "id": 1, "tournamentRoundText": 1, "state": "DONE" },
            { "id": 2, "tournamentRoundText": "1", "state": "SCHEDULED" },
            { "id": 3, "state": "DONE" }
        ] });
        let stats = TournamentStats::from_raw(Some(&raw));
        assert_eq!(stats.total_matches, 3);
        assert_eq!(stats.total_rounds, 1);
        assert_eq!(stats.completed_matches, 2);
    }

    #[test]
    fn serializes_camel_case() {
        let v = serde_json::to_value(TournamentStats::default()).unwrap();
        assert_eq!(
            v,
            json!({ "totalRounds": 0, "totalMatches": 0, "completedMatches": 0, "remainingMatches": 0 })
        );
    }
}
