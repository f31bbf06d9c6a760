use crate::MatchId;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

pub const TOURNAMENT_REQUIRED: &str = "Tournament data is required";
pub const MATCHES_REQUIRED: &str = "Tournament must have matches array";

/// Outcome of a structural check over raw tournament data.
///
/// `errors` block rendering; `warnings` describe data the bracket can still be
/// drawn from (dangling routing ids, duplicate ids, two flagged winners).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self { is_valid: errors.is_empty(), errors, warnings: Vec::new() }
    }
}

/// Check a raw value purporting to be tournament data.
///
/// Every defect is reported, not just the first. Matches and participants are
/// numbered from 1 in the messages.
pub fn validate_tournament(data: Option<&Value>) -> ValidationReport {
    let Some(data) = data.filter(|v| !v.is_null()) else {
        return ValidationReport::from_errors(vec![TOURNAMENT_REQUIRED.to_owned()]);
    };
    let Some(matches) = data.get("matches").and_then(Value::as_array) else {
        return ValidationReport::from_errors(vec![MATCHES_REQUIRED.to_owned()]);
    };

    let mut errors = Vec::new();
    for (idx, m) in matches.iter().enumerate() {
        check_match(idx + 1, m, &mut errors);
    }

    let mut report = ValidationReport::from_errors(errors);
    report.warnings = routing_warnings(matches);
    report
}

fn check_match(n: usize, m: &Value, errors: &mut Vec<String>) {
    if is_missing(m.get("id")) {
        errors.push(format!("Match {n}: missing id"));
    }
    if is_missing(m.get("name")) {
        errors.push(format!("Match {n}: missing name"));
    }

    let Some(participants) = m.get("participants").and_then(Value::as_array) else {
        errors.push(format!("Match {n}: missing participants array"));
        return;
    };
    if participants.len() != 2 {
        errors.push(format!(
            "Match {n}: must have exactly 2 participants (found {})",
            participants.len()
        ));
    }
    for (pidx, p) in participants.iter().enumerate() {
        let p_n = pidx + 1;
        if is_missing(p.get("id")) {
            errors.push(format!("Match {n}, participant {p_n}: missing id"));
        }
        if is_missing(p.get("name")) {
            errors.push(format!("Match {n}, participant {p_n}: missing name"));
        }
    }
}

/// Absent, `null` and `""` all count as missing. `0` is a perfectly good id.
fn is_missing(field: Option<&Value>) -> bool {
    match field {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn routing_warnings(matches: &[Value]) -> Vec<String> {
    let known: HashSet<MatchId> = matches
        .iter()
        .filter_map(|m| m.get("id").and_then(MatchId::from_json))
        .collect();

    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    for (idx, m) in matches.iter().enumerate() {
        let n = idx + 1;
        if let Some(id) = m.get("id").and_then(MatchId::from_json)
            && !seen.insert(id.clone())
        {
            warnings.push(format!("Match {n}: duplicate match id {id}"));
        }

        for field in ["nextMatchId", "nextLoserMatchId"] {
            if let Some(target) = m.get(field).and_then(MatchId::from_json)
                && !known.contains(&target)
            {
                warnings.push(format!(
                    "Match {n}: {field} {target} does not reference a match in this tournament"
                ));
            }
        }

        let winners = m
            .get("participants")
            .and_then(Value::as_array)
            .map(|ps| {
                ps.iter()
                    .filter(|p| p.get("isWinner").and_then(Value::as_bool) == Some(true))
                    .count()
            })
            .unwrap_or(0);
        if winners > 1 {
            warnings.push(format!("Match {n}: more than one participant marked as winner"));
        }
    }
    warnings
}
