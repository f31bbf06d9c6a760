use crate::{
    Bracket, BracketFormat, Match, TournamentInfo, TournamentStats, ValidationReport, classify,
    ingest_tournament, partition, validate_tournament,
};
use log::{debug, error, warn};
use serde_json::{Value, json};

/// Everything the renderer needs from one match-list snapshot.
///
/// Stats are always computed from the raw value. Classification and the typed
/// matches exist only when validation passed.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub validation: ValidationReport,
    pub stats: TournamentStats,
    pub tournament: Option<TournamentInfo>,
    pub matches: Vec<Match>,
    pub format: Option<BracketFormat>,
    /// Set when a payload passed validation but still could not be mapped.
    pub ingest_error: Option<String>,
}

impl Analysis {
    pub fn from_value(raw: Option<&Value>) -> Self {
        let stats = TournamentStats::from_raw(raw);
        let validation = validate_tournament(raw);
        let mut analysis = Self { validation, stats, ..Default::default() };

        if !analysis.validation.is_valid {
            debug!(
                "match list failed validation with {} error(s)",
                analysis.validation.errors.len()
            );
            return analysis;
        }
        let Some(raw) = raw else {
            return analysis;
        };

        match ingest_tournament(raw) {
            Ok((tournament, matches)) => {
                analysis.format = Some(classify(&matches));
                analysis.tournament = tournament;
                analysis.matches = matches;
                analysis.log_unclassified();
            }
            Err(e) => {
                error!("validated match list could not be ingested: {e}");
                analysis.ingest_error = Some(e.to_string());
            }
        }
        analysis
    }

    /// Runs once per snapshot; `bracket()` itself never logs.
    fn log_unclassified(&self) {
        let Some(bracket) = self.bracket() else {
            return;
        };
        for m in bracket.unclassified() {
            warn!(
                "match {} has round label {:?} with no bracket side; listed as unclassified",
                m.id, m.tournament_round_text
            );
        }
    }

    /// True when there is a bracket to draw (possibly an empty one).
    pub fn is_renderable(&self) -> bool {
        self.format.is_some()
    }

    /// Borrowed views over the stored matches, rebuilt on each call.
    pub fn bracket(&self) -> Option<Bracket<'_>> {
        self.format.map(|format| partition(&self.matches, format))
    }

    /// Problems that do not block rendering but deserve a mention.
    pub fn notices(&self) -> Vec<String> {
        let mut notices = self.validation.warnings.clone();
        if let Some(err) = &self.ingest_error {
            notices.push(err.clone());
        }
        if let Some(bracket) = self.bracket() {
            for m in bracket.unclassified() {
                notices.push(format!(
                    "Match {} ({}): round label {:?} is neither winners nor consolation",
                    m.id, m.name, m.tournament_round_text
                ));
            }
        }
        notices
    }

    /// The output contract: validation result, stats, format and bracket shape.
    pub fn to_json(&self) -> Value {
        json!({
            "validation": self.validation,
            "stats": self.stats,
            "tournament": self.tournament,
            "format": self.format,
            "bracket": self.bracket(),
        })
    }
}
