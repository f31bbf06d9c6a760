use serde::Serialize;

/// Which half of a double-elimination bracket a match is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketSide {
    Winners,
    Consolation,
}

impl BracketSide {
    pub fn label(&self) -> &'static str {
        match self {
            BracketSide::Winners => "Winners",
            BracketSide::Consolation => "Consolation",
        }
    }
}

/// Parsed form of a match's `tournamentRoundText`.
///
/// Single-elimination feeds use bare integers ("1", "2", ...). Double-elimination
/// feeds tag the round with its bracket half: `W1`/`Upper 1`/`Winners Round 1`,
/// `L2`/`LB 2`/`Consolation 2`, and `GF`/`Grand Final` for the deciding bout.
/// Stages named after the half, like `Winners Final` or `Consolation Semifinal`,
/// keep their side without a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RoundLabel {
    Upper(u32),
    Lower(u32),
    Stage(BracketSide),
    GrandFinal,
    Numbered(u32),
    #[default]
    Unrecognized,
}

const UPPER_TAGS: &[&str] = &["w", "wb", "u", "ub", "upper", "winner", "winners"];
const LOWER_TAGS: &[&str] = &[
    "l",
    "lb",
    "lower",
    "loser",
    "losers",
    "c",
    "cons",
    "consolation",
];
const FINAL_TAGS: &[&str] = &[
    "gf",
    "gfreset",
    "grandfinal",
    "grandfinals",
    "grandfinalreset",
    "final",
    "finals",
];

impl RoundLabel {
    pub fn parse(text: &str) -> Self {
        let lowered = text.trim().to_ascii_lowercase();
        if let Ok(n) = lowered.parse::<u32>() {
            return RoundLabel::Numbered(n);
        }

        let head_len = lowered.trim_end_matches(|c: char| c.is_ascii_digit()).len();
        let (head, digits) = lowered.split_at(head_len);
        let number = digits.parse::<u32>().ok();

        // "Winners Round 2", "upper-bracket 1", "LB_3" all reduce to a bare tag.
        let words: Vec<&str> = head
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|word| !word.is_empty() && !matches!(*word, "round" | "bracket" | "r"))
            .collect();
        let tag = words.concat();

        match (tag.as_str(), number) {
            ("", Some(n)) => RoundLabel::Numbered(n),
            (t, Some(n)) if UPPER_TAGS.contains(&t) => RoundLabel::Upper(n),
            (t, Some(n)) if LOWER_TAGS.contains(&t) => RoundLabel::Lower(n),
            (t, _) if FINAL_TAGS.contains(&t) => RoundLabel::GrandFinal,
            _ => Self::named_stage(&words),
        }
    }

    /// "Losers Final", "WB Semis 2": a side word followed by a stage name.
    fn named_stage(words: &[&str]) -> Self {
        let [first, _, ..] = words else {
            return RoundLabel::Unrecognized;
        };
        if UPPER_TAGS.contains(first) {
            RoundLabel::Stage(BracketSide::Winners)
        } else if LOWER_TAGS.contains(first) {
            RoundLabel::Stage(BracketSide::Consolation)
        } else {
            RoundLabel::Unrecognized
        }
    }

    /// The double-elimination half this label names. The grand final always sits
    /// on the winners side, whoever reaches it. Bare numbers carry no side.
    pub fn side(&self) -> Option<BracketSide> {
        match self {
            RoundLabel::Upper(_) | RoundLabel::GrandFinal => Some(BracketSide::Winners),
            RoundLabel::Lower(_) => Some(BracketSide::Consolation),
            RoundLabel::Stage(side) => Some(*side),
            RoundLabel::Numbered(_) | RoundLabel::Unrecognized => None,
        }
    }
}
