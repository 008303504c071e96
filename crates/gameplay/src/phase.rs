use serde::Deserialize;
use serde::Serialize;

/// Where a session sits in the round flow.
///
/// ```text
/// Lobby -> Description -> Discussion -> Elimination -+-> BlankGuess -+
///            ^                                       |       |       |
///            |                                       v       v       v
///            +---------------------------------- RoundEnd  Ended   Ended
/// ```
///
/// `BlankGuess` only interposes when the eliminated player was the blank;
/// otherwise elimination resolves straight to `RoundEnd` or `Ended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Description,
    Discussion,
    Elimination,
    BlankGuess,
    RoundEnd,
    Ended,
}

impl Phase {
    /// Stable lowercase label, identical to the wire and storage form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::Description => "description",
            Self::Discussion => "discussion",
            Self::Elimination => "elimination",
            Self::BlankGuess => "blank_guess",
            Self::RoundEnd => "round_end",
            Self::Ended => "ended",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_the_wire_form() {
        for phase in [
            Phase::Lobby,
            Phase::Description,
            Phase::Discussion,
            Phase::Elimination,
            Phase::BlankGuess,
            Phase::RoundEnd,
            Phase::Ended,
        ] {
            let wire = serde_json::to_string(&phase).unwrap();
            assert_eq!(wire, format!("\"{}\"", phase.label()));
        }
    }
}
