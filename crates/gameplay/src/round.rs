use super::*;
use serde::Deserialize;
use serde::Serialize;
use wb_core::*;

/// One submitted clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clue {
    pub player: ID<Player>,
    pub text: String,
}

/// The eliminated blank's one shot at naming the crew word. `guess` and
/// `correct` stay unset until the guess comes in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlankGuess {
    pub player: ID<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
}

/// Per-round working state: clue order, submitted clues, the elimination
/// ballot, and the pending blank guess.
///
/// Phase boundaries replace the whole value through the consuming
/// constructors below, so nothing leaks across a transition by accident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    clue_order: Vec<ID<Player>>,
    clues: Vec<Clue>,
    ballot: Ballot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    blank_guess: Option<BlankGuess>,
}

impl RoundState {
    /// Fresh state for the opening round: everything cleared, the given
    /// clue order installed.
    pub fn opening(clue_order: Vec<ID<Player>>) -> Self {
        Self {
            clue_order,
            ..Self::default()
        }
    }
    /// Roll into the next round: clues and votes dropped, a new clue
    /// order installed. The last blank guess stays on display until the
    /// next one replaces it.
    pub fn next_round(self, clue_order: Vec<ID<Player>>) -> Self {
        Self {
            clue_order,
            blank_guess: self.blank_guess,
            ..Self::default()
        }
    }
    /// Open the elimination ballot with votes wiped. Clues stay visible.
    pub fn balloting(self) -> Self {
        Self {
            ballot: Ballot::default(),
            ..self
        }
    }
    /// Park the round at its break: votes and clues wiped, clue order and
    /// blank guess retained.
    pub fn intermission(self) -> Self {
        Self {
            clues: Vec::new(),
            ballot: Ballot::default(),
            ..self
        }
    }
    /// Hand the round to an eliminated blank for their guess.
    pub fn guessing(self, player: ID<Player>) -> Self {
        Self {
            blank_guess: Some(BlankGuess {
                player,
                guess: None,
                correct: None,
            }),
            ..self
        }
    }
    /// Record or revise a clue, keeping the submitter's first position.
    pub fn describe(&mut self, player: ID<Player>, text: String) {
        match self.clues.iter_mut().find(|clue| clue.player == player) {
            Some(clue) => clue.text = text,
            None => self.clues.push(Clue { player, text }),
        }
    }
    /// Record or replace a vote.
    pub fn cast(&mut self, voter: ID<Player>, target: ID<Player>) {
        self.ballot.cast(voter, target);
    }
    /// Fill in the pending blank guess and its verdict.
    pub fn record_guess(&mut self, guess: String, correct: bool) {
        if let Some(pending) = self.blank_guess.as_mut() {
            pending.guess = Some(guess);
            pending.correct = Some(correct);
        }
    }
    /// The clue this player has submitted, if any.
    pub fn clue(&self, player: ID<Player>) -> Option<&str> {
        self.clues
            .iter()
            .find(|clue| clue.player == player)
            .map(|clue| clue.text.as_str())
    }
    pub fn clue_order(&self) -> &[ID<Player>] {
        &self.clue_order
    }
    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }
    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }
    pub fn blank_guess(&self) -> Option<&BlankGuess> {
        self.blank_guess.as_ref()
    }
    /// Who may answer the pending blank guess.
    pub fn guesser(&self) -> Option<ID<Player>> {
        self.blank_guess.as_ref().map(|pending| pending.player)
    }
}
