use super::*;
use serde::Serialize;
use wb_core::*;
use wb_lexicon::WordPair;

/// Votes as the table sees them: per-target counts in first-vote order
/// plus who has voted so far. Never who voted for whom.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteCount {
    pub target: ID<Player>,
    pub votes: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotView {
    pub counts: Vec<VoteCount>,
    pub voted: Vec<ID<Player>>,
}

/// What one seated player is allowed to see.
///
/// Roles and words stay hidden: a view carries only the requester's own
/// role and word, votes only in aggregate, and the word pair only once
/// the session has ended.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub code: Code,
    pub host_id: ID<Player>,
    pub players: Vec<Player>,
    pub phase: Phase,
    pub round: Round,
    pub eliminated: Vec<ID<Player>>,
    pub clue_order: Vec<ID<Player>>,
    pub clues: Vec<Clue>,
    pub ballot: BallotView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_guess: Option<BlankGuess>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Faction>,
    pub my_player_id: ID<Player>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_word: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_pair: Option<WordPair>,
}

impl View {
    /// Project the session for one seated player.
    pub fn project(game: &Game, viewer: ID<Player>) -> Self {
        Self {
            code: game.code().clone(),
            host_id: game.host(),
            players: game.players().to_vec(),
            phase: game.phase(),
            round: game.round(),
            eliminated: game.eliminated().to_vec(),
            clue_order: game.current().clue_order().to_vec(),
            clues: game.current().clues().to_vec(),
            ballot: BallotView {
                counts: game
                    .current()
                    .ballot()
                    .tally()
                    .into_iter()
                    .map(|(target, votes)| VoteCount { target, votes })
                    .collect(),
                voted: game.current().ballot().voters(),
            },
            blank_guess: game.current().blank_guess().cloned(),
            winner: game.winner(),
            my_player_id: viewer,
            my_role: game.role(viewer),
            my_word: game.word(viewer).map(str::to_string),
            word_pair: match game.phase() {
                Phase::Ended => game.pair().cloned(),
                _ => None,
            },
        }
    }
}
