use super::*;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use wb_core::*;
use wb_lexicon::Distribution;
use wb_lexicon::WordPair;

/// Hidden allegiance dealt once at game start.
///
/// - `Crew` — sees the crew word, the majority
/// - `Blur` — sees the near-miss word, must blend in
/// - `Blank` — sees no word at all, wins with the blur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Crew,
    Blur,
    Blank,
}

impl Role {
    /// The word this role is shown, if any.
    pub fn word<'a>(&self, pair: &'a WordPair) -> Option<&'a str> {
        match self {
            Self::Crew => Some(&pair.crew),
            Self::Blur => Some(&pair.blur),
            Self::Blank => None,
        }
    }
    /// The faction this role scores with.
    pub fn faction(&self) -> Faction {
        match self {
            Self::Crew => Faction::Crew,
            Self::Blur => Faction::Blur,
            Self::Blank => Faction::Blur,
        }
    }
    /// Deal roles across a roster by shuffling ids and slicing the role
    /// distribution off the front. Rosters hold at least [`MIN_PLAYERS`]
    /// when this runs, so the spread covers every seat.
    pub fn deal(ids: &[ID<Player>], rng: &mut impl Rng) -> HashMap<ID<Player>, Role> {
        let spread = Distribution::of(ids.len());
        let mut order = ids.to_vec();
        order.shuffle(rng);
        let mut slots = order.into_iter();
        let mut roles = HashMap::new();
        roles.extend(slots.by_ref().take(spread.crew).map(|id| (id, Self::Crew)));
        roles.extend(slots.by_ref().take(spread.blur).map(|id| (id, Self::Blur)));
        roles.extend(slots.by_ref().take(spread.blank).map(|id| (id, Self::Blank)));
        roles
    }
}

/// Which side a finished session went to. The blank has no word but wins
/// alongside the blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Crew,
    Blur,
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crew => write!(f, "crew"),
            Self::Blur => write!(f, "blur"),
        }
    }
}
