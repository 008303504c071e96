use super::*;
use serde::Deserialize;
use serde::Serialize;
use wb_core::*;

/// One elimination vote: who, and against whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cast {
    pub voter: ID<Player>,
    pub target: ID<Player>,
}

/// Elimination votes in submission order.
///
/// A re-vote overwrites in place and keeps the voter's original position,
/// so tally order depends on who voted first, not on who voted last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ballot {
    casts: Vec<Cast>,
}

impl Ballot {
    /// Record a vote, or replace the voter's earlier one in place.
    pub fn cast(&mut self, voter: ID<Player>, target: ID<Player>) {
        match self.casts.iter_mut().find(|cast| cast.voter == voter) {
            Some(cast) => cast.target = target,
            None => self.casts.push(Cast { voter, target }),
        }
    }
    /// True when this voter has a recorded vote.
    pub fn voted(&self, voter: ID<Player>) -> bool {
        self.casts.iter().any(|cast| cast.voter == voter)
    }
    /// Voters in submission order.
    pub fn voters(&self) -> Vec<ID<Player>> {
        self.casts.iter().map(|cast| cast.voter).collect()
    }
    /// True when every listed player has a recorded vote.
    pub fn complete(&self, roster: &[ID<Player>]) -> bool {
        roster.iter().all(|id| self.voted(*id))
    }
    /// Vote counts per target, ordered by each target's first appearance
    /// in the ballot.
    pub fn tally(&self) -> Vec<(ID<Player>, usize)> {
        let mut counts: Vec<(ID<Player>, usize)> = Vec::new();
        for cast in self.casts.iter() {
            match counts.iter_mut().find(|(target, _)| *target == cast.target) {
                Some((_, n)) => *n += 1,
                None => counts.push((cast.target, 1)),
            }
        }
        counts
    }
    /// The elimination target: scanning the tally in first-appearance
    /// order, the first target to hold a strict maximum wins. Ties go to
    /// whoever drew a vote earliest.
    pub fn elect(&self) -> Option<ID<Player>> {
        let mut max = 0;
        let mut winner = None;
        for (target, count) in self.tally() {
            if count > max {
                max = count;
                winner = Some(target);
            }
        }
        winner
    }
    pub fn len(&self) -> usize {
        self.casts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.casts.is_empty()
    }
}
