use serde::Deserialize;
use serde::Serialize;
use wb_core::*;

/// A roster member: identity, display name, and running score.
///
/// Serializes to exactly the public roster entry, so views and snapshots
/// embed players directly. Roles live on the [`crate::Game`], never here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: ID<Player>,
    name: String,
    score: Points,
}

impl Player {
    /// Fresh player with a new v7 id and a zero score.
    pub fn new(name: String) -> Self {
        Self {
            id: ID::default(),
            name,
            score: 0,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn score(&self) -> Points {
        self.score
    }
    /// Add points. Awards are never negative, so scores only climb.
    pub fn award(&mut self, points: Points) {
        self.score += points;
    }
}

impl Unique for Player {
    fn id(&self) -> ID<Player> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_players_start_at_zero() {
        let player = Player::new("Ada".to_string());
        assert_eq!(player.score(), 0);
        assert_eq!(player.name(), "Ada");
    }

    #[test]
    fn awards_accumulate() {
        let mut player = Player::new("Ada".to_string());
        player.award(2);
        player.award(10);
        assert_eq!(player.score(), 12);
    }

    #[test]
    fn players_serialize_as_public_roster_entries() {
        let player = Player::new("Ada".to_string());
        let json = serde_json::to_value(&player).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["score"], 0);
        assert_eq!(json["id"], player.id().to_string());
    }
}
