use super::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::HashMap;
use wb_core::*;
use wb_lexicon::WordPair;

/// Everything needed to rebuild a [`Game`] after a restart.
///
/// Live connections are deliberately absent, so a restored session comes
/// back with every seat detached and waits on reconnects. Words per
/// player are absent too; they derive from the pair and the role map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub code: Code,
    pub host_id: ID<Player>,
    pub players: Vec<Player>,
    pub phase: Phase,
    pub round: Round,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_pair: Option<WordPair>,
    #[serde(default)]
    pub roles: HashMap<ID<Player>, Role>,
    pub eliminated: Vec<ID<Player>>,
    pub current: RoundState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Faction>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn mid_game() -> Game {
        let mut game = Game::create(Code::try_from("SNAP").unwrap(), "p0".to_string());
        for i in 1..5 {
            game.join(format!("p{}", i)).unwrap();
        }
        let mut rng = SmallRng::seed_from_u64(21);
        game.start(game.host(), &mut rng).unwrap();
        for id in game.living() {
            game.describe(id, format!("clue from {}", id)).unwrap();
        }
        game.advance_to_discussion(game.host()).unwrap();
        game.advance_to_elimination(game.host()).unwrap();
        let ids = game.living();
        game.vote(ids[0], ids[1]).unwrap();
        game.vote(ids[1], ids[2]).unwrap();
        game
    }

    #[test]
    fn a_restored_session_projects_identically() {
        let game = mid_game();
        let copy = Game::restore(game.snapshot());
        for id in game.ids() {
            let before = serde_json::to_value(View::project(&game, id)).unwrap();
            let after = serde_json::to_value(View::project(&copy, id)).unwrap();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn a_restored_session_keeps_playing() {
        let game = mid_game();
        let mut copy = Game::restore(game.snapshot());
        for id in copy.living() {
            copy.vote(id, copy.living()[1]).unwrap();
        }
        copy.resolve(copy.host()).unwrap();
        assert_ne!(copy.phase(), Phase::Elimination);
    }

    #[test]
    fn snapshots_survive_the_json_round_trip() {
        let game = mid_game();
        let json = serde_json::to_string(&game.snapshot()).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        let copy = Game::restore(back);
        assert_eq!(copy.phase(), game.phase());
        assert_eq!(copy.round(), game.round());
        assert_eq!(copy.host(), game.host());
        assert_eq!(copy.ids(), game.ids());
        for id in game.ids() {
            assert_eq!(copy.role(id), game.role(id));
            assert_eq!(copy.word(id), game.word(id));
        }
        assert_eq!(copy.current().ballot(), game.current().ballot());
    }

    #[test]
    fn snapshots_never_store_per_player_words() {
        let game = mid_game();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        let players = json["players"].as_array().unwrap();
        for entry in players {
            assert!(entry.get("word").is_none());
            assert!(entry.get("role").is_none());
        }
    }
}
