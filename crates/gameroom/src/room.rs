use super::*;
use rand::rngs::SmallRng;
use std::collections::HashMap;
use wb_core::*;
use wb_gameplay::*;

/// Live session coordinator.
/// Imperative shell that owns a [`Game`] (functional core) and handles
/// connection tracking, fan-out, and logging concerns. One room guards
/// one invite code; the [`Parlor`] wraps each room in a mutex so every
/// command runs against a consistent state.
pub struct Room {
    game: Game,
    links: HashMap<ID<Player>, Link>,
    rng: SmallRng,
}

impl Room {
    pub fn new(game: Game, rng: SmallRng) -> Self {
        Self {
            game,
            links: HashMap::new(),
            rng,
        }
    }
    pub fn game(&self) -> &Game {
        &self.game
    }
    /// Binds a connection to a seat. A later bind for the same seat
    /// silently replaces the earlier one, which is what makes refresh
    /// and reconnect work without an explicit logout.
    pub fn attach(&mut self, player: ID<Player>, link: Link) {
        self.links.insert(player, link);
    }
    /// Unbinds a connection, but only if it still holds the seat.
    /// A socket that was superseded by a reconnect must not evict
    /// its replacement when its own hangup finally arrives.
    pub fn detach(&mut self, player: ID<Player>, link: ID<Link>) -> bool {
        match self.links.get(&player) {
            Some(held) if held.id() == link => {
                self.links.remove(&player);
                true
            }
            _ => false,
        }
    }
    /// Whether any seat is currently bound to this connection.
    pub fn attached(&self, link: ID<Link>) -> bool {
        self.links.values().any(|held| held.id() == link)
    }
    pub fn project(&self, player: ID<Player>) -> View {
        View::project(&self.game, player)
    }
    /// Pushes each seated player their own view of the session.
    pub fn publish(&self) {
        for (player, link) in self.links.iter() {
            link.send(&ServerMessage::view(self.project(*player)));
        }
    }
}

impl Room {
    pub fn join(&mut self, name: String) -> Result<ID<Player>, GameError> {
        let id = self.game.join(name)?;
        log::info!(
            "[room {}] {} joined ({} seated)",
            self.game.code(),
            self.name(id),
            self.game.players().len()
        );
        Ok(id)
    }
    /// Removes a lobby player and reports whether the room emptied.
    pub fn leave(&mut self, id: ID<Player>) -> bool {
        log::info!("[room {}] {} left", self.game.code(), self.name(id));
        self.links.remove(&id);
        self.game.leave(id)
    }
    pub fn start(&mut self, by: ID<Player>) -> Result<(), GameError> {
        self.game.start(by, &mut self.rng)?;
        log::info!(
            "[room {}] round 1 begins with {} players",
            self.game.code(),
            self.game.players().len()
        );
        Ok(())
    }
    pub fn describe(&mut self, by: ID<Player>, text: String) -> Result<(), GameError> {
        self.game.describe(by, text)?;
        log::debug!("[room {}] clue from {}", self.game.code(), self.name(by));
        Ok(())
    }
    pub fn advance_to_discussion(&mut self, by: ID<Player>) -> Result<(), GameError> {
        self.game.advance_to_discussion(by)?;
        log::debug!("[room {}] discussion open", self.game.code());
        Ok(())
    }
    pub fn advance_to_elimination(&mut self, by: ID<Player>) -> Result<(), GameError> {
        self.game.advance_to_elimination(by)?;
        log::debug!("[room {}] ballot open", self.game.code());
        Ok(())
    }
    pub fn vote(&mut self, by: ID<Player>, target: ID<Player>) -> Result<(), GameError> {
        self.game.vote(by, target)?;
        log::debug!("[room {}] vote from {}", self.game.code(), self.name(by));
        Ok(())
    }
    pub fn resolve(&mut self, by: ID<Player>) -> Result<(), GameError> {
        self.game.resolve(by)?;
        let out = self
            .game
            .eliminated()
            .last()
            .map(|id| self.name(*id))
            .unwrap_or("nobody");
        log::info!("[room {}] {} eliminated", self.game.code(), out);
        self.outcome();
        Ok(())
    }
    pub fn guess(&mut self, by: ID<Player>, text: String) -> Result<(), GameError> {
        self.game.guess(by, text)?;
        match self.game.current().blank_guess().and_then(|g| g.correct) {
            Some(true) => log::info!("[room {}] blank guessed the word", self.game.code()),
            _ => log::info!("[room {}] blank missed the word", self.game.code()),
        }
        self.outcome();
        Ok(())
    }
    pub fn next_round(&mut self, by: ID<Player>) -> Result<(), GameError> {
        self.game.next_round(by, &mut self.rng)?;
        log::info!(
            "[room {}] round {} begins with {} players",
            self.game.code(),
            self.game.round(),
            self.game.living().len()
        );
        Ok(())
    }
    fn name(&self, id: ID<Player>) -> &str {
        self.game.player(id).map(Player::name).unwrap_or("unknown")
    }
    fn outcome(&self) {
        if let Some(winner) = self.game.winner() {
            log::info!("[room {}] game over, {} win", self.game.code(), winner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::mpsc::unbounded_channel;

    fn seated(n: usize) -> (Room, Vec<ID<Player>>, Vec<UnboundedReceiver<String>>) {
        let mut game = Game::create(Code::try_from("ROOM").unwrap(), "p0".to_string());
        let mut ids = vec![game.host()];
        for i in 1..n {
            ids.push(game.join(format!("p{}", i)).unwrap());
        }
        let mut room = Room::new(game, SmallRng::seed_from_u64(7));
        let mut rxs = Vec::new();
        for id in ids.iter() {
            let (tx, rx) = unbounded_channel();
            room.attach(*id, Link::new(tx));
            rxs.push(rx);
        }
        (room, ids, rxs)
    }

    #[test]
    fn publish_delivers_each_player_their_own_view() {
        let (room, ids, mut rxs) = seated(3);
        room.publish();
        for (id, rx) in ids.iter().zip(rxs.iter_mut()) {
            let value: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
            assert_eq!(value["type"], "view");
            assert_eq!(value["view"]["myPlayerId"], id.to_string());
        }
    }
    #[test]
    fn a_stale_socket_cannot_evict_its_replacement() {
        let (mut room, ids, _rxs) = seated(3);
        let stale = room.links.get(&ids[0]).unwrap().id();
        let (tx, _rx) = unbounded_channel();
        let fresh = Link::new(tx);
        let fresh_id = fresh.id();
        room.attach(ids[0], fresh);
        assert!(!room.detach(ids[0], stale));
        assert!(room.attached(fresh_id));
        assert!(room.detach(ids[0], fresh_id));
        assert!(!room.attached(fresh_id));
    }
    #[test]
    fn leaving_reports_when_the_room_empties() {
        let (mut room, ids, _rxs) = seated(2);
        assert!(!room.leave(ids[1]));
        assert!(room.leave(ids[0]));
    }
    #[test]
    fn commands_flow_through_to_the_game() {
        let (mut room, ids, _rxs) = seated(4);
        room.start(ids[0]).unwrap();
        assert_eq!(room.game().phase(), Phase::Description);
        for id in ids.iter() {
            room.describe(*id, format!("clue from {}", id)).unwrap();
        }
        room.advance_to_discussion(ids[0]).unwrap();
        room.advance_to_elimination(ids[0]).unwrap();
        assert_eq!(room.game().phase(), Phase::Elimination);
    }
    #[test]
    fn rejections_pass_through_unchanged() {
        let (mut room, ids, _rxs) = seated(4);
        match room.start(ids[1]) {
            Err(e) => assert_eq!(e.to_string(), "only the host can do that"),
            Ok(_) => panic!("non-host started the game"),
        }
    }
}
