use super::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::RwLock;
use wb_core::*;
use wb_database::Store;
use wb_gameplay::*;
use wb_sanitize::Kind;

/// Where a connection is currently seated.
/// The transport task owns one of these per socket and passes it back
/// on every dispatch, so seating survives across commands without the
/// parlor tracking connections itself.
#[derive(Clone, Debug)]
pub struct Seat {
    pub code: Code,
    pub player: ID<Player>,
}

/// Lobby facts served over HTTP for the invite landing page.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteInfo {
    pub valid: bool,
    pub can_join: bool,
    pub player_count: usize,
    pub host_name: String,
}

/// Registry of live rooms keyed by invite code.
/// Every command funnels through [`Parlor::dispatch`], which routes it
/// to the room under its mutex, fans the fresh state out to everyone
/// seated, and writes the session through to storage. Rooms retire
/// from the registry when the game ends or the lobby empties.
pub struct Parlor {
    rooms: RwLock<HashMap<Code, Arc<Mutex<Room>>>>,
    store: Store,
}

impl Parlor {
    pub fn new(store: Store) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            store,
        }
    }
    /// Rehydrates unfinished sessions from storage after a restart.
    /// Players resume their seats through the reconnect command.
    pub async fn reload(&self) {
        let snapshots = self.store.active().await;
        let count = snapshots.len();
        let mut rooms = self.rooms.write().await;
        for snapshot in snapshots {
            let game = Game::restore(snapshot);
            let code = game.code().clone();
            let room = Room::new(game, SmallRng::from_os_rng());
            rooms.insert(code, Arc::new(Mutex::new(room)));
        }
        if count > 0 {
            log::info!("[parlor] restored {} sessions", count);
        }
    }
    /// Answers the invite landing page: does this code point anywhere,
    /// and can a new player still take a seat. Checks live rooms first
    /// and falls back to storage for sessions not currently resident.
    pub async fn validate(&self, code: &str) -> Option<InviteInfo> {
        let code = Code::try_from(code).ok()?;
        if let Some(handle) = self.room(&code).await {
            return Some(Self::peek(handle.lock().await.game()));
        }
        let snapshot = self.store.lookup(&code).await?;
        Some(Self::peek(&Game::restore(snapshot)))
    }
    fn peek(game: &Game) -> InviteInfo {
        InviteInfo {
            valid: true,
            can_join: game.phase() == Phase::Lobby && game.players().len() < MAX_PLAYERS,
            player_count: game.players().len(),
            host_name: game
                .player(game.host())
                .map(Player::name)
                .unwrap_or_default()
                .to_string(),
        }
    }
    async fn room(&self, code: &Code) -> Option<Arc<Mutex<Room>>> {
        self.rooms.read().await.get(code).cloned()
    }
}

impl Parlor {
    /// Routes one decoded command from one connection.
    /// Any refusal goes back to the sender alone; accepted commands
    /// publish fresh views to the whole room.
    pub async fn dispatch(&self, link: &Link, seat: &mut Option<Seat>, command: ClientCommand) {
        let result = match command {
            ClientCommand::Create { code, name } => self.create(link, seat, code, name).await,
            ClientCommand::Join { code, name } => self.join(link, seat, code, name).await,
            ClientCommand::Reconnect { code, player_id } => {
                self.reconnect(link, seat, code, player_id).await
            }
            ClientCommand::Start => self.seated(seat, |room, by| room.start(by)).await,
            ClientCommand::Description { text } => match scrub(Kind::Clue, &text) {
                Ok(text) => self.seated(seat, |room, by| room.describe(by, text)).await,
                Err(e) => Err(e),
            },
            ClientCommand::AdvanceToDiscussion => {
                self.seated(seat, |room, by| room.advance_to_discussion(by)).await
            }
            ClientCommand::AdvanceToElimination => {
                self.seated(seat, |room, by| room.advance_to_elimination(by)).await
            }
            ClientCommand::Vote { target_id } => {
                self.seated(seat, |room, by| room.vote(by, target_id)).await
            }
            ClientCommand::Resolve => self.seated(seat, |room, by| room.resolve(by)).await,
            ClientCommand::BlankGuess { guess } => match scrub(Kind::Guess, &guess) {
                Ok(guess) => self.seated(seat, |room, by| room.guess(by, guess)).await,
                Err(e) => Err(e),
            },
            ClientCommand::NextRound => self.seated(seat, |room, by| room.next_round(by)).await,
        };
        if let Err(ref error) = result {
            link.send(&ServerMessage::rejected(error));
        }
    }
    /// Reaps a closed connection. Lobby seats are given up so the name
    /// frees for reuse; mid-game seats survive for reconnection. Stale
    /// sockets superseded by a reconnect are ignored entirely.
    pub async fn hangup(&self, seat: Option<Seat>, link: ID<Link>) {
        let Some(seat) = seat else { return };
        let Some(handle) = self.room(&seat.code).await else {
            return;
        };
        let mut room = handle.lock().await;
        if !room.detach(seat.player, link) {
            return;
        }
        if room.game().phase() != Phase::Lobby {
            return;
        }
        if room.leave(seat.player) {
            drop(room);
            self.rooms.write().await.remove(&seat.code);
            log::info!("[parlor] room {} emptied", seat.code);
            let store = self.store.clone();
            tokio::spawn(async move { store.delete(&seat.code).await });
        } else {
            room.publish();
            let snapshot = room.game().snapshot();
            let store = self.store.clone();
            tokio::spawn(async move { store.upsert(&snapshot).await });
        }
    }
}

impl Parlor {
    async fn create(
        &self,
        link: &Link,
        seat: &mut Option<Seat>,
        code: String,
        name: String,
    ) -> Result<(), GameError> {
        let code = Code::try_from(code.as_str())?;
        let name = scrub(Kind::Name, &name)?;
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&code) {
            return Err(GameError::Capacity("code already in use"));
        }
        let game = Game::create(code.clone(), name);
        let host = game.host();
        let snapshot = game.snapshot();
        let mut room = Room::new(game, SmallRng::from_os_rng());
        room.attach(host, link.clone());
        link.send(&ServerMessage::joined(code.clone(), true, room.project(host)));
        rooms.insert(code.clone(), Arc::new(Mutex::new(room)));
        drop(rooms);
        log::info!("[parlor] room {} opened", code);
        let fresh = Seat { code, player: host };
        self.vacate(link, seat.take(), &fresh).await;
        *seat = Some(fresh);
        let store = self.store.clone();
        tokio::spawn(async move { store.upsert(&snapshot).await });
        Ok(())
    }
    async fn join(
        &self,
        link: &Link,
        seat: &mut Option<Seat>,
        code: String,
        name: String,
    ) -> Result<(), GameError> {
        let code = Code::try_from(code.as_str())?;
        let name = scrub(Kind::Name, &name)?;
        let handle = self
            .room(&code)
            .await
            .ok_or(GameError::NotFound("game not found"))?;
        let mut room = handle.lock().await;
        if room.attached(link.id()) {
            return Err(GameError::Conflict("connection already seated"));
        }
        let player = room.join(name)?;
        room.attach(player, link.clone());
        link.send(&ServerMessage::joined(code.clone(), false, room.project(player)));
        room.publish();
        let snapshot = room.game().snapshot();
        drop(room);
        let fresh = Seat { code, player };
        self.vacate(link, seat.take(), &fresh).await;
        *seat = Some(fresh);
        let store = self.store.clone();
        tokio::spawn(async move { store.upsert(&snapshot).await });
        Ok(())
    }
    async fn reconnect(
        &self,
        link: &Link,
        seat: &mut Option<Seat>,
        code: String,
        player: ID<Player>,
    ) -> Result<(), GameError> {
        let code = Code::try_from(code.as_str())?;
        let handle = self
            .room(&code)
            .await
            .ok_or(GameError::NotFound("game not found"))?;
        let mut room = handle.lock().await;
        let name = room
            .game()
            .player(player)
            .map(|p| p.name().to_string())
            .ok_or(GameError::NotFound("player not in this game"))?;
        room.attach(player, link.clone());
        let is_host = room.game().host() == player;
        link.send(&ServerMessage::joined(code.clone(), is_host, room.project(player)));
        room.publish();
        log::info!("[room {}] {} reconnected", code, name);
        drop(room);
        let fresh = Seat { code, player };
        self.vacate(link, seat.take(), &fresh).await;
        *seat = Some(fresh);
        Ok(())
    }
    /// Runs a command against the room this connection is seated in.
    async fn seated<F>(&self, seat: &Option<Seat>, apply: F) -> Result<(), GameError>
    where
        F: FnOnce(&mut Room, ID<Player>) -> Result<(), GameError>,
    {
        let seat = seat
            .as_ref()
            .ok_or(GameError::Unauthorized("join a game before sending commands"))?;
        let handle = self
            .room(&seat.code)
            .await
            .ok_or(GameError::NotFound("game not found"))?;
        let mut room = handle.lock().await;
        apply(&mut room, seat.player)?;
        room.publish();
        self.persist(&room).await;
        Ok(())
    }
    /// Writes the session through to storage. Ended sessions retire:
    /// final scores land in the leaderboard, the session row goes away,
    /// and the invite code frees for reuse.
    async fn persist(&self, room: &Room) {
        let snapshot = room.game().snapshot();
        let store = self.store.clone();
        if room.game().phase() == Phase::Ended {
            self.rooms.write().await.remove(room.game().code());
            log::info!("[parlor] room {} retired", room.game().code());
            tokio::spawn(async move {
                store.record_scores(&snapshot).await;
                store.delete(&snapshot.code).await;
            });
        } else {
            tokio::spawn(async move { store.upsert(&snapshot).await });
        }
    }
    /// Taking a new seat implies hanging up the old one, so a client
    /// that creates or joins afresh does not strand a lobby ghost.
    async fn vacate(&self, link: &Link, old: Option<Seat>, fresh: &Seat) {
        if let Some(old) = old {
            if old.code != fresh.code || old.player != fresh.player {
                self.hangup(Some(old), link.id()).await;
            }
        }
    }
}

fn scrub(kind: Kind, raw: &str) -> Result<String, GameError> {
    wb_sanitize::admit(kind, raw).map_err(|refusal| GameError::Validation(refusal.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;
    use tokio::sync::mpsc::unbounded_channel;

    struct Client {
        link: Link,
        seat: Option<Seat>,
        rx: UnboundedReceiver<String>,
    }

    impl Client {
        fn new() -> Self {
            let (tx, rx) = unbounded_channel();
            Self {
                link: Link::new(tx),
                seat: None,
                rx,
            }
        }
        async fn send(&mut self, parlor: &Parlor, command: ClientCommand) {
            parlor.dispatch(&self.link, &mut self.seat, command).await;
        }
        fn drain(&mut self) -> Vec<serde_json::Value> {
            let mut out = Vec::new();
            while let Ok(json) = self.rx.try_recv() {
                out.push(serde_json::from_str(&json).unwrap());
            }
            out
        }
        fn last_view(&mut self) -> serde_json::Value {
            let views = self
                .drain()
                .into_iter()
                .filter(|m| m["type"] == "view" || m["type"] == "joined")
                .collect::<Vec<_>>();
            views.last().expect("no view received")["view"].clone()
        }
        fn id(&mut self) -> ID<Player> {
            let view = self.last_view();
            serde_json::from_value(view["myPlayerId"].clone()).unwrap()
        }
    }

    fn parlor() -> Parlor {
        Parlor::new(Store::disconnected())
    }
    fn create(code: &str, name: &str) -> ClientCommand {
        ClientCommand::Create {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
    fn join(code: &str, name: &str) -> ClientCommand {
        ClientCommand::Join {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
    /// Seats the host plus enough joiners for a session of `n`.
    async fn lobby(parlor: &Parlor, n: usize) -> Vec<Client> {
        let mut clients = Vec::new();
        let mut host = Client::new();
        host.send(parlor, create("taco", "p0")).await;
        clients.push(host);
        for i in 1..n {
            let mut client = Client::new();
            client.send(parlor, join("taco", &format!("p{}", i))).await;
            clients.push(client);
        }
        clients
    }

    #[tokio::test]
    async fn create_seats_the_host() {
        let parlor = parlor();
        let mut host = Client::new();
        host.send(&parlor, create("taco", "Ada")).await;
        assert!(host.seat.is_some());
        let messages = host.drain();
        assert_eq!(messages[0]["type"], "joined");
        assert_eq!(messages[0]["isHost"], true);
        assert_eq!(messages[0]["code"], "TACO");
        assert_eq!(messages[0]["view"]["phase"], "lobby");
    }
    #[tokio::test]
    async fn codes_are_exclusive_while_live() {
        let parlor = parlor();
        let mut host = Client::new();
        host.send(&parlor, create("taco", "Ada")).await;
        let mut rival = Client::new();
        rival.send(&parlor, create("taco", "Grace")).await;
        let messages = rival.drain();
        assert_eq!(messages[0]["type"], "commandRejected");
        assert_eq!(messages[0]["reason"], "code already in use");
        assert!(rival.seat.is_none());
    }
    #[tokio::test]
    async fn joining_an_unknown_code_is_refused() {
        let parlor = parlor();
        let mut client = Client::new();
        client.send(&parlor, join("ghost", "Ada")).await;
        let messages = client.drain();
        assert_eq!(messages[0]["type"], "commandRejected");
        assert_eq!(messages[0]["reason"], "game not found");
    }
    #[tokio::test]
    async fn commands_require_a_seat() {
        let parlor = parlor();
        let mut client = Client::new();
        client.send(&parlor, ClientCommand::Start).await;
        let messages = client.drain();
        assert_eq!(messages[0]["reason"], "join a game before sending commands");
    }
    #[tokio::test]
    async fn one_connection_holds_one_seat_per_room() {
        let parlor = parlor();
        let mut host = Client::new();
        host.send(&parlor, create("taco", "Ada")).await;
        host.send(&parlor, join("taco", "Alter")).await;
        let last = host.drain().pop().unwrap();
        assert_eq!(last["type"], "commandRejected");
        assert_eq!(last["reason"], "connection already seated");
    }
    #[tokio::test]
    async fn joins_fan_out_to_everyone_seated() {
        let parlor = parlor();
        let mut clients = lobby(&parlor, 3).await;
        let host_view = clients[0].last_view();
        let names = host_view["players"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["p0", "p1", "p2"]);
    }
    #[tokio::test]
    async fn dirty_names_are_refused_at_the_door() {
        let parlor = parlor();
        let mut host = Client::new();
        host.send(&parlor, create("taco", "")).await;
        let messages = host.drain();
        assert_eq!(messages[0]["reason"], "name is required");
        assert!(host.seat.is_none());
    }
    #[tokio::test]
    async fn reconnect_rebinds_the_seat() {
        let parlor = parlor();
        let mut clients = lobby(&parlor, 2).await;
        let player = clients[1].id();
        let mut replacement = Client::new();
        replacement
            .send(
                &parlor,
                ClientCommand::Reconnect {
                    code: "taco".to_string(),
                    player_id: player,
                },
            )
            .await;
        let messages = replacement.drain();
        assert_eq!(messages[0]["type"], "joined");
        assert_eq!(messages[0]["isHost"], false);
        assert_eq!(
            messages[0]["view"]["myPlayerId"],
            serde_json::to_value(player).unwrap()
        );
        // pushes now reach the replacement, not the original socket
        clients[0].drain();
        let mut third = Client::new();
        third.send(&parlor, join("taco", "p9")).await;
        assert!(clients[1].drain().is_empty());
        assert!(!replacement.drain().is_empty());
    }
    #[tokio::test]
    async fn reconnecting_nobody_is_refused() {
        let parlor = parlor();
        let mut clients = lobby(&parlor, 2).await;
        clients[1].drain();
        let mut stranger = Client::new();
        stranger
            .send(
                &parlor,
                ClientCommand::Reconnect {
                    code: "taco".to_string(),
                    player_id: ID::default(),
                },
            )
            .await;
        let messages = stranger.drain();
        assert_eq!(messages[0]["reason"], "player not in this game");
    }
    #[tokio::test]
    async fn lobby_hangups_free_the_seat_and_name() {
        let parlor = parlor();
        let mut clients = lobby(&parlor, 2).await;
        let leaver = clients.pop().unwrap();
        parlor.hangup(leaver.seat, leaver.link.id()).await;
        let view = clients[0].last_view();
        assert_eq!(view["players"].as_array().unwrap().len(), 1);
        let mut returner = Client::new();
        returner.send(&parlor, join("taco", "p1")).await;
        assert_eq!(returner.drain()[0]["type"], "joined");
    }
    #[tokio::test]
    async fn midgame_hangups_keep_the_seat() {
        let parlor = parlor();
        let mut clients = lobby(&parlor, 4).await;
        clients[0].send(&parlor, ClientCommand::Start).await;
        let absent = clients.pop().unwrap();
        let player = absent.seat.as_ref().unwrap().player;
        parlor.hangup(absent.seat, absent.link.id()).await;
        let view = clients[0].last_view();
        assert_eq!(view["players"].as_array().unwrap().len(), 4);
        let mut replacement = Client::new();
        replacement
            .send(
                &parlor,
                ClientCommand::Reconnect {
                    code: "taco".to_string(),
                    player_id: player,
                },
            )
            .await;
        assert_eq!(replacement.drain()[0]["type"], "joined");
    }
    #[tokio::test]
    async fn an_emptied_lobby_frees_its_code() {
        let parlor = parlor();
        let clients = lobby(&parlor, 1).await;
        let host = clients.into_iter().next().unwrap();
        parlor.hangup(host.seat, host.link.id()).await;
        let mut successor = Client::new();
        successor.send(&parlor, create("taco", "Grace")).await;
        assert_eq!(successor.drain()[0]["type"], "joined");
    }
    #[tokio::test]
    async fn invites_report_lobby_capacity() {
        let parlor = parlor();
        let _clients = lobby(&parlor, 3).await;
        let info = parlor.validate("taco").await.unwrap();
        assert!(info.valid);
        assert!(info.can_join);
        assert_eq!(info.player_count, 3);
        assert_eq!(info.host_name, "p0");
        assert!(parlor.validate("ghost").await.is_none());
    }
    #[tokio::test]
    async fn invites_close_once_the_game_starts() {
        let parlor = parlor();
        let mut clients = lobby(&parlor, 3).await;
        clients[0].send(&parlor, ClientCommand::Start).await;
        let info = parlor.validate("taco").await.unwrap();
        assert!(info.valid);
        assert!(!info.can_join);
        let mut late = Client::new();
        late.send(&parlor, join("taco", "tardy")).await;
        assert_eq!(late.drain()[0]["reason"], "game already started");
    }
    #[tokio::test]
    async fn a_session_plays_out_over_the_wire() {
        let parlor = parlor();
        let mut clients = lobby(&parlor, 3).await;
        clients[0].send(&parlor, ClientCommand::Start).await;
        let ids = clients.iter_mut().map(Client::id).collect::<Vec<_>>();
        for client in clients.iter_mut() {
            client
                .send(
                    &parlor,
                    ClientCommand::Description {
                        text: "something roundish".to_string(),
                    },
                )
                .await;
        }
        clients[0].send(&parlor, ClientCommand::AdvanceToDiscussion).await;
        clients[0]
            .send(&parlor, ClientCommand::AdvanceToElimination)
            .await;
        assert_eq!(clients[0].last_view()["phase"], "elimination");
        for client in clients.iter_mut() {
            client
                .send(&parlor, ClientCommand::Vote { target_id: ids[1] })
                .await;
        }
        clients[0].send(&parlor, ClientCommand::Resolve).await;
        // three players deal two crew and one blur, so a single
        // elimination always settles the game one way or the other
        let view = clients[0].last_view();
        assert_eq!(view["phase"], "ended");
        assert!(view["winner"] == "crew" || view["winner"] == "blur");
        assert!(view["wordPair"].is_object());
        clients[0].send(&parlor, ClientCommand::NextRound).await;
        let last = clients[0].drain().pop().unwrap();
        assert_eq!(last["reason"], "game not found");
    }
}
