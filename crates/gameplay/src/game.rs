use super::*;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use wb_core::*;
use wb_lexicon::WordPair;

/// One hidden-role session from lobby to scored finish.
///
/// All mutation goes through command methods returning `Result`, and a
/// refused command leaves state untouched. Randomness is injected so role
/// deals and clue orders reproduce under a seeded generator. Connection
/// concerns live a layer up; the engine only knows player identities.
#[derive(Debug, Clone)]
pub struct Game {
    code: Code,
    host: ID<Player>,
    players: Vec<Player>,
    phase: Phase,
    round: Round,
    pair: Option<WordPair>,
    roles: HashMap<ID<Player>, Role>,
    eliminated: Vec<ID<Player>>,
    current: RoundState,
    winner: Option<Faction>,
    created_at: i64,
}

impl Game {
    /// Open a lobby with its creator seated as host.
    pub fn create(code: Code, host_name: String) -> Self {
        let host = Player::new(host_name);
        let id = host.id();
        Self {
            code,
            host: id,
            players: vec![host],
            phase: Phase::Lobby,
            round: 0,
            pair: None,
            roles: HashMap::new(),
            eliminated: Vec::new(),
            current: RoundState::default(),
            winner: None,
            created_at: now(),
        }
    }
    /// Seat a new player. Only lobbies accept joins, names are unique
    /// case-insensitively, and the roster caps at [`MAX_PLAYERS`].
    pub fn join(&mut self, name: String) -> Result<ID<Player>, GameError> {
        if self.phase != Phase::Lobby {
            return Err(GameError::Conflict("game already started"));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::Capacity("room is full"));
        }
        if self
            .players
            .iter()
            .any(|p| p.name().to_lowercase() == name.to_lowercase())
        {
            return Err(GameError::Capacity("name already taken"));
        }
        let player = Player::new(name);
        let id = player.id();
        self.players.push(player);
        Ok(id)
    }
    /// Remove a lobby player, migrating host duty to the senior survivor.
    /// Outside the lobby the roster is immutable and this is a no-op.
    /// Returns true when the roster is left empty.
    pub fn leave(&mut self, id: ID<Player>) -> bool {
        if self.phase != Phase::Lobby {
            return false;
        }
        self.players.retain(|p| p.id() != id);
        if self.host == id {
            if let Some(senior) = self.players.first() {
                self.host = senior.id();
            }
        }
        self.players.is_empty()
    }
    /// Deal words and roles and open the first round of clues.
    pub fn start(&mut self, by: ID<Player>, rng: &mut impl Rng) -> Result<(), GameError> {
        self.authorize(by)?;
        if self.phase != Phase::Lobby {
            return Err(GameError::Conflict("game already started"));
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::Conflict("not enough players to start"));
        }
        self.pair = Some(WordPair::draw(rng));
        self.roles = Role::deal(&self.ids(), rng);
        self.eliminated.clear();
        self.winner = None;
        self.round = 1;
        let mut order = self.ids();
        order.shuffle(rng);
        self.current = RoundState::opening(order);
        self.phase = Phase::Description;
        Ok(())
    }
    /// Record or revise a clue during the description phase. Eliminated
    /// players may still submit; only living clues gate the advance.
    pub fn describe(&mut self, by: ID<Player>, text: String) -> Result<(), GameError> {
        if self.phase != Phase::Description {
            return Err(GameError::Conflict("clues are closed"));
        }
        if self.player(by).is_none() {
            return Err(GameError::NotFound("player not in this game"));
        }
        self.current.describe(by, text);
        Ok(())
    }
    /// Close clues and open table talk. Requires every living player's clue.
    pub fn advance_to_discussion(&mut self, by: ID<Player>) -> Result<(), GameError> {
        self.authorize(by)?;
        if self.phase != Phase::Description {
            return Err(GameError::Conflict("not in the clue phase"));
        }
        if !self.all_clues_in() {
            return Err(GameError::Conflict("waiting for clues"));
        }
        self.phase = Phase::Discussion;
        Ok(())
    }
    /// Open the elimination ballot with a clean slate of votes.
    pub fn advance_to_elimination(&mut self, by: ID<Player>) -> Result<(), GameError> {
        self.authorize(by)?;
        if self.phase != Phase::Discussion {
            return Err(GameError::Conflict("not in the discussion phase"));
        }
        self.current = std::mem::take(&mut self.current).balloting();
        self.phase = Phase::Elimination;
        Ok(())
    }
    /// Cast or change a vote. Voter and target must both be living.
    pub fn vote(&mut self, by: ID<Player>, target: ID<Player>) -> Result<(), GameError> {
        if self.phase != Phase::Elimination {
            return Err(GameError::Conflict("voting is closed"));
        }
        if !self.alive(by) {
            return Err(GameError::Conflict("eliminated players cannot vote"));
        }
        if !self.alive(target) {
            return Err(GameError::Conflict("target is not in the round"));
        }
        self.current.cast(by, target);
        Ok(())
    }
    /// Tally the ballot, eliminate the chosen player, and route onward to
    /// the blank's guess, a round break, or the end of the session.
    pub fn resolve(&mut self, by: ID<Player>) -> Result<(), GameError> {
        self.authorize(by)?;
        if self.phase != Phase::Elimination {
            return Err(GameError::Conflict("not in the voting phase"));
        }
        if !self.current.ballot().complete(&self.living()) {
            return Err(GameError::Conflict("waiting for votes"));
        }
        let Some(target) = self.current.ballot().elect() else {
            return Err(GameError::Conflict("no votes to resolve"));
        };
        self.eliminated.push(target);
        match self.roles.get(&target) {
            Some(Role::Blank) => {
                self.current = std::mem::take(&mut self.current).guessing(target);
                self.phase = Phase::BlankGuess;
            }
            _ => self.conclude(),
        }
        Ok(())
    }
    /// The eliminated blank names the crew word. A match, compared trimmed
    /// and case-insensitive, ends the session for the blur side on the
    /// spot; a miss falls through to the usual round resolution.
    pub fn guess(&mut self, by: ID<Player>, text: String) -> Result<(), GameError> {
        if self.phase != Phase::BlankGuess {
            return Err(GameError::Conflict("no guess is pending"));
        }
        if self.current.guesser() != Some(by) {
            return Err(GameError::Unauthorized("the guess is not yours to make"));
        }
        let correct = self
            .pair
            .as_ref()
            .is_some_and(|pair| pair.crew.trim().to_lowercase() == text.trim().to_lowercase());
        self.current.record_guess(text, correct);
        match correct {
            true => self.finish(Faction::Blur),
            false => self.conclude(),
        }
        Ok(())
    }
    /// Open the next round of clues over the surviving roster.
    pub fn next_round(&mut self, by: ID<Player>, rng: &mut impl Rng) -> Result<(), GameError> {
        self.authorize(by)?;
        if self.phase != Phase::RoundEnd {
            return Err(GameError::Conflict("the round is still running"));
        }
        let mut order = self.living();
        order.shuffle(rng);
        self.round += 1;
        self.current = std::mem::take(&mut self.current).next_round(order);
        self.phase = Phase::Description;
        Ok(())
    }
    fn authorize(&self, by: ID<Player>) -> Result<(), GameError> {
        match self.host == by {
            true => Ok(()),
            false => Err(GameError::Unauthorized("only the host can do that")),
        }
    }
    /// Decide whether the session is over, parking it at a round break
    /// otherwise. Crew wins once no covert role survives; the blur side
    /// wins once the living crew thins to one.
    fn conclude(&mut self) {
        let crew = self.living_with(Role::Crew);
        let blur = self.living_with(Role::Blur);
        let blank = self.living_with(Role::Blank);
        if blur == 0 && blank == 0 {
            self.finish(Faction::Crew);
        } else if crew <= 1 {
            self.finish(Faction::Blur);
        } else {
            self.current = std::mem::take(&mut self.current).intermission();
            self.phase = Phase::RoundEnd;
        }
    }
    /// Settle the session: record the winner and pay every member of the
    /// winning faction, eliminated players included.
    fn finish(&mut self, winner: Faction) {
        self.winner = Some(winner);
        self.phase = Phase::Ended;
        for player in self.players.iter_mut() {
            if let Some(role) = self.roles.get(&player.id()) {
                player.award(payout(*role, winner));
            }
        }
    }
    pub fn code(&self) -> &Code {
        &self.code
    }
    pub fn host(&self) -> ID<Player> {
        self.host
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn round(&self) -> Round {
        self.round
    }
    pub fn winner(&self) -> Option<Faction> {
        self.winner
    }
    pub fn created_at(&self) -> i64 {
        self.created_at
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, id: ID<Player>) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }
    pub fn eliminated(&self) -> &[ID<Player>] {
        &self.eliminated
    }
    pub fn current(&self) -> &RoundState {
        &self.current
    }
    pub fn pair(&self) -> Option<&WordPair> {
        self.pair.as_ref()
    }
    pub fn role(&self, id: ID<Player>) -> Option<Role> {
        self.roles.get(&id).copied()
    }
    /// The word this player plays with, once roles are dealt. Blanks and
    /// lobby players get nothing.
    pub fn word(&self, id: ID<Player>) -> Option<&str> {
        match (self.roles.get(&id), self.pair.as_ref()) {
            (Some(role), Some(pair)) => role.word(pair),
            _ => None,
        }
    }
    /// Roster ids in join order.
    pub fn ids(&self) -> Vec<ID<Player>> {
        self.players.iter().map(|p| p.id()).collect()
    }
    /// Living roster ids in join order.
    pub fn living(&self) -> Vec<ID<Player>> {
        self.ids()
            .into_iter()
            .filter(|id| !self.eliminated.contains(id))
            .collect()
    }
    /// True when the player is seated and not eliminated.
    pub fn alive(&self, id: ID<Player>) -> bool {
        self.player(id).is_some() && !self.eliminated.contains(&id)
    }
    fn living_with(&self, role: Role) -> usize {
        self.living()
            .iter()
            .filter(|id| self.roles.get(id) == Some(&role))
            .count()
    }
    fn all_clues_in(&self) -> bool {
        self.living()
            .iter()
            .all(|id| self.current.clue(*id).is_some_and(|text| !text.is_empty()))
    }
    /// Storable mirror of this session, live connections excluded.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            code: self.code.clone(),
            host_id: self.host,
            players: self.players.clone(),
            phase: self.phase,
            round: self.round,
            word_pair: self.pair.clone(),
            roles: self.roles.clone(),
            eliminated: self.eliminated.clone(),
            current: self.current.clone(),
            winner: self.winner,
            created_at: self.created_at,
        }
    }
    /// Rebuild a session from storage. Every seat comes back detached and
    /// waits on reconnects.
    pub fn restore(snapshot: Snapshot) -> Self {
        Self {
            code: snapshot.code,
            host: snapshot.host_id,
            players: snapshot.players,
            phase: snapshot.phase,
            round: snapshot.round,
            pair: snapshot.word_pair,
            roles: snapshot.roles,
            eliminated: snapshot.eliminated,
            current: snapshot.current,
            winner: snapshot.winner,
            created_at: snapshot.created_at,
        }
    }
}
