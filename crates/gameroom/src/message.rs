use serde::Deserialize;
use serde::Serialize;
use wb_core::ID;
use wb_gameplay::*;

/// Requests sent from client to server over WebSocket.
/// Everything after the seating commands is implicitly scoped to the
/// session the connection is seated in, so no command carries a code
/// except the three that establish the seat.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Open a new session under an invite code and seat the host.
    Create { code: String, name: String },
    /// Seat a new player in an existing lobby.
    Join { code: String, name: String },
    /// Re-bind a live connection to an existing seat.
    Reconnect { code: String, player_id: ID<Player> },
    /// Host deals the first round.
    Start,
    /// Submit or revise this round's clue.
    Description { text: String },
    AdvanceToDiscussion,
    AdvanceToElimination,
    /// Vote to eliminate a player.
    Vote { target_id: ID<Player> },
    /// Host closes the ballot and eliminates the plurality target.
    Resolve,
    /// Eliminated blank guesses the crew word.
    BlankGuess { guess: String },
    NextRound,
}

/// Messages sent from server to client over WebSocket.
/// State pushes carry a full personalized [`View`] rather than deltas,
/// so a client can always rebuild its screen from the latest message.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Seat confirmation after create, join, or reconnect.
    Joined {
        code: Code,
        is_host: bool,
        view: View,
    },
    /// Personalized state push after any accepted command.
    View { view: View },
    /// A command was refused; the session state did not change.
    CommandRejected { kind: &'static str, reason: String },
}

impl ServerMessage {
    pub fn joined(code: Code, is_host: bool, view: View) -> Self {
        Self::Joined {
            code,
            is_host,
            view,
        }
    }
    pub fn view(view: View) -> Self {
        Self::View { view }
    }
    pub fn rejected(error: &GameError) -> Self {
        Self::CommandRejected {
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}
