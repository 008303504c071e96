use super::*;
use tokio::sync::mpsc::UnboundedSender;
use wb_core::ID;
use wb_core::Unique;

/// Outbound half of one WebSocket connection.
/// The other half lives in the transport task that drains the channel
/// into the socket. Sends are fire-and-forget: a closed channel means
/// the client hung up, and the hangup path will reap the seat.
#[derive(Clone)]
pub struct Link {
    id: ID<Self>,
    tx: UnboundedSender<String>,
}

impl Link {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self {
            id: ID::default(),
            tx,
        }
    }
    pub fn send(&self, message: &ServerMessage) {
        let _ = self.tx.send(message.to_json());
    }
}

impl Unique for Link {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
