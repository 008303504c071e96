use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;
use wb_core::Unique;
use wb_gameroom::Link;
use wb_gameroom::Parlor;
use wb_gameroom::Protocol;
use wb_gameroom::Seat;
use wb_gameroom::ServerMessage;

/// Spawns the pump for one WebSocket connection.
/// Outbound messages drain from the link channel into the socket;
/// inbound frames decode into commands for the parlor. Either side
/// closing ends the session, and the hangup reaps the seat.
pub fn spawn(
    parlor: Arc<Parlor>,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    actix_web::rt::spawn(async move {
        let (tx, mut rx) = unbounded_channel();
        let link = Link::new(tx);
        let mut seat: Option<Seat> = None;
        log::debug!("[bridge {}] connected", link.id());
        'sesh: loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Some(json) => if session.text(json).await.is_err() { break 'sesh },
                    None => break 'sesh,
                },
                msg = stream.next() => match msg {
                    Some(Ok(actix_ws::Message::Text(text))) => match Protocol::decode(&text) {
                        Ok(command) => parlor.dispatch(&link, &mut seat, command).await,
                        Err(ref error) => link.send(&ServerMessage::rejected(error)),
                    },
                    Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                    Some(Err(_)) => break 'sesh,
                    None => break 'sesh,
                    _ => continue 'sesh,
                },
            }
        }
        parlor.hangup(seat, link.id()).await;
        log::debug!("[bridge {}] disconnected", link.id());
    });
}
