//! Per-connection WebSocket session.

use super::codec;
use crate::broadcast::{Inbox, Outbox};
use crate::coordinator::GameCoordinator;
use axum::extract::State;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use noughts_board::Mark;
use tracing::{debug, error, info, instrument, warn};

/// Close code sent when both marks are taken (cannot accept).
pub const CAPACITY_CLOSE_CODE: u16 = close_code::UNSUPPORTED;

/// Upgrades the request and runs a game session on the socket.
pub async fn play_handler(
    ws: WebSocketUpgrade,
    State(coordinator): State<GameCoordinator>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_session(socket, coordinator))
}

#[instrument(skip_all)]
async fn run_session(mut socket: WebSocket, coordinator: GameCoordinator) {
    let (outbox, inbox) = Outbox::channel();
    let mark = match coordinator.admit(outbox).await {
        Ok(mark) => mark,
        Err(e) => {
            warn!(error = %e, "Rejecting connection");
            let frame = CloseFrame {
                code: CAPACITY_CLOSE_CODE,
                reason: e.to_string().into(),
            };
            if let Err(e) = socket.send(Message::Close(Some(frame))).await {
                debug!(error = %e, "Close frame not delivered");
            }
            return;
        }
    };
    info!(%mark, "Participant connected");

    let (sink, stream) = socket.split();
    let mut writer = tokio::spawn(write_snapshots(sink, inbox, mark));

    tokio::select! {
        _ = read_moves(stream, &coordinator, mark) => {}
        _ = &mut writer => {
            warn!(%mark, "Outbound stream ended, dropping participant");
        }
    }

    coordinator.evict(mark);
    writer.abort();
    info!(%mark, "Participant disconnected");
}

async fn read_moves(mut stream: SplitStream<WebSocket>, coordinator: &GameCoordinator, mark: Mark) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let turn = codec::decode_move(text.as_str());
                let outcome = coordinator.apply_move(mark, turn.x, turn.y).await;
                debug!(%mark, ?turn, ?outcome, "Move processed");
            }
            Ok(Message::Close(_)) => {
                debug!(%mark, "Close frame received");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(%mark, error = %e, "WebSocket receive failed");
                break;
            }
        }
    }
}

async fn write_snapshots(mut sink: SplitSink<WebSocket, Message>, mut inbox: Inbox, mark: Mark) {
    while let Some(snapshot) = inbox.recv().await {
        let text = match codec::encode_snapshot(&snapshot) {
            Ok(text) => text,
            Err(e) => {
                error!(%mark, error = %e, "Snapshot encoding failed");
                continue;
            }
        };
        if let Err(e) = sink.send(Message::Text(text.into())).await {
            warn!(%mark, error = %e, "Snapshot delivery failed");
            break;
        }
    }
}
