pub mod handlers;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::RoomCode;

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle one client connection. The connection id doubles as the player
/// id inside whichever room the client joins.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let conn_id = ulid::Ulid::new().to_string();
    tracing::info!(conn = %conn_id, "websocket connected");

    let (mut sender, mut receiver) = socket.split();

    // Set once the connection creates or joins a room.
    let mut joined: Option<RoomCode> = None;
    let mut room_rx: Option<broadcast::Receiver<ServerMessage>> = None;

    loop {
        tokio::select! {
            // Room-scoped broadcasts, once subscribed
            room_msg = async {
                match &mut room_rx {
                    Some(rx) => rx.recv().await.ok(),
                    None => {
                        // Not in a room yet: wait forever
                        std::future::pending::<Option<ServerMessage>>().await
                    }
                }
            } => {
                if let Some(msg) = room_msg {
                    if let Ok(json) = serde_json::to_string(&msg) {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                }
            }

            // Client messages
            ws_msg = receiver.next() => {
                match ws_msg {
                    Some(Ok(Message::Text(text))) => {
                        tracing::debug!(conn = %conn_id, "received: {}", text);

                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                match handlers::handle_message(client_msg, &conn_id, &state).await {
                                    handlers::Dispatch::Handled => {}
                                    handlers::Dispatch::Reply(reply) => {
                                        if let Ok(json) = serde_json::to_string(&reply) {
                                            if sender.send(Message::Text(json.into())).await.is_err() {
                                                break;
                                            }
                                        }
                                    }
                                    handlers::Dispatch::Joined { code, rx } => {
                                        // Switching rooms leaves the old one.
                                        if let Some(old) = joined.take() {
                                            if old != code {
                                                state.remove_member(&old, &conn_id).await;
                                            }
                                        }
                                        joined = Some(code);
                                        room_rx = Some(rx);
                                    }
                                }
                            }
                            Err(e) => {
                                tracing::warn!(conn = %conn_id, "unparseable client message: {}", e);
                                let error = ServerMessage::ErrorMsg {
                                    text: "Ungültige Nachricht.".to_string(),
                                };
                                if let Ok(json) = serde_json::to_string(&error) {
                                    let _ = sender.send(Message::Text(json.into())).await;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!(conn = %conn_id, "websocket closed");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(conn = %conn_id, "websocket error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    // Transactional cleanup: drop membership, reassign the host, destroy
    // the room if this was the last player.
    if let Some(code) = joined {
        state.remove_member(&code, &conn_id).await;
    }
    tracing::info!(conn = %conn_id, "websocket connection closed");
}
