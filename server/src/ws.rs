use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::ball::PlayerId;
use crate::game_loop::{GameBroadcast, GameCommand};
use crate::protocol::{encode, ClientMsg, ServerMsg};

/// Shared app state passed to each WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub game_tx: mpsc::Sender<GameCommand>,
    pub broadcast_tx: broadcast::Sender<GameBroadcast>,
    /// Larger inbound text frames are dropped.
    pub max_message_bytes: usize,
}

/// Query string of the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Token from an earlier `join`, to resume that player.
    pub token: Option<String>,
}

/// HTTP handler for WebSocket upgrade
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state, params.token))
}

fn to_server_msg(broadcast: GameBroadcast) -> ServerMsg {
    match broadcast {
        GameBroadcast::Tick(msg) => ServerMsg::Tick(msg),
        GameBroadcast::PlayerList(msg) => ServerMsg::PlayerList(msg),
        GameBroadcast::Score(msg) => ServerMsg::Score(msg),
    }
}

/// Turn an inbound frame into a game command. `None` for anything that is
/// oversized, malformed, or not a known message.
fn command_for(my_id: PlayerId, text: &str, max_bytes: usize) -> Option<GameCommand> {
    if text.len() > max_bytes {
        return None;
    }
    match ClientMsg::parse(text)? {
        ClientMsg::PlayerInfo { name, colour } => Some(GameCommand::Register {
            id: my_id,
            name,
            colour,
        }),
        ClientMsg::Putt { vec } => Some(GameCommand::Putt { id: my_id, vec }),
    }
}

async fn handle_socket(socket: WebSocket, app_state: AppState, token: Option<String>) {
    let (mut sink, mut stream) = socket.split();

    // Subscribe before joining so no roster change after the join is missed
    let mut broadcast_rx = app_state.broadcast_tx.subscribe();

    let (resp_tx, resp_rx) = oneshot::channel();
    if app_state
        .game_tx
        .send(GameCommand::Join {
            token,
            response: resp_tx,
        })
        .await
        .is_err()
    {
        tracing::error!("Failed to send Join command");
        return;
    }

    let join = match resp_rx.await {
        Ok(join) => join,
        Err(_) => {
            tracing::error!("Failed to receive join");
            return;
        }
    };
    let my_id = join.self_id;

    tracing::info!("Player {} connected", my_id);

    match encode(&ServerMsg::Join(join)) {
        Ok(json) => {
            if sink.send(Message::Text(json.into())).await.is_err() {
                leave(&app_state, my_id).await;
                return;
            }
        }
        Err(e) => {
            tracing::error!("Failed to encode join for player {}: {}", my_id, e);
            leave(&app_state, my_id).await;
            return;
        }
    }

    loop {
        tokio::select! {
            // Client -> Server
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match command_for(my_id, text.as_str(), app_state.max_message_bytes) {
                            Some(cmd) => {
                                if app_state.game_tx.send(cmd).await.is_err() {
                                    tracing::error!("Game loop gone, closing player {}", my_id);
                                    break;
                                }
                            }
                            None => {
                                tracing::debug!(
                                    "Dropped message from player {} ({} bytes)",
                                    my_id,
                                    text.as_str().len()
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!("Player {} socket error: {}", my_id, e);
                        break;
                    }
                    _ => {} // Ignore ping/pong/binary
                }
            }

            // Server -> Client (broadcast)
            result = broadcast_rx.recv() => {
                match result {
                    Ok(broadcast) => {
                        let json = match encode(&to_server_msg(broadcast)) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("Failed to encode broadcast: {}", e);
                                continue;
                            }
                        };
                        if sink.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("Player {} lagged by {} messages", my_id, n);
                        // Continue - the next tick snapshot supersedes the dropped ones
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    leave(&app_state, my_id).await;
    tracing::info!("Player {} disconnected", my_id);
}

async fn leave(app_state: &AppState, id: PlayerId) {
    let _ = app_state.game_tx.send(GameCommand::Leave { id }).await;
}
