use minigolf_shared::level::Level;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::ball::PlayerId;
use crate::config::ServerConfig;
use crate::protocol::{JoinMsg, PlayerListMsg, ScoreMsg, TickMsg};
use crate::state::GameState;

/// Commands from client connections to the game loop
#[derive(Debug)]
pub enum GameCommand {
    Join {
        /// Token from the connect URL, if any.
        token: Option<String>,
        response: oneshot::Sender<JoinMsg>,
    },
    Register {
        id: PlayerId,
        name: String,
        colour: String,
    },
    Putt {
        id: PlayerId,
        vec: [f64; 2],
    },
    Leave {
        id: PlayerId,
    },
}

/// Broadcasts from game loop to all clients
#[derive(Debug, Clone)]
pub enum GameBroadcast {
    Tick(TickMsg),
    PlayerList(PlayerListMsg),
    Score(ScoreMsg),
}

/// Run the main game loop. Owns all game state.
pub async fn run_game_loop(
    mut cmd_rx: mpsc::Receiver<GameCommand>,
    broadcast_tx: broadcast::Sender<GameBroadcast>,
    server_config: ServerConfig,
    level: Level,
) {
    let mut state = GameState::new(
        level,
        server_config.physics,
        server_config.network_tick_every,
    );

    let mut tick_interval =
        tokio::time::interval(Duration::from_millis(server_config.tick_interval_ms));
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let outcome = state.tick();

                if !outcome.scores.is_empty() {
                    for score in outcome.scores {
                        let _ = broadcast_tx.send(GameBroadcast::Score(score));
                    }
                    let _ = broadcast_tx.send(GameBroadcast::PlayerList(state.player_list()));
                }

                if let Some(snapshot) = outcome.snapshot {
                    let _ = broadcast_tx.send(GameBroadcast::Tick(snapshot));
                }
            }

            Some(cmd) = cmd_rx.recv() => {
                handle_command(&mut state, &broadcast_tx, cmd);
            }

            else => break,
        }
    }

    tracing::info!("Game loop ended");
}

fn handle_command(
    state: &mut GameState,
    broadcast_tx: &broadcast::Sender<GameBroadcast>,
    cmd: GameCommand,
) {
    match cmd {
        GameCommand::Join { token, response } => {
            let connected = state.connect(token.as_deref());
            let Some(join) = state.join_msg(connected.player_id) else {
                return;
            };
            if response.send(join).is_err() {
                // Connection went away while waiting; undo the attach.
                state.disconnect(connected.player_id);
                return;
            }
            if connected.resumed {
                tracing::info!("Player {} resumed", connected.player_id);
            }
            if connected.roster_changed {
                let _ = broadcast_tx.send(GameBroadcast::PlayerList(state.player_list()));
            }
        }
        GameCommand::Register { id, name, colour } => {
            if state.register(id, &name, &colour) {
                if let Some(player) = state.players.get(&id) {
                    tracing::info!("Player {} registered as {:?}", id, player.name);
                }
                let _ = broadcast_tx.send(GameBroadcast::PlayerList(state.player_list()));
            }
        }
        GameCommand::Putt { id, vec } => {
            if !state.putt(id, vec) {
                tracing::debug!("Ignored putt from player {}", id);
            }
        }
        GameCommand::Leave { id } => {
            if state.disconnect(id) {
                let _ = broadcast_tx.send(GameBroadcast::PlayerList(state.player_list()));
            }
            tracing::info!("Player {} left", id);
        }
    }
}
