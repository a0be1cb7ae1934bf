use anyhow::Context;
use axum::routing::get;
use axum::Router;
use minigolf_server::config::ServerConfig;
use minigolf_server::game_loop::{run_game_loop, GameBroadcast, GameCommand};
use minigolf_server::levels::{default_course, load_level};
use minigolf_server::ws::{ws_handler, AppState};
use tokio::sync::{broadcast, mpsc};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=minigolf_server=debug for dropped messages and sinks
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;

    let level = match &config.level_path {
        Some(path) => {
            let level = load_level(path)
                .with_context(|| format!("failed to load course {}", path.display()))?;
            tracing::info!("Loaded course from {}", path.display());
            level
        }
        None => default_course(),
    };

    let listen_addr = config.listen_addr.clone();
    let max_message_bytes = config.max_message_bytes;

    let (game_tx, game_rx) = mpsc::channel::<GameCommand>(config.command_capacity);
    let (broadcast_tx, _) = broadcast::channel::<GameBroadcast>(config.broadcast_capacity);

    // Spawn game loop
    let bc_tx = broadcast_tx.clone();
    tokio::spawn(async move {
        run_game_loop(game_rx, bc_tx, config, level).await;
    });

    // Axum app
    let app_state = AppState {
        game_tx,
        broadcast_tx,
        max_message_bytes,
    };
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", listen_addr))?;
    tracing::info!("Minigolf server listening on {}", listen_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
