use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;

use classroom_signaling::config::Config;
use classroom_signaling::signaling::{build_router, AppState, Hub};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let state = AppState {
        hub: Arc::new(Hub::new()),
        turn: config.turn,
    };
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    log::info!("Starting signaling server on http://{}", addr);
    log::info!("WebSocket endpoint: ws://{}/ws", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
