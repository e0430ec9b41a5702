//! HTTP server for the progression engine.

pub mod routes;
pub mod session;

use anyhow::Result;
use axum::Router;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use session::{Clock, GameSession};

/// The session shared across handlers. One lock serializes every read-modify-write.
pub type SharedSession = Arc<Mutex<GameSession>>;

/// Build the full API router around a session.
pub fn router(session: GameSession) -> Router {
    let state: SharedSession = Arc::new(Mutex::new(session));
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::player_routes())
        .merge(routes::daily_routes())
        .merge(routes::shop_routes())
        .merge(routes::achievement_routes())
        .merge(routes::quest_routes())
        .with_state(state)
}

/// Run the HTTP server until the listener fails or Ctrl-C is received.
pub async fn run(session: GameSession, addr: SocketAddr) -> Result<()> {
    let app = router(session);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;
    Ok(())
}
