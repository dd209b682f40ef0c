//! HTTP/WebSocket router: `/ws` upgrade, a liveness probe, and a debug
//! endpoint for room counts (§4.9).

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Json;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::GameServer;

use super::handler::websocket_handler;

pub fn create_router(cors_allowed_origins: &[String]) -> axum::Router<Arc<GameServer>> {
    let cors = build_cors_layer(cors_allowed_origins);

    axum::Router::new()
        .route("/ws", get(websocket_handler))
        .route("/health", get(health_check))
        .route("/rooms", get(room_counts))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let parsed: Vec<_> = origins
        .iter()
        .filter_map(|origin| origin.parse::<axum::http::HeaderValue>().ok())
        .collect();

    if parsed.is_empty() {
        tracing::warn!("no valid CORS origins configured, falling back to permissive CORS");
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Serialize)]
struct RoomCounts {
    room_count: usize,
    participant_count: usize,
    viewer_count: usize,
}

async fn room_counts(State(server): State<Arc<GameServer>>) -> Json<RoomCounts> {
    let (participant_count, viewer_count) = server.active_connection_count();
    Json(RoomCounts {
        room_count: server.room_count(),
        participant_count,
        viewer_count,
    })
}

pub async fn run_server(
    addr: std::net::SocketAddr,
    server: Arc<GameServer>,
    cors_allowed_origins: &[String],
) -> anyhow::Result<()> {
    let app = create_router(cors_allowed_origins).with_state(server);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening for connections");
    axum::serve(listener, app).await?;
    Ok(())
}
