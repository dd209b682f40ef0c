//! Axum entry point: upgrades an HTTP connection to a WebSocket and hands
//! the socket off to the connection loop (§4.9).

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;

use crate::server::GameServer;

use super::connection::handle_socket;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(server): State<Arc<GameServer>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, server))
}
