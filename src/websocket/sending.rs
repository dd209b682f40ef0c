//! Per-connection outbound path: drains a `ServerMessage` channel onto the
//! socket's write half as JSON text frames (§4.9).

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use tokio::sync::mpsc;
use tracing::warn;

use crate::protocol::messages::ServerMessage;

/// Serialize and send a single message, used for both the steady-state send
/// loop and one-off messages (like a join failure) sent before the loop
/// starts.
pub async fn send_server_message(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(err) => {
            warn!(error = %err, "failed to serialize outgoing message");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}

/// Owns the write half of a connection for its lifetime, forwarding
/// everything sent on `outbox` until the channel closes or a send fails.
pub async fn run_send_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut outbox: mpsc::Receiver<ServerMessage>,
) {
    while let Some(message) = outbox.recv().await {
        if send_server_message(&mut sink, &message).await.is_err() {
            break;
        }
    }
    let _ = sink.close().await;
}
