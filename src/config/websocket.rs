//! WebSocket transport configuration.

use super::defaults::{default_max_message_bytes, default_send_buffer_size};
use serde::{Deserialize, Serialize};

/// WebSocket configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebSocketConfig {
    /// Capacity of the per-connection outbound channel; the send task
    /// applies backpressure once this fills (§5, §6 "delivered in emission
    /// order").
    #[serde(default = "default_send_buffer_size")]
    pub send_buffer_size: usize,
    /// Largest inbound text frame accepted before the connection is closed.
    #[serde(default = "default_max_message_bytes")]
    pub max_message_bytes: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: default_send_buffer_size(),
            max_message_bytes: default_max_message_bytes(),
        }
    }
}

impl WebSocketConfig {
    /// Validate websocket configuration bounds.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.send_buffer_size == 0 {
            anyhow::bail!("websocket.send_buffer_size must be at least 1");
        }
        if self.max_message_bytes < 1024 {
            anyhow::bail!("websocket.max_message_bytes must be at least 1024 bytes");
        }
        Ok(())
    }
}
