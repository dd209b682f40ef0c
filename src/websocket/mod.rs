//! Transport layer: axum WebSocket upgrade, per-connection send/receive
//! tasks, and the HTTP router (§4.9).

pub mod connection;
pub mod handler;
pub mod routes;
pub mod sending;

pub use routes::{create_router, run_server};
