#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_excessive_bools,
    clippy::too_many_arguments,
    clippy::too_many_lines,
    clippy::similar_names
)]

//! # Echofest Server
//!
//! Authoritative room server for Echofest, a real-time party sound-guessing
//! game: rooms, round state machine, disconnection handling, and viewer
//! broadcast all live in-memory behind a single WebSocket endpoint.

/// Asset catalog: prompts and sounds available to a room.
pub mod assets;

/// Server, game, asset, and logging configuration.
pub mod config;

/// Three-phase disconnection/reconnection-vote protocol.
pub mod disconnection;

/// Room state, round state machine, scoring, and shuffling.
pub mod game;

/// Structured logging configuration.
pub mod logging;

/// Client/server wire protocol and validation.
pub mod protocol;

/// Per-room actor, connection registry, and the top-level server handle.
pub mod server;

/// Passive-viewer registry and primary-viewer election.
pub mod viewers;

/// WebSocket transport: upgrade handler, router, send/receive loops.
pub mod websocket;
