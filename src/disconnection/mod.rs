//! Disconnection grace period, reconnection vote, and resumption (§4.6).

pub mod controller;
