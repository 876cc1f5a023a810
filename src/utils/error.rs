//! The `error` module defines the error types surfaced by the hub and its
//! WebSocket transport.
//!
//! Every variant is scoped to a single connection or to server startup; none
//! of them is meant to bring the whole process down from a connection task.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    /// The WebSocket upgrade for one incoming connection failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(#[from] tungstenite::Error),

    /// The registry already holds the configured number of connections.
    #[error("connection limit of {limit} reached")]
    ConnectionLimit { limit: usize },

    /// The router is gone, so inbound messages have nowhere to go.
    #[error("aggregation channel closed")]
    InboundClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
