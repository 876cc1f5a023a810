//! The `transport` module is responsible for network communication with
//! clients over WebSockets.
//!
//! It accepts TCP connections, performs the WebSocket handshake, and hands
//! each upgraded stream to the hub's connection lifecycle. Frames are relayed
//! as-is; there is no application protocol at this layer.

pub mod websocket;

pub use websocket::{serve, start_websocket_server};
