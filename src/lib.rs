//! # chathub
//!
//! `chathub` is a real-time WebSocket broadcast hub. Every message a client
//! sends is relayed to all connected clients, the sender included. Slow
//! clients lose messages instead of holding anybody else up.
//!
//! ## Core Modules
//!
//! - `hub`: connection registry, per-connection writers, the broadcast router
//!   and the connection lifecycle.
//! - `transport`: the WebSocket listener feeding connections into the hub.
//! - `persistence`: the `sled`-backed credential store.
//! - `client`: a minimal WebSocket client for smoke tests.
//! - `config`: layered configuration (file, then environment).
//! - `utils`: error types and logging setup.

pub mod client;
pub mod config;
pub mod hub;
pub mod persistence;
pub mod transport;
pub mod utils;
