//! The `client` module is a small WebSocket client for smoke-testing a
//! running hub from the command line.

pub mod ws_client;

pub use ws_client::exchange;

#[cfg(test)]
mod tests;
