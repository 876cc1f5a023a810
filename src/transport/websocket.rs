//! WebSocket transport
//!
//! Responsibilities:
//! - Accept TCP connections and upgrade them to WebSockets
//! - Give each connection an id and run it through [`run_connection`]
//! - Keep serving when a single handshake or connection fails

use std::net::SocketAddr;

use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use tracing::{info, warn};

use crate::hub::{ConnectionId, Hub, run_connection};
use crate::utils::HubError;

/// Binds `addr` and serves WebSocket connections on it forever.
pub async fn start_websocket_server(addr: &str, hub: Hub) -> Result<(), HubError> {
    let listener = TcpListener::bind(addr).await?;
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);
    serve(listener, hub).await
}

/// Accept loop over an already bound listener.
pub async fn serve(listener: TcpListener, hub: Hub) -> Result<(), HubError> {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "failed to accept connection");
                continue;
            }
        };

        let hub = hub.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_stream(stream, peer, hub).await {
                warn!(%peer, error = %e, "connection ended with error");
            }
        });
    }
}

async fn handle_stream(stream: TcpStream, peer: SocketAddr, hub: Hub) -> Result<(), HubError> {
    let ws_stream = accept_async(stream).await?;
    let connection_id = ConnectionId::new();
    info!(%connection_id, %peer, "connection opened");

    let (ws_sender, ws_receiver) = ws_stream.split();
    let reason = run_connection(hub, connection_id, ws_receiver, ws_sender).await?;

    info!(%connection_id, %peer, ?reason, "connection closed");
    Ok(())
}
