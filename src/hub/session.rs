//! Connection lifecycle.
//!
//! One [`run_connection`] call drives a single connection from registration
//! to teardown:
//!
//! `Connecting -> Open -> Closing -> Closed`
//!
//! The first read error, end of stream, close frame, or write failure moves it
//! to `Closing`. Nothing is retried.

use std::fmt::{self, Display};

use futures_util::{Sink, Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::hub::Hub;
use crate::hub::message::Message;
use crate::hub::registry::ConnectionId;
use crate::hub::writer::Writer;
use crate::utils::HubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Why a connection left the `Open` state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// Close frame or end of stream from the peer.
    PeerClosed,
    ReadError(String),
    /// The writer's send loop ended, normally after a failed write.
    WriterEnded,
    /// The router is gone and inbound messages cannot be forwarded.
    RouterGone,
}

fn enter(connection_id: ConnectionId, state: ConnectionState) {
    debug!(%connection_id, %state, "connection state");
}

/// Serves one connection until it closes.
///
/// `inbound` yields frames read from the peer; `outbound` is handed to a new
/// [`Writer`]. Data frames are forwarded verbatim to the hub, waiting if the
/// router is saturated. On the way out the connection is deregistered and its
/// writer closed without draining, so a peer that stopped reading cannot keep
/// it alive; the send loop has finished before this returns.
pub async fn run_connection<St, E, Si>(
    hub: Hub,
    connection_id: ConnectionId,
    inbound: St,
    outbound: Si,
) -> Result<CloseReason, HubError>
where
    St: Stream<Item = Result<WsMessage, E>> + Unpin,
    E: Display,
    Si: Sink<WsMessage> + Unpin + Send + 'static,
    Si::Error: Display + Send,
{
    enter(connection_id, ConnectionState::Connecting);
    let (writer, mut send_loop) = Writer::spawn(connection_id, outbound, hub.mailbox_capacity());

    if let Err(e) = hub.registry().register(writer) {
        // the rejected writer was dropped, so its loop closes the sink
        join_send_loop(connection_id, send_loop).await;
        enter(connection_id, ConnectionState::Closed);
        return Err(e);
    }
    enter(connection_id, ConnectionState::Open);

    let reason = read_loop(&hub, connection_id, inbound, &mut send_loop).await;

    enter(connection_id, ConnectionState::Closing);
    if let Some(writer) = hub.registry().deregister(&connection_id) {
        writer.close();
    }
    if reason != CloseReason::WriterEnded {
        join_send_loop(connection_id, send_loop).await;
    }
    enter(connection_id, ConnectionState::Closed);

    Ok(reason)
}

async fn join_send_loop(connection_id: ConnectionId, send_loop: JoinHandle<()>) {
    if let Err(e) = send_loop.await {
        warn!(%connection_id, error = %e, "send loop task failed");
    }
}

async fn read_loop<St, E>(
    hub: &Hub,
    connection_id: ConnectionId,
    mut inbound: St,
    send_loop: &mut JoinHandle<()>,
) -> CloseReason
where
    St: Stream<Item = Result<WsMessage, E>> + Unpin,
    E: Display,
{
    loop {
        tokio::select! {
            frame = inbound.next() => match frame {
                Some(Ok(WsMessage::Close(_))) | None => return CloseReason::PeerClosed,
                Some(Ok(frame)) => {
                    let Some(message) = Message::from_frame(frame) else {
                        continue;
                    };
                    if hub.publish(message).await.is_err() {
                        return CloseReason::RouterGone;
                    }
                }
                Some(Err(e)) => return CloseReason::ReadError(e.to_string()),
            },
            joined = &mut *send_loop => {
                if let Err(e) = joined {
                    warn!(%connection_id, error = %e, "send loop task failed");
                }
                return CloseReason::WriterEnded;
            }
        }
    }
}
