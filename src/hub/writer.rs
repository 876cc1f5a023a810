//! Per-connection writer.
//!
//! A [`Writer`] is the only thing allowed to write to its connection: it owns
//! the outbound half and drains a bounded mailbox into it from a dedicated
//! task, so at most one write is ever in flight per connection.
//!
//! Closing a writer stops the send loop at once, even mid-write. Whatever is
//! still queued is lost.

use std::fmt::Display;
use std::time::Duration;

use futures_util::{Sink, SinkExt};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::hub::message::Message;
use crate::hub::registry::ConnectionId;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// The send loop is not keeping up; the message was not queued.
    #[error("mailbox full")]
    MailboxFull,
    /// The send loop has ended, usually after a write failure.
    #[error("mailbox closed")]
    MailboxClosed,
}

/// Upper bound on the close handshake once the send loop stops. A peer that
/// stopped reading would otherwise hold the connection open.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Writer {
    connection_id: ConnectionId,
    mailbox: mpsc::Sender<Message>,
    stop: oneshot::Sender<()>,
}

impl Writer {
    /// Spawns the send loop for `sink` with a mailbox of `capacity` messages.
    ///
    /// The returned handle completes once the loop has ended and the sink has
    /// been closed.
    pub fn spawn<S>(connection_id: ConnectionId, sink: S, capacity: usize) -> (Self, JoinHandle<()>)
    where
        S: Sink<WsMessage> + Unpin + Send + 'static,
        S::Error: Display + Send,
    {
        let (tx, rx) = mpsc::channel(capacity);
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(send_loop(connection_id, sink, rx, stop_rx));

        let writer = Self {
            connection_id,
            mailbox: tx,
            stop: stop_tx,
        };
        (writer, handle)
    }

    /// Queues `message` for delivery without waiting.
    pub fn send(&self, message: Message) -> Result<(), SendError> {
        self.mailbox.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => SendError::MailboxFull,
            TrySendError::Closed(_) => SendError::MailboxClosed,
        })
    }

    /// Stops the send loop, interrupting a pending write, and closes the
    /// connection. Dropping a writer has the same effect.
    pub fn close(self) {
        debug!(connection_id = %self.connection_id, "closing writer");
        let _ = self.stop.send(());
    }

    pub fn is_closed(&self) -> bool {
        self.mailbox.is_closed()
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }
}

async fn send_loop<S>(
    connection_id: ConnectionId,
    mut sink: S,
    mut mailbox: mpsc::Receiver<Message>,
    mut stop: oneshot::Receiver<()>,
) where
    S: Sink<WsMessage> + Unpin,
    S::Error: Display,
{
    // `stop` resolves on close() and on a dropped writer alike
    loop {
        let message = tokio::select! {
            biased;
            _ = &mut stop => break,
            message = mailbox.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        tokio::select! {
            biased;
            _ = &mut stop => break,
            result = sink.send(message.into_frame()) => {
                if let Err(e) = result {
                    warn!(%connection_id, error = %e, "write failed, closing connection");
                    break;
                }
            }
        }
    }

    // refuse anything queued after the loop stopped
    mailbox.close();

    match timeout(CLOSE_GRACE, sink.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!(%connection_id, error = %e, "error while closing connection"),
        Err(_) => debug!(%connection_id, "close timed out, dropping connection"),
    }
    debug!(%connection_id, "send loop closed");
}
