use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::hub::message::Message;
use crate::hub::writer::{SendError, Writer};
use crate::utils::HubError;

/// Identity of a live connection. Assigned once at accept time and used only
/// as the registry key; it carries no user information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Outcome of one dispatch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    /// Recipients whose mailbox was full.
    pub dropped: usize,
    /// Recipients whose send loop had already ended.
    pub closed: usize,
}

impl DispatchReport {
    pub fn recipients(&self) -> usize {
        self.delivered + self.dropped + self.closed
    }
}

/// Shared map of live connections to their writers.
///
/// Each connection task registers and deregisters only its own entry; the
/// router reads the whole map on every dispatch pass. Cloning shares the map.
#[derive(Debug, Clone)]
pub struct Registry {
    writers: Arc<Mutex<HashMap<ConnectionId, Writer>>>,
    max_connections: usize,
}

impl Registry {
    pub fn new(max_connections: usize) -> Self {
        Self {
            writers: Arc::new(Mutex::new(HashMap::new())),
            max_connections,
        }
    }

    // A panic elsewhere cannot leave the map half-updated, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<ConnectionId, Writer>> {
        self.writers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `writer` under its connection id.
    ///
    /// When the registry is full the writer is dropped, which closes its
    /// mailbox and lets its send loop shut the connection.
    pub fn register(&self, writer: Writer) -> Result<(), HubError> {
        let mut writers = self.lock();
        if writers.len() >= self.max_connections {
            return Err(HubError::ConnectionLimit {
                limit: self.max_connections,
            });
        }
        writers.insert(writer.connection_id(), writer);
        Ok(())
    }

    /// Removes and returns the writer for `id`, if it is still registered.
    pub fn deregister(&self, id: &ConnectionId) -> Option<Writer> {
        self.lock().remove(id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.lock().keys().copied().collect()
    }

    /// Offers `message` to every registered writer without waiting on any of
    /// them. A full mailbox loses this message; other recipients are unaffected.
    ///
    /// The lock is held for the whole pass, so the recipients are exactly the
    /// connections registered when the pass began.
    pub fn dispatch(&self, message: &Message) -> DispatchReport {
        let writers = self.lock();
        let mut report = DispatchReport::default();

        for (id, writer) in writers.iter() {
            match writer.send(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(SendError::MailboxFull) => {
                    warn!(connection_id = %id, "mailbox full, dropping message");
                    report.dropped += 1;
                }
                Err(SendError::MailboxClosed) => {
                    debug!(connection_id = %id, "send loop gone, skipping recipient");
                    report.closed += 1;
                }
            }
        }

        report
    }
}
