//! The broadcast hub.
//!
//! Every connection registers a [`Writer`] in the shared [`Registry`] and
//! pushes what it reads into a single aggregation channel. The [`Router`]
//! drains that channel and offers each message to every registered writer,
//! dropping it for recipients whose mailbox is full.

pub mod message;
pub mod registry;
pub mod router;
pub mod session;
pub mod writer;

pub use message::Message;
pub use registry::{ConnectionId, DispatchReport, Registry};
pub use router::Router;
pub use session::{CloseReason, ConnectionState, run_connection};
pub use writer::{SendError, Writer};

use tokio::sync::mpsc;

use crate::config::HubSettings;
use crate::utils::HubError;

/// Handle to a running hub. Cheap to clone; every connection task holds one.
#[derive(Debug, Clone)]
pub struct Hub {
    registry: Registry,
    inbound: mpsc::Sender<Message>,
    mailbox_capacity: usize,
}

impl Hub {
    /// Creates a hub and the router that feeds it. Nothing is delivered until
    /// [`Router::run`] is polled.
    pub fn new(settings: &HubSettings) -> (Self, Router) {
        let registry = Registry::new(settings.max_connections);
        let (tx, rx) = mpsc::channel(settings.inbound_capacity.max(1));

        let hub = Self {
            registry: registry.clone(),
            inbound: tx,
            mailbox_capacity: settings.mailbox_capacity.max(1),
        };
        (hub, Router::new(rx, registry))
    }

    /// Creates a hub and spawns its router on the current runtime.
    pub fn start(settings: &HubSettings) -> Self {
        let (hub, router) = Self::new(settings);
        tokio::spawn(router.run());
        hub
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn mailbox_capacity(&self) -> usize {
        self.mailbox_capacity
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Pushes `message` into the aggregation channel, waiting for room.
    pub async fn publish(&self, message: Message) -> Result<(), HubError> {
        self.inbound
            .send(message)
            .await
            .map_err(|_| HubError::InboundClosed)
    }
}
