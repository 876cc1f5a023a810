use tokio::sync::mpsc;
use tracing::{info, trace};

use crate::hub::message::Message;
use crate::hub::registry::{DispatchReport, Registry};

/// Drains the aggregation channel and fans every message out to the registry.
///
/// There is one router per hub. It only ever waits on the aggregation
/// channel, never on a recipient.
#[derive(Debug)]
pub struct Router {
    inbound: mpsc::Receiver<Message>,
    registry: Registry,
}

impl Router {
    pub fn new(inbound: mpsc::Receiver<Message>, registry: Registry) -> Self {
        Self { inbound, registry }
    }

    /// Runs one dispatch pass for `message`.
    pub fn dispatch(&self, message: &Message) -> DispatchReport {
        let report = self.registry.dispatch(message);
        trace!(
            bytes = message.len(),
            delivered = report.delivered,
            dropped = report.dropped,
            closed = report.closed,
            "dispatched message"
        );
        report
    }

    /// Dispatches messages until every sender of the aggregation channel is gone.
    pub async fn run(mut self) {
        info!("router started");
        while let Some(message) = self.inbound.recv().await {
            self.dispatch(&message);
        }
        info!("aggregation channel closed, router stopped");
    }
}
