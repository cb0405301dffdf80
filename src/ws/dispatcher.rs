use tracing::{debug, error};

use crate::models::{ConnId, SendMessage};
use crate::ws::registry::ConnectionRegistry;

/// Serialize an event once and queue it on every recipient's outbound channel.
///
/// Callers hold the hub lock, so events for one room are queued in the order they were
/// triggered and each connection's channel preserves that order. Recipients that are gone
/// or whose socket has closed are skipped silently. Returns the number of deliveries.
pub fn publish<'a>(
    registry: &ConnectionRegistry,
    recipients: impl IntoIterator<Item = &'a ConnId>,
    event: &SendMessage,
) -> usize {
    let Some(frame) = encode(event) else {
        return 0;
    };

    let mut delivered = 0;
    for conn_id in recipients {
        if let Some(sender) = registry.sender(*conn_id) {
            if sender.send(frame.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!("Dropping event for closed connection {}", conn_id);
            }
        }
    }
    delivered
}

/// Queue an event for a single connection.
pub fn unicast(registry: &ConnectionRegistry, conn_id: ConnId, event: &SendMessage) -> bool {
    publish(registry, [&conn_id], event) == 1
}

fn encode(event: &SendMessage) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            error!("Failed to serialize outbound event: {}", e);
            None
        }
    }
}
