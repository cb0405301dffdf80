use std::collections::{BTreeSet, HashMap};
use tokio::sync::mpsc;

use crate::models::{ActivityId, ConnId};

/// Outbound half of a connection: pre-serialized JSON frames in send order.
pub type OutboundSender = mpsc::UnboundedSender<String>;
pub type OutboundReceiver = mpsc::UnboundedReceiver<String>;

#[derive(Debug)]
struct ConnEntry {
    sender: OutboundSender,
    rooms: BTreeSet<ActivityId>,
}

/// Live connections, their outbound channels and the rooms each one has joined.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    conns: HashMap<ConnId, ConnEntry>,
}

impl ConnectionRegistry {
    /// Register a new connection and hand back its id plus the receiving end of its channel.
    pub fn register(&mut self) -> (ConnId, OutboundReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut conn_id = ConnId::new();
        while self.conns.contains_key(&conn_id) {
            conn_id = ConnId::new();
        }
        self.conns.insert(conn_id, ConnEntry { sender, rooms: BTreeSet::new() });
        (conn_id, receiver)
    }

    pub fn sender(&self, conn_id: ConnId) -> Option<&OutboundSender> {
        self.conns.get(&conn_id).map(|entry| &entry.sender)
    }

    /// Returns false when the connection is unknown.
    pub fn attach(&mut self, conn_id: ConnId, room: &ActivityId) -> bool {
        match self.conns.get_mut(&conn_id) {
            Some(entry) => {
                entry.rooms.insert(room.clone());
                true
            }
            None => false,
        }
    }

    pub fn detach(&mut self, conn_id: ConnId, room: &ActivityId) {
        if let Some(entry) = self.conns.get_mut(&conn_id) {
            entry.rooms.remove(room);
        }
    }

    /// Drop the connection and return the rooms it was in. Unknown ids yield `None`.
    ///
    /// Dropping the entry closes the outbound channel, which ends the socket writer task.
    pub fn remove(&mut self, conn_id: ConnId) -> Option<Vec<ActivityId>> {
        self.conns
            .remove(&conn_id)
            .map(|entry| entry.rooms.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }
}
