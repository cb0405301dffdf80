use std::collections::{BTreeSet, HashMap};

use crate::models::{ActivityId, ConnId};

/// Per-activity set of joined connections.
///
/// A room exists only while it has members; the count is always the size of the set.
#[derive(Debug, Default)]
pub struct RoomTracker {
    rooms: HashMap<ActivityId, BTreeSet<ConnId>>,
}

impl RoomTracker {
    /// Add the connection to the room. Joining twice is the same as joining once.
    pub fn join(&mut self, room: &ActivityId, conn_id: ConnId) -> usize {
        let members = self.rooms.entry(room.clone()).or_default();
        members.insert(conn_id);
        members.len()
    }

    /// Remove the connection from the room if present.
    pub fn leave(&mut self, room: &ActivityId, conn_id: ConnId) -> usize {
        let Some(members) = self.rooms.get_mut(room) else {
            return 0;
        };
        members.remove(&conn_id);
        let count = members.len();
        if count == 0 {
            self.rooms.remove(room);
        }
        count
    }

    pub fn count(&self, room: &ActivityId) -> usize {
        self.rooms.get(room).map_or(0, BTreeSet::len)
    }

    /// Members in connection-id order.
    pub fn members(&self, room: &ActivityId) -> Vec<ConnId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
