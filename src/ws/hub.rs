use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::models::{ActivityId, ConnId, ConnectedMessage, SendMessage, Session};
use crate::ws::aggregator;
use crate::ws::dispatcher::{publish, unicast};
use crate::ws::error::HubError;
use crate::ws::registry::{ConnectionRegistry, OutboundReceiver};
use crate::ws::rooms::RoomTracker;
use crate::ws::session::{ArchiveLimits, SessionMachine, StartPolicy, Started};

struct HubState {
    registry: ConnectionRegistry,
    rooms: RoomTracker,
    sessions: SessionMachine,
}

/// Snapshot of hub sizes for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HubStats {
    pub connections: usize,
    pub rooms: usize,
    pub live_sessions: usize,
    pub archived_sessions: u64,
}

/// Coordinates connections, rooms and sessions.
///
/// Every operation runs to completion under one lock, including queueing the broadcasts it
/// triggers, so no two operations interleave and each room observes events in trigger order.
/// Nothing awaited under the lock touches the network.
pub struct Hub {
    state: Mutex<HubState>,
}

impl Hub {
    pub fn new(policy: StartPolicy, limits: ArchiveLimits) -> Self {
        Self {
            state: Mutex::new(HubState {
                registry: ConnectionRegistry::default(),
                rooms: RoomTracker::default(),
                sessions: SessionMachine::new(policy, limits),
            }),
        }
    }

    /// Register a new connection. The first queued frame is `connected` with its id.
    pub async fn connect(&self) -> (ConnId, OutboundReceiver) {
        let mut state = self.state.lock().await;
        let (conn_id, receiver) = state.registry.register();
        unicast(
            &state.registry,
            conn_id,
            &SendMessage::Connected(ConnectedMessage { connection_id: conn_id }),
        );
        info!("Connection {} registered", conn_id);
        (conn_id, receiver)
    }

    /// Remove the connection from every room it joined and republish those rooms' counts.
    /// Unknown connections are ignored.
    pub async fn disconnect(&self, conn_id: ConnId) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(rooms) = state.registry.remove(conn_id) else {
            debug!("Disconnect for unknown connection {}", conn_id);
            return;
        };
        for room in &rooms {
            let count = state.rooms.leave(room, conn_id);
            let members = state.rooms.members(room);
            publish(&state.registry, &members, &SendMessage::ParticipantCount(count));
        }
        info!("Connection {} disconnected from {} room(s)", conn_id, rooms.len());
    }

    pub async fn join(&self, conn_id: ConnId, activity: &ActivityId) -> Result<usize, HubError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if !state.registry.attach(conn_id, activity) {
            return Err(HubError::UnknownConnection(conn_id));
        }
        let count = state.rooms.join(activity, conn_id);
        let members = state.rooms.members(activity);
        publish(&state.registry, &members, &SendMessage::ParticipantCount(count));
        info!("Connection {} joined activity {} ({} present)", conn_id, activity, count);
        Ok(count)
    }

    /// Leaving a room the connection is not in only republishes the count.
    pub async fn leave(&self, conn_id: ConnId, activity: &ActivityId) -> usize {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.registry.detach(conn_id, activity);
        let count = state.rooms.leave(activity, conn_id);
        let mut recipients = state.rooms.members(activity);
        recipients.push(conn_id);
        publish(&state.registry, &recipients, &SendMessage::ParticipantCount(count));
        info!("Connection {} left activity {} ({} present)", conn_id, activity, count);
        count
    }

    pub async fn count(&self, activity: &ActivityId) -> usize {
        self.state.lock().await.rooms.count(activity)
    }

    pub async fn start(&self, activity: &ActivityId) -> Result<Session, HubError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let participants = state.rooms.members(activity);
        let started = state.sessions.start(activity, participants, Utc::now())?;
        let members = state.rooms.members(activity);
        let session = match started {
            Started::Created(session) | Started::Replaced(session) => {
                publish(&state.registry, &members, &SendMessage::SessionStarted(session.clone()));
                session
            }
            Started::Resumed(session) => session,
        };
        publish(&state.registry, &members, &SendMessage::SessionUpdated(session.clone()));
        Ok(session)
    }

    pub async fn pause(&self, activity: &ActivityId) -> Result<Session, HubError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let session = state.sessions.pause(activity)?;
        let members = state.rooms.members(activity);
        publish(&state.registry, &members, &SendMessage::SessionUpdated(session.clone()));
        info!("Session {} paused for activity {}", session.id, activity);
        Ok(session)
    }

    pub async fn resume(&self, activity: &ActivityId) -> Result<Session, HubError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let session = state.sessions.resume(activity)?;
        let members = state.rooms.members(activity);
        publish(&state.registry, &members, &SendMessage::SessionUpdated(session.clone()));
        info!("Session {} resumed for activity {}", session.id, activity);
        Ok(session)
    }

    pub async fn end(&self, activity: &ActivityId) -> Result<Session, HubError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let session = state.sessions.end(activity, Utc::now())?;
        let members = state.rooms.members(activity);
        publish(&state.registry, &members, &SendMessage::SessionEnded(session.clone()));
        publish(&state.registry, &members, &SendMessage::SessionUpdated(session.clone()));
        info!(
            "Session {} ended for activity {} with {} response(s)",
            session.id,
            activity,
            session.total_responses()
        );
        Ok(session)
    }

    /// Record a response from `conn_id` and broadcast the new tally. Returns the total.
    pub async fn submit(
        &self,
        conn_id: ConnId,
        activity: &ActivityId,
        response: Value,
    ) -> Result<usize, HubError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let session = state.sessions.live_mut(activity)?;
        let received = aggregator::record(session, conn_id, response, Utc::now())?;
        let total = received.total_responses;
        let members = state.rooms.members(activity);
        publish(&state.registry, &members, &SendMessage::ResponseReceived(received));
        debug!("Response from {} recorded for activity {} (total {})", conn_id, activity, total);
        Ok(total)
    }

    pub async fn status(&self, activity: &ActivityId) -> Option<Session> {
        self.state.lock().await.sessions.status(activity)
    }

    /// Reply to a late joiner with the current session, or `session-status: null` if none.
    pub async fn send_status(&self, conn_id: ConnId, activity: &ActivityId) {
        let state = self.state.lock().await;
        let reply = match state.sessions.status(activity) {
            Some(session) => SendMessage::SessionUpdated(session),
            None => SendMessage::SessionStatus(None),
        };
        unicast(&state.registry, conn_id, &reply);
    }

    pub async fn send_to(&self, conn_id: ConnId, event: &SendMessage) -> bool {
        let state = self.state.lock().await;
        unicast(&state.registry, conn_id, event)
    }

    pub async fn stats(&self) -> HubStats {
        let state = self.state.lock().await;
        HubStats {
            connections: state.registry.len(),
            rooms: state.rooms.room_count(),
            live_sessions: state.sessions.live_count(),
            archived_sessions: state.sessions.archived_count(),
        }
    }
}
