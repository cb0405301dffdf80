use chrono::{DateTime, Utc};
use moka::sync::Cache;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{info, warn};

use crate::models::{ActivityId, ConnId, Session, SessionStatus};
use crate::ws::error::HubError;

/// How `start` treats an activity that already has a live session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartPolicy {
    /// Resume a paused session, replace an active one.
    Compatible,
    /// Refuse to start while any live session exists.
    Strict,
}

/// Outcome of a `start` command.
#[derive(Clone, Debug, PartialEq)]
pub enum Started {
    Created(Session),
    Replaced(Session),
    Resumed(Session),
}

impl Started {
    pub fn session(&self) -> &Session {
        match self {
            Started::Created(session) | Started::Replaced(session) | Started::Resumed(session) => {
                session
            }
        }
    }
}

/// Retention limits for completed sessions.
#[derive(Clone, Copy, Debug)]
pub struct ArchiveLimits {
    pub ttl: Duration,
    pub capacity: u64,
}

impl Default for ArchiveLimits {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(60 * 60), capacity: 10_000 }
    }
}

/// Owns every session object.
///
/// At most one live (active or paused) session exists per activity. Ending a session moves it
/// into a bounded archive where it stays readable until it expires or the activity ends another
/// session.
pub struct SessionMachine {
    live: HashMap<ActivityId, Session>,
    archive: Cache<ActivityId, Session>,
    policy: StartPolicy,
    next_seq: u64,
}

impl SessionMachine {
    pub fn new(policy: StartPolicy, limits: ArchiveLimits) -> Self {
        Self {
            live: HashMap::new(),
            archive: Cache::builder()
                .max_capacity(limits.capacity)
                .time_to_live(limits.ttl)
                .build(),
            policy,
            next_seq: 0,
        }
    }

    pub fn start(
        &mut self,
        activity: &ActivityId,
        participants: Vec<ConnId>,
        now: DateTime<Utc>,
    ) -> Result<Started, HubError> {
        if let Some(existing) = self.live.get_mut(activity) {
            match (self.policy, existing.status) {
                (StartPolicy::Strict, _) => return Err(HubError::AlreadyLive(activity.clone())),
                (StartPolicy::Compatible, SessionStatus::Paused) => {
                    existing.status = SessionStatus::Active;
                    info!("Session {} resumed by start for activity {}", existing.id, activity);
                    return Ok(Started::Resumed(existing.clone()));
                }
                (StartPolicy::Compatible, _) => {
                    warn!(
                        "Replacing active session {} for activity {} ({} responses discarded)",
                        existing.id,
                        activity,
                        existing.total_responses()
                    );
                }
            }
        }

        let session = Session {
            id: self.session_id(activity, now),
            activity_id: activity.clone(),
            status: SessionStatus::Active,
            started_at: now,
            ended_at: None,
            participants,
            results: BTreeMap::new(),
        };
        info!("Session {} started for activity {}", session.id, activity);
        let replaced = self.live.insert(activity.clone(), session.clone()).is_some();
        if replaced {
            Ok(Started::Replaced(session))
        } else {
            Ok(Started::Created(session))
        }
    }

    pub fn pause(&mut self, activity: &ActivityId) -> Result<Session, HubError> {
        let session = self.live_mut(activity)?;
        session.status = SessionStatus::Paused;
        Ok(session.clone())
    }

    pub fn resume(&mut self, activity: &ActivityId) -> Result<Session, HubError> {
        let session = self.live_mut(activity)?;
        if session.status != SessionStatus::Paused {
            return Err(HubError::InvalidTransition {
                activity: activity.clone(),
                action: "resume",
                status: session.status,
            });
        }
        session.status = SessionStatus::Active;
        Ok(session.clone())
    }

    /// Complete the live session and archive it. The end timestamp never precedes the start.
    pub fn end(&mut self, activity: &ActivityId, now: DateTime<Utc>) -> Result<Session, HubError> {
        let mut session = self
            .live
            .remove(activity)
            .ok_or_else(|| HubError::NoSession(activity.clone()))?;
        session.status = SessionStatus::Completed;
        session.ended_at = Some(now.max(session.started_at));
        self.archive.insert(activity.clone(), session.clone());
        Ok(session)
    }

    /// Mutable access to the live session, for the response aggregator.
    pub fn live_mut(&mut self, activity: &ActivityId) -> Result<&mut Session, HubError> {
        self.live
            .get_mut(activity)
            .ok_or_else(|| HubError::NoSession(activity.clone()))
    }

    /// Live session if any, otherwise the most recent completed one still retained.
    pub fn status(&self, activity: &ActivityId) -> Option<Session> {
        self.live
            .get(activity)
            .cloned()
            .or_else(|| self.archive.get(activity))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn archived_count(&self) -> u64 {
        self.archive.run_pending_tasks();
        self.archive.entry_count()
    }

    fn session_id(&mut self, activity: &ActivityId, now: DateTime<Utc>) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("session-{}-{}-{}", activity, now.timestamp_millis(), seq)
    }
}
