use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{SessionId, SessionSnapshot};

pub type SnapshotSender = mpsc::UnboundedSender<Arc<SessionSnapshot>>;

/// Per-session fan-out of committed snapshots.
///
/// Subscribers are keyed by a random token so they can be removed without
/// holding a reference to their channel. Publishing never blocks: channels
/// are unbounded and closed receivers are pruned on the next broadcast.
#[derive(Default)]
pub struct SessionHub {
    sessions: DashMap<SessionId, DashMap<Uuid, SnapshotSender>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, session_id: &SessionId, sender: SnapshotSender) -> Uuid {
        let token = Uuid::new_v4();
        let entry = self
            .sessions
            .entry(session_id.clone())
            .or_insert_with(DashMap::new);
        entry.insert(token, sender);
        token
    }

    pub fn unregister(&self, session_id: &SessionId, token: Uuid) {
        if let Some(entry) = self.sessions.get(session_id) {
            entry.remove(&token);
        }
        self.sessions
            .remove_if(session_id, |_, subscribers| subscribers.is_empty());
    }

    pub fn broadcast(&self, snapshot: Arc<SessionSnapshot>) {
        let Some(entry) = self.sessions.get(&snapshot.id) else {
            return;
        };
        entry.retain(|token, sender| {
            let delivered = sender.send(Arc::clone(&snapshot)).is_ok();
            if !delivered {
                debug!(session_id = %snapshot.id, %token, "dropping closed subscriber");
            }
            delivered
        });
    }

    pub fn subscriber_count(&self, session_id: &SessionId) -> usize {
        self.sessions
            .get(session_id)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }
}
