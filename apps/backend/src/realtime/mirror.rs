//! Local replica of one session with an overlay of unconfirmed edits.
//!
//! The mirror keeps two tiers: the latest authoritative snapshot, and the
//! caller's pending edits in the order they were made. [`OptimisticMirror::view`]
//! replays pending edits over the snapshot. An edit leaves the overlay when
//! it is rejected, or once it has been acknowledged at version `v` and a
//! snapshot at version `v` or later has arrived. Edits the store has not
//! answered yet survive every incoming snapshot.

use std::sync::Arc;

use tracing::trace;

use crate::domain::{FieldPath, GameSession, SessionId, SessionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Sent, no answer from the store yet.
    Pending,
    /// Committed by the store at this version.
    Acknowledged(u64),
}

#[derive(Debug, Clone)]
struct PendingEdit {
    seq: u64,
    path: FieldPath,
    value: f64,
    state: EditState,
}

#[derive(Debug)]
pub struct OptimisticMirror {
    session_id: SessionId,
    authoritative: Option<Arc<SessionSnapshot>>,
    pending: Vec<PendingEdit>,
    next_seq: u64,
}

impl OptimisticMirror {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            authoritative: None,
            pending: Vec::new(),
            next_seq: 1,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn authoritative(&self) -> Option<&SessionSnapshot> {
        self.authoritative.as_deref()
    }

    /// Version of the latest authoritative snapshot, if any arrived.
    pub fn version(&self) -> Option<u64> {
        self.authoritative.as_ref().map(|s| s.version)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn edit_state(&self, seq: u64) -> Option<EditState> {
        self.pending.iter().find(|e| e.seq == seq).map(|e| e.state)
    }

    /// Records a local edit and returns its sequence number.
    pub fn local_update(&mut self, path: FieldPath, value: f64) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        trace!(session_id = %self.session_id, seq, %path, value, "local edit");
        self.pending.push(PendingEdit {
            seq,
            path,
            value,
            state: EditState::Pending,
        });
        seq
    }

    /// Marks `seq` as committed at `version`. Dropped straight away if the
    /// mirror already holds a snapshot that recent.
    pub fn acknowledge(&mut self, seq: u64, version: u64) {
        if let Some(edit) = self.pending.iter_mut().find(|e| e.seq == seq) {
            edit.state = EditState::Acknowledged(version);
        }
        if let Some(current) = self.version() {
            self.prune_confirmed(current);
        }
    }

    /// Drops `seq`; the view falls back to whatever the store holds.
    pub fn reject(&mut self, seq: u64) {
        self.pending.retain(|e| e.seq != seq);
    }

    /// Installs a snapshot from the authoritative stream. Snapshots for
    /// other sessions or older than the current one are ignored; returns
    /// whether the snapshot was installed.
    pub fn apply_snapshot(&mut self, snapshot: Arc<SessionSnapshot>) -> bool {
        if snapshot.id != self.session_id {
            return false;
        }
        if self.version().is_some_and(|v| snapshot.version < v) {
            trace!(session_id = %self.session_id, version = snapshot.version, "ignoring stale snapshot");
            return false;
        }
        let version = snapshot.version;
        self.authoritative = Some(snapshot);
        self.prune_confirmed(version);
        true
    }

    /// The authoritative session with pending edits replayed on top, oldest
    /// first. `None` until the first snapshot arrives.
    pub fn view(&self) -> Option<GameSession> {
        let base = self.authoritative.as_ref()?;
        let mut session = base.session.clone();
        for edit in &self.pending {
            edit.path.apply(&mut session, edit.value);
        }
        Some(session)
    }

    fn prune_confirmed(&mut self, version: u64) {
        self.pending.retain(|e| match e.state {
            EditState::Acknowledged(acked) => acked > version,
            EditState::Pending => true,
        });
    }
}
