//! Authoritative game session store.
//!
//! Every mutation is a single-document read-modify-write: validation runs
//! against a scratch copy, and only a successful mutation is committed,
//! versioned and fanned out to subscribers. Concurrent writes to the same
//! field resolve last-writer-wins.
//!
//! The API is `async` so a persistent backend can replace the in-memory
//! collection without changing callers; today no method suspends.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::settlement::close_with_plan;
use crate::domain::{
    CreateSession, FieldPath, GameSession, LedgerField, SessionId, SessionSnapshot, SettlementPlan,
};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::infra::docstore::{DocumentCollection, Versioned};
use crate::realtime::hub::SessionHub;
use crate::realtime::subscription::{Subscription, SubscriptionHandle};

#[derive(Clone)]
pub struct GameSessionStore {
    docs: Arc<DocumentCollection<SessionId, GameSession>>,
    hub: Arc<SessionHub>,
}

impl Default for GameSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSessionStore {
    pub fn new() -> Self {
        Self {
            docs: Arc::new(DocumentCollection::new(NotFoundKind::Session)),
            hub: Arc::new(SessionHub::new()),
        }
    }

    pub fn hub(&self) -> Arc<SessionHub> {
        Arc::clone(&self.hub)
    }

    /// Opens a new active session and returns its id.
    pub async fn create(&self, req: CreateSession) -> Result<SessionId, AppError> {
        let session = GameSession::open(req, OffsetDateTime::now_utc())?;
        let id = SessionId::generate();
        info!(
            session_id = %id,
            host = %session.host_username,
            currency = %session.currency,
            players = session.player_usernames.len(),
            "created game session"
        );
        self.docs.insert(id.clone(), session)?;
        Ok(id)
    }

    /// Seats a new player. Returns the committed version.
    pub async fn add_player(
        &self,
        id: &SessionId,
        username: &str,
        buy_in: f64,
    ) -> Result<u64, AppError> {
        let version = self.mutate(id, |s| s.add_player(username, buy_in))?;
        info!(session_id = %id, username, buy_in, version, "added player");
        Ok(version)
    }

    /// Overwrites one ledger field with an absolute value.
    pub async fn set_ledger_field(
        &self,
        id: &SessionId,
        username: &str,
        field: LedgerField,
        value: f64,
    ) -> Result<u64, AppError> {
        let version = self.mutate(id, |s| s.set_ledger_field(username, field, value))?;
        debug!(session_id = %id, username, %field, value, version, "ledger write");
        Ok(version)
    }

    /// Writes the value addressed by a dotted field path.
    pub async fn update_field(
        &self,
        id: &SessionId,
        path: &FieldPath,
        value: f64,
    ) -> Result<u64, AppError> {
        match path {
            FieldPath::Ledger { username, field } => {
                self.set_ledger_field(id, username, *field, value).await
            }
            FieldPath::FinalStack { username } => {
                self.record_final_stacks(id, &[(username.clone(), value)])
                    .await
            }
        }
    }

    /// Records final stacks for some or all players; may be repeated while
    /// the session is active.
    pub async fn record_final_stacks(
        &self,
        id: &SessionId,
        stacks: &[(String, f64)],
    ) -> Result<u64, AppError> {
        let version = self.mutate(id, |s| s.record_final_stacks(stacks))?;
        debug!(session_id = %id, count = stacks.len(), version, "recorded final stacks");
        Ok(version)
    }

    /// Marks the session complete. Unguarded: a second call overwrites the
    /// stored duration and settlement text.
    pub async fn complete(
        &self,
        id: &SessionId,
        duration_minutes: u32,
        settlement: Option<String>,
    ) -> Result<u64, AppError> {
        let has_text = settlement.is_some();
        let version = self.mutate(id, |s| s.complete(duration_minutes, settlement))?;
        info!(
            session_id = %id,
            duration_minutes,
            has_settlement = has_text,
            version,
            "completed game session"
        );
        Ok(version)
    }

    /// Completes an active session only if `plan` still settles its ledger
    /// as committed at the moment of the write. A ledger that moved since the
    /// plan was computed leaves the session active.
    pub async fn complete_settled(
        &self,
        id: &SessionId,
        plan: &SettlementPlan,
        duration_minutes: u32,
        settlement: String,
    ) -> Result<u64, AppError> {
        let version = self.mutate(id, |s| {
            close_with_plan(s, plan, duration_minutes, Some(settlement))
        })?;
        info!(
            session_id = %id,
            duration_minutes,
            payments = plan.len(),
            version,
            "completed settled game session"
        );
        Ok(version)
    }

    pub async fn get(&self, id: &SessionId) -> Result<SessionSnapshot, AppError> {
        let stored = self.docs.get(id)?;
        Ok(snapshot_of(id, &stored))
    }

    /// Committed snapshots matching `pred`, oldest first.
    pub async fn list_where<P>(&self, pred: P) -> Vec<SessionSnapshot>
    where
        P: Fn(&GameSession) -> bool,
    {
        let mut found: Vec<SessionSnapshot> = self
            .docs
            .scan(|_, session| pred(session))
            .into_iter()
            .map(|(id, stored)| snapshot_of(&id, &stored))
            .collect();
        found.sort_by(|a, b| {
            a.session
                .created_at
                .cmp(&b.session.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        found
    }

    /// Subscribes to committed snapshots of one session. The current
    /// snapshot is queued before any later commit can be published.
    pub async fn subscribe(&self, id: &SessionId) -> Result<Subscription, AppError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = self.docs.with_locked(id, |stored| {
            // Receiver is alive in this scope, so the send cannot fail.
            let _ = tx.send(Arc::new(snapshot_of(id, stored)));
            self.hub.register(id, tx)
        })?;
        debug!(session_id = %id, %token, "subscribed");
        let handle = SubscriptionHandle::new(self.hub(), id.clone(), token);
        Ok(Subscription::new(rx, handle))
    }

    fn mutate<F>(&self, id: &SessionId, f: F) -> Result<u64, AppError>
    where
        F: FnOnce(&mut GameSession) -> Result<(), DomainError>,
    {
        let hub = &self.hub;
        let mut committed = 0;
        self.docs.update(
            id,
            |session| f(session).map_err(AppError::from),
            |stored| {
                committed = stored.version;
                if hub.subscriber_count(id) > 0 {
                    hub.broadcast(Arc::new(snapshot_of(id, stored)));
                }
            },
        )?;
        Ok(committed)
    }
}

fn snapshot_of(id: &SessionId, stored: &Versioned<GameSession>) -> SessionSnapshot {
    SessionSnapshot {
        id: id.clone(),
        version: stored.version,
        session: stored.doc.clone(),
    }
}
