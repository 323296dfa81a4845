//! Client-side session handle: live subscription, optimistic mirror and
//! write-through to the store.

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{FieldPath, GameSession, SessionId};
use crate::error::AppError;
use crate::realtime::mirror::OptimisticMirror;
use crate::services::sessions::GameSessionStore;

pub struct ClientSession {
    session_id: SessionId,
    store: GameSessionStore,
    mirror: Arc<Mutex<OptimisticMirror>>,
    versions: watch::Receiver<Option<u64>>,
    cancel: CancellationToken,
    pump: Option<JoinHandle<()>>,
}

impl ClientSession {
    /// Subscribes to `session_id` and starts applying snapshots to a fresh
    /// mirror in the background.
    pub async fn connect(store: GameSessionStore, session_id: SessionId) -> Result<Self, AppError> {
        let subscription = store.subscribe(&session_id).await?;
        let mirror = Arc::new(Mutex::new(OptimisticMirror::new(session_id.clone())));
        let (version_tx, versions) = watch::channel(None);
        let cancel = CancellationToken::new();

        let pump = {
            let mirror = Arc::clone(&mirror);
            let cancel = cancel.clone();
            let session_id = session_id.clone();
            tokio::spawn(async move {
                // The handle lives in the task so the hub entry goes away
                // when the pump stops.
                let (mut stream, _handle) = subscription.into_parts();
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        next = stream.next() => {
                            let Some(snapshot) = next else { break };
                            let version = snapshot.version;
                            if mirror.lock().apply_snapshot(snapshot) {
                                version_tx.send_replace(Some(version));
                            }
                        }
                    }
                }
                debug!(session_id = %session_id, "snapshot pump stopped");
            })
        };

        Ok(Self {
            session_id,
            store,
            mirror,
            versions,
            cancel,
            pump: Some(pump),
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Local view: latest snapshot plus edits not yet confirmed.
    pub fn view(&self) -> Option<GameSession> {
        self.mirror.lock().view()
    }

    pub fn version(&self) -> Option<u64> {
        self.mirror.lock().version()
    }

    pub fn pending_edits(&self) -> usize {
        self.mirror.lock().pending_count()
    }

    /// Applies `value` locally at once, then writes it to the store. The
    /// local edit is acknowledged with the committed version, or dropped if
    /// the store rejects the write.
    pub async fn edit(&self, path: FieldPath, value: f64) -> Result<u64, AppError> {
        let seq = self.mirror.lock().local_update(path.clone(), value);
        match self.store.update_field(&self.session_id, &path, value).await {
            Ok(version) => {
                self.mirror.lock().acknowledge(seq, version);
                Ok(version)
            }
            Err(err) => {
                warn!(session_id = %self.session_id, %path, error = %err, "edit rejected");
                self.mirror.lock().reject(seq);
                Err(err)
            }
        }
    }

    /// Waits until a snapshot at `version` or later has been applied.
    /// Returns `false` if the pump stopped first.
    pub async fn wait_for_version(&self, version: u64) -> bool {
        let mut versions = self.versions.clone();
        let reached = versions
            .wait_for(|seen| seen.is_some_and(|v| v >= version))
            .await
            .is_ok();
        reached
    }

    /// Stops the pump and unsubscribes.
    pub async fn close(mut self) {
        self.cancel.cancel();
        if let Some(pump) = self.pump.take() {
            if let Err(err) = pump.await {
                warn!(session_id = %self.session_id, error = %err, "snapshot pump panicked");
            }
        }
    }
}

impl Drop for ClientSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
