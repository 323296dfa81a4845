//! Settlement advisor doubles.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ledger_backend::advisor::{AdvisorError, AdvisorRequest, SettlementAdvisor};
use ledger_backend::domain::{FieldPath, SessionId};
use ledger_backend::GameSessionStore;
use parking_lot::Mutex;

/// Returns a fixed reply and records every request it saw.
pub struct ScriptedAdvisor {
    reply: Result<String, fn() -> AdvisorError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<AdvisorRequest>>,
}

impl ScriptedAdvisor {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn failing(err: fn() -> AdvisorError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<AdvisorRequest> {
        self.last_request.lock().clone()
    }
}

#[async_trait]
impl SettlementAdvisor for ScriptedAdvisor {
    async fn suggest(&self, request: &AdvisorRequest) -> Result<String, AdvisorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(make) => Err(make()),
        }
    }
}

/// Writes to the session's ledger while "thinking", then echoes the
/// engine-style text it was given. Stands in for a participant editing the
/// ledger while a settlement is in flight.
pub struct MeddlingAdvisor {
    store: GameSessionStore,
    session_id: SessionId,
    writes: Vec<(FieldPath, f64)>,
    reply: String,
}

impl MeddlingAdvisor {
    pub fn new(
        store: &GameSessionStore,
        session_id: &SessionId,
        writes: Vec<(FieldPath, f64)>,
        reply: &str,
    ) -> Arc<Self> {
        Arc::new(Self {
            store: store.clone(),
            session_id: session_id.clone(),
            writes,
            reply: reply.to_string(),
        })
    }
}

#[async_trait]
impl SettlementAdvisor for MeddlingAdvisor {
    async fn suggest(&self, _request: &AdvisorRequest) -> Result<String, AdvisorError> {
        for (path, value) in &self.writes {
            self.store
                .update_field(&self.session_id, path, *value)
                .await
                .map_err(|e| AdvisorError::Transport(e.to_string()))?;
        }
        Ok(self.reply.clone())
    }
}
