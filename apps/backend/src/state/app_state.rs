use std::sync::Arc;

use crate::advisor::SettlementAdvisor;
use crate::services::{GameSessionStore, HistoryService, IdentityRegistry, SettlementService};

/// Shared handles to every service. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityRegistry,
    pub sessions: GameSessionStore,
    advisor: Option<Arc<dyn SettlementAdvisor>>,
}

impl AppState {
    pub fn new(
        identity: IdentityRegistry,
        sessions: GameSessionStore,
        advisor: Option<Arc<dyn SettlementAdvisor>>,
    ) -> Self {
        Self {
            identity,
            sessions,
            advisor,
        }
    }

    pub fn has_advisor(&self) -> bool {
        self.advisor.is_some()
    }

    pub fn settlement(&self) -> SettlementService {
        SettlementService::new(self.sessions.clone(), self.advisor.clone())
    }

    pub fn history(&self) -> HistoryService {
        HistoryService::new(self.sessions.clone())
    }
}
