use std::sync::Arc;

use crate::advisor::{self, SettlementAdvisor};
use crate::config::AdvisorConfig;
use crate::error::AppError;
use crate::services::{GameSessionStore, IdentityRegistry};
use crate::state::app_state::AppState;

/// Builder for AppState, used by tests and embedding applications alike.
#[derive(Default)]
pub struct StateBuilder {
    advisor: Option<Arc<dyn SettlementAdvisor>>,
    advisor_config: Option<AdvisorConfig>,
    advisor_from_env: bool,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a ready-made advisor, e.g. a test double.
    pub fn with_advisor(mut self, advisor: Arc<dyn SettlementAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    /// Builds an HTTP advisor from explicit settings.
    pub fn with_advisor_config(mut self, config: AdvisorConfig) -> Self {
        self.advisor_config = Some(config);
        self
    }

    /// Reads advisor settings from the environment at build time.
    pub fn with_advisor_from_env(mut self) -> Self {
        self.advisor_from_env = true;
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let advisor = match (self.advisor, self.advisor_config) {
            (Some(advisor), _) => Some(advisor),
            (None, Some(config)) => advisor::from_config(Some(&config))?,
            (None, None) if self.advisor_from_env => {
                advisor::from_config(AdvisorConfig::from_env()?.as_ref())?
            }
            (None, None) => None,
        };
        Ok(AppState::new(
            IdentityRegistry::new(),
            GameSessionStore::new(),
            advisor,
        ))
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
