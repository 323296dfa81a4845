//! End-of-game settlement: final stacks, the payment plan, the optional
//! advisor, and completion of the session.

use std::sync::Arc;

use tracing::{info, warn};

use crate::advisor::{parse_suggestion, AdvisorRequest, SettlementAdvisor};
use crate::domain::settlement::{compute_plan, format_plan, net_positions, verify_plan};
use crate::domain::{NetPosition, SessionId, SettlementPlan};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::services::sessions::GameSessionStore;

/// Host input for closing a game.
#[derive(Debug, Clone, Default)]
pub struct SettleRequest {
    /// Stacks to record before settling; players already recorded may be
    /// omitted.
    pub final_stacks: Vec<(String, f64)>,
    pub duration_minutes: u32,
    /// Ask the configured advisor for a suggestion.
    pub use_advisor: bool,
    pub instructions: Option<String>,
}

impl SettleRequest {
    pub fn new(duration_minutes: u32) -> Self {
        Self {
            duration_minutes,
            ..Default::default()
        }
    }

    pub fn with_final_stacks(mut self, stacks: Vec<(String, f64)>) -> Self {
        self.final_stacks = stacks;
        self
    }

    pub fn with_advisor(mut self, instructions: Option<&str>) -> Self {
        self.use_advisor = true;
        self.instructions = instructions.map(str::to_string);
        self
    }
}

/// What happened to the advisor's suggestion, if one was asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvisorVerdict {
    NotRequested,
    /// No advisor is configured.
    Unavailable,
    Accepted,
    /// Call failed or the suggestion did not settle the ledger; the engine's
    /// plan text was stored instead.
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub session_id: SessionId,
    pub positions: Vec<NetPosition>,
    pub plan: SettlementPlan,
    /// Text stored on the session.
    pub settlement_text: String,
    pub advisor: AdvisorVerdict,
    pub version: u64,
}

#[derive(Clone)]
pub struct SettlementService {
    store: GameSessionStore,
    advisor: Option<Arc<dyn SettlementAdvisor>>,
}

impl SettlementService {
    pub fn new(store: GameSessionStore, advisor: Option<Arc<dyn SettlementAdvisor>>) -> Self {
        Self { store, advisor }
    }

    /// Computes the plan for the current ledger without completing the
    /// session.
    pub async fn preview(&self, id: &SessionId) -> Result<SettlementPlan, AppError> {
        let snapshot = self.store.get(id).await?;
        let positions = net_positions(&snapshot.session)?;
        Ok(compute_plan(&positions)?)
    }

    /// Settles and completes the session.
    ///
    /// The engine's zero-sum check always runs first; an imbalance aborts
    /// with the discrepancy and leaves the session active. The advisor can
    /// only replace the stored text, and only with a suggestion that
    /// verifies against the same net positions. The plan is checked again
    /// inside the completing write: a ledger that moved in the meantime fails
    /// with `ZERO_SUM_VIOLATION` or `LEDGER_CHANGED` and the session stays
    /// active.
    pub async fn settle(
        &self,
        id: &SessionId,
        req: SettleRequest,
    ) -> Result<SettlementOutcome, AppError> {
        let mut snapshot = self.store.get(id).await?;
        if !snapshot.session.is_active() {
            return Err(AppError::state(
                ErrorCode::SessionAlreadyComplete,
                format!("Game '{}' has already been settled", snapshot.session.name),
            ));
        }
        if !req.final_stacks.is_empty() {
            self.store.record_final_stacks(id, &req.final_stacks).await?;
            snapshot = self.store.get(id).await?;
        }
        let session = &snapshot.session;

        let positions = net_positions(session)?;
        let plan = compute_plan(&positions).inspect_err(|err| {
            warn!(session_id = %id, error = %err, "settlement rejected");
        })?;
        let engine_text = format_plan(&plan, session.currency);

        let (settlement_text, advisor) = if req.use_advisor {
            self.consult(id, &positions, req.instructions.as_deref(), engine_text)
                .await
        } else {
            (engine_text, AdvisorVerdict::NotRequested)
        };

        // Participants may have written to the ledger while the advisor was
        // out; the completing write re-checks the plan against what it freezes.
        let version = self
            .store
            .complete_settled(id, &plan, req.duration_minutes, settlement_text.clone())
            .await
            .inspect_err(|err| {
                warn!(session_id = %id, error = %err, "settlement aborted at completion");
            })?;
        info!(
            session_id = %id,
            payments = plan.len(),
            advisor = ?advisor,
            "settled game session"
        );

        Ok(SettlementOutcome {
            session_id: id.clone(),
            positions,
            plan,
            settlement_text,
            advisor,
            version,
        })
    }

    async fn consult(
        &self,
        id: &SessionId,
        positions: &[NetPosition],
        instructions: Option<&str>,
        engine_text: String,
    ) -> (String, AdvisorVerdict) {
        let Some(advisor) = &self.advisor else {
            return (engine_text, AdvisorVerdict::Unavailable);
        };

        let request = AdvisorRequest::new(positions, instructions);
        let checked = match advisor.suggest(&request).await {
            Ok(text) => parse_suggestion(&text)
                .map_err(|e| e.to_string())
                .and_then(|plan| verify_plan(positions, &plan).map_err(|e| e.to_string()))
                .map(|()| text),
            Err(e) => Err(e.to_string()),
        };

        match checked {
            Ok(text) => (text, AdvisorVerdict::Accepted),
            Err(reason) => {
                warn!(session_id = %id, %reason, "discarding advisor suggestion");
                (engine_text, AdvisorVerdict::Rejected(reason))
            }
        }
    }
}
