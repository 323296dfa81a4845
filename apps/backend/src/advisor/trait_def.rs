//! Settlement advisor seam.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::NetPosition;
use crate::error::AppError;

/// Errors an advisor call can produce. None of them fail a settlement.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor did not answer in time")]
    Timeout,
    #[error("advisor request failed: {0}")]
    Transport(String),
    #[error("advisor returned status {0}")]
    Status(u16),
    #[error("advisor returned an empty suggestion")]
    Empty,
    #[error("advisor suggestion could not be read: {0}")]
    Malformed(String),
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        AppError::advisor(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorPlayer {
    pub name: String,
    pub net_position: f64,
}

/// Body sent to the advisor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorRequest {
    pub players: Vec<AdvisorPlayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl AdvisorRequest {
    /// Blank instructions are dropped.
    pub fn new(positions: &[NetPosition], instructions: Option<&str>) -> Self {
        Self {
            players: positions
                .iter()
                .map(|p| AdvisorPlayer {
                    name: p.username.clone(),
                    net_position: p.amount,
                })
                .collect(),
            instructions: instructions
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Produces a free-text settlement suggestion. Suggestions are advisory:
/// callers verify them against the ledger before use.
#[async_trait]
pub trait SettlementAdvisor: Send + Sync {
    async fn suggest(&self, request: &AdvisorRequest) -> Result<String, AdvisorError>;
}
