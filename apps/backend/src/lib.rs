#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod advisor;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod infra;
pub mod logging;
pub mod realtime;
pub mod services;
pub mod state;
pub mod telemetry;

// Re-exports for public API
pub use advisor::{AdvisorError, AdvisorRequest, SettlementAdvisor};
pub use config::AdvisorConfig;
pub use error::AppError;
pub use errors::ErrorCode;
pub use infra::state::{build_state, StateBuilder};
pub use realtime::{ClientSession, OptimisticMirror, Subscription};
pub use services::{
    AdvisorVerdict, GameSessionStore, HistoryService, IdentityRegistry, SettleRequest,
    SettlementOutcome, SettlementService,
};
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
