//! Domain layer: pure ledger, session and settlement logic.

pub mod account;
pub mod currency;
pub mod field_path;
pub mod ids;
pub mod ledger;
pub mod session;
pub mod settlement;
pub mod stats;
pub mod username;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_props_settlement;

// Re-exports for ergonomics
pub use account::Account;
pub use currency::Currency;
pub use field_path::FieldPath;
pub use ids::{AccountId, SessionId};
pub use ledger::{LedgerField, PlayerLedger};
pub use session::{CreateSession, GameSession, SessionSnapshot, SessionStatus};
pub use settlement::{
    close_with_plan, compute_plan, format_plan, net_positions, verify_plan, NetPosition, Payment, SettlementError,
    SettlementPlan, SETTLEMENT_EPSILON,
};
pub use stats::{GameSummary, PerformanceSummary, PlayerDetail};
pub use username::Username;
