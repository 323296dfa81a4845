pub mod history;
pub mod identity;
pub mod sessions;
pub mod settlement;

pub use history::{ActiveSession, HistoryService};
pub use identity::IdentityRegistry;
pub use sessions::GameSessionStore;
pub use settlement::{AdvisorVerdict, SettleRequest, SettlementOutcome, SettlementService};
