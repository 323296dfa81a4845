//! Builders for sessions and accounts used across suites.

use backend_test_support::unique_helpers::{unique_email, unique_str, unique_username};
use ledger_backend::domain::{AccountId, CreateSession, SessionId};
use ledger_backend::{build_state, AppState, GameSessionStore, IdentityRegistry};

pub const HOST: &str = "host_user";

pub fn create_request(players: &[(&str, f64)]) -> CreateSession {
    CreateSession {
        name: "Friday Night".into(),
        currency: "USD".into(),
        host_username: HOST.into(),
        players: players.iter().map(|(u, b)| (u.to_string(), *b)).collect(),
    }
}

pub fn stacks(rows: &[(&str, f64)]) -> Vec<(String, f64)> {
    rows.iter().map(|(u, s)| (u.to_string(), *s)).collect()
}

pub fn fresh_state() -> AppState {
    build_state().build().expect("state builds without advisor")
}

pub async fn open_session(store: &GameSessionStore, players: &[(&str, f64)]) -> SessionId {
    store
        .create(create_request(players))
        .await
        .expect("session should open")
}

/// Opens a session and records `stacks` as final stacks.
pub async fn session_with_stacks(
    store: &GameSessionStore,
    players: &[(&str, f64)],
    final_stacks: &[(&str, f64)],
) -> SessionId {
    let id = open_session(store, players).await;
    store
        .record_final_stacks(&id, &stacks(final_stacks))
        .await
        .expect("final stacks should record");
    id
}

/// A fresh account with a unique id and email but no username yet.
pub async fn new_account(registry: &IdentityRegistry) -> AccountId {
    let id = AccountId::new(unique_str("acct"));
    registry
        .create_account(id.clone(), "Test Player", &unique_email("player"))
        .await
        .expect("account should be created");
    id
}

/// A fresh account that already owns a unique username.
pub async fn account_with_username(registry: &IdentityRegistry, prefix: &str) -> (AccountId, String) {
    let id = new_account(registry).await;
    let name = unique_username(prefix);
    registry
        .reserve(&id, &name)
        .await
        .expect("unique username should reserve");
    (id, name)
}
