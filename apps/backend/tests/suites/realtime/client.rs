use std::time::Duration;

use ledger_backend::domain::{FieldPath, LedgerField};
use ledger_backend::{ClientSession, ErrorCode, GameSessionStore};
use tokio::time::timeout;

use crate::support::factory::open_session;

const WAIT: Duration = Duration::from_secs(5);

fn cash_outs(client: &ClientSession, username: &str) -> f64 {
    client.view().unwrap().players[username].cash_outs
}

#[tokio::test]
async fn connect_delivers_the_current_snapshot() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;

    let client = ClientSession::connect(store.clone(), id.clone()).await.unwrap();
    assert!(timeout(WAIT, client.wait_for_version(1)).await.unwrap());
    assert_eq!(client.view().unwrap().player_usernames, vec!["alice_1"]);
    client.close().await;
}

#[tokio::test]
async fn local_edit_is_visible_and_confirmed() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;
    let client = ClientSession::connect(store.clone(), id.clone()).await.unwrap();
    assert!(timeout(WAIT, client.wait_for_version(1)).await.unwrap());

    let version = client
        .edit(FieldPath::ledger("alice_1", LedgerField::CashOuts), 25.0)
        .await
        .unwrap();
    assert_eq!(cash_outs(&client, "alice_1"), 25.0);

    assert!(timeout(WAIT, client.wait_for_version(version)).await.unwrap());
    assert_eq!(client.pending_edits(), 0);
    assert_eq!(cash_outs(&client, "alice_1"), 25.0);
    client.close().await;
}

#[tokio::test]
async fn rejected_edit_rolls_back_the_view() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;
    let client = ClientSession::connect(store.clone(), id.clone()).await.unwrap();
    assert!(timeout(WAIT, client.wait_for_version(1)).await.unwrap());

    let err = client
        .edit(FieldPath::ledger("alice_1", LedgerField::CashOuts), -3.0)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidAmount);
    assert_eq!(client.pending_edits(), 0);
    assert_eq!(cash_outs(&client, "alice_1"), 0.0);
    client.close().await;
}

#[tokio::test]
async fn two_clients_converge_on_the_last_write() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0), ("bob_22", 50.0)]).await;
    let a = ClientSession::connect(store.clone(), id.clone()).await.unwrap();
    let b = ClientSession::connect(store.clone(), id.clone()).await.unwrap();

    a.edit(FieldPath::ledger("bob_22", LedgerField::CashOuts), 10.0)
        .await
        .unwrap();
    let last = b
        .edit(FieldPath::ledger("bob_22", LedgerField::CashOuts), 12.0)
        .await
        .unwrap();

    assert!(timeout(WAIT, a.wait_for_version(last)).await.unwrap());
    assert!(timeout(WAIT, b.wait_for_version(last)).await.unwrap());
    assert_eq!(cash_outs(&a, "bob_22"), 12.0);
    assert_eq!(cash_outs(&b, "bob_22"), 12.0);

    a.close().await;
    b.close().await;
}

#[tokio::test]
async fn close_unsubscribes() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;
    let hub = store.hub();
    let client = ClientSession::connect(store.clone(), id.clone()).await.unwrap();
    assert_eq!(hub.subscriber_count(&id), 1);

    client.close().await;
    assert_eq!(hub.subscriber_count(&id), 0);
}
