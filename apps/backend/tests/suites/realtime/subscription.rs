use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use ledger_backend::domain::{LedgerField, SessionId};
use ledger_backend::{ErrorCode, GameSessionStore, Subscription};
use tokio::time::timeout;

use crate::support::factory::open_session;

const WAIT: Duration = Duration::from_secs(5);

async fn next_version(sub: &mut Subscription) -> u64 {
    timeout(WAIT, sub.next())
        .await
        .expect("snapshot should arrive")
        .expect("stream should be open")
        .version
}

#[tokio::test]
async fn current_snapshot_arrives_first() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;
    store.add_player(&id, "bob_22", 20.0).await.unwrap();

    let mut sub = store.subscribe(&id).await.unwrap();
    let first = timeout(WAIT, sub.next()).await.unwrap().unwrap();
    assert_eq!(first.version, 2);
    assert_eq!(first.session.player_usernames, vec!["alice_1", "bob_22"]);
}

#[tokio::test]
async fn commits_follow_in_version_order() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;
    let mut sub = store.subscribe(&id).await.unwrap();
    assert_eq!(next_version(&mut sub).await, 1);

    for value in [5.0, 10.0, 15.0] {
        store
            .set_ledger_field(&id, "alice_1", LedgerField::CashOuts, value)
            .await
            .unwrap();
    }
    let last = timeout(WAIT, async {
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(sub.next().await.unwrap());
        }
        seen
    })
    .await
    .unwrap();
    let versions: Vec<u64> = last.iter().map(|s| s.version).collect();
    assert_eq!(versions, vec![2, 3, 4]);
    assert_eq!(last[2].session.players["alice_1"].cash_outs, 15.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_are_seen_in_strictly_increasing_order() {
    let store = Arc::new(GameSessionStore::new());
    let id = open_session(&store, &[("alice_1", 50.0), ("bob_22", 50.0)]).await;
    let mut sub = store.subscribe(&id).await.unwrap();
    assert_eq!(next_version(&mut sub).await, 1);

    let mut tasks = Vec::new();
    for n in 0..20 {
        let store = Arc::clone(&store);
        let id = id.clone();
        tasks.push(tokio::spawn(async move {
            let who = if n % 2 == 0 { "alice_1" } else { "bob_22" };
            store
                .set_ledger_field(&id, who, LedgerField::AddBuyIns, n as f64)
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let mut previous = 1;
    for _ in 0..20 {
        let version = next_version(&mut sub).await;
        assert!(version > previous, "{version} after {previous}");
        previous = version;
    }
    assert_eq!(previous, 21);
}

#[tokio::test]
async fn failed_writes_publish_nothing() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;
    let mut sub = store.subscribe(&id).await.unwrap();
    assert_eq!(next_version(&mut sub).await, 1);

    store
        .set_ledger_field(&id, "alice_1", LedgerField::CashOuts, -1.0)
        .await
        .unwrap_err();
    store
        .set_ledger_field(&id, "alice_1", LedgerField::CashOuts, 1.0)
        .await
        .unwrap();
    assert_eq!(next_version(&mut sub).await, 2);
}

#[tokio::test]
async fn cancel_unregisters_and_ends_the_stream() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;
    let hub = store.hub();

    let mut sub = store.subscribe(&id).await.unwrap();
    assert_eq!(hub.subscriber_count(&id), 1);
    assert_eq!(next_version(&mut sub).await, 1);

    sub.cancel();
    assert_eq!(hub.subscriber_count(&id), 0);
    store.add_player(&id, "bob_22", 5.0).await.unwrap();
    assert!(timeout(WAIT, sub.next()).await.unwrap().is_none());
}

#[tokio::test]
async fn dropping_the_subscription_unregisters() {
    let store = GameSessionStore::new();
    let id = open_session(&store, &[("alice_1", 50.0)]).await;
    let hub = store.hub();

    let a = store.subscribe(&id).await.unwrap();
    let b = store.subscribe(&id).await.unwrap();
    assert_eq!(hub.subscriber_count(&id), 2);
    drop(a);
    assert_eq!(hub.subscriber_count(&id), 1);
    drop(b);
    assert_eq!(hub.subscriber_count(&id), 0);
}

#[tokio::test]
async fn subscribing_to_unknown_session_fails() {
    let store = GameSessionStore::new();
    let err = store
        .subscribe(&SessionId::new("missing"))
        .await
        .err()
        .unwrap();
    assert_eq!(err.code(), ErrorCode::SessionNotFound);
}
