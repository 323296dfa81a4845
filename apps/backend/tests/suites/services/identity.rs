use std::sync::Arc;

use backend_test_support::unique_helpers::unique_username;
use ledger_backend::domain::AccountId;
use ledger_backend::{AppError, ErrorCode, IdentityRegistry};

use crate::support::factory::{account_with_username, new_account};

#[tokio::test]
async fn create_account_is_idempotent() {
    let registry = IdentityRegistry::new();
    let id = AccountId::new("uid-idempotent");
    let first = registry
        .create_account(id.clone(), "Alice", " Alice@Example.COM ")
        .await
        .unwrap();
    assert_eq!(first.email, "alice@example.com");
    assert!(first.username.is_none());

    let second = registry
        .create_account(id.clone(), "Someone Else", "other@example.com")
        .await
        .unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn reserve_normalizes_and_links_both_records() {
    let registry = IdentityRegistry::new();
    let id = new_account(&registry).await;

    let name = registry.reserve(&id, "  Poker_Pal ").await.unwrap();
    assert_eq!(name.as_str(), "poker_pal");

    assert_eq!(registry.lookup("poker_pal").await.unwrap(), id);
    assert_eq!(registry.lookup("POKER_PAL").await.unwrap(), id);
    assert_eq!(
        registry.username_for(&id).await.map(|u| u.to_string()),
        Some("poker_pal".to_string())
    );
    assert!(registry.has_username(&id).await);
    assert_eq!(
        registry.account(&id).await.unwrap().username,
        Some(name)
    );
}

#[tokio::test]
async fn reserve_rejects_bad_format_without_writing() {
    let registry = IdentityRegistry::new();
    let id = new_account(&registry).await;

    for bad in ["abc", "has space", "way_too_long_for_a_username", "dash-name"] {
        let err = registry.reserve(&id, bad).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }), "{bad}: {err:?}");
        assert_eq!(err.code(), ErrorCode::InvalidUsername);
    }
    assert!(!registry.has_username(&id).await);
}

#[tokio::test]
async fn taken_username_is_a_conflict_and_leaves_claimant_untouched() {
    let registry = IdentityRegistry::new();
    let (owner, name) = account_with_username(&registry, "taken").await;
    let other = new_account(&registry).await;

    let err = registry.reserve(&other, &name).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::UsernameTaken);
    assert!(!registry.has_username(&other).await);
    assert_eq!(registry.lookup(&name).await.unwrap(), owner);
}

#[tokio::test]
async fn second_username_for_same_account_is_rejected() {
    let registry = IdentityRegistry::new();
    let (id, first) = account_with_username(&registry, "first").await;
    let second = unique_username("second");

    let err = registry.reserve(&id, &second).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyHasUsername);
    assert!(matches!(err, AppError::Conflict { .. }));

    // The failed claim wrote neither record.
    assert_eq!(registry.lookup(&second).await.unwrap_err().code(), ErrorCode::UsernameNotFound);
    assert_eq!(
        registry.username_for(&id).await.map(|u| u.to_string()),
        Some(first)
    );
}

#[tokio::test]
async fn reserve_for_unknown_account_is_not_found() {
    let registry = IdentityRegistry::new();
    let name = unique_username("ghost");
    let err = registry
        .reserve(&AccountId::new("missing"), &name)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AccountNotFound);
    assert!(registry.lookup(&name).await.is_err());
}

#[tokio::test]
async fn lookups_for_missing_records() {
    let registry = IdentityRegistry::new();
    let missing = AccountId::new("nobody");
    assert_eq!(
        registry.lookup("nobody_here").await.unwrap_err().code(),
        ErrorCode::UsernameNotFound
    );
    assert_eq!(
        registry.account(&missing).await.unwrap_err().code(),
        ErrorCode::AccountNotFound
    );
    assert!(registry.username_for(&missing).await.is_none());
    assert!(!registry.has_username(&missing).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_claims_of_one_username_have_a_single_winner() {
    let registry = Arc::new(IdentityRegistry::new());
    let name = unique_username("race");

    let mut accounts = Vec::new();
    for _ in 0..8 {
        accounts.push(new_account(&registry).await);
    }

    let mut tasks = Vec::new();
    for id in accounts.clone() {
        let registry = Arc::clone(&registry);
        let name = name.clone();
        tasks.push(tokio::spawn(async move {
            registry.reserve(&id, &name).await.map(|_| id)
        }));
    }

    let mut winners = Vec::new();
    for task in tasks {
        match task.await.unwrap() {
            Ok(id) => winners.push(id),
            Err(err) => assert_eq!(err.code(), ErrorCode::UsernameTaken),
        }
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(registry.lookup(&name).await.unwrap(), winners[0]);
    let mut with_name = 0;
    for id in &accounts {
        if registry.has_username(id).await {
            with_name += 1;
        }
    }
    assert_eq!(with_name, 1);
}
