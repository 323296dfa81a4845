//! Identity registry: accounts and the one-time username claim.
//!
//! Methods are `async` like every service in this crate, so a persistent
//! store can back the registry without changing callers; the in-memory
//! tables never suspend.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, error, info};

use crate::domain::{Account, AccountId, Username};
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::errors::ErrorCode;
use crate::infra::txn::IdentityDb;
use crate::logging::pii::Redacted;

#[derive(Clone, Default)]
pub struct IdentityRegistry {
    db: Arc<IdentityDb>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the account record for a newly signed-up user. Idempotent:
    /// an existing account is returned unchanged.
    pub async fn create_account(
        &self,
        account_id: AccountId,
        display_name: &str,
        email: &str,
    ) -> Result<Account, AppError> {
        self.db.with_txn(|txn| {
            if let Some(existing) = txn.account(&account_id) {
                debug!(account_id = %account_id, "account already exists");
                return Ok(existing.clone());
            }
            let account = Account::new(
                account_id.clone(),
                display_name,
                email,
                OffsetDateTime::now_utc(),
            );
            info!(
                account_id = %account.account_id,
                email = %Redacted(&account.email),
                "created account"
            );
            txn.put_account(account.clone());
            Ok(account)
        })
    }

    /// Claims `desired` for `account_id`.
    ///
    /// The name is trimmed and lowercased before validation. The claim record
    /// and the account's username are written together or not at all.
    pub async fn reserve(&self, account_id: &AccountId, desired: &str) -> Result<Username, AppError> {
        let username = Username::parse(desired)?;

        self.db.with_txn(|txn| {
            if txn.owner_of(&username).is_some() {
                return Err(AppError::conflict(
                    ErrorCode::UsernameTaken,
                    "Username already taken. Please choose another.",
                ));
            }

            let mut account = txn
                .account(account_id)
                .cloned()
                .ok_or_else(|| account_missing(account_id))?;

            if account.username.is_some() {
                return Err(AppError::conflict(
                    ErrorCode::AlreadyHasUsername,
                    "Account already has a username.",
                ));
            }

            account.username = Some(username.clone());
            txn.put_owner(username.clone(), account_id.clone());
            txn.put_account(account);
            Ok(())
        })?;

        info!(account_id = %account_id, username = %username, "reserved username");
        Ok(username)
    }

    /// Account that owns `username`. Input is normalised the same way as
    /// [`IdentityRegistry::reserve`].
    pub async fn lookup(&self, username: &str) -> Result<AccountId, AppError> {
        let not_found = || {
            AppError::not_found(
                ErrorCode::UsernameNotFound,
                format!("Username '{}' is not registered", username.trim()),
            )
        };
        let username = Username::parse(username).map_err(|_| not_found())?;
        let (owner, owner_claim) = self.db.read(|t| {
            let owner = t.owner_of(&username).cloned();
            let claim = owner
                .as_ref()
                .and_then(|id| t.account(id))
                .and_then(|a| a.username.clone());
            (owner, claim)
        });
        let owner = owner.ok_or_else(not_found)?;

        // The claim row and the account's own username are written together.
        if owner_claim.as_ref() != Some(&username) {
            error!(account_id = %owner, username = %username, "username claim does not match account");
            return Err(DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Claim for '{username}' points at an account that does not hold it"),
            )
            .into());
        }
        Ok(owner)
    }

    pub async fn account(&self, account_id: &AccountId) -> Result<Account, AppError> {
        self.db
            .read(|t| t.account(account_id).cloned())
            .ok_or_else(|| account_missing(account_id))
    }

    /// `None` when the account has not claimed a username or does not exist.
    pub async fn username_for(&self, account_id: &AccountId) -> Option<Username> {
        self.db
            .read(|t| t.account(account_id).and_then(|a| a.username.clone()))
    }

    pub async fn has_username(&self, account_id: &AccountId) -> bool {
        self.username_for(account_id).await.is_some()
    }
}

fn account_missing(account_id: &AccountId) -> AppError {
    AppError::not_found(
        ErrorCode::AccountNotFound,
        format!("Account {account_id} does not exist"),
    )
}
