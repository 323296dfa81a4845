//! Transactional tables backing the identity registry.
//!
//! A transaction sees committed rows plus its own staged writes. Staged
//! writes reach the tables only when the closure returns `Ok`; on `Err`
//! they are dropped, so a failed transaction never changes either table.
//! The table lock is held for the whole closure, which serialises
//! transactions.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::account::Account;
use crate::domain::ids::AccountId;
use crate::domain::username::Username;

#[derive(Debug, Default)]
pub struct IdentityTables {
    accounts: HashMap<AccountId, Account>,
    owners: HashMap<Username, AccountId>,
}

impl IdentityTables {
    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    pub fn owner_of(&self, username: &Username) -> Option<&AccountId> {
        self.owners.get(username)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn username_count(&self) -> usize {
        self.owners.len()
    }

    fn apply(&mut self, staged: Staged) {
        self.accounts.extend(staged.accounts);
        self.owners.extend(staged.owners);
    }
}

#[derive(Default)]
struct Staged {
    accounts: HashMap<AccountId, Account>,
    owners: HashMap<Username, AccountId>,
}

pub struct Txn<'a> {
    committed: &'a IdentityTables,
    staged: Staged,
}

impl<'a> Txn<'a> {
    fn begin(committed: &'a IdentityTables) -> Self {
        Self {
            committed,
            staged: Staged::default(),
        }
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.staged
            .accounts
            .get(id)
            .or_else(|| self.committed.account(id))
    }

    pub fn owner_of(&self, username: &Username) -> Option<&AccountId> {
        self.staged
            .owners
            .get(username)
            .or_else(|| self.committed.owner_of(username))
    }

    pub fn put_account(&mut self, account: Account) {
        self.staged
            .accounts
            .insert(account.account_id.clone(), account);
    }

    pub fn put_owner(&mut self, username: Username, account_id: AccountId) {
        self.staged.owners.insert(username, account_id);
    }
}

#[derive(Debug, Default)]
pub struct IdentityDb {
    tables: Mutex<IdentityTables>,
}

impl IdentityDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` in a transaction: commit on `Ok`, discard on `Err`.
    pub fn with_txn<R, E>(&self, f: impl FnOnce(&mut Txn<'_>) -> Result<R, E>) -> Result<R, E> {
        let mut tables = self.tables.lock();
        let (out, staged) = {
            let mut txn = Txn::begin(&tables);
            let out = f(&mut txn);
            (out, txn.staged)
        };
        let value = out?;
        tables.apply(staged);
        Ok(value)
    }

    /// Read-only access to committed rows.
    pub fn read<R>(&self, f: impl FnOnce(&IdentityTables) -> R) -> R {
        let tables = self.tables.lock();
        f(&tables)
    }
}
