//! Account mutation engine
//!
//! Withdraw and deposit run one critical section per account: take the exclusive hold, validate,
//! mutate, commit, release. Lock, unlock and lookups use the plain path, so the lock flag follows
//! last-writer-wins while the balance never loses an update.

use crate::{
    account::{Account, AccountType},
    amount::Amount,
    config::EngineConfig,
    errors::{AccountErr, EngineErr},
    store::{AccountStore, InMemoryStore},
    AccountId,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Orchestrates account operations on top of an [`AccountStore`]
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
}

impl Engine<InMemoryStore> {
    /// Engine over a fresh in-memory store
    pub fn in_memory(config: &EngineConfig) -> Self {
        Self::new(InMemoryStore::new(config.exclusive_wait))
    }
}

impl<S: AccountStore> Engine<S> {
    /// Create engine on top of `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Open new unlocked account with `initial` funds
    pub async fn open_account(
        &self,
        id: AccountId,
        kind: AccountType,
        initial: Decimal,
    ) -> Result<(), EngineErr> {
        let res = self.insert_new(id, kind, initial).await;
        trace_outcome("open", id, Some(initial), &res);
        res
    }

    /// Take strictly positive `amount` from account `id`
    pub async fn withdraw(&self, id: AccountId, amount: Decimal) -> Result<(), EngineErr> {
        let res = self.mutate_balance(id, amount, Account::withdraw).await;
        trace_outcome("withdraw", id, Some(amount), &res);
        res
    }

    /// Put strictly positive `amount` into account `id`
    pub async fn deposit(&self, id: AccountId, amount: Decimal) -> Result<(), EngineErr> {
        let res = self.mutate_balance(id, amount, Account::deposit).await;
        trace_outcome("deposit", id, Some(amount), &res);
        res
    }

    /// Freeze account `id`
    pub async fn lock(&self, id: AccountId) -> Result<(), EngineErr> {
        let res = self.flip_lock(id, Account::lock).await;
        trace_outcome("lock", id, None, &res);
        res
    }

    /// Unfreeze account `id`
    pub async fn unlock(&self, id: AccountId) -> Result<(), EngineErr> {
        let res = self.flip_lock(id, Account::unlock).await;
        trace_outcome("unlock", id, None, &res);
        res
    }

    /// Snapshot of account `id`, may trail an in-flight deposit or withdraw
    pub async fn get_account(&self, id: AccountId) -> Result<Account, EngineErr> {
        Ok(self.store.get(id).await?)
    }

    /// Snapshot of every account ordered by identifier
    pub async fn accounts(&self) -> Vec<Account> {
        self.store.all().await
    }

    async fn insert_new(
        &self,
        id: AccountId,
        kind: AccountType,
        initial: Decimal,
    ) -> Result<(), EngineErr> {
        let account = Account::open(id, kind, initial)?;
        self.store.insert(account).await?;
        Ok(())
    }

    async fn mutate_balance<F>(
        &self,
        id: AccountId,
        amount: Decimal,
        apply: F,
    ) -> Result<(), EngineErr>
    where
        F: FnOnce(&mut Account, &Amount) -> Result<(), AccountErr>,
    {
        // invalid requests never queue behind a hold
        let amount = Amount::try_from(amount)?;
        let mut held = self.store.get_exclusive(id).await?;

        if let Err(e) = apply(&mut *held, &amount) {
            self.store.release(held).await;
            return Err(e.into());
        }
        self.store.commit(held).await?;
        Ok(())
    }

    async fn flip_lock<F>(&self, id: AccountId, apply: F) -> Result<(), EngineErr>
    where
        F: FnOnce(&mut Account) -> Result<(), AccountErr>,
    {
        let mut account = self.store.get(id).await?;
        apply(&mut account)?;
        self.store.save_lock_state(&account).await?;
        Ok(())
    }
}

fn trace_outcome(
    op: &'static str,
    id: AccountId,
    amount: Option<Decimal>,
    res: &Result<(), EngineErr>,
) {
    match res {
        Ok(()) => debug!(account = id, op, ?amount, "operation committed"),
        Err(e) => warn!(account = id, op, ?amount, kind = ?e.kind(), "operation rejected: {e}"),
    }
}
