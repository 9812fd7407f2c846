//! Account storage with plain and exclusive retrieval
use crate::{account::Account, errors::StoreErr, AccountId};
use async_trait::async_trait;
use std::ops::{Deref, DerefMut};

pub(crate) mod holds;
pub(crate) mod memory;

pub use holds::{Hold, HoldTable};
pub use memory::InMemoryStore;

/// Durable keyed storage of [`Account`]s.
///
/// Two access paths exist. Exclusive retrieval serializes every balance change of one account,
/// plain retrieval never waits and may observe a value an in-flight exclusive operation is about
/// to replace. Each path persists only the field it owns: exclusive commits write the balance,
/// plain saves write the lock flag.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// point in time read, takes no hold
    async fn get(&self, id: AccountId) -> Result<Account, StoreErr>;

    /// read `id` and take its exclusive hold, waiting for the current holder if any
    async fn get_exclusive(&self, id: AccountId) -> Result<Exclusive, StoreErr>;

    /// persist balance of exclusively held account and release the hold
    async fn commit(&self, held: Exclusive) -> Result<(), StoreErr>;

    /// release the hold without persisting anything
    async fn release(&self, held: Exclusive);

    /// persist lock flag of an account read through the plain path
    async fn save_lock_state(&self, account: &Account) -> Result<(), StoreErr>;

    /// add new account, fails when its identifier is taken
    async fn insert(&self, account: Account) -> Result<(), StoreErr>;

    /// snapshot of every account ordered by identifier
    async fn all(&self) -> Vec<Account>;
}

/// Account checked out under an exclusive hold.
///
/// Hand it back with [`AccountStore::commit`] or [`AccountStore::release`]. Dropping it releases
/// the hold as well, without persisting.
#[derive(Debug)]
pub struct Exclusive {
    account: Account,
    hold: Hold,
}

impl Exclusive {
    /// pair account copy with the hold that protects it
    pub fn new(account: Account, hold: Hold) -> Self {
        debug_assert_eq!(account.id(), hold.id());
        Self { account, hold }
    }

    /// hold protecting this account
    pub fn hold(&self) -> &Hold {
        &self.hold
    }
}

impl Deref for Exclusive {
    type Target = Account;
    fn deref(&self) -> &Self::Target {
        &self.account
    }
}

impl DerefMut for Exclusive {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.account
    }
}
