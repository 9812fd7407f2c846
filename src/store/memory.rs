use super::{AccountStore, Exclusive, HoldTable};
use crate::{account::Account, errors::StoreErr, AccountId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::{collections::BTreeMap, sync::Arc, time::Duration};

/// [`AccountStore`] keeping records in memory
#[derive(Debug)]
pub struct InMemoryStore {
    records: RwLock<BTreeMap<AccountId, Account>>,
    holds: Arc<HoldTable>,
}

impl InMemoryStore {
    /// Create empty store, exclusive retrieval waits at most `exclusive_wait`
    pub fn new(exclusive_wait: Duration) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            holds: HoldTable::new(exclusive_wait),
        }
    }

    /// holds of this store
    pub fn holds(&self) -> &Arc<HoldTable> {
        &self.holds
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn get(&self, id: AccountId) -> Result<Account, StoreErr> {
        self.records
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreErr::NotFound(id))
    }

    async fn get_exclusive(&self, id: AccountId) -> Result<Exclusive, StoreErr> {
        let hold = self.holds.acquire(id).await?;
        // read only after the hold is ours, so the copy reflects the last commit
        let account = self.get(id).await?;
        Ok(Exclusive::new(account, hold))
    }

    async fn commit(&self, held: Exclusive) -> Result<(), StoreErr> {
        {
            let mut records = self.records.write();
            let record = records
                .get_mut(&held.id())
                .ok_or(StoreErr::NotFound(held.id()))?;
            record.adopt_balance(&held);
        }
        drop(held);
        Ok(())
    }

    async fn release(&self, held: Exclusive) {
        drop(held);
    }

    async fn save_lock_state(&self, account: &Account) -> Result<(), StoreErr> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&account.id())
            .ok_or(StoreErr::NotFound(account.id()))?;
        record.adopt_lock_state(account);
        Ok(())
    }

    async fn insert(&self, account: Account) -> Result<(), StoreErr> {
        let mut records = self.records.write();
        if records.contains_key(&account.id()) {
            return Err(StoreErr::AlreadyExists(account.id()));
        }
        records.insert(account.id(), account);
        Ok(())
    }

    async fn all(&self) -> Vec<Account> {
        self.records.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod test {
    use super::InMemoryStore;
    use crate::{
        account::Account,
        amount::Amount,
        config::EngineConfig,
        errors::StoreErr,
        store::AccountStore,
    };
    use rust_decimal::Decimal;

    async fn store_with(accounts: impl IntoIterator<Item = Account>) -> InMemoryStore {
        let store = InMemoryStore::new(EngineConfig::for_testing().exclusive_wait);
        for a in accounts {
            store.insert(a).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn missing_account() {
        let store = InMemoryStore::new(EngineConfig::for_testing().exclusive_wait);
        assert_eq!(store.get(1).await.unwrap_err(), StoreErr::NotFound(1));
        assert_eq!(store.get_exclusive(1).await.unwrap_err(), StoreErr::NotFound(1));
        assert!(store.holds().is_empty());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id() {
        let store = store_with([Account::new_test_account(1, 10, false)]).await;
        let e = store
            .insert(Account::new_test_account(1, 0, false))
            .await
            .unwrap_err();
        assert_eq!(e, StoreErr::AlreadyExists(1));
        assert_eq!(store.get(1).await.unwrap().balance(), Decimal::new(10, 0));
    }

    #[tokio::test]
    async fn commit_persists_and_releases() {
        let store = store_with([Account::new_test_account(1, 10, false)]).await;

        let mut held = store.get_exclusive(1).await.unwrap();
        held.deposit(&Amount::new(5, 0).unwrap()).unwrap();
        assert_eq!(held.hold().id(), 1);
        assert!(store.holds().is_held(1));
        store.commit(held).await.unwrap();

        assert!(!store.holds().is_held(1));
        assert_eq!(store.get(1).await.unwrap().balance(), Decimal::new(15, 0));
    }

    #[tokio::test]
    async fn release_discards_changes() {
        let store = store_with([Account::new_test_account(1, 10, false)]).await;

        let mut held = store.get_exclusive(1).await.unwrap();
        held.withdraw(&Amount::new(10, 0).unwrap()).unwrap();
        store.release(held).await;

        assert!(store.holds().is_empty());
        assert_eq!(store.get(1).await.unwrap().balance(), Decimal::new(10, 0));
    }

    #[tokio::test]
    async fn plain_read_is_not_blocked_by_hold() {
        let store = store_with([Account::new_test_account(1, 10, false)]).await;

        let mut held = store.get_exclusive(1).await.unwrap();
        held.deposit(&Amount::new(5, 0).unwrap()).unwrap();

        // stale but available
        assert_eq!(store.get(1).await.unwrap().balance(), Decimal::new(10, 0));
        assert_eq!(store.get_exclusive(1).await.unwrap_err(), StoreErr::Busy(1));

        store.commit(held).await.unwrap();
        assert_eq!(store.get(1).await.unwrap().balance(), Decimal::new(15, 0));
    }

    #[tokio::test]
    async fn paths_do_not_overwrite_each_other() {
        let store = store_with([Account::new_test_account(1, 10, false)]).await;

        let mut held = store.get_exclusive(1).await.unwrap();
        held.deposit(&Amount::new(5, 0).unwrap()).unwrap();

        let mut plain = store.get(1).await.unwrap();
        plain.lock().unwrap();
        store.save_lock_state(&plain).await.unwrap();

        store.commit(held).await.unwrap();

        let a = store.get(1).await.unwrap();
        assert!(a.is_locked());
        assert_eq!(a.balance(), Decimal::new(15, 0));
    }

    #[tokio::test]
    async fn all_is_ordered_by_id() {
        let store = store_with([
            Account::new_test_account(3, 0, false),
            Account::new_test_account(1, 0, false),
            Account::new_test_account(2, 0, true),
        ])
        .await;
        let ids: Vec<_> = store.all().await.iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
