//! Keyed table of exclusive holds

use crate::{errors::StoreErr, AccountId};
use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

/// Per-account exclusive holds, scoped to the owning store.
///
/// Each account gets a slot while anybody holds or waits for it. Slots nobody references are
/// dropped again, so the table only tracks accounts in flight.
#[derive(Debug)]
pub struct HoldTable {
    slots: Mutex<HashMap<AccountId, Slot>>,
    wait: Duration,
}

impl HoldTable {
    /// Create empty table, acquisitions give up after `wait`
    pub fn new(wait: Duration) -> Arc<Self> {
        Arc::new(Self {
            slots: Mutex::new(HashMap::new()),
            wait,
        })
    }

    /// Wait for exclusive hold of `id`. Fails with [`StoreErr::Busy`] when the current holder
    /// does not let go within the configured wait.
    pub async fn acquire(self: &Arc<Self>, id: AccountId) -> Result<Hold, StoreErr> {
        let slot = Arc::clone(self.slots.lock().entry(id).or_default());
        // declared before the wait so it drops after it, also when this future is cancelled
        let _waiting = Waiting { table: self, id };

        let acquired = tokio::time::timeout(self.wait, slot.lock_owned()).await;
        match acquired {
            Ok(guard) => Ok(Hold {
                id,
                guard: Some(guard),
                table: Arc::clone(self),
            }),
            Err(_elapsed) => Err(StoreErr::Busy(id)),
        }
    }

    /// is somebody holding `id` right now
    pub fn is_held(&self, id: AccountId) -> bool {
        self.slots
            .lock()
            .get(&id)
            .map_or(false, |slot| slot.try_lock().is_err())
    }

    /// number of accounts currently held or waited for
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// `true` when no account is held or waited for
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Only the table references the slot once holder and waiters are gone.
    fn prune(&self, id: AccountId) {
        let mut slots = self.slots.lock();
        if slots.get(&id).map_or(false, |slot| Arc::strong_count(slot) == 1) {
            slots.remove(&id);
        }
    }
}

// Prunes the slot once a wait ends, however it ends.
struct Waiting<'a> {
    table: &'a HoldTable,
    id: AccountId,
}

impl Drop for Waiting<'_> {
    fn drop(&mut self) {
        self.table.prune(self.id);
    }
}

/// Exclusive hold of one account. Released when dropped.
#[derive(Debug)]
pub struct Hold {
    id: AccountId,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<HoldTable>,
}

impl Hold {
    /// held account
    pub fn id(&self) -> AccountId {
        self.id
    }
}

impl Drop for Hold {
    fn drop(&mut self) {
        // the guard keeps a slot reference, let go of it before pruning
        drop(self.guard.take());
        self.table.prune(self.id);
    }
}
