//! Possible errors

use crate::{amount::InvalidAmountErr, AccountId};
use thiserror::Error;

/// Group errors for account balance
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BalanceErr {
    #[error("not enough funds available for this withdrawal")]
    InsufficientFunds,
    #[error("balance would exceed the largest representable amount")]
    Overflow,
}

/// Group all errors that can occurs within account entity
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountErr {
    #[error("account {0} is locked")]
    Locked(AccountId),
    #[error("account {0} is not locked")]
    NotLocked(AccountId),
    #[error("account money change error")]
    Balance(#[from] BalanceErr),
}

/// Group errors returned by an [`AccountStore`](crate::store::AccountStore)
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreErr {
    #[error("account {0} not found")]
    NotFound(AccountId),
    #[error("account {0} is busy, exclusive hold not acquired in time")]
    Busy(AccountId),
    #[error("account {0} already exists")]
    AlreadyExists(AccountId),
}

/// Every error an engine operation can end with
#[allow(missing_docs)]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineErr {
    #[error(transparent)]
    Account(#[from] AccountErr),
    #[error(transparent)]
    Store(#[from] StoreErr),
    #[error(transparent)]
    Amount(#[from] InvalidAmountErr),
}

/// Flat classification of [`EngineErr`] for callers mapping errors to their own responses
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Locked,
    NotLocked,
    InvalidAmount,
    InsufficientFunds,
    Overflow,
    Busy,
    AlreadyExists,
}

impl EngineErr {
    /// Flatten nested error into its kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineErr::Account(AccountErr::Locked(_)) => ErrorKind::Locked,
            EngineErr::Account(AccountErr::NotLocked(_)) => ErrorKind::NotLocked,
            EngineErr::Account(AccountErr::Balance(BalanceErr::InsufficientFunds)) => {
                ErrorKind::InsufficientFunds
            }
            EngineErr::Account(AccountErr::Balance(BalanceErr::Overflow)) => ErrorKind::Overflow,
            EngineErr::Store(StoreErr::NotFound(_)) => ErrorKind::NotFound,
            EngineErr::Store(StoreErr::Busy(_)) => ErrorKind::Busy,
            EngineErr::Store(StoreErr::AlreadyExists(_)) => ErrorKind::AlreadyExists,
            EngineErr::Amount(_) => ErrorKind::InvalidAmount,
        }
    }

    /// Account the error refers to, when the error carries one
    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            EngineErr::Account(AccountErr::Locked(id) | AccountErr::NotLocked(id))
            | EngineErr::Store(
                StoreErr::NotFound(id) | StoreErr::Busy(id) | StoreErr::AlreadyExists(id),
            ) => Some(*id),
            EngineErr::Account(AccountErr::Balance(_)) | EngineErr::Amount(_) => None,
        }
    }
}
