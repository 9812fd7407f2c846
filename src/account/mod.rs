//! Account entity and its balance
use serde::{Deserialize, Serialize};

pub(crate) mod balance;
pub(crate) mod bank_account;

pub use bank_account::Account;

/// Kind of account, fixed when the account is opened
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// everyday account
    #[default]
    #[serde(alias = "regular")]
    Regular,
    /// savings account
    #[serde(alias = "savings")]
    Savings,
}
