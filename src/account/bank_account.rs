use super::balance::Balance;
use super::AccountType;
use crate::{
    amount::{Amount, InvalidAmountErr},
    errors::AccountErr,
    AccountId,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Account balance, lock state and identity.
///
/// Every mutation checks its guard first and only then touches state, so a method returning an
/// error leaves the account exactly as it was. The account owns no shared state: concurrent
/// access is the job of the [`AccountStore`](crate::store::AccountStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: AccountId,
    balance: Balance,
    #[serde(rename = "type")]
    kind: AccountType,
    locked: bool,
    creation_date: DateTime<Utc>,
}

impl Account {
    /// Create new empty unlocked [`Account`]
    pub fn new(id: AccountId, kind: AccountType) -> Self {
        Self {
            id,
            balance: Balance::default(),
            kind,
            locked: false,
            creation_date: Utc::now(),
        }
    }

    /// Create new unlocked [`Account`] holding `initial` funds. Negative `initial` is rejected.
    pub fn open(
        id: AccountId,
        kind: AccountType,
        initial: Decimal,
    ) -> Result<Self, InvalidAmountErr> {
        let balance = Balance::opening(initial).ok_or(InvalidAmountErr(initial))?;
        Ok(Self {
            balance,
            ..Self::new(id, kind)
        })
    }

    #[cfg(test)]
    /// New regular account with given balance and lock state
    pub fn new_test_account(id: AccountId, balance: i64, locked: bool) -> Self {
        let mut a = Account::open(id, AccountType::Regular, Decimal::new(balance, 0)).unwrap();
        a.locked = locked;
        a
    }

    /// take `amount` out of the account
    pub fn withdraw(&mut self, amount: &Amount) -> Result<(), AccountErr> {
        self.check_locked()?;
        self.balance.try_withdraw(amount)?;
        Ok(())
    }

    /// put `amount` into the account
    pub fn deposit(&mut self, amount: &Amount) -> Result<(), AccountErr> {
        self.check_locked()?;
        self.balance.deposit(amount)?;
        Ok(())
    }

    /// freeze the account, locking an already locked account is an error
    pub fn lock(&mut self) -> Result<(), AccountErr> {
        self.check_locked()?;
        self.locked = true;
        Ok(())
    }

    /// unfreeze the account, unlocking an unlocked account is an error
    pub fn unlock(&mut self) -> Result<(), AccountErr> {
        if !self.locked {
            return Err(AccountErr::NotLocked(self.id));
        }
        self.locked = false;
        Ok(())
    }

    fn check_locked(&self) -> Result<(), AccountErr> {
        if self.locked {
            Err(AccountErr::Locked(self.id))
        } else {
            Ok(())
        }
    }

    // Stores persist one field per access path, see `AccountStore::commit`.
    pub(crate) fn adopt_balance(&mut self, from: &Account) {
        self.balance = from.balance;
    }

    pub(crate) fn adopt_lock_state(&mut self, from: &Account) {
        self.locked = from.locked;
    }
}

impl Account {
    /// account identifier
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// funds on the account
    pub fn balance(&self) -> Decimal {
        self.balance.value()
    }

    /// kind of account
    pub fn kind(&self) -> AccountType {
        self.kind
    }

    /// is account frozen
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// when the account was opened
    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date
    }
}

#[cfg(test)]
mod test {
    use super::Account;
    use crate::account::AccountType;
    use crate::amount::{Amount, InvalidAmountErr};
    use crate::errors::{AccountErr, BalanceErr};
    use rust_decimal::Decimal;

    fn amount(v: u64) -> Amount {
        Amount::new(v, 0).unwrap()
    }

    #[test]
    fn new_account_is_empty_and_unlocked() {
        let a = Account::new(1, AccountType::Savings);
        assert_eq!(a.balance(), Decimal::ZERO);
        assert!(!a.is_locked());
        assert_eq!(a.kind(), AccountType::Savings);
        assert_eq!(a.id(), 1);
    }

    #[test]
    fn cannot_open_with_negative_balance() {
        let e = Account::open(1, AccountType::Regular, Decimal::new(-1, 0)).unwrap_err();
        assert_eq!(e, InvalidAmountErr(Decimal::new(-1, 0)));
    }

    #[test]
    fn withdraw_money() {
        let mut a = Account::new_test_account(100, 2000, false);
        a.withdraw(&amount(1000)).unwrap();
        assert_eq!(a.balance(), Decimal::new(1000, 0));
    }

    #[test]
    fn preventing_debt_withdraw() {
        let mut a = Account::new_test_account(100, 500, false);
        let e = a.withdraw(&amount(1000)).unwrap_err();
        assert_eq!(e, AccountErr::Balance(BalanceErr::InsufficientFunds));
        assert_eq!(a.balance(), Decimal::new(500, 0));
    }

    #[test]
    fn deposit_money() {
        let mut a = Account::new_test_account(100, 1000, false);
        a.deposit(&amount(1000)).unwrap();
        assert_eq!(a.balance(), Decimal::new(2000, 0));
    }

    #[test]
    fn locked_account_rejects_money_changes() {
        let mut a = Account::new_test_account(100, 0, true);
        assert_eq!(a.deposit(&amount(1000)), Err(AccountErr::Locked(100)));
        assert_eq!(a.withdraw(&amount(1)), Err(AccountErr::Locked(100)));
        assert_eq!(a.balance(), Decimal::ZERO);
        assert!(a.is_locked());
    }

    #[test]
    fn lock_and_unlock_reject_same_state() {
        let mut a = Account::new_test_account(7, 10, false);
        a.lock().unwrap();
        assert_eq!(a.lock(), Err(AccountErr::Locked(7)));
        assert!(a.is_locked());

        a.unlock().unwrap();
        assert_eq!(a.unlock(), Err(AccountErr::NotLocked(7)));
        assert!(!a.is_locked());
        assert_eq!(a.balance(), Decimal::new(10, 0));
    }
}
