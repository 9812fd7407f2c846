use crate::{amount::Amount, errors::BalanceErr};
use rust_decimal::Decimal;
use serde::Serialize;

/// Represents current account balance, never below zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Balance(Decimal);

impl Balance {
    /// Returns `None` for negative opening balance
    pub fn opening(initial: Decimal) -> Option<Self> {
        (initial >= Decimal::ZERO).then_some(Self(initial))
    }

    pub fn deposit(&mut self, amount: &Amount) -> Result<(), BalanceErr> {
        self.0 = self.0.checked_add(**amount).ok_or(BalanceErr::Overflow)?;
        Ok(())
    }

    pub fn try_withdraw(&mut self, amount: &Amount) -> Result<(), BalanceErr> {
        if self.0 < **amount {
            return Err(BalanceErr::InsufficientFunds);
        }

        self.0 -= **amount;
        debug_assert!(self.0 >= Decimal::ZERO);
        Ok(())
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}
