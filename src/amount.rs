//! Protect against zero and negative amounts reaching deposits and withdraws.

use std::{borrow::Borrow, ops::Deref};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Represent strictly positive financial amount of money
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Amount(Decimal);

impl Amount {
    #[cfg(test)]
    /// Create new amount from mantissa and scale, `Amount::new(15, 1)` is `1.5`
    pub fn new(num: u64, scale: u32) -> Result<Amount, InvalidAmountErr> {
        Decimal::from_i128_with_scale(num.into(), scale).try_into()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("amount {0} is not strictly positive")]
/// represent error when operation want to move zero or negative amount of money
pub struct InvalidAmountErr(pub Decimal);

impl TryFrom<Decimal> for Amount {
    type Error = InvalidAmountErr;
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(InvalidAmountErr(value))
        }
    }
}

impl From<Amount> for Decimal {
    fn from(this: Amount) -> Self {
        this.0
    }
}

impl Borrow<Decimal> for Amount {
    fn borrow(&self) -> &Decimal {
        &self.0
    }
}

impl Deref for Amount {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        self.borrow()
    }
}

#[cfg(test)]
mod test {
    use super::{Amount, InvalidAmountErr};
    use rust_decimal::Decimal;

    #[test]
    fn accepts_positive_values() {
        let a = Amount::try_from(Decimal::new(1, 4)).unwrap();
        assert_eq!(*a, Decimal::new(1, 4));
        assert_eq!(
            Amount::new(15, 1).unwrap(),
            Amount::try_from(Decimal::new(15, 1)).unwrap()
        );
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(
            Amount::try_from(Decimal::ZERO),
            Err(InvalidAmountErr(Decimal::ZERO))
        );
        assert_eq!(
            Amount::try_from(Decimal::new(-5, 0)),
            Err(InvalidAmountErr(Decimal::new(-5, 0)))
        );
        assert!(Amount::new(0, 2).is_err());
    }
}
