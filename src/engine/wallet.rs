//! Session wallet.
//!
//! Holds the available balance and applies debits and credits. A debit
//! larger than the balance fails atomically and leaves the balance
//! untouched.

use rust_decimal::Decimal;
use std::fmt;
use tracing::debug;

use crate::types::ArenaError;

/// Available funds for one betting session.
#[derive(Debug, Clone)]
pub struct Wallet {
    balance: Decimal,
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "balance=${:.2}", self.balance)
    }
}

impl Wallet {
    pub fn new(starting_balance: Decimal) -> Self {
        Self {
            balance: starting_balance,
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn can_cover(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// Withdraw `amount`. Fails with `InsufficientBalance` when the
    /// balance cannot cover it; nothing changes on failure.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), ArenaError> {
        if !self.can_cover(amount) {
            return Err(ArenaError::InsufficientBalance {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        debug!(debited = %amount, balance = %self.balance, "Wallet debited");
        Ok(())
    }

    /// Add winnings or a deposit.
    pub fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
        debug!(credited = %amount, balance = %self.balance, "Wallet credited");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_debit_success() {
        let mut wallet = Wallet::new(dec!(1000));
        wallet.debit(dec!(30)).unwrap();
        assert_eq!(wallet.balance(), dec!(970));
    }

    #[test]
    fn test_debit_exact_balance() {
        let mut wallet = Wallet::new(dec!(30));
        wallet.debit(dec!(30)).unwrap();
        assert_eq!(wallet.balance(), Decimal::ZERO);
    }

    #[test]
    fn test_debit_insufficient_leaves_balance() {
        let mut wallet = Wallet::new(dec!(12.50));
        let err = wallet.debit(dec!(30)).unwrap_err();
        assert!(matches!(
            err,
            ArenaError::InsufficientBalance { needed, available }
                if needed == dec!(30) && available == dec!(12.50)
        ));
        assert_eq!(wallet.balance(), dec!(12.50));
    }

    #[test]
    fn test_credit() {
        let mut wallet = Wallet::new(dec!(100));
        wallet.credit(dec!(45.50));
        assert_eq!(wallet.balance(), dec!(145.50));
    }

    #[test]
    fn test_can_cover() {
        let wallet = Wallet::new(dec!(50));
        assert!(wallet.can_cover(dec!(50)));
        assert!(wallet.can_cover(Decimal::ZERO));
        assert!(!wallet.can_cover(dec!(50.01)));
    }

    #[test]
    fn test_display() {
        let wallet = Wallet::new(dec!(1000));
        assert_eq!(format!("{wallet}"), "balance=$1000.00");
    }
}
