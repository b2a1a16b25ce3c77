// Balances - the single source of truth for current holdings

use crate::account::Address;
use crate::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from the balance primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Amount, required: Amount },

    #[error("Balance would overflow")]
    BalanceOverflow,
}

/// Per-account balances plus total supply.
///
/// Every primitive either applies both sides of the change or nothing, so
/// `total_supply` always equals the sum of all balances.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Balances {
    balances: HashMap<Address, Amount>,
    total_supply: Amount,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Number of accounts with a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Iterate over all non-zero balances
    pub fn holders(&self) -> impl Iterator<Item = (&Address, Amount)> {
        self.balances.iter().map(|(account, balance)| (account, *balance))
    }

    /// Create `amount` new tokens in `to`
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    /// Destroy `amount` tokens held by `from`
    pub fn burn(&mut self, from: &Address, amount: Amount) -> Result<(), LedgerError> {
        let balance = self.debited(from, amount)?;

        self.total_supply -= amount;
        self.set_balance(from, balance);
        Ok(())
    }

    /// Move `amount` tokens from `from` to `to`
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), LedgerError> {
        let (from_balance, to_balance) = self.check_transfer(from, to, amount)?;

        if from != to {
            self.set_balance(from, from_balance);
            self.set_balance(to, to_balance);
        }
        Ok(())
    }

    /// Validate a transfer without applying it. Returns the resulting balances.
    pub fn check_transfer(&self, from: &Address, to: &Address, amount: Amount) -> Result<(Amount, Amount), LedgerError> {
        let from_balance = self.debited(from, amount)?;

        if from == to {
            return Ok((from_balance + amount, from_balance + amount));
        }

        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;

        Ok((from_balance, to_balance))
    }

    fn debited(&self, account: &Address, amount: Amount) -> Result<Amount, LedgerError> {
        let available = self.balance_of(account);
        available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                available,
                required: amount,
            })
    }

    // Zero balances are dropped to keep the map proportional to live holders.
    fn set_balance(&mut self, account: &Address, balance: Amount) {
        if balance == 0 {
            self.balances.remove(account);
        } else {
            self.balances.insert(*account, balance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_updates_balance_and_supply() {
        let mut balances = Balances::new();
        let alice = Address::from_label("alice");

        balances.mint(&alice, 100).unwrap();

        assert_eq!(balances.balance_of(&alice), 100);
        assert_eq!(balances.total_supply(), 100);
    }

    #[test]
    fn test_burn_more_than_balance_fails_without_effect() {
        let mut balances = Balances::new();
        let alice = Address::from_label("alice");
        balances.mint(&alice, 10).unwrap();

        let err = balances.burn(&alice, 11).unwrap_err();

        assert_eq!(err, LedgerError::InsufficientBalance { available: 10, required: 11 });
        assert_eq!(balances.balance_of(&alice), 10);
        assert_eq!(balances.total_supply(), 10);
    }

    #[test]
    fn test_transfer_preserves_supply() {
        let mut balances = Balances::new();
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");
        balances.mint(&alice, 10).unwrap();

        balances.transfer(&alice, &bob, 4).unwrap();

        assert_eq!(balances.balance_of(&alice), 6);
        assert_eq!(balances.balance_of(&bob), 4);
        assert_eq!(balances.total_supply(), 10);
    }

    #[test]
    fn test_self_transfer_is_a_no_op() {
        let mut balances = Balances::new();
        let alice = Address::from_label("alice");
        balances.mint(&alice, 10).unwrap();

        balances.transfer(&alice, &alice, 10).unwrap();
        assert_eq!(balances.balance_of(&alice), 10);

        assert!(balances.transfer(&alice, &alice, 11).is_err());
    }

    #[test]
    fn test_mint_overflow_is_rejected() {
        let mut balances = Balances::new();
        let alice = Address::from_label("alice");
        balances.mint(&alice, Amount::MAX).unwrap();

        assert_eq!(balances.mint(&alice, 1), Err(LedgerError::BalanceOverflow));
        assert_eq!(balances.total_supply(), Amount::MAX);
    }

    #[test]
    fn test_emptied_accounts_are_dropped() {
        let mut balances = Balances::new();
        let alice = Address::from_label("alice");
        balances.mint(&alice, 5).unwrap();
        balances.burn(&alice, 5).unwrap();

        assert_eq!(balances.holder_count(), 0);
    }
}
