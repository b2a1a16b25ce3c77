// Vesting - per-account amounts that can only ever shrink once granted

use crate::account::Address;
use crate::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VestingError {
    #[error("Vesting can only be decreased: current {current}, requested {requested}")]
    IncreaseRejected { current: Amount, requested: Amount },

    #[error("Vesting amount would overflow")]
    Overflow,
}

/// Vesting amounts per account.
///
/// The vesting amount is independent from the balance: it may exceed it
/// (for instance after a burn) and callers cap it at the balance when they
/// compute what is transferable.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VestingStore {
    vesting: HashMap<Address, Amount>,
}

impl VestingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_vesting(&self, account: &Address) -> Amount {
        self.vesting.get(account).copied().unwrap_or(0)
    }

    /// Lower the vesting amount of `account` to `amount`
    pub fn set_vesting(&mut self, account: &Address, amount: Amount) -> Result<(), VestingError> {
        let current = self.current_vesting(account);
        if amount > current {
            return Err(VestingError::IncreaseRejected {
                current,
                requested: amount,
            });
        }

        self.store(account, amount);
        Ok(())
    }

    /// Grant `delta` more vesting to `account`. Returns the new total.
    pub fn mint_vesting(&mut self, account: &Address, delta: Amount) -> Result<Amount, VestingError> {
        let total = self
            .current_vesting(account)
            .checked_add(delta)
            .ok_or(VestingError::Overflow)?;

        self.store(account, total);
        Ok(total)
    }

    /// Balance left once the vesting amount (capped at the balance) is set aside
    pub fn non_vesting(&self, account: &Address, balance: Amount) -> Amount {
        balance - self.current_vesting(account).min(balance)
    }

    fn store(&mut self, account: &Address, amount: Amount) {
        if amount == 0 {
            self.vesting.remove(account);
        } else {
            self.vesting.insert(*account, amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_vesting_accumulates() {
        let mut store = VestingStore::new();
        let alice = Address::from_label("alice");

        assert_eq!(store.mint_vesting(&alice, 100).unwrap(), 100);
        assert_eq!(store.mint_vesting(&alice, 10).unwrap(), 110);
        assert_eq!(store.current_vesting(&alice), 110);
    }

    #[test]
    fn test_set_vesting_decreases() {
        let mut store = VestingStore::new();
        let alice = Address::from_label("alice");
        store.mint_vesting(&alice, 100).unwrap();

        store.set_vesting(&alice, 90).unwrap();
        assert_eq!(store.current_vesting(&alice), 90);

        store.set_vesting(&alice, 90).unwrap();
        assert_eq!(store.current_vesting(&alice), 90);
    }

    #[test]
    fn test_set_vesting_rejects_increase() {
        let mut store = VestingStore::new();
        let alice = Address::from_label("alice");
        store.mint_vesting(&alice, 100).unwrap();

        let err = store.set_vesting(&alice, 110).unwrap_err();

        assert_eq!(err, VestingError::IncreaseRejected { current: 100, requested: 110 });
        assert_eq!(store.current_vesting(&alice), 100);
    }

    #[test]
    fn test_non_vesting_caps_vesting_at_balance() {
        let mut store = VestingStore::new();
        let alice = Address::from_label("alice");
        store.mint_vesting(&alice, 100).unwrap();

        assert_eq!(store.non_vesting(&alice, 110), 10);
        assert_eq!(store.non_vesting(&alice, 50), 0);
    }
}
