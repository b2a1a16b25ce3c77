// Lock accounting - how much of a balance may move right now
//
// Two layers apply to outgoing tokens. Vesting binds every account. The offer
// lock binds contributors only: their tokens stay locked until an offer
// expires unmatched, which releases the offered amount.

use crate::access::{AccessOracle, Status};
use crate::account::Address;
use crate::token::equity::{TokenError, TokenState};
use crate::{Amount, Timestamp};

/// Read-only view over the token state at a fixed instant
pub struct LockView<'a, O: AccessOracle> {
    state: &'a TokenState,
    oracle: &'a O,
    now: Timestamp,
}

impl<'a, O: AccessOracle> LockView<'a, O> {
    pub fn new(state: &'a TokenState, oracle: &'a O, now: Timestamp) -> Self {
        Self { state, oracle, now }
    }

    /// Contributors are subject to the offer lock
    pub fn is_restricted(&self, account: &Address) -> bool {
        self.oracle.is_at_least(account, Status::Contributor)
    }

    /// Tokens currently on offer (0 for unrestricted accounts)
    pub fn offered_balance(&self, account: &Address) -> Amount {
        if !self.is_restricted(account) {
            return 0;
        }
        self.state.offers.active_sum(account, self.now)
    }

    /// Tokens the offer lock lets go of.
    ///
    /// For contributors: amounts already released by purged offers, plus
    /// offers that have expired but are still stored, capped at the balance.
    pub fn unlocked_balance(&self, account: &Address) -> Amount {
        let balance = self.state.balances.balance_of(account);
        if !self.is_restricted(account) {
            return balance;
        }

        self.state
            .settled_unlocked(account)
            .saturating_add(self.state.offers.expired_sum(account, self.now))
            .min(balance)
    }

    pub fn locked_balance(&self, account: &Address) -> Amount {
        self.state.balances.balance_of(account) - self.unlocked_balance(account)
    }

    /// Balance not held back by vesting
    pub fn non_vesting_balance(&self, account: &Address) -> Amount {
        let balance = self.state.balances.balance_of(account);
        self.state.vesting.non_vesting(account, balance)
    }

    /// Largest amount `account` may still put on offer
    pub fn available_to_offer(&self, account: &Address) -> Amount {
        self.non_vesting_balance(account)
            .saturating_sub(self.state.offers.active_sum(account, self.now))
    }

    /// Check that `amount` may leave `account` by transfer or burn
    pub fn authorize_move(&self, account: &Address, amount: Amount) -> Result<(), TokenError> {
        let non_vesting = self.non_vesting_balance(account);
        if amount > non_vesting {
            return Err(TokenError::ExceedsVesting {
                available: non_vesting,
                requested: amount,
            });
        }

        if self.is_restricted(account) {
            let unlocked = self.unlocked_balance(account);
            if amount > unlocked {
                return Err(TokenError::ExceedsUnlocked {
                    available: unlocked,
                    requested: amount,
                });
            }
        }

        Ok(())
    }

    /// Check that `account` may put `amount` on offer
    pub fn authorize_offer(&self, account: &Address, amount: Amount) -> Result<(), TokenError> {
        if !self.is_restricted(account) {
            return Err(TokenError::NotAContributor(*account));
        }

        let available = self.available_to_offer(account);
        if amount > available {
            return Err(TokenError::ExceedsBalance {
                available,
                requested: amount,
            });
        }

        Ok(())
    }
}
