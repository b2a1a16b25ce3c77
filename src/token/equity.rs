// Equity token - every balance-mutating operation goes through here
//
// Each operation validates completely before touching state, so a returned
// error always means nothing changed.

use crate::access::AccessOracle;
use crate::account::Address;
use crate::ledger::{
    Balances, LedgerError, SnapshotError, SnapshotId, SnapshotStore, VestingError, VestingStore,
};
use crate::offers::{Offer, OfferError, OfferOutcome, OfferQueue};
use crate::token::config::TokenConfig;
use crate::token::events::LedgerEvent;
use crate::token::lock::LockView;
use crate::{Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during token operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Not a contributor: {0}")]
    NotAContributor(Address),

    #[error("Offered amount exceeds balance: available {available}, requested {requested}")]
    ExceedsBalance { available: Amount, requested: Amount },

    #[error("Transfer amount exceeds vesting: available {available}, requested {requested}")]
    ExceedsVesting { available: Amount, requested: Amount },

    #[error("Transfer amount exceeds unlocked tokens: unlocked {available}, requested {requested}")]
    ExceedsUnlocked { available: Amount, requested: Amount },

    #[error("Zero address is not a valid account")]
    ZeroAddress,

    #[error("Offer matching failed: {0}")]
    Offer(#[from] OfferError),

    #[error("Vesting update failed: {0}")]
    Vesting(#[from] VestingError),

    #[error("Snapshot query failed: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Ledger operation failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("State export/import error: {0}")]
    StateError(String),
}

/// Everything the token owns, without the status oracle
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenState {
    pub(crate) config: TokenConfig,
    pub(crate) balances: Balances,
    pub(crate) vesting: VestingStore,
    pub(crate) offers: OfferQueue,
    pub(crate) snapshots: SnapshotStore,
    /// Amounts released by expired offers that have since been purged
    pub(crate) settled_unlocked: HashMap<Address, Amount>,
}

impl Default for TokenState {
    fn default() -> Self {
        Self::new(TokenConfig::default())
    }
}

impl TokenState {
    pub fn new(config: TokenConfig) -> Self {
        Self {
            offers: OfferQueue::new(config.offer_expiry_secs),
            config,
            balances: Balances::new(),
            vesting: VestingStore::new(),
            snapshots: SnapshotStore::new(),
            settled_unlocked: HashMap::new(),
        }
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn vesting(&self) -> &VestingStore {
        &self.vesting
    }

    pub fn offers(&self) -> &OfferQueue {
        &self.offers
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    pub fn settled_unlocked(&self, account: &Address) -> Amount {
        self.settled_unlocked.get(account).copied().unwrap_or(0)
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        postcard::to_allocvec(self).unwrap_or_default()
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        postcard::from_bytes(bytes).map_err(|e| TokenError::StateError(e.to_string()))
    }
}

/// The equity token: ledger state plus the oracle deciding who is restricted.
///
/// Privileged operations (`mint`, `mint_vesting`, `burn`, `set_vesting`,
/// `snapshot`, `match_offer`) are not access-checked here; the caller is
/// expected to gate them.
#[derive(Debug)]
pub struct EquityToken<O: AccessOracle> {
    state: TokenState,
    oracle: O,
}

impl<O: AccessOracle> EquityToken<O> {
    pub fn new(config: TokenConfig, oracle: O) -> Self {
        Self::from_state(TokenState::new(config), oracle)
    }

    /// Resume from previously exported state
    pub fn from_state(state: TokenState, oracle: O) -> Self {
        Self { state, oracle }
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn into_parts(self) -> (TokenState, O) {
        (self.state, self.oracle)
    }

    /// Lock accounting as of `now`
    pub fn lock_view(&self, now: Timestamp) -> LockView<'_, O> {
        LockView::new(&self.state, &self.oracle, now)
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.state.config.name
    }

    pub fn symbol(&self) -> &str {
        &self.state.config.symbol
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.state.balances.balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.state.balances.total_supply()
    }

    pub fn vesting_balance_of(&self, account: &Address) -> Amount {
        self.state.vesting.current_vesting(account)
    }

    pub fn offered_balance_of(&self, account: &Address, now: Timestamp) -> Amount {
        self.lock_view(now).offered_balance(account)
    }

    pub fn unlocked_balance_of(&self, account: &Address, now: Timestamp) -> Amount {
        self.lock_view(now).unlocked_balance(account)
    }

    pub fn locked_balance_of(&self, account: &Address, now: Timestamp) -> Amount {
        self.lock_view(now).locked_balance(account)
    }

    /// Stored offers of `account`, oldest first
    pub fn offers_of(&self, account: &Address) -> Vec<&Offer> {
        self.state.offers.offers_of(account)
    }

    pub fn current_snapshot_id(&self) -> SnapshotId {
        self.state.snapshots.current_id()
    }

    pub fn balance_of_at(&self, account: &Address, version: SnapshotId) -> Result<Amount, TokenError> {
        let live = self.balance_of(account);
        Ok(self.state.snapshots.balance_at(account, version, live)?)
    }

    pub fn total_supply_at(&self, version: SnapshotId) -> Result<Amount, TokenError> {
        let live = self.total_supply();
        Ok(self.state.snapshots.total_supply_at(version, live)?)
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    /// Freeze current balances under a new snapshot id
    pub fn snapshot(&mut self) -> SnapshotId {
        let id = self.state.snapshots.snapshot();
        info!(id, "snapshot taken");
        id
    }

    // ========================================================================
    // SUPPLY
    // ========================================================================

    /// Create `amount` tokens for `to`
    pub fn mint(&mut self, to: &Address, amount: Amount) -> Result<Vec<LedgerEvent>, TokenError> {
        ensure_account(to)?;

        let balance = self.balance_of(to);
        let supply = self.total_supply();
        self.state.balances.mint(to, amount)?;
        self.state.snapshots.record_balance(to, balance);
        self.state.snapshots.record_total_supply(supply);

        debug!(%to, %amount, "minted");
        Ok(vec![LedgerEvent::TransferExecuted {
            from: Address::ZERO,
            to: *to,
            amount,
        }])
    }

    /// Mint `amount` tokens to `to` and put the same amount under vesting
    pub fn mint_vesting(&mut self, to: &Address, amount: Amount) -> Result<Vec<LedgerEvent>, TokenError> {
        ensure_account(to)?;
        if self.vesting_balance_of(to).checked_add(amount).is_none() {
            return Err(VestingError::Overflow.into());
        }

        let mut events = self.mint(to, amount)?;
        let total = self.state.vesting.mint_vesting(to, amount)?;

        debug!(account = %to, %total, "vesting granted");
        events.push(LedgerEvent::VestingSet {
            account: *to,
            amount: total,
        });
        Ok(events)
    }

    /// Destroy `amount` tokens of `from`, subject to the same locks as a transfer
    pub fn burn(&mut self, from: &Address, amount: Amount, now: Timestamp) -> Result<Vec<LedgerEvent>, TokenError> {
        ensure_account(from)?;

        let view = self.lock_view(now);
        view.authorize_move(from, amount).map_err(|e| rejected("burn", e))?;
        let restricted = view.is_restricted(from);

        let balance = self.balance_of(from);
        let supply = self.total_supply();
        self.state.balances.burn(from, amount)?;
        self.state.snapshots.record_balance(from, balance);
        self.state.snapshots.record_total_supply(supply);

        let mut events = Vec::new();
        if restricted {
            events.extend(self.release_expired(from, now));
            self.debit_unlocked(from, amount);
        }

        debug!(%from, %amount, "burned");
        events.push(LedgerEvent::TransferExecuted {
            from: *from,
            to: Address::ZERO,
            amount,
        });
        Ok(events)
    }

    // ========================================================================
    // TRANSFERS
    // ========================================================================

    /// Holder-initiated transfer, authorized by the lock rules
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Vec<LedgerEvent>, TokenError> {
        ensure_account(from)?;
        ensure_account(to)?;

        let view = self.lock_view(now);
        view.authorize_move(from, amount).map_err(|e| rejected("transfer", e))?;
        let restricted = view.is_restricted(from);

        self.move_balance(from, to, amount)?;

        let mut events = Vec::new();
        if restricted {
            events.extend(self.release_expired(from, now));
            // A transfer to self moves nothing, so nothing is spent.
            if from != to {
                self.debit_unlocked(from, amount);
            }
        }

        debug!(%from, %to, %amount, "transfer executed");
        events.push(LedgerEvent::TransferExecuted {
            from: *from,
            to: *to,
            amount,
        });
        Ok(events)
    }

    // ========================================================================
    // VESTING
    // ========================================================================

    /// Lower the vesting amount of `account`
    pub fn set_vesting(&mut self, account: &Address, amount: Amount) -> Result<Vec<LedgerEvent>, TokenError> {
        self.state
            .vesting
            .set_vesting(account, amount)
            .map_err(|e| rejected("set_vesting", e.into()))?;

        debug!(%account, %amount, "vesting set");
        Ok(vec![LedgerEvent::VestingSet {
            account: *account,
            amount,
        }])
    }

    // ========================================================================
    // OFFERS
    // ========================================================================

    /// Put `amount` of the contributor's tokens up for internal sale
    pub fn create_offer(&mut self, account: &Address, amount: Amount, now: Timestamp) -> Result<Vec<LedgerEvent>, TokenError> {
        self.lock_view(now)
            .authorize_offer(account, amount)
            .map_err(|e| rejected("create_offer", e))?;

        let offer = self.state.offers.append(account, amount, now);

        debug!(%account, id = %offer.id(), %amount, expires_at = offer.expires_at(), "offer created");
        Ok(vec![LedgerEvent::OfferCreated {
            id: offer.id(),
            account: *account,
            amount,
            expires_at: offer.expires_at(),
        }])
    }

    /// Sell `amount` of `from`'s offered tokens to `to`, oldest offer first
    pub fn match_offer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Vec<LedgerEvent>, TokenError> {
        ensure_account(from)?;
        ensure_account(to)?;
        self.state.balances.check_transfer(from, to, amount)?;

        let outcomes = self
            .state
            .offers
            .consume(from, amount, now)
            .map_err(|e| rejected("match_offer", e.into()))?;
        self.move_balance(from, to, amount)?;

        let mut events = Vec::with_capacity(outcomes.len() + 1);
        for outcome in outcomes {
            match outcome {
                OfferOutcome::Expired(offer) => {
                    self.credit_unlocked(from, offer.amount());
                    events.push(expired_event(&offer));
                }
                OfferOutcome::Matched { id, amount } => {
                    events.push(LedgerEvent::OfferMatched {
                        id,
                        from: *from,
                        to: *to,
                        amount,
                    });
                }
            }
        }

        debug!(%from, %to, %amount, "offer matched");
        events.push(LedgerEvent::TransferExecuted {
            from: *from,
            to: *to,
            amount,
        });
        Ok(events)
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn move_balance(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        let from_balance = self.balance_of(from);
        let to_balance = self.balance_of(to);
        self.state.balances.transfer(from, to, amount)?;
        self.state.snapshots.record_balance(from, from_balance);
        self.state.snapshots.record_balance(to, to_balance);
        Ok(())
    }

    /// Purge expired offers of `account`, settling their amounts as unlocked
    fn release_expired(&mut self, account: &Address, now: Timestamp) -> Vec<LedgerEvent> {
        let expired = self.state.offers.purge_expired(account, now);
        expired
            .iter()
            .map(|offer| {
                self.credit_unlocked(account, offer.amount());
                expired_event(offer)
            })
            .collect()
    }

    fn credit_unlocked(&mut self, account: &Address, amount: Amount) {
        let settled = self.state.settled_unlocked.entry(*account).or_default();
        *settled = settled.saturating_add(amount);
    }

    fn debit_unlocked(&mut self, account: &Address, amount: Amount) {
        let remaining = self.state.settled_unlocked(account).saturating_sub(amount);
        if remaining == 0 {
            self.state.settled_unlocked.remove(account);
        } else {
            self.state.settled_unlocked.insert(*account, remaining);
        }
    }
}

fn ensure_account(account: &Address) -> Result<(), TokenError> {
    if account.is_zero() {
        return Err(TokenError::ZeroAddress);
    }
    Ok(())
}

fn rejected(operation: &'static str, error: TokenError) -> TokenError {
    warn!(operation, %error, "operation rejected");
    error
}

fn expired_event(offer: &Offer) -> LedgerEvent {
    debug!(account = %offer.owner(), id = %offer.id(), amount = %offer.amount(), "offer expired");
    LedgerEvent::OfferExpired {
        id: offer.id(),
        account: *offer.owner(),
        amount: offer.amount(),
    }
}
