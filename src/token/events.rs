use crate::account::Address;
use crate::offers::OfferId;
use crate::{Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notifications produced by successful token operations.
///
/// Operations return their events in the order they happened; a failed
/// operation produces none.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Tokens moved. Mints come from, and burns go to, [`Address::ZERO`].
    TransferExecuted { from: Address, to: Address, amount: Amount },
    VestingSet { account: Address, amount: Amount },
    OfferCreated { id: OfferId, account: Address, amount: Amount, expires_at: Timestamp },
    OfferMatched { id: OfferId, from: Address, to: Address, amount: Amount },
    OfferExpired { id: OfferId, account: Address, amount: Amount },
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::TransferExecuted { from, to, amount } => {
                write!(f, "transfer {} -> {}: {}", from, to, amount)
            }
            LedgerEvent::VestingSet { account, amount } => {
                write!(f, "vesting {} = {}", account, amount)
            }
            LedgerEvent::OfferCreated { id, account, amount, expires_at } => {
                write!(f, "{} created by {}: {} until {}", id, account, amount, expires_at)
            }
            LedgerEvent::OfferMatched { id, from, to, amount } => {
                write!(f, "{} matched {} -> {}: {}", id, from, to, amount)
            }
            LedgerEvent::OfferExpired { id, account, amount } => {
                write!(f, "{} of {} expired: {}", id, account, amount)
            }
        }
    }
}
