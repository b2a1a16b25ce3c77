use crate::account::Address;
use crate::{Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One day in seconds
pub const DAY: Timestamp = 60 * 60 * 24;

/// How long an offer stays active after creation
pub const OFFER_EXPIRY_WINDOW: Timestamp = 7 * DAY;

/// Per-account offer sequence number, starting at 0
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OfferId(pub u64);

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offer#{}", self.0)
    }
}

/// A declaration that up to `amount` tokens of `owner` are up for internal sale
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    id: OfferId,
    owner: Address,
    amount: Amount,
    created_at: Timestamp,
    expires_at: Timestamp,
}

impl Offer {
    pub fn new(id: OfferId, owner: Address, amount: Amount, created_at: Timestamp, window: Timestamp) -> Self {
        Self {
            id,
            owner,
            amount,
            created_at,
            expires_at: created_at.saturating_add(window),
        }
    }

    pub fn id(&self) -> OfferId {
        self.id
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Quantity still on offer
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Still matchable at `now` (the expiry instant itself is inclusive)
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.expires_at >= now
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        !self.is_active(now)
    }

    pub(crate) fn reduce(&mut self, amount: Amount) {
        self.amount -= amount;
    }
}
