// Offer queue - per-account FIFO of offers with lazy expiry
//
// Expiry is never stored: every read compares `expires_at` with the caller's
// clock, and expired entries are only dropped by writes that already walk
// the queue.

use crate::account::Address;
use crate::offers::model::{Offer, OfferId, OFFER_EXPIRY_WINDOW};
use crate::{Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OfferError {
    #[error("Amount exceeds offer: requested {requested}, active {available}")]
    AmountExceeded { requested: Amount, available: Amount },
}

/// What a successful consume did to one queue entry, in queue order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OfferOutcome {
    /// The offer had expired and was dropped without transferring anything
    Expired(Offer),
    /// `amount` was taken from the offer
    Matched { id: OfferId, amount: Amount },
}

/// The offers of a single account
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OfferBook {
    next_id: u64,
    entries: VecDeque<Offer>,
}

impl OfferBook {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn next_id(&self) -> OfferId {
        OfferId(self.next_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Offer> {
        self.entries.iter()
    }
}

/// All offer books, keyed by owner
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OfferQueue {
    window: Timestamp,
    books: HashMap<Address, OfferBook>,
}

impl Default for OfferQueue {
    fn default() -> Self {
        Self::new(OFFER_EXPIRY_WINDOW)
    }
}

impl OfferQueue {
    /// Create an empty queue whose offers stay active for `window` seconds
    pub fn new(window: Timestamp) -> Self {
        Self {
            window,
            books: HashMap::new(),
        }
    }

    pub fn expiry_window(&self) -> Timestamp {
        self.window
    }

    pub fn book(&self, account: &Address) -> Option<&OfferBook> {
        self.books.get(account)
    }

    /// Offers of `account` in FIFO order, including expired ones not yet purged
    pub fn offers_of(&self, account: &Address) -> Vec<&Offer> {
        self.books
            .get(account)
            .map(|book| book.iter().collect())
            .unwrap_or_default()
    }

    /// Append a new offer at the tail. No expiry check happens here.
    pub fn append(&mut self, account: &Address, amount: Amount, now: Timestamp) -> Offer {
        let window = self.window;
        let book = self.books.entry(*account).or_default();

        let offer = Offer::new(OfferId(book.next_id), *account, amount, now, window);
        book.next_id += 1;
        book.entries.push_back(offer.clone());
        offer
    }

    /// Sum of offers still active at `now`
    pub fn active_sum(&self, account: &Address, now: Timestamp) -> Amount {
        self.sum_where(account, |offer| offer.is_active(now))
    }

    /// Sum of offers expired at `now` but not purged yet
    pub fn expired_sum(&self, account: &Address, now: Timestamp) -> Amount {
        self.sum_where(account, |offer| offer.is_expired(now))
    }

    /// Take `amount` from the head of the queue of `account`.
    ///
    /// Expired entries met on the way are dropped and do not count toward
    /// `amount`. If the active offers cannot cover `amount` the queue is left
    /// exactly as it was, expired entries included.
    pub fn consume(&mut self, account: &Address, amount: Amount, now: Timestamp) -> Result<Vec<OfferOutcome>, OfferError> {
        let Some(book) = self.books.get_mut(account) else {
            return if amount == 0 {
                Ok(Vec::new())
            } else {
                Err(OfferError::AmountExceeded { requested: amount, available: 0 })
            };
        };

        let mut remaining = amount;
        let mut outcomes = Vec::new();
        let mut scanned = 0;
        let mut partial: Option<Offer> = None;

        for offer in book.entries.iter() {
            if remaining == 0 {
                break;
            }
            scanned += 1;

            if offer.is_expired(now) {
                outcomes.push(OfferOutcome::Expired(offer.clone()));
                continue;
            }

            let taken = offer.amount().min(remaining);
            remaining -= taken;
            outcomes.push(OfferOutcome::Matched { id: offer.id(), amount: taken });

            if taken < offer.amount() {
                let mut rest = offer.clone();
                rest.reduce(taken);
                partial = Some(rest);
            }
        }

        if remaining > 0 {
            return Err(OfferError::AmountExceeded {
                requested: amount,
                available: amount - remaining,
            });
        }

        // Only the last scanned entry can be partially filled.
        book.entries.drain(..scanned);
        if let Some(rest) = partial {
            book.entries.push_front(rest);
        }

        Ok(outcomes)
    }

    /// Drop every offer of `account` expired at `now`. Returns them in queue order.
    pub fn purge_expired(&mut self, account: &Address, now: Timestamp) -> Vec<Offer> {
        let Some(book) = self.books.get_mut(account) else {
            return Vec::new();
        };

        let (expired, active): (VecDeque<Offer>, VecDeque<Offer>) =
            book.entries.drain(..).partition(|offer| offer.is_expired(now));
        book.entries = active;
        expired.into()
    }

    fn sum_where(&self, account: &Address, predicate: impl Fn(&Offer) -> bool) -> Amount {
        self.books
            .get(account)
            .map(|book| {
                book.iter()
                    .filter(|offer| predicate(offer))
                    .fold(0, |sum: Amount, offer| sum.saturating_add(offer.amount()))
            })
            .unwrap_or(0)
    }
}
