// Offers module - THE INTERNAL MARKET
// Time-boxed offers that release a contributor's locked balance, consumed FIFO

mod model;
mod queue;

pub use model::{Offer, OfferId, DAY, OFFER_EXPIRY_WINDOW};
pub use queue::{OfferBook, OfferError, OfferOutcome, OfferQueue};
