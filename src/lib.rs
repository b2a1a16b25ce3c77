//! Equity-token ledger for a member-governed organization.
//!
//! Contributors hold tokens that stay locked unless released through the
//! internal offer market; any account may carry a vesting amount that can
//! only shrink; balances and total supply are checkpointed so voting weight
//! can be read at any past snapshot.
//!
//! ```
//! use equity_ledger::access::{Status, StatusRegistry};
//! use equity_ledger::account::Address;
//! use equity_ledger::offers::DAY;
//! use equity_ledger::token::{EquityToken, TokenConfig};
//!
//! let alice = Address::from_label("alice");
//! let bob = Address::from_label("bob");
//! let mut registry = StatusRegistry::new();
//! registry.set_status(alice, Status::Contributor);
//!
//! let mut token = EquityToken::new(TokenConfig::default(), registry);
//! token.mint(&alice, 100).unwrap();
//! token.create_offer(&alice, 40, 0).unwrap();
//!
//! // Nobody bought within the window: the offered tokens are released.
//! assert_eq!(token.unlocked_balance_of(&alice, 8 * DAY), 40);
//! token.transfer(&alice, &bob, 40, 8 * DAY).unwrap();
//! assert_eq!(token.balance_of(&bob), 40);
//! ```

pub mod access;
pub mod account;
pub mod ledger;
pub mod offers;
pub mod storage;
pub mod token;

/// Token quantity
pub type Amount = u128;

/// Seconds since the Unix epoch, supplied by the caller
pub type Timestamp = u64;
