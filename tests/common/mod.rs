// Shared fixtures for the integration tests

#![allow(dead_code)]

use equity_ledger::access::{Status, StatusRegistry};
use equity_ledger::account::Address;
use equity_ledger::offers::DAY;
use equity_ledger::token::{EquityToken, TokenConfig};

pub const WEEK: u64 = 7 * DAY;

/// Base timestamp for every scenario
pub const T0: u64 = 1_700_000_000;

pub struct Accounts {
    pub account: Address,
    pub contributor: Address,
    pub contributor2: Address,
    pub non_contributor: Address,
}

impl Accounts {
    pub fn new() -> Self {
        Self {
            account: Address::from_label("account"),
            contributor: Address::from_label("contributor"),
            contributor2: Address::from_label("contributor2"),
            non_contributor: Address::from_label("non-contributor"),
        }
    }
}

/// A fresh token with `contributor` and `contributor2` registered as contributors
pub fn setup() -> (EquityToken<StatusRegistry>, Accounts) {
    let accounts = Accounts::new();
    let mut registry = StatusRegistry::new();
    registry.set_status(accounts.contributor, Status::Contributor);
    registry.set_status(accounts.contributor2, Status::Contributor);

    let token = EquityToken::new(TokenConfig::new("Test", "TEST"), registry);
    (token, accounts)
}

/// Contributor with 1000 vesting + 100 free tokens and offers of 11, 25 and 35
/// created at T0, T0 + 2 days and T0 + 4 days
pub fn setup_with_offers() -> (EquityToken<StatusRegistry>, Accounts) {
    let (mut token, accounts) = setup();
    token.mint_vesting(&accounts.contributor, 1000).unwrap();
    token.mint(&accounts.contributor, 100).unwrap();
    token.create_offer(&accounts.contributor, 11, T0).unwrap();
    token.create_offer(&accounts.contributor, 25, T0 + 2 * DAY).unwrap();
    token.create_offer(&accounts.contributor, 35, T0 + 4 * DAY).unwrap();
    (token, accounts)
}
