// Store Tests
// Persisting and reloading the token through sled

mod common;

use common::{setup_with_offers, T0, WEEK};
use equity_ledger::access::Status;
use equity_ledger::offers::DAY;
use equity_ledger::storage::TokenStore;
use tempfile::TempDir;

#[test]
fn test_store_open_existing() {
    let temp_dir = TempDir::new().unwrap();

    {
        let store = TokenStore::open(temp_dir.path()).unwrap();
        store.put_raw(b"test_key", b"test_value").unwrap();
        store.flush().unwrap();
    }

    {
        let store = TokenStore::open(temp_dir.path()).unwrap();
        assert_eq!(store.get_raw(b"test_key").unwrap(), Some(b"test_value".to_vec()));
        store.delete(b"test_key").unwrap();
        assert_eq!(store.get_raw(b"test_key").unwrap(), None);
    }
}

#[test]
fn test_token_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let (mut token, a) = setup_with_offers();
    token.mint(&a.account, 40).unwrap();
    let snapshot = token.snapshot();
    token.transfer(&a.account, &a.non_contributor, 15, T0).unwrap();

    {
        let store = TokenStore::open(temp_dir.path()).unwrap();
        store.save_token(&token).unwrap();
    }

    let store = TokenStore::open(temp_dir.path()).unwrap();
    let loaded = store.load_token().unwrap().unwrap();
    let now = T0 + WEEK + DAY;

    assert_eq!(loaded.name(), "Test");
    assert_eq!(loaded.total_supply(), token.total_supply());
    assert_eq!(loaded.balance_of(&a.account), 25);
    assert_eq!(loaded.vesting_balance_of(&a.contributor), 1000);
    assert_eq!(loaded.offers_of(&a.contributor).len(), 3);
    assert_eq!(loaded.offered_balance_of(&a.contributor, now), 25 + 35);
    assert_eq!(loaded.unlocked_balance_of(&a.contributor, now), 11);
    assert_eq!(loaded.current_snapshot_id(), snapshot);
    assert_eq!(loaded.balance_of_at(&a.account, snapshot).unwrap(), 40);
    assert_eq!(loaded.oracle().status_of(&a.contributor), Some(Status::Contributor));
}

#[test]
fn test_reloaded_token_continues_offer_ids() {
    let temp_dir = TempDir::new().unwrap();
    let (token, a) = setup_with_offers();
    let store = TokenStore::open(temp_dir.path()).unwrap();
    store.save_token(&token).unwrap();

    let mut loaded = store.load_token().unwrap().unwrap();
    let events = loaded.create_offer(&a.contributor, 1, T0 + 5 * DAY).unwrap();

    assert!(matches!(
        events[0],
        equity_ledger::token::LedgerEvent::OfferCreated { id: equity_ledger::offers::OfferId(3), .. }
    ));
}

#[test]
fn test_stats_count_saved_keys() {
    let temp_dir = TempDir::new().unwrap();
    let (token, _) = setup_with_offers();
    let store = TokenStore::open(temp_dir.path()).unwrap();

    store.save_token(&token).unwrap();

    assert_eq!(store.stats().unwrap().key_count, 2);
}
