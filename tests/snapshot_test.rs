// Snapshot tests: balances and total supply at past snapshots

mod common;

use common::{setup, T0};
use equity_ledger::ledger::SnapshotError;
use equity_ledger::token::TokenError;

#[test]
fn test_snapshot_id_increases() {
    let (mut token, _) = setup();

    token.snapshot();
    let before = token.current_snapshot_id();
    token.snapshot();
    let after = token.current_snapshot_id();

    assert!(before < after);
}

#[test]
fn test_balance_at_snapshot_after_mint() {
    let (mut token, a) = setup();
    token.mint(&a.contributor, 10).unwrap();
    let before = token.snapshot();
    token.mint(&a.contributor, 3).unwrap();
    let after = token.snapshot();

    assert_eq!(token.balance_of_at(&a.contributor, before).unwrap(), 10);
    assert_eq!(token.balance_of_at(&a.contributor, after).unwrap(), 13);
}

#[test]
fn test_balance_at_snapshot_after_sending() {
    let (mut token, a) = setup();
    token.mint(&a.non_contributor, 10).unwrap();
    let before = token.snapshot();
    token.transfer(&a.non_contributor, &a.contributor, 3, T0).unwrap();
    let after = token.snapshot();

    assert_eq!(token.balance_of_at(&a.non_contributor, before).unwrap(), 10);
    assert_eq!(token.balance_of_at(&a.non_contributor, after).unwrap(), 7);
}

#[test]
fn test_balance_at_snapshot_after_receiving() {
    let (mut token, a) = setup();
    token.mint(&a.non_contributor, 10).unwrap();
    token.mint(&a.contributor, 3).unwrap();
    let before = token.snapshot();
    token.transfer(&a.non_contributor, &a.contributor, 4, T0).unwrap();
    let after = token.snapshot();

    assert_eq!(token.balance_of_at(&a.contributor, before).unwrap(), 3);
    assert_eq!(token.balance_of_at(&a.contributor, after).unwrap(), 7);
}

#[test]
fn test_balance_at_snapshot_after_burn() {
    let (mut token, a) = setup();
    token.mint(&a.non_contributor, 10).unwrap();
    let before = token.snapshot();
    token.burn(&a.non_contributor, 4, T0).unwrap();
    let after = token.snapshot();

    assert_eq!(token.balance_of_at(&a.non_contributor, before).unwrap(), 10);
    assert_eq!(token.balance_of_at(&a.non_contributor, after).unwrap(), 6);
}

#[test]
fn test_total_supply_at_snapshot() {
    let (mut token, a) = setup();
    token.mint(&a.contributor, 10).unwrap();
    let first = token.snapshot();
    token.mint(&a.non_contributor, 3).unwrap();
    let second = token.snapshot();
    token.transfer(&a.non_contributor, &a.account, 3, T0).unwrap();
    let third = token.snapshot();
    token.burn(&a.account, 2, T0).unwrap();

    assert_eq!(token.total_supply_at(first).unwrap(), 10);
    assert_eq!(token.total_supply_at(second).unwrap(), 13);
    assert_eq!(token.total_supply_at(third).unwrap(), 13);
    assert_eq!(token.total_supply(), 11);

    let series = token.state().snapshots().total_supply_checkpoints();
    let versions: Vec<u64> = series.entries().iter().map(|c| c.version).collect();
    assert_eq!(versions, vec![0, 1, 3]);
}

#[test]
fn test_genesis_snapshot_is_empty() {
    let (mut token, a) = setup();
    token.mint(&a.account, 10).unwrap();

    assert_eq!(token.balance_of_at(&a.account, 0).unwrap(), 0);
    assert_eq!(token.total_supply_at(0).unwrap(), 0);
}

#[test]
fn test_untouched_snapshots_report_latest_value_before_change() {
    let (mut token, a) = setup();
    token.mint(&a.account, 10).unwrap();
    let first = token.snapshot();
    let second = token.snapshot();
    let third = token.snapshot();
    token.mint(&a.account, 5).unwrap();

    assert_eq!(token.balance_of_at(&a.account, first).unwrap(), 10);
    assert_eq!(token.balance_of_at(&a.account, second).unwrap(), 10);
    assert_eq!(token.balance_of_at(&a.account, third).unwrap(), 10);
    assert_eq!(token.balance_of(&a.account), 15);
}

#[test]
fn test_one_checkpoint_per_epoch() {
    let (mut token, a) = setup();
    token.snapshot();
    for _ in 0..5 {
        token.mint(&a.account, 1).unwrap();
    }

    let series = token.state().snapshots().account_checkpoints(&a.account).unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series.entries()[0].value, 0);
}

#[test]
fn test_future_snapshot_is_rejected() {
    let (mut token, a) = setup();
    let current = token.snapshot();

    let err = token.balance_of_at(&a.account, current + 1).unwrap_err();

    assert_eq!(
        err,
        TokenError::Snapshot(SnapshotError::Nonexistent { requested: 2, current: 1 })
    );
    assert!(token.total_supply_at(current + 1).is_err());
}

#[test]
fn test_failed_operation_records_no_checkpoint() {
    let (mut token, a) = setup();
    token.mint(&a.contributor, 10).unwrap();
    token.snapshot();

    assert!(token.transfer(&a.contributor, &a.account, 1, T0).is_err());

    let series = token.state().snapshots().account_checkpoints(&a.contributor).unwrap();
    assert_eq!(series.len(), 1);
    assert!(token.state().snapshots().account_checkpoints(&a.account).is_none());
}
