// Snapshots - sparse, versioned history of balances and total supply
//
// A series only gains an entry the first time its value changes inside a
// snapshot epoch, so storage grows with the number of (account, epoch) pairs
// that actually moved rather than with the number of snapshots taken.

use crate::account::Address;
use crate::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Snapshot identifier. `0` means no snapshot has been taken yet.
pub type SnapshotId = u64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Nonexistent snapshot: requested {requested}, current {current}")]
    Nonexistent { requested: SnapshotId, current: SnapshotId },
}

/// A recorded value: what the series held when snapshot `version` was taken
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub version: SnapshotId,
    pub value: Amount,
}

/// One checkpoint series, ordered by strictly increasing version
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Checkpoints {
    entries: Vec<Checkpoint>,
}

impl Checkpoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Checkpoint] {
        &self.entries
    }

    /// Record `current_value` for epoch `current` unless that epoch already has an entry.
    /// Must be called before the value changes. Returns true if an entry was appended.
    pub fn record(&mut self, current: SnapshotId, current_value: Amount) -> bool {
        let last = self.entries.last().map(|checkpoint| checkpoint.version);
        if last.is_some_and(|version| version >= current) {
            return false;
        }

        self.entries.push(Checkpoint {
            version: current,
            value: current_value,
        });
        true
    }

    /// Value of the series at snapshot `version`.
    ///
    /// The first checkpoint at or after `version` holds the value that was live
    /// when `version` was taken. With no such checkpoint the series has not
    /// changed since, and `live` is the answer.
    pub fn value_at(&self, version: SnapshotId, live: Amount) -> Amount {
        let index = self.entries.partition_point(|checkpoint| checkpoint.version < version);
        self.entries
            .get(index)
            .map(|checkpoint| checkpoint.value)
            .unwrap_or(live)
    }
}

/// Global snapshot counter plus every checkpoint series
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotStore {
    current_id: SnapshotId,
    accounts: HashMap<Address, Checkpoints>,
    total_supply: Checkpoints,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new epoch. Returns the id of the snapshot just taken.
    pub fn snapshot(&mut self) -> SnapshotId {
        self.current_id += 1;
        self.current_id
    }

    pub fn current_id(&self) -> SnapshotId {
        self.current_id
    }

    /// Checkpoint an account balance before it changes
    pub fn record_balance(&mut self, account: &Address, balance: Amount) {
        let current = self.current_id;
        self.accounts.entry(*account).or_default().record(current, balance);
    }

    /// Checkpoint the total supply before it changes
    pub fn record_total_supply(&mut self, supply: Amount) {
        self.total_supply.record(self.current_id, supply);
    }

    /// Balance of `account` at snapshot `version`, given its live balance
    pub fn balance_at(&self, account: &Address, version: SnapshotId, live: Amount) -> Result<Amount, SnapshotError> {
        self.ensure_exists(version)?;
        Ok(self
            .accounts
            .get(account)
            .map(|series| series.value_at(version, live))
            .unwrap_or(live))
    }

    /// Total supply at snapshot `version`, given the live supply
    pub fn total_supply_at(&self, version: SnapshotId, live: Amount) -> Result<Amount, SnapshotError> {
        self.ensure_exists(version)?;
        Ok(self.total_supply.value_at(version, live))
    }

    pub fn account_checkpoints(&self, account: &Address) -> Option<&Checkpoints> {
        self.accounts.get(account)
    }

    pub fn total_supply_checkpoints(&self) -> &Checkpoints {
        &self.total_supply
    }

    fn ensure_exists(&self, version: SnapshotId) -> Result<(), SnapshotError> {
        if version > self.current_id {
            return Err(SnapshotError::Nonexistent {
                requested: version,
                current: self.current_id,
            });
        }
        Ok(())
    }
}
