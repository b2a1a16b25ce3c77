// Ledger module - THE BOOKS
// Current balances, vesting amounts and the sparse checkpoint history behind them

mod balances;
mod snapshot;
mod vesting;

pub use balances::{Balances, LedgerError};
pub use snapshot::{Checkpoint, Checkpoints, SnapshotError, SnapshotId, SnapshotStore};
pub use vesting::{VestingError, VestingStore};
