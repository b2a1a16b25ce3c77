// Access module - WHO is restricted
// The shareholder status oracle consulted by the lock engine

mod oracle;

pub use oracle::{AccessOracle, Status, StatusRegistry};
