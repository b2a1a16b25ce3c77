use crate::account::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// STATUS
// ============================================================================

/// Membership status of an address.
///
/// Statuses are nested: every contributor is also a shareholder, and every
/// shareholder is also an investor. Ordering follows that nesting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Investor,
    Shareholder,
    Contributor,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Investor => write!(f, "investor"),
            Status::Shareholder => write!(f, "shareholder"),
            Status::Contributor => write!(f, "contributor"),
        }
    }
}

// ============================================================================
// ORACLE TRAIT
// ============================================================================

/// Answers "is this address at least status S?"
pub trait AccessOracle {
    fn is_at_least(&self, account: &Address, status: Status) -> bool;
}

impl<T: AccessOracle + ?Sized> AccessOracle for &T {
    fn is_at_least(&self, account: &Address, status: Status) -> bool {
        (**self).is_at_least(account, status)
    }
}

// ============================================================================
// IN-MEMORY REGISTRY
// ============================================================================

/// In-memory status registry, persisted alongside the token state
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatusRegistry {
    statuses: HashMap<Address, Status>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the status of an address
    pub fn set_status(&mut self, account: Address, status: Status) {
        self.statuses.insert(account, status);
    }

    /// Remove an address from the registry. Returns its previous status.
    pub fn clear_status(&mut self, account: &Address) -> Option<Status> {
        self.statuses.remove(account)
    }

    pub fn status_of(&self, account: &Address) -> Option<Status> {
        self.statuses.get(account).copied()
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        postcard::to_allocvec(self).unwrap_or_default()
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

impl AccessOracle for StatusRegistry {
    fn is_at_least(&self, account: &Address, status: Status) -> bool {
        self.statuses
            .get(account)
            .is_some_and(|current| *current >= status)
    }
}
