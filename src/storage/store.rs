// TokenStore - Persistent key-value storage using sled
//
// Provides typed access for storing:
// - The token state (balances, vesting, offers, checkpoints)
// - The status registry used as access oracle

use crate::access::StatusRegistry;
use crate::token::{EquityToken, TokenError, TokenState};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Key prefixes for organizing data
mod keys {
    pub const TOKEN_STATE: &[u8] = b"token:state";
    pub const STATUS_REGISTRY: &[u8] = b"access:registry";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent store for the token ledger
///
/// Uses sled for crash-safe, embedded storage.
/// All writes are atomic and durable after flush.
pub struct TokenStore {
    db: sled::Db,
}

impl TokenStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.db.is_empty())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StoreError> {
        Ok(StorageStats {
            key_count: self.db.len(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        })
    }

    // ========================================================================
    // RAW KEY-VALUE OPERATIONS
    // ========================================================================

    /// Put raw bytes
    pub fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    /// Get raw bytes
    pub fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    /// Delete a key
    pub fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.db.remove(key)?;
        Ok(())
    }

    // ========================================================================
    // TOKEN STATE PERSISTENCE
    // ========================================================================

    /// Save the token state
    pub fn save_state(&self, state: &TokenState) -> Result<(), StoreError> {
        self.put_raw(keys::TOKEN_STATE, &state.to_bytes())
    }

    /// Load the token state
    pub fn load_state(&self) -> Result<Option<TokenState>, StoreError> {
        match self.get_raw(keys::TOKEN_STATE)? {
            Some(bytes) => {
                let state = TokenState::from_bytes(&bytes)
                    .map_err(|e: TokenError| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // STATUS REGISTRY PERSISTENCE
    // ========================================================================

    /// Save the status registry
    pub fn save_registry(&self, registry: &StatusRegistry) -> Result<(), StoreError> {
        self.put_raw(keys::STATUS_REGISTRY, &registry.to_bytes())
    }

    /// Load the status registry
    pub fn load_registry(&self) -> Result<Option<StatusRegistry>, StoreError> {
        match self.get_raw(keys::STATUS_REGISTRY)? {
            Some(bytes) => {
                let registry = StatusRegistry::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(registry))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // WHOLE TOKEN
    // ========================================================================

    /// Save the token together with its registry, then flush
    pub fn save_token(&self, token: &EquityToken<StatusRegistry>) -> Result<(), StoreError> {
        self.save_state(token.state())?;
        self.save_registry(token.oracle())?;
        self.flush()?;
        info!(
            holders = token.state().balances().holder_count(),
            snapshot = token.current_snapshot_id(),
            "token saved"
        );
        Ok(())
    }

    /// Load a previously saved token. A missing registry loads as empty.
    pub fn load_token(&self) -> Result<Option<EquityToken<StatusRegistry>>, StoreError> {
        let Some(state) = self.load_state()? else {
            return Ok(None);
        };
        let registry = self.load_registry()?.unwrap_or_default();
        Ok(Some(EquityToken::from_state(state, registry)))
    }
}
