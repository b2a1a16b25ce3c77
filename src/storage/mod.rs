// Storage module - PERSISTENCE
// Handles persistent key-value storage of the token state using sled

mod store;

pub use store::{StorageStats, StoreError, TokenStore};
