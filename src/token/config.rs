use crate::offers::OFFER_EXPIRY_WINDOW;
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Static token parameters, persisted with the token state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Human-readable token name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Seconds an offer stays active after creation
    pub offer_expiry_secs: Timestamp,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "Equity".to_string(),
            symbol: "EQT".to_string(),
            offer_expiry_secs: OFFER_EXPIRY_WINDOW,
        }
    }
}

impl TokenConfig {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn with_offer_expiry(mut self, secs: Timestamp) -> Self {
        self.offer_expiry_secs = secs;
        self
    }
}
