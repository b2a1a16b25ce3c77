// Token module - THE RULES
// Lock accounting, offer matching and the event stream on top of the ledger

mod config;
mod equity;
mod events;
mod lock;

pub use config::TokenConfig;
pub use equity::{EquityToken, TokenError, TokenState};
pub use events::LedgerEvent;
pub use lock::LockView;
