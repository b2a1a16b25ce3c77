// Account module - WHO holds tokens
// Addresses key every balance, vesting amount, offer queue and checkpoint series

mod address;

pub use address::{Address, AddressError, ADDRESS_LEN};
