//! # Memory Banks
//!
//! Free-list allocators for objects that churn.
//!
//! ## Design
//!
//! - Memory is taken from the system one page at a time
//! - Pages are kept until the bank drops
//! - Handles are checked on every access, so freed slots never alias

mod bank;
mod config;
mod struct_bank;
mod sync_bank;

pub use bank::{BankHandle, ObjectBank};
pub use config::{BankConfig, DEFAULT_CACHE_SIZE};
pub use struct_bank::{StructBank, StructHandle, POISON_BYTE};
pub use sync_bank::SyncObjectBank;
