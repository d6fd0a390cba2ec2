//! Repository Layer
//!
//! The persistence contract the account service depends on, plus an
//! in-memory reference implementation used by tests and embedders.

pub mod account;
pub mod memory;

pub use account::{AccountRepository, Page, PageRequest};
pub use memory::MemoryAccountRepository;
