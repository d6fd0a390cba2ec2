//! Identra Accounts
//!
//! Core account service providing:
//! - Capability-gated CRUD over identity records
//! - Single-use validation tokens issued at account creation
//! - Single-use password-recovery tokens
//! - Typed lifecycle events for downstream consumers
//!
//! Transport and storage engines live outside this crate; they plug in
//! through the `AccountRepository`, `AuthorizationGate`, `TokenGenerator`,
//! `PasswordHasher`, and `EventSink` seams.

pub mod domain;
pub mod error;
pub mod repository;
pub mod service;

pub use domain::*;
pub use error::AccountsError;
pub use repository::{AccountRepository, MemoryAccountRepository};
pub use service::AccountService;
