//! Domain Models
//!
//! The managed identity record and the lifecycle events it produces.

pub mod account;
pub mod event;

pub use account::*;
pub use event::*;
