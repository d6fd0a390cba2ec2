//! Service Layer
//!
//! The capability gate, the credential/token collaborator seams, and the
//! account service that composes them.

pub mod accounts;
pub mod authorization;
pub mod password;
pub mod token;

pub use accounts::AccountService;
pub use authorization::{AuthContext, AuthorizationGate, Capability, PermissionGate};
pub use password::{Argon2PasswordHasher, PasswordHasher, PasswordPolicy};
pub use token::{RandomTokenGenerator, TokenGenerator};
