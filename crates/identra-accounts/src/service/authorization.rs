//! Authorization Gate
//!
//! Capability checks evaluated against the calling context before any
//! mutating or listing operation. Capabilities are a closed set; the gate
//! resolves them against the context's permission strings, including
//! resource wildcards and the `*:*` superuser grant.

use std::collections::HashSet;

use crate::error::{AccountsError, Result};

/// Named permission gating one account-service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    AccountsCreate,
    AccountsList,
    AccountsUpdate,
    AccountsDelete,
}

impl Capability {
    /// Permission string as stored on roles and contexts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountsCreate => "accounts:create",
            Self::AccountsList => "accounts:list",
            Self::AccountsUpdate => "accounts:update",
            Self::AccountsDelete => "accounts:delete",
        }
    }
}

/// Resolved calling context: who is acting and what they may do.
///
/// Permission resolution (role expansion, token validation) happens in the
/// authentication layer above this crate; by the time a context reaches the
/// service it carries a flat permission set.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal_id: String,
    pub email: Option<String>,
    pub permissions: HashSet<String>,
    pub roles: Vec<String>,
}

impl AuthContext {
    pub fn new(principal_id: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            email: None,
            permissions: HashSet::new(),
            roles: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    pub fn with_capability(self, capability: Capability) -> Self {
        self.with_permission(capability.as_str())
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission) || self.has_wildcard_permission(permission)
    }

    /// Check for wildcard grants (e.g., "accounts:*" matches "accounts:list")
    fn has_wildcard_permission(&self, permission: &str) -> bool {
        let parts: Vec<&str> = permission.split(':').collect();
        if parts.len() < 2 {
            return false;
        }

        let wildcard = format!("{}:*", parts[0]);
        if self.permissions.contains(&wildcard) {
            return true;
        }

        self.permissions.contains("*:*")
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Gate seam: returns normally iff the context holds the capability.
///
/// A denial halts the calling operation before any persistence or event
/// side effect.
pub trait AuthorizationGate: Send + Sync {
    fn assert_can(&self, ctx: &AuthContext, capability: Capability) -> Result<()>;
}

/// Default gate: evaluates the context's permission set.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissionGate;

impl AuthorizationGate for PermissionGate {
    fn assert_can(&self, ctx: &AuthContext, capability: Capability) -> Result<()> {
        if ctx.has_permission(capability.as_str()) {
            Ok(())
        } else {
            Err(AccountsError::forbidden(format!(
                "Missing capability: {}",
                capability.as_str()
            )))
        }
    }
}
