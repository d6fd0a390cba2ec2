//! Account Service
//!
//! Capability-checked CRUD over accounts plus the two single-use token
//! workflows: account validation and password recovery. Every gated
//! operation checks its capability first, before any persistence or event
//! side effect. The validation and recovery entry points are deliberately
//! ungated: they are exercised by unauthenticated holders of a token.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info};

use crate::domain::{Account, AccountEvent, AccountUpdate, EventSink, NewAccount};
use crate::error::{AccountsError, Result, ValidationDetail};
use crate::repository::{AccountRepository, Page, PageRequest};
use crate::service::authorization::{AuthContext, AuthorizationGate, Capability};
use crate::service::password::{PasswordHasher, PasswordPolicy};
use crate::service::token::TokenGenerator;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^\w.*@.*\..{2,}$").expect("email pattern compiles"))
}

/// Generic failure for the token flows. Missing-account and wrong-token
/// cases share one message so a caller cannot tell which occurred.
fn token_validation_failed() -> AccountsError {
    AccountsError::validation("token validation failed: account not found or invalid token")
}

fn check_email(email: &str) -> Result<()> {
    if email.trim().is_empty() {
        return Err(AccountsError::validation_with(
            "email is required",
            [ValidationDetail::required("email")],
        ));
    }
    if !email_re().is_match(email) {
        return Err(AccountsError::validation_with(
            "email is not valid",
            [ValidationDetail::format("email", "email is not valid")],
        ));
    }
    Ok(())
}

/// The core identity service. Collaborators are injected; the service holds
/// no state of its own and never caches account records across calls.
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    gate: Arc<dyn AuthorizationGate>,
    events: Arc<dyn EventSink>,
    tokens: Arc<dyn TokenGenerator>,
    passwords: Arc<dyn PasswordHasher>,
    policy: PasswordPolicy,
}

impl AccountService {
    pub fn new(
        repo: Arc<dyn AccountRepository>,
        gate: Arc<dyn AuthorizationGate>,
        events: Arc<dyn EventSink>,
        tokens: Arc<dyn TokenGenerator>,
        passwords: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            repo,
            gate,
            events,
            tokens,
            passwords,
            policy: PasswordPolicy::default(),
        }
    }

    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Create a new account and issue its validation token.
    pub async fn create(&self, ctx: &AuthContext, params: NewAccount) -> Result<Account> {
        self.gate.assert_can(ctx, Capability::AccountsCreate)?;

        check_email(&params.email)?;
        self.policy.check(&params.password)?;

        if self.repo.find_by_email(&params.email).await?.is_some() {
            return Err(AccountsError::duplicate("Account", "email", &params.email));
        }

        let password_hash = self.passwords.hash(&params.password)?;
        let account = Account::new(&params.email, password_hash, self.tokens.generate());

        if let Err(err) = self.repo.insert(&account).await {
            debug!(error = %err, email = %params.email, "Account creation failed");
            return Err(err);
        }

        info!(account_id = %account.id, "Account created");
        self.events.emit(AccountEvent::Created {
            account: account.clone(),
            validation_url: params.validation_url.unwrap_or_default(),
        });

        Ok(account)
    }

    pub async fn get_by_id(&self, ctx: &AuthContext, id: &str) -> Result<Account> {
        self.gate.assert_can(ctx, Capability::AccountsList)?;

        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AccountsError::not_found("Account", id))
    }

    pub async fn update_by_id(
        &self,
        ctx: &AuthContext,
        id: &str,
        update: AccountUpdate,
    ) -> Result<Account> {
        self.gate.assert_can(ctx, Capability::AccountsUpdate)?;

        let mut account = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AccountsError::not_found("Account", id))?;

        if let Some(email) = update.email {
            check_email(&email)?;
            if email != account.email && self.repo.find_by_email(&email).await?.is_some() {
                return Err(AccountsError::duplicate("Account", "email", &email));
            }
            account.email = email;
        }

        account.updated_at = chrono::Utc::now();
        self.repo.update(&account).await?;

        Ok(account)
    }

    pub async fn get_paginated(
        &self,
        ctx: &AuthContext,
        request: PageRequest,
    ) -> Result<Page<Account>> {
        self.gate.assert_can(ctx, Capability::AccountsList)?;

        self.repo.find_page(request).await
    }

    pub async fn delete_by_id(&self, ctx: &AuthContext, id: &str) -> Result<()> {
        self.gate.assert_can(ctx, Capability::AccountsDelete)?;

        if !self.repo.delete(id).await? {
            return Err(AccountsError::not_found("Account", id));
        }

        info!(account_id = %id, "Account deleted");
        Ok(())
    }

    /// Consume a validation token: `Unvalidated` -> `Validated`.
    ///
    /// Ungated. The generic error covers both the missing-account and
    /// wrong-token cases; a wrong token additionally emits
    /// `validation-failed`. Re-validating after success fails, since the
    /// stored token is already cleared.
    pub async fn validate_by_id_and_token(&self, id: &str, token: &str) -> Result<Account> {
        let mut details = Vec::new();
        if id.trim().is_empty() {
            details.push(ValidationDetail::required("id"));
        }
        if token.trim().is_empty() {
            details.push(ValidationDetail::required("token"));
        }
        if !details.is_empty() {
            return Err(AccountsError::validation_with(
                "Some params are missing",
                details,
            ));
        }

        let account = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(token_validation_failed)?;

        if account.validation_token.as_deref() != Some(token) {
            self.events.emit(AccountEvent::ValidationFailed { account });
            return Err(token_validation_failed());
        }

        let before = account.clone();
        let mut updated = account;
        updated.mark_validated();
        self.repo.update(&updated).await?;

        info!(account_id = %updated.id, "Account validated");
        self.events.emit(AccountEvent::Validated { account: before });

        Ok(updated)
    }

    /// Issue a recovery token for the account owning `email`.
    ///
    /// Ungated. Returns `Ok(false)` when no account matches: the absence of
    /// a match must not be distinguishable from success, so callers cannot
    /// enumerate registered addresses.
    pub async fn generate_recover_token(&self, email: &str) -> Result<bool> {
        check_email(email)?;

        let Some(mut account) = self.repo.find_by_email(email).await? else {
            debug!("Recovery requested for unknown email");
            return Ok(false);
        };

        account.issue_recovery_token(self.tokens.generate());
        self.repo.update(&account).await?;

        info!(account_id = %account.id, "Recovery token issued");
        self.events
            .emit(AccountEvent::RecoveryTokenIssued { account });

        Ok(true)
    }

    /// Consume a recovery token and set a new credential.
    ///
    /// Ungated. The lookup matches email and stored token in one shot; the
    /// new credential and the cleared token are persisted in the same
    /// update, so no token is reusable.
    pub async fn set_new_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<Account> {
        self.policy.check(new_password)?;

        let mut account = self
            .repo
            .find_by_email_and_recovery_token(email, token)
            .await?
            .ok_or_else(token_validation_failed)?;

        let password_hash = self.passwords.hash(new_password)?;
        account.consume_recovery_token(password_hash);
        self.repo.update(&account).await?;

        info!(account_id = %account.id, "New password set");
        self.events.emit(AccountEvent::PasswordSet {
            account: account.clone(),
        });

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape_check() {
        assert!(check_email("user@example.com").is_ok());
        assert!(check_email("u@x.io").is_ok());
        assert!(check_email("").is_err());
        assert!(check_email("   ").is_err());
        assert!(check_email("no-at-sign.com").is_err());
        assert!(check_email("user@example.c").is_err());
    }
}
