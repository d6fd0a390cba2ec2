//! Account Entity
//!
//! The persisted identity record managed by the account service. Token
//! fields are mutated only through the validation and recovery flows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted identity record.
///
/// A non-null `validation_token` implies `validated_at` is `None`; the two
/// are mutually exclusive states of the account-confirmation dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// UUID assigned at construction
    pub id: String,

    /// Unique email address
    pub email: String,

    /// Opaque credential hash. Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Single-use secret proving control of the email at creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_token: Option<String>,

    /// Set when the validation token was successfully consumed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,

    /// Single-use secret proving eligibility to reset the credential
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password_token: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new, unvalidated account carrying its validation token.
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        validation_token: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            password_hash: password_hash.into(),
            validation_token: Some(validation_token.into()),
            validated_at: None,
            new_password_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.validated_at.is_some()
    }

    /// Consume the validation token: clears it and stamps `validated_at`.
    pub fn mark_validated(&mut self) {
        self.validation_token = None;
        self.validated_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Store a freshly issued recovery token.
    pub fn issue_recovery_token(&mut self, token: impl Into<String>) {
        self.new_password_token = Some(token.into());
        self.updated_at = Utc::now();
    }

    /// Apply a new credential and clear the recovery token in one step.
    pub fn consume_recovery_token(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.new_password_token = None;
        self.updated_at = Utc::now();
    }
}

/// Input for `AccountService::create`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    /// Email address
    pub email: String,

    /// Plaintext password, hashed before it reaches storage
    pub password: String,

    /// Optional URL hint carried on the `created` event for the
    /// notification subscriber to embed in the validation email
    #[serde(default)]
    pub validation_url: Option<String>,
}

/// Partial update for `AccountService::update_by_id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_unvalidated() {
        let account = Account::new("test@example.com", "hash", "tok-1");
        assert_eq!(account.validation_token.as_deref(), Some("tok-1"));
        assert!(account.validated_at.is_none());
        assert!(account.new_password_token.is_none());
        assert!(!account.is_validated());
    }

    #[test]
    fn test_mark_validated_clears_token() {
        let mut account = Account::new("test@example.com", "hash", "tok-1");
        account.mark_validated();

        assert!(account.validation_token.is_none());
        assert!(account.validated_at.is_some());
        assert!(account.is_validated());
    }

    #[test]
    fn test_recovery_token_round_trip() {
        let mut account = Account::new("test@example.com", "hash", "tok-1");
        account.issue_recovery_token("recover-1");
        assert_eq!(account.new_password_token.as_deref(), Some("recover-1"));

        account.consume_recovery_token("new-hash");
        assert!(account.new_password_token.is_none());
        assert_eq!(account.password_hash, "new-hash");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let account = Account::new("test@example.com", "secret-hash", "tok-1");
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("validationToken"));
    }
}
