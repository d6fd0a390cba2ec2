//! Account Lifecycle Events
//!
//! Typed notifications emitted after successful mutations (and on failed
//! validation attempts). Delivery is fire-and-forget: a sink failure must
//! never fail the operation that produced the event.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::Account;

/// Lifecycle notification for external consumers (notification dispatch,
/// audit logging).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum AccountEvent {
    /// A new account was persisted.
    Created {
        account: Account,
        /// URL hint for the validation email, verbatim from the caller
        validation_url: String,
    },

    /// The validation token was consumed. Carries the pre-update account.
    Validated { account: Account },

    /// A validation attempt presented the wrong token.
    ValidationFailed { account: Account },

    /// A recovery token was issued and stored.
    #[serde(rename = "new-recovery-password-token")]
    RecoveryTokenIssued { account: Account },

    /// A recovery token was consumed and a new credential set.
    #[serde(rename = "new-password-set")]
    PasswordSet { account: Account },
}

impl AccountEvent {
    /// Stable event name, matching the wire names consumers subscribe to.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Validated { .. } => "validated",
            Self::ValidationFailed { .. } => "validation-failed",
            Self::RecoveryTokenIssued { .. } => "new-recovery-password-token",
            Self::PasswordSet { .. } => "new-password-set",
        }
    }

    /// The account the event is about.
    pub fn account(&self) -> &Account {
        match self {
            Self::Created { account, .. }
            | Self::Validated { account }
            | Self::ValidationFailed { account }
            | Self::RecoveryTokenIssued { account }
            | Self::PasswordSet { account } => account,
        }
    }
}

/// Observer seam for lifecycle events.
pub trait EventSink: Send + Sync {
    /// Deliver an event. Infallible from the caller's perspective;
    /// implementations log and swallow delivery problems.
    fn emit(&self, event: AccountEvent);
}

/// Broadcast-channel sink. Subscribers receive every event emitted while
/// they hold a receiver; emitting with no receivers is not an error.
pub struct BroadcastSink {
    tx: broadcast::Sender<AccountEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AccountEvent> {
        self.tx.subscribe()
    }
}

impl EventSink for BroadcastSink {
    fn emit(&self, event: AccountEvent) {
        let event_type = event.event_type();
        if self.tx.send(event).is_err() {
            debug!(event_type, "No subscribers for account event");
        }
    }
}

/// Sink that drops every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: AccountEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new("test@example.com", "hash", "tok-1")
    }

    #[test]
    fn test_event_type_names() {
        let a = account();
        assert_eq!(
            AccountEvent::Created {
                account: a.clone(),
                validation_url: String::new()
            }
            .event_type(),
            "created"
        );
        assert_eq!(
            AccountEvent::Validated { account: a.clone() }.event_type(),
            "validated"
        );
        assert_eq!(
            AccountEvent::ValidationFailed { account: a.clone() }.event_type(),
            "validation-failed"
        );
        assert_eq!(
            AccountEvent::RecoveryTokenIssued { account: a.clone() }.event_type(),
            "new-recovery-password-token"
        );
        assert_eq!(
            AccountEvent::PasswordSet { account: a }.event_type(),
            "new-password-set"
        );
    }

    #[test]
    fn test_broadcast_sink_without_subscribers_does_not_panic() {
        let sink = BroadcastSink::new(16);
        sink.emit(AccountEvent::Validated { account: account() });
    }

    #[tokio::test]
    async fn test_broadcast_sink_delivers_to_subscriber() {
        let sink = BroadcastSink::new(16);
        let mut rx = sink.subscribe();

        sink.emit(AccountEvent::Validated { account: account() });

        let received = rx.recv().await.unwrap();
        assert_eq!(received.event_type(), "validated");
    }
}
