//! Account Service Error Types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single structured validation failure, suitable for client display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDetail {
    /// The offending input property (e.g., "email", "token")
    pub property: String,

    /// Failure kind (e.g., "required", "format")
    pub kind: String,

    /// Human-readable message
    pub message: String,
}

impl ValidationDetail {
    pub fn required(property: impl Into<String>) -> Self {
        let property = property.into();
        let message = format!("{} is required", property);
        Self {
            property,
            kind: "required".to_string(),
            message,
        }
    }

    pub fn format(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            kind: "format".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AccountsError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Duplicate entity: {entity_type} with {field}={value}")]
    Duplicate {
        entity_type: String,
        field: String,
        value: String,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Vec<ValidationDetail>,
    },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AccountsError {
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(
        entity_type: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn validation_with(
        message: impl Into<String>,
        details: impl IntoIterator<Item = ValidationDetail>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            details: details.into_iter().collect(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AccountsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = AccountsError::not_found("Account", "acct123");
        let msg = err.to_string();
        assert!(msg.contains("Account"));
        assert!(msg.contains("acct123"));
    }

    #[test]
    fn test_duplicate_error() {
        let err = AccountsError::duplicate("Account", "email", "test@example.com");
        let msg = err.to_string();
        assert!(msg.contains("email"));
        assert!(msg.contains("test@example.com"));
    }

    #[test]
    fn test_validation_error_accumulates_details() {
        let err = AccountsError::validation_with(
            "Some params are missing",
            [
                ValidationDetail::required("id"),
                ValidationDetail::required("token"),
            ],
        );

        match err {
            AccountsError::Validation { details, .. } => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[0].property, "id");
                assert_eq!(details[0].kind, "required");
                assert_eq!(details[1].message, "token is required");
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_forbidden_error() {
        let err = AccountsError::forbidden("Missing capability: accounts:create");
        assert!(err.to_string().contains("accounts:create"));
    }
}
