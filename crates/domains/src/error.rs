//! # DomainError
//!
//! Centralized error handling for the listing store.
//! Validation and lookup failures surface to the caller; corruption of a
//! stored collection is recovered inside the store and only ever logged.

use thiserror::Error;

use crate::models::Role;

/// The primary error type for all store operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Identifier does not resolve (e.g., Property, Booking, Notification)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Missing or invalid input field (e.g., blank title, rent on a sale listing)
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource already exists (e.g., duplicate registration email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Login with a wrong password
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Login with a role other than the one registered
    #[error("you're registered as a {registered}, not a {requested}")]
    RoleMismatch { registered: Role, requested: Role },

    /// Stored JSON could not be parsed. Never returned by the store itself.
    #[error("collection `{collection}` is corrupt: {reason}")]
    StorageCorrupt { collection: String, reason: String },

    /// Backend failure while writing (e.g., disk full, permission denied)
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &str, id: impl Into<String>) -> Self {
        Self::NotFound(entity.to_string(), id.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(..))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// A specialized Result type for listing store logic.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_mismatch_reads_like_the_login_prompt() {
        let err = DomainError::RoleMismatch {
            registered: Role::Seller,
            requested: Role::Buyer,
        };
        assert_eq!(err.to_string(), "you're registered as a seller, not a buyer");
    }

    #[test]
    fn not_found_names_entity_and_id() {
        let err = DomainError::not_found("Property", "prop_1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Property not found with ID prop_1");
    }
}
