//! Error types for the guardianship reconciliation engine.

use clubhaus_core::{GuardianId, MemberId};
use clubhaus_db::DbError;
use thiserror::Error;

/// Error raised by a [`crate::GuardianshipStore`] implementation.
///
/// Implementations reduce their backend-specific failures to this type so
/// the engine stays backend-agnostic. The engine never inspects the
/// message, only surfaces it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    /// Create a store error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Errors produced by guardianship reconciliation operations.
#[derive(Debug, Error)]
pub enum GuardianshipError {
    /// A snapshot or store access failed. The whole operation fails;
    /// nothing is written against partial data.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// Referenced guardian does not exist at write time.
    #[error("unknown guardian: {0}")]
    UnknownGuardian(GuardianId),

    /// Referenced member does not exist at write time.
    #[error("unknown member: {0}")]
    UnknownMember(MemberId),

    /// Guardian account provisioning failed; no links were written.
    #[error("guardian account creation failed: {0}")]
    GuardianCreationFailed(#[source] StoreError),

    /// No member record carries the given guardian contact email, so
    /// there is nothing to materialize.
    #[error("no member has guardian contact email '{0}'")]
    NoMatchingMembers(String),

    /// The supplied email is empty or not plausibly an email address.
    #[error("invalid guardian email: '{0}'")]
    InvalidEmail(String),
}

/// Result type for guardianship operations.
pub type Result<T> = std::result::Result<T, GuardianshipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::new("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_unknown_guardian_display_contains_id() {
        let id = GuardianId::new();
        let err = GuardianshipError::UnknownGuardian(id);
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_store_unavailable_wraps_message() {
        let err = GuardianshipError::StoreUnavailable(StoreError::new("timeout"));
        assert_eq!(err.to_string(), "store unavailable: timeout");
    }
}
