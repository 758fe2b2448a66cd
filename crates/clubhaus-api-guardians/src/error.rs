//! Guardianship API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use clubhaus_guardianship::GuardianshipError;

/// Error type for guardianship API operations.
#[derive(Debug, Error)]
pub enum GuardianApiError {
    /// Guardian account not found.
    #[error("guardian not found: {0}")]
    GuardianNotFound(Uuid),

    /// Member record not found.
    #[error("member not found: {0}")]
    MemberNotFound(Uuid),

    /// No member carries the given contact email.
    #[error("no member has guardian contact email: {0}")]
    NoMatchingMembers(String),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// The identity or relationship store could not be reached.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Guardian account provisioning failed.
    #[error("guardian provisioning failed: {0}")]
    ProvisioningFailed(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for GuardianApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            GuardianApiError::GuardianNotFound(_) => (
                StatusCode::NOT_FOUND,
                "guardian_not_found",
                self.to_string(),
            ),
            GuardianApiError::MemberNotFound(_) => {
                (StatusCode::NOT_FOUND, "member_not_found", self.to_string())
            }
            GuardianApiError::NoMatchingMembers(_) => (
                StatusCode::NOT_FOUND,
                "no_matching_members",
                self.to_string(),
            ),
            GuardianApiError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.to_string(),
            ),
            GuardianApiError::StoreUnavailable(ref e) => {
                error!("Store unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "Backing store unavailable".to_string(),
                )
            }
            GuardianApiError::ProvisioningFailed(_) => (
                StatusCode::BAD_GATEWAY,
                "provisioning_failed",
                self.to_string(),
            ),
            GuardianApiError::Internal(ref e) => {
                error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = json!({
            "error": error_type,
            "message": message,
        });

        (status, Json(body)).into_response()
    }
}

impl From<GuardianshipError> for GuardianApiError {
    fn from(err: GuardianshipError) -> Self {
        match err {
            GuardianshipError::StoreUnavailable(e) => {
                GuardianApiError::StoreUnavailable(e.to_string())
            }
            GuardianshipError::UnknownGuardian(id) => {
                GuardianApiError::GuardianNotFound(id.into_uuid())
            }
            GuardianshipError::UnknownMember(id) => {
                GuardianApiError::MemberNotFound(id.into_uuid())
            }
            GuardianshipError::GuardianCreationFailed(e) => {
                GuardianApiError::ProvisioningFailed(e.to_string())
            }
            GuardianshipError::NoMatchingMembers(email) => {
                GuardianApiError::NoMatchingMembers(email)
            }
            GuardianshipError::InvalidEmail(text) => {
                GuardianApiError::Validation(format!("invalid guardian email: '{text}'"))
            }
        }
    }
}

/// Result type for guardianship API operations.
pub type Result<T> = std::result::Result<T, GuardianApiError>;
