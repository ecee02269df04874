//! Error types for the workshop platform.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Workshop not found: {0}")]
    WorkshopNotFound(String),

    #[error("Registration not found: {0}")]
    RegistrationNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already registered for this workshop")]
    DuplicateRegistration,

    #[error("No available seats for this workshop")]
    SoldOut,

    #[error("No seats remaining to confirm this registration")]
    SeatsExhausted,

    #[error("Payment has not been verified")]
    PaymentNotVerified,

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::UserNotFound(_) | Self::WorkshopNotFound(_) | Self::RegistrationNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::PaymentNotVerified => StatusCode::BAD_REQUEST,
            Self::Conflict(_)
            | Self::DuplicateRegistration
            | Self::SoldOut
            | Self::SeatsExhausted => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::WorkshopNotFound(_) => "WORKSHOP_NOT_FOUND",
            Self::RegistrationNotFound(_) => "REGISTRATION_NOT_FOUND",
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::DuplicateRegistration => "DUPLICATE_REGISTRATION",
            Self::SoldOut => "SOLD_OUT",
            Self::SeatsExhausted => "SEATS_EXHAUSTED",
            Self::PaymentNotVerified => "PAYMENT_NOT_VERIFIED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Log server errors
        if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(
            AppError::WorkshopNotFound("w1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::RegistrationNotFound("r1".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_seat_errors_are_conflicts() {
        assert_eq!(AppError::SoldOut.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::SeatsExhausted.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::DuplicateRegistration.status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::SoldOut.error_code(), "SOLD_OUT");
        assert_eq!(
            AppError::PaymentNotVerified.error_code(),
            "PAYMENT_NOT_VERIFIED"
        );
        assert_eq!(
            AppError::Database("boom".to_string()).error_code(),
            "DATABASE_ERROR"
        );
    }

    #[test]
    fn test_server_errors_flagged() {
        assert!(AppError::Database("down".to_string()).is_server_error());
        assert!(!AppError::SoldOut.is_server_error());
    }
}
