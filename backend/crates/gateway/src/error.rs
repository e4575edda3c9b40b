//! Gateway Error Types
//!
//! Infrastructure and input failures of the gateway. A rejected login is
//! *not* an error: it is reported as `LoginOutcome::Rejected` and rendered
//! as a flash message.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Login already belongs to another user
    #[error("Login already taken")]
    LoginTaken,

    /// Login does not satisfy the login rules (registration only)
    #[error("Invalid login: {0}")]
    InvalidLogin(String),

    /// New password rejected by the password policy
    #[error("Password validation failed: {0}")]
    PasswordPolicy(String),

    /// Protected resource requested without an authenticated session
    #[error("Login required")]
    LoginRequired,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session payload could not be (de)serialized
    #[error("Session encoding error: {0}")]
    SessionEncoding(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::LoginTaken => ErrorKind::Conflict,
            GatewayError::InvalidLogin(_) | GatewayError::PasswordPolicy(_) => {
                ErrorKind::BadRequest
            }
            GatewayError::LoginRequired => ErrorKind::Unauthorized,
            GatewayError::Database(_)
            | GatewayError::SessionEncoding(_)
            | GatewayError::Template(_)
            | GatewayError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs; the client only sees the kind.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        if kind.is_server_error() {
            AppError::new(kind, "Internal error")
        } else {
            AppError::new(kind, self.to_string())
        }
    }

    fn log(&self) {
        match self {
            GatewayError::Database(e) => {
                tracing::error!(error = %e, "Gateway database error");
            }
            GatewayError::SessionEncoding(e) => {
                tracing::error!(error = %e, "Session payload could not be encoded");
            }
            GatewayError::Template(e) => {
                tracing::error!(error = %e, "Template rendering failed");
            }
            GatewayError::Internal(msg) => {
                tracing::error!(message = %msg, "Gateway internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Gateway error");
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_kinds() {
        assert_eq!(GatewayError::LoginTaken.kind(), ErrorKind::Conflict);
        assert_eq!(GatewayError::LoginRequired.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            GatewayError::PasswordPolicy("too short".into()).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            GatewayError::Internal("boom".into()).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = GatewayError::Internal("connection string leaked".into());
        let app = err.to_app_error();
        assert_eq!(app.message(), "Internal error");

        let err = GatewayError::LoginTaken;
        assert_eq!(err.to_app_error().message(), "Login already taken");
    }

    #[test]
    fn test_into_response_status() {
        let response = GatewayError::LoginRequired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
