//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `PortalError`は`external_message()`と`status_code()`メソッドを提供し、
//! 内部情報を漏らさないエラーレスポンスを生成できます。

use axum::http::StatusCode;
use thiserror::Error;

/// ポータル統一エラー型
#[derive(Debug, Error)]
pub enum PortalError {
    /// Validation error (missing or malformed request fields)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Upstream HTTP error (registry unreachable or non-2xx)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Timeout error
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Password hash error
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Returns a safe error message for external clients.
    ///
    /// This method returns a generic error message that does not expose
    /// internal implementation details such as upstream hostnames, SQL text
    /// or stack detail. Use this for HTTP responses to external clients.
    ///
    /// For debugging purposes, use the `Display` implementation
    /// (`to_string()`) which includes full error details - but only in
    /// server logs.
    ///
    /// Validation details name only client-supplied fields and are passed
    /// through as-is.
    pub fn external_message(&self) -> &str {
        match self {
            Self::Validation(msg) => msg,
            Self::NotFound(_) => "Not found",
            Self::Database(_) => "Internal server error",
            Self::Upstream(_) => "Registry service unavailable",
            Self::Timeout(_) => "Request timeout",
            Self::PasswordHash(_) => "Internal server error",
            Self::Authentication(_) => "Invalid password",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias
pub type PortalResult<T> = Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PortalError::Validation("dob missing".to_string());
        assert_eq!(error.to_string(), "Validation error: dob missing");
    }

    #[test]
    fn test_external_message_hides_detail() {
        let error = PortalError::Upstream("http://10.0.0.5:8080 refused".to_string());
        assert_eq!(error.external_message(), "Registry service unavailable");
        assert!(!error.external_message().contains("10.0.0.5"));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let error = PortalError::Validation("dob is required".to_string());
        assert_eq!(error.external_message(), "dob is required");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            PortalError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PortalError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PortalError::Upstream("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            PortalError::Timeout("x".into()).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            PortalError::Authentication("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            PortalError::Database("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            PortalError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_authentication_message() {
        let error = PortalError::Authentication("bcrypt mismatch".to_string());
        assert_eq!(error.external_message(), "Invalid password");
    }
}
