/// Error handling shared by both services
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>`, which converts to the wire shape
/// `{message, error?}` with the appropriate status code. Every failure is
/// recovered at the request boundary; nothing on the request path is
/// allowed to crash the process.
///
/// # Example
///
/// ```no_run
/// use taskvault_shared::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::NotFound("Task not found".to_string()))
/// }
/// ```
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing credentials (401)
    Unauthenticated(String),

    /// Presented token failed verification (403)
    InvalidToken(String),

    /// Login failure: unknown email or wrong password (401).
    /// The two cases are deliberately indistinguishable to the caller.
    InvalidCredential(String),

    /// Registration conflict: username or email already taken (400)
    DuplicateIdentity(String),

    /// Resource absent or owned by someone else (404).
    /// The two cases are indistinguishable so record ids do not leak.
    NotFound(String),

    /// Request payload failed validation (422)
    Validation(Vec<ValidationErrorDetail>),

    /// Stored password hash is malformed (500). Operator-visible in the
    /// logs, never exposed to the client.
    CorruptCredential(String),

    /// Internal server error (500)
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format: `{message, error?}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// Optional detail string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            ApiError::InvalidCredential(msg) => write!(f, "Invalid credential: {}", msg),
            ApiError::DuplicateIdentity(msg) => write!(f, "Duplicate identity: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::CorruptCredential(msg) => write!(f, "Corrupt credential: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::InvalidToken(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidCredential(_) => StatusCode::UNAUTHORIZED,
            ApiError::DuplicateIdentity(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::CorruptCredential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, error) = match self {
            ApiError::Unauthenticated(msg) => (msg, None),
            ApiError::InvalidToken(msg) => (msg, None),
            ApiError::InvalidCredential(msg) => (msg, None),
            ApiError::DuplicateIdentity(msg) => (msg, None),
            ApiError::NotFound(msg) => (msg, None),
            ApiError::Validation(errors) => {
                let detail = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                ("Request validation failed".to_string(), Some(detail))
            }
            ApiError::CorruptCredential(msg) => {
                // Log the detail but don't expose it to clients
                tracing::error!("Corrupt stored credential: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("An internal error occurred".to_string(), None)
            }
        };

        let body = Json(ErrorResponse { message, error });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations on the users table become duplicate
/// identity failures: the database constraint, not the application-level
/// pre-check, is what actually closes the concurrent-registration race.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") {
                        return ApiError::DuplicateIdentity("Username already exists".to_string());
                    }
                    if constraint.contains("email") {
                        return ApiError::DuplicateIdentity("Email already exists".to_string());
                    }
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert token errors to API errors
impl From<crate::auth::jwt::JwtError> for ApiError {
    fn from(err: crate::auth::jwt::JwtError) -> Self {
        match err {
            crate::auth::jwt::JwtError::Expired => {
                ApiError::InvalidToken("Token expired".to_string())
            }
            crate::auth::jwt::JwtError::ValidationError(msg) => ApiError::InvalidToken(msg),
            crate::auth::jwt::JwtError::CreateError(msg) => {
                ApiError::Internal(format!("Token creation failed: {}", msg))
            }
        }
    }
}

/// Convert password errors to API errors
impl From<crate::auth::password::PasswordError> for ApiError {
    fn from(err: crate::auth::password::PasswordError) -> Self {
        match err {
            crate::auth::password::PasswordError::CorruptHash(msg) => {
                ApiError::CorruptCredential(msg)
            }
            other => ApiError::Internal(format!("Password operation failed: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::PasswordError;

    #[test]
    fn test_error_display() {
        let err = ApiError::DuplicateIdentity("Email already exists".to_string());
        assert_eq!(err.to_string(), "Duplicate identity: Email already exists");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Unauthenticated("".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::InvalidToken("".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::InvalidCredential("".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::DuplicateIdentity("".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::CorruptCredential("".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_corrupt_hash_maps_to_500() {
        let err: ApiError = PasswordError::CorruptHash("bad phc string".to_string()).into();
        assert!(matches!(err, ApiError::CorruptCredential(_)));
    }

    #[test]
    fn test_expired_token_maps_to_403() {
        let err: ApiError = crate::auth::jwt::JwtError::Expired.into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_error_detail_joined() {
        let err = ApiError::Validation(vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Too short".to_string(),
            },
        ]);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
