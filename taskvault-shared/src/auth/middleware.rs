/// Bearer-token middleware for axum
///
/// Validates the `Authorization: Bearer <token>` header in front of every
/// protected route and injects the caller's identity into request
/// extensions as [`AuthContext`]. Handlers receive the identity as an
/// explicit value rather than ambient state, so nothing can leak between
/// concurrent requests.
///
/// The identity service is never consulted here: the token signature is
/// the entire trust boundary.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskvault_shared::auth::middleware::{require_bearer, AuthContext};
///
/// async fn protected(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
///
/// let app: Router = Router::new()
///     .route("/tasks", get(protected))
///     .layer(middleware::from_fn(require_bearer("your-signing-secret")));
/// ```
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use super::jwt::validate_token;
use crate::error::ErrorResponse;

/// Authenticated caller identity, added to request extensions after the
/// presented token verifies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    /// User id embedded in the verified token. Trusted for the remainder
    /// of the request without re-querying the identity service.
    pub user_id: Uuid,
}

/// Error type for the bearer middleware
#[derive(Debug)]
pub enum AuthError {
    /// No usable bearer token in the Authorization header (401)
    MissingToken,

    /// Token failed signature, structure, or expiry checks (403)
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidToken => (StatusCode::FORBIDDEN, "Invalid or expired token"),
        };

        let body = Json(ErrorResponse {
            message: message.to_string(),
            error: None,
        });

        (status, body).into_response()
    }
}

/// Bearer-token middleware
///
/// # Errors
///
/// - `401` if the Authorization header is absent or not a Bearer token
/// - `403` if the token is malformed, forged, or expired
pub async fn bearer_auth(secret: String, mut req: Request, next: Next) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?;

    let claims = validate_token(token, &secret).map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        AuthError::InvalidToken
    })?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
    });

    Ok(next.run(req).await)
}

/// Creates a bearer-auth middleware closure capturing the signing secret
///
/// For use with `axum::middleware::from_fn`.
pub fn require_bearer(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>
       + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(bearer_auth(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_responses() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_auth_context_is_copy() {
        let ctx = AuthContext {
            user_id: Uuid::new_v4(),
        };
        let copied = ctx;
        assert_eq!(ctx, copied);
    }
}
