/// Token issuing and validation
///
/// Tokens are signed with HS256 (HMAC-SHA256) and carry the authenticated
/// user id as the `sub` claim. They are fully self-contained: the task
/// service validates a token without ever consulting the identity service,
/// trusting the signature instead of a session table. There is no
/// revocation list; a leaked token is bounded only by its 24 hour expiry.
///
/// The signing secret is passed explicitly to [`create_token`] and
/// [`validate_token`] so it lives in configuration, can be rotated, and
/// both functions can be tested in isolation.
///
/// # Example
///
/// ```
/// use taskvault_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "a-signing-secret-of-at-least-32-bytes";
///
/// let token = create_token(&Claims::new(user_id), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in every token and required during validation
const ISSUER: &str = "taskvault";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token (bad signature, malformed, wrong issuer)
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Claims carried by a TaskVault token
///
/// - `sub`: the user id established at login/registration
/// - `iss`: always `"taskvault"`
/// - `iat` / `exp`: Unix timestamps; `exp` is 24 hours after issuance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Token lifetime. Compromise of a token is mitigated only by this bound.
    pub const TOKEN_TTL_HOURS: i64 = 24;

    /// Creates claims for `user_id` expiring 24 hours from now
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::hours(Self::TOKEN_TTL_HOURS))
    }

    /// Creates claims with a custom expiry, mainly for tests that need an
    /// already-expired token
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Checks if the claims are past their expiry
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string
///
/// Each call produces a fresh, independently valid token; issuing twice for
/// the same user does not invalidate earlier tokens.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature against `secret`, the issuer, and that the
/// current time is before `exp`. On success the embedded `sub` is the
/// authenticated caller identity for the remainder of the request.
///
/// # Errors
///
/// - `JwtError::Expired` if the token is past its expiry
/// - `JwtError::ValidationError` for a bad signature, malformed token,
///   or wrong issuer
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
