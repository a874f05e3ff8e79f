/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Create an account and receive a bearer token
/// - `POST /login` - Verify credentials and receive a bearer token
///
/// Registration checks username and email uniqueness up front for a clear
/// message, but the database unique constraints remain the authority: a
/// concurrent duplicate insert is rejected there and mapped to the same
/// 400 response. Login failure never reveals whether the email exists.
use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskvault_shared::{
    auth::{jwt, password},
    error::{ApiError, ApiResult, ValidationErrorDetail},
    models::user::{CreateUser, User},
};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password
    pub password: String,
}

/// Public view of a user; never includes the password hash
#[derive(Debug, Serialize)]
pub struct UserBody {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Email address
    pub email: String,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Response for both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Human-readable outcome
    pub message: String,

    /// Bearer token, valid for 24 hours
    pub token: String,

    /// The authenticated user
    pub user: UserBody,
}

fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();
    ApiError::Validation(errors)
}

/// Register a new user
///
/// ```text
/// POST /register
/// {"username": "t1", "email": "t1@x.com", "password": "pw123456"}
/// ```
///
/// # Errors
///
/// - `400` duplicate username or email
/// - `422` validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate().map_err(validation_errors)?;

    if User::find_by_identifier(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateIdentity(
            "Username already exists".to_string(),
        ));
    }
    if User::find_by_identifier(&state.db, &req.email)
        .await?
        .is_some()
    {
        return Err(ApiError::DuplicateIdentity(
            "Email already exists".to_string(),
        ));
    }

    let password_hash = password::hash_password(&req.password)?;

    // A concurrent duplicate slips past the checks above; the unique
    // constraint rejects it here and From<sqlx::Error> maps it to 400.
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
            user: user.into(),
        }),
    ))
}

/// Login with email and password
///
/// ```text
/// POST /login
/// {"email": "t1@x.com", "password": "pw123456"}
/// ```
///
/// # Errors
///
/// - `401` unknown email or wrong password, indistinguishable by design
/// - `500` corrupt stored hash (logged for operators)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(validation_errors)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::InvalidCredential("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredential(
            "Invalid credentials".to_string(),
        ));
    }

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into(),
    }))
}
