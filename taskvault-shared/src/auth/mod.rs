/// Authentication primitives shared by both services
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Token issuing and validation (HS256)
/// - [`middleware`]: Bearer-token middleware for protected routes
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Tokens**: HS256 signing, 24 hour expiry, stateless (no server-side
///   session table); the signing secret is explicit configuration so the
///   issuer and verifier can run in separate processes
/// - **Constant-time Comparison**: password verification never short-circuits

pub mod jwt;
pub mod middleware;
pub mod password;
