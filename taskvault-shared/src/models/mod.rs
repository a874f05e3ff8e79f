/// Database models for TaskVault
///
/// # Models
///
/// - `user`: user accounts; the credential store behind the identity service
/// - `task`: per-user tasks; every operation is scoped to an owner id

pub mod task;
pub mod user;
