//! # TaskVault Task Service Library
//!
//! Stores per-user tasks and enforces that every read and mutation is
//! scoped to the owner established by the verified bearer token. The
//! identity service is never consulted at request time.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `routes`: Route handlers (task CRUD, health)

pub mod app;
pub mod config;
pub mod routes;
