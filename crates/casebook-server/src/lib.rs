//! # casebook-server
//!
//! Axum HTTP surface for casebook.
//!
//! - JSON routes over cases, workflow steps, milestones, and time entries
//! - Session identity via `Authorization: Bearer` or the session cookie
//! - `ApiError` mapping onto HTTP status codes with sanitized bodies
//! - Prometheus `/metrics` and a `/health` check
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod health;
pub mod identity;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod shutdown;

pub use config::ServerConfig;
pub use errors::ApiError;
pub use identity::{CurrentUser, IdentityProvider, SqliteIdentityProvider};
pub use server::{AppState, CasebookServer};
pub use shutdown::{ShutdownCoordinator, wait_for_signal};
