//! # casebook-store
//!
//! `SQLite` persistence plumbing: an `r2d2` connection pool with per-connection
//! pragmas, and the idempotent schema DDL for every casebook table.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;

pub use connection::{
    ConnectionConfig, ConnectionPool, PooledConnection, new_file, new_in_memory, verify_pragmas,
};
pub use errors::{Result, StoreError};
pub use migrations::run_migrations;
