//! # casebook-cases
//!
//! Legal case management over `SQLite`: cases, ordered workflow steps,
//! legacy milestones, time entries, comments, legal references, and the
//! append-only activity log.
//!
//! [`CaseRepository`] is a stateless SQL layer; [`CaseService`] adds
//! validation, derived progress, and activity logging, running every
//! mutation and its activity row inside one `IMMEDIATE` transaction.

#![deny(unsafe_code)]

pub mod errors;
pub mod progress;
pub mod repository;
pub mod service;
pub mod types;

pub use errors::CaseError;
pub use progress::compute_progress;
pub use repository::CaseRepository;
pub use service::{CaseService, DeleteStepOptions, parse_step_ids};
pub use types::*;
