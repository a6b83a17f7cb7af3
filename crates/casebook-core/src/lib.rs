//! # casebook-core
//!
//! Foundation helpers shared by every casebook crate:
//!
//! - **Ids**: prefixed UUID v7 identifiers (`case-…`, `step-…`)
//! - **Time**: ISO 8601 timestamp formatting in UTC
//! - **Logging**: `tracing` subscriber installation

#![deny(unsafe_code)]

pub mod ids;
pub mod logging;
pub mod time;

pub use ids::{IdPrefix, generate_id};
pub use logging::init_subscriber;
pub use time::{format_iso, now_iso};
