//! # casebook-settings
//!
//! Configuration management with layered sources.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`CasebookSettings::default()`]
//! 2. **User file**: `~/.casebook/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `CASEBOOK_*` overrides (highest priority)
//!
//! The binary applies CLI flags on top of the loaded value.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    casebook_home, deep_merge, load_settings, load_settings_from_path, resolve_db_path,
    settings_path,
};
pub use types::*;
