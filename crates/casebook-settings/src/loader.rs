//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`CasebookSettings::default()`]
//! 2. If `~/.casebook/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::CasebookSettings;

/// Resolve the casebook home directory (`~/.casebook`).
pub fn casebook_home() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".casebook")
}

/// Resolve the path to the settings file (`~/.casebook/settings.json`).
pub fn settings_path() -> PathBuf {
    casebook_home().join("settings.json")
}

/// Load settings from `~/.casebook/settings.json` with env var overrides.
pub fn load_settings() -> Result<CasebookSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<CasebookSettings> {
    let defaults = serde_json::to_value(CasebookSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: CasebookSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Reject values no component can work with.
fn validate(settings: &CasebookSettings) -> Result<()> {
    if settings.database.pool_size == 0 {
        return Err(SettingsError::InvalidValue(
            "database.poolSize must be at least 1".to_string(),
        ));
    }
    if settings.database.path.trim().is_empty() {
        return Err(SettingsError::InvalidValue(
            "database.path must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Apply environment variable overrides to loaded settings.
///
/// Invalid values are ignored with a warning (fall back to file/default).
pub fn apply_env_overrides(settings: &mut CasebookSettings) {
    if let Some(v) = read_env_string("CASEBOOK_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("CASEBOOK_PORT", 0, 65535) {
        settings.server.port = v;
    }
    if let Some(v) = read_env_string("CASEBOOK_DB_PATH") {
        settings.database.path = v;
    }
    if let Some(v) = read_env_u32("CASEBOOK_POOL_SIZE", 1, 256) {
        settings.database.pool_size = v;
    }
    if let Some(v) = read_env_string("CASEBOOK_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_bool("CASEBOOK_LOG_JSON") {
        settings.logging.json = v;
    }
    if let Some(v) = read_env_bool("CASEBOOK_RECOMPUTE_ON_DELETE") {
        settings.workflow.recompute_progress_on_delete = v;
    }
}

/// Resolve the database path: absolute paths pass through, relative ones
/// land under `~/.casebook`.
pub fn resolve_db_path(settings: &CasebookSettings) -> PathBuf {
    let path = PathBuf::from(&settings.database.path);
    if path.is_absolute() {
        path
    } else {
        casebook_home().join(path)
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}
