//! SQL data access layer for cases and everything a case owns.
//!
//! All methods take a `&Connection` parameter and are stateless: pure
//! functions that translate between Rust types and SQL. Transactions are the
//! caller's concern; pass a `&Transaction` (it derefs to `&Connection`) to
//! group several calls atomically.

mod activity;
mod calendar;
mod cases;
mod milestones;
mod records;
mod steps;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

/// Case repository for SQL CRUD operations.
pub struct CaseRepository;

/// Parse a JSON array string into a `Vec<String>`.
fn parse_id_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Serialize ids to a JSON array string.
fn id_list_to_json(ids: &[String]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

/// Parse optional JSON metadata.
fn parse_metadata(json: Option<String>) -> Option<serde_json::Value> {
    json.and_then(|s| serde_json::from_str(&s).ok())
}

/// Trim a free-text field, mapping blank input to `None`.
pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
